use crate::{
    report::{sink::NotificationSink, table::candidate_table},
    scan::ScanResult,
};
use thiserror::Error;
use tracing::info;
use trendscan_integration::error::SocketError;

/// [`NotificationSink`] trait plus the file & in-memory sinks.
pub mod sink;

/// Candidate table rendering, CSV encoding & console summary.
pub mod table;

/// [`TelegramSink`](telegram::TelegramSink) delivering reports as Telegram documents.
pub mod telegram;

/// Failure to deliver a report. Surfaced to the caller, never retried.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum DeliveryError {
    /// The sink answered but refused the payload. Carries the sink's raw response.
    #[error("delivery rejected (status={status:?}): {response}")]
    Rejected {
        status: Option<u16>,
        response: String,
    },

    #[error("delivery transport error: {0}")]
    Transport(String),

    #[error("failed to encode report: {0}")]
    Encode(String),

    #[error("failed to write report: {0}")]
    Io(String),
}

impl From<SocketError> for DeliveryError {
    fn from(error: SocketError) -> Self {
        match error {
            SocketError::HttpResponse(status, response) => Self::Rejected {
                status: Some(status.as_u16()),
                response,
            },
            error => match error.payload() {
                Some(response) => Self::Rejected {
                    status: None,
                    response,
                },
                None => Self::Transport(error.to_string()),
            },
        }
    }
}

impl From<std::io::Error> for DeliveryError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

/// Result of a successful [`Reporter::report`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DeliveryOutcome {
    /// No candidates, so no artifact was produced and the sink was not called.
    Skipped,
    Delivered { rows: usize },
}

/// Renders a [`ScanResult`] as a CSV table and delivers it to a [`NotificationSink`].
#[derive(Debug, Clone)]
pub struct Reporter<Sink> {
    sink: Sink,
    filename: String,
}

impl<Sink> Reporter<Sink> {
    pub fn new<S>(sink: Sink, filename: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            sink,
            filename: filename.into(),
        }
    }

    pub fn sink(&self) -> &Sink {
        &self.sink
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }
}

impl<Sink> Reporter<Sink>
where
    Sink: NotificationSink + Sync,
{
    pub async fn report(&self, result: &ScanResult) -> Result<DeliveryOutcome, DeliveryError> {
        if result.is_empty() {
            info!("no candidates, skipping report delivery");
            return Ok(DeliveryOutcome::Skipped);
        }

        let payload = table::to_csv_bytes(&candidate_table(result))?;
        self.sink.send(payload, &self.filename).await?;

        info!(
            rows = result.len(),
            filename = %self.filename,
            "delivered candidate report"
        );

        Ok(DeliveryOutcome::Delivered { rows: result.len() })
    }
}
