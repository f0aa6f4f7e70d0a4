use crate::report::DeliveryError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::PathBuf;
use tracing::info;

/// Push destination for a rendered report.
#[async_trait]
pub trait NotificationSink {
    /// Deliver `payload` as a file named `filename`.
    async fn send(&self, payload: Vec<u8>, filename: &str) -> Result<(), DeliveryError>;
}

/// Writes reports into a directory, creating it if required.
#[derive(Debug, Clone)]
pub struct FileSink {
    directory: PathBuf,
}

impl FileSink {
    pub fn new<P>(directory: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self {
            directory: directory.into(),
        }
    }

    pub fn path(&self, filename: &str) -> PathBuf {
        self.directory.join(filename)
    }
}

#[async_trait]
impl NotificationSink for FileSink {
    async fn send(&self, payload: Vec<u8>, filename: &str) -> Result<(), DeliveryError> {
        tokio::fs::create_dir_all(&self.directory).await?;

        let path = self.path(filename);
        tokio::fs::write(&path, payload).await?;

        info!(path = %path.display(), "wrote report");
        Ok(())
    }
}

/// Records every delivery in memory.
#[derive(Debug, Default)]
pub struct VecSink {
    deliveries: Mutex<Vec<(String, Vec<u8>)>>,
}

impl VecSink {
    /// `(filename, payload)` of every delivery so far, in order.
    pub fn deliveries(&self) -> Vec<(String, Vec<u8>)> {
        self.deliveries.lock().clone()
    }
}

#[async_trait]
impl NotificationSink for VecSink {
    async fn send(&self, payload: Vec<u8>, filename: &str) -> Result<(), DeliveryError> {
        self.deliveries.lock().push((filename.to_string(), payload));
        Ok(())
    }
}
