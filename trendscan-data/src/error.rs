use crate::interval::Interval;
use trendscan_integration::error::SocketError;
use thiserror::Error;

/// All errors generated in `trendscan-data`.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum DataError {
    #[error("no_data")]
    NoData,

    #[error("missing_close_cols: {columns:?}")]
    MissingCloseField { columns: Vec<String> },

    #[error("invalid_series: {0}")]
    InvalidSeries(String),

    #[error("invalid_interval: {0}")]
    InvalidInterval(String),

    #[error("unsupported_interval: no native interval divides {0}")]
    UnsupportedInterval(Interval),

    #[error("resample_error: {0}")]
    Resample(String),

    #[error("provider_error: {0}")]
    Provider(String),

    #[error("download_error: {0}")]
    Socket(String),
}

impl From<SocketError> for DataError {
    fn from(value: SocketError) -> Self {
        Self::Socket(value.to_string())
    }
}
