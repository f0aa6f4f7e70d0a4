use crate::{config::ConfigError, report::DeliveryError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrendscanError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("delivery: {0}")]
    Delivery(#[from] DeliveryError),
}
