use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a bar series cannot be analysed, checked in declaration order.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize, Serialize, Error)]
pub enum AnalysisError {
    #[error("no_data")]
    NoData,

    #[error("too_few_rows: {rows} < {min_rows}")]
    InsufficientRows { rows: usize, min_rows: usize },

    #[error("insufficient_ma{window_len}_rows: {rows}")]
    InsufficientMaHistory { rows: usize, window_len: usize },
}
