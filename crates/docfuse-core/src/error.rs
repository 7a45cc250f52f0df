use thiserror::Error;

use crate::types::IndexKind;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0} index is not fitted")]
    NotFitted(IndexKind),

    #[error("Encoding unavailable: {0}")]
    EncodingUnavailable(String),

    #[error("Record source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Malformed record: {0}")]
    Record(String),
}

impl Error {
    /// Whether the caller can keep serving results after this error.
    pub fn is_degradable(&self) -> bool {
        matches!(self, Error::EncodingUnavailable(_) | Error::SourceUnavailable(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
