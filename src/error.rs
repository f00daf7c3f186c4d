use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CreditError>;

#[derive(Debug, Error)]
pub enum CreditError {
    /// Any violated input precondition. The reason is for the log only; users
    /// always see the same message.
    #[error("Incorrect parameters")]
    InvalidParameters { reason: String },

    #[error("output error: {0}")]
    Io(#[from] io::Error),
}

impl CreditError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        CreditError::InvalidParameters {
            reason: reason.into(),
        }
    }
}
