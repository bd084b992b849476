//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid calling context: {0}")]
    InvalidContext(String),

    #[error("Invalid phone number: {0}")]
    InvalidPhone(String),

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Deal is already closed as {0}")]
    DealClosed(&'static str),
}

impl DomainError {
    /// Check if this error is a lifecycle violation (closed deal)
    pub fn is_lifecycle_violation(&self) -> bool {
        matches!(self, DomainError::DealClosed(_))
    }
}
