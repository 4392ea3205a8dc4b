//! Errors of the inventory and cart domain.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Why an inventory or cart operation was refused.
///
/// Transport and availability failures are not here; the client crate has
/// its own error for those.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Bad input, such as a non-positive quantity or a nameless new part.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The request is well-formed but would break a stock rule.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An id that does not parse or is out of range.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// No inventory item or cart line has the given id.
    #[error("not found")]
    NotFound,

    /// The id is already taken, e.g. a second cart line with the same id.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    /// Stable snake_case code for the failure kind, as used in API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::InvariantViolation(_) => "invariant_violation",
            Self::InvalidId(_) => "invalid_id",
            Self::NotFound => "not_found",
            Self::Conflict(_) => "conflict",
        }
    }

    /// The message without the kind prefix `Display` adds.
    pub fn detail(&self) -> &str {
        match self {
            Self::Validation(msg)
            | Self::InvariantViolation(msg)
            | Self::InvalidId(msg)
            | Self::Conflict(msg) => msg,
            Self::NotFound => "not found",
        }
    }
}
