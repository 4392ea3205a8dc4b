//! Errors surfaced by the client.

use prodtrack_core::DomainError;

/// Failure of a client call.
///
/// `Clone` so one failed stock query can be handed to every caller that was
/// waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("service unavailable: {0}")]
    Unavailable(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("parse error: {0}")]
    Parse(String),
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_))
    }
}

impl From<DomainError> for ClientError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::NotFound => ClientError::NotFound("resource".to_string()),
            other => ClientError::Validation(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            ClientError::Parse(value.to_string())
        } else {
            ClientError::Unavailable(value.to_string())
        }
    }
}
