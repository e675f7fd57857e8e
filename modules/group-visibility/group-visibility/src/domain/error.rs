//! Domain errors for group visibility.

use std::time::Duration;

use group_visibility_sdk::GroupVisibilityError;
use thiserror::Error;

/// Domain-level errors for group visibility operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Malformed context key from the caller
    #[error("invalid context: {reason}")]
    InvalidContext { reason: String },

    /// Grant payload kind the resolver cannot interpret
    #[error("unsupported grant payload: {kind}")]
    UnsupportedGrant { kind: String },

    /// Resolution exceeded the configured limit
    #[error("resolution timed out after {elapsed:?}")]
    Timeout { elapsed: Duration },

    /// Error from a directory or store backend
    #[error("backend error: {0}")]
    Backend(#[from] GroupVisibilityError),
}

/// Convert domain errors to SDK errors for API boundary.
impl From<DomainError> for GroupVisibilityError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidContext { reason } => GroupVisibilityError::InvalidContext { reason },
            DomainError::UnsupportedGrant { kind } => GroupVisibilityError::UnsupportedGrant { kind },
            DomainError::Timeout { elapsed } => GroupVisibilityError::Timeout { elapsed },
            DomainError::Backend(err) => err,
        }
    }
}
