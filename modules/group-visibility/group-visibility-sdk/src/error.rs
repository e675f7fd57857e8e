//! Error types for the group visibility module.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when resolving group visibility.
///
/// Insufficient permission is never an error: it yields an empty result.
#[derive(Debug, Error)]
pub enum GroupVisibilityError {
    /// The caller supplied a malformed context key.
    #[error("invalid context: {reason}")]
    InvalidContext {
        /// What is missing or wrong.
        reason: String,
    },

    /// A stored grant payload kind is not handled by the resolver.
    #[error("unsupported grant payload: {kind}")]
    UnsupportedGrant {
        /// Tag of the grant that could not be interpreted.
        kind: String,
    },

    /// The external directory failed.
    #[error("directory error: {message}")]
    Directory {
        /// Error message
        message: String,
        /// Source error from the directory backend
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A permission, filter, subscriber or hierarchy store failed.
    #[error("store error: {message}")]
    Store {
        /// Error message
        message: String,
        /// Source error from the store backend
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The resolution did not complete within the configured limit.
    #[error("resolution timed out after {elapsed:?}")]
    Timeout {
        /// Configured limit that was exceeded.
        elapsed: Duration,
    },
}

impl GroupVisibilityError {
    /// Create a directory error with a message only.
    pub fn directory(message: impl Into<String>) -> Self {
        Self::Directory {
            message: message.into(),
            source: None,
        }
    }

    /// Create a directory error with a source error.
    pub fn directory_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Directory {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a store error with a message only.
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
            source: None,
        }
    }
}
