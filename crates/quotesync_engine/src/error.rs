//! Error types for the sync engine.

use quotesync_core::QuoteId;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur during sync operations.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The remote source could not be reached or failed the request.
    #[error("remote unavailable: {message}")]
    RemoteUnavailable {
        /// Error message.
        message: String,
        /// Whether the operation can be retried.
        retryable: bool,
    },

    /// A remote update or delete referenced an unknown id.
    ///
    /// Propagated to the caller, never retried.
    #[error("quote {0} not found on remote")]
    NotFound(QuoteId),

    /// Core store, payload, or persistence error.
    #[error(transparent)]
    Core(#[from] quotesync_core::Error),

    /// A sync cycle was requested while one was already in flight.
    #[error("invalid state transition from {from} to {to}")]
    InvalidStateTransition {
        /// Current state.
        from: String,
        /// Attempted target state.
        to: String,
    },
}

impl SyncError {
    /// Creates a retryable remote failure.
    pub fn remote_unavailable(message: impl Into<String>) -> Self {
        Self::RemoteUnavailable {
            message: message.into(),
            retryable: true,
        }
    }

    /// Creates a non-retryable remote failure.
    pub fn remote_fatal(message: impl Into<String>) -> Self {
        Self::RemoteUnavailable {
            message: message.into(),
            retryable: false,
        }
    }

    /// Returns true if this error can be retried.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            SyncError::RemoteUnavailable { retryable, .. } => *retryable,
            _ => false,
        }
    }
}
