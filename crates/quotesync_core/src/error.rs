//! Error types for quotesync_core.

use thiserror::Error;

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in core operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed import payload. Surfaced immediately, never retried.
    #[error("invalid payload format: {0}")]
    InvalidFormat(String),

    /// Rejected user input (empty quote text or category).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// IO error while reading or writing a snapshot.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::InvalidFormat("not an array".to_string());
        assert_eq!(err.to_string(), "invalid payload format: not an array");

        let err = Error::InvalidInput("empty category".to_string());
        assert!(err.to_string().contains("empty category"));
    }
}
