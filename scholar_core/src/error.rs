//! Error types for the ScholarSource core
//!
//! The parser and domain filter are infallible; errors here cover the
//! cache storage layer (always swallowed at the cache boundary) and the
//! external pipeline invocation.

use thiserror::Error;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the ScholarSource core
#[derive(Error, Debug)]
pub enum Error {
    /// Cache storage errors (connectivity, malformed rows). Converted to
    /// a cache miss or a no-op at the `ResultCache` boundary and never
    /// surfaced past it.
    #[error("cache storage error: {0}")]
    Storage(String),

    /// The agent pipeline reported a failure instead of a usable report
    #[error("pipeline failure: {message}")]
    Pipeline { message: String },

    /// Result payload (de)serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a storage error from any displayable cause
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Create a pipeline failure from the report's error narration
    pub fn pipeline(message: impl Into<String>) -> Self {
        Self::Pipeline {
            message: message.into(),
        }
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Self::Storage(format!("database error: {err}"))
    }
}

impl From<chrono::ParseError> for Error {
    fn from(err: chrono::ParseError) -> Self {
        Self::Storage(format!("malformed timestamp: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display() {
        let error = Error::storage("connection refused");
        assert_eq!(error.to_string(), "cache storage error: connection refused");
    }

    #[test]
    fn test_pipeline_error_display() {
        let error = Error::pipeline("Cannot access provided resources");
        assert!(error.to_string().contains("Cannot access provided resources"));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
