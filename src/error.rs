//! Error types for the Raven library.
//!
//! All fallible operations return [`Result`], whose error type is the
//! [`RavenError`] enum.
//!
//! # Examples
//!
//! ```
//! use raven::error::{RavenError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(RavenError::invalid_config("max_segment_size must be positive"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Raven operations.
#[derive(Error, Debug)]
pub enum RavenError {
    /// I/O errors (directory creation, page reads and writes)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors (page encoding)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Page store errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Index-related errors
    #[error("Index error: {0}")]
    Index(String),

    /// Analysis-related errors (tokenization, filtering, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Membership filter errors.
    ///
    /// Kept apart from a negative membership answer so callers can tell
    /// "term absent" from "filter unusable".
    #[error("Filter error: {0}")]
    Filter(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with RavenError.
pub type Result<T> = std::result::Result<T, RavenError>;

impl RavenError {
    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        RavenError::Storage(msg.into())
    }

    /// Create a new index error.
    pub fn index<S: Into<String>>(msg: S) -> Self {
        RavenError::Index(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        RavenError::Analysis(msg.into())
    }

    /// Create a new membership filter error.
    pub fn filter<S: Into<String>>(msg: S) -> Self {
        RavenError::Filter(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        RavenError::InvalidConfig(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        RavenError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = RavenError::index("Test index error");
        assert_eq!(error.to_string(), "Index error: Test index error");

        let error = RavenError::filter("bit 12 out of range");
        assert_eq!(error.to_string(), "Filter error: bit 12 out of range");

        let error = RavenError::invalid_config("growth_factor must be >= 1");
        assert_eq!(
            error.to_string(),
            "Invalid configuration: growth_factor must be >= 1"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let raven_error = RavenError::from(io_error);

        match raven_error {
            RavenError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<u64>("not a number").unwrap_err();
        let raven_error = RavenError::from(json_error);

        assert!(matches!(raven_error, RavenError::Json(_)));
    }
}
