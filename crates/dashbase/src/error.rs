//! Error types for the dashbase library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for dashbase operations.
#[derive(Debug, Error)]
pub enum DashbaseError {
    /// Error reading a local file handed to the ingestor.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Neither the declared type nor the file name identify CSV or JSON.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Malformed CSV/JSON input.
    #[error("Parse error: {details}")]
    Parse { details: String },

    /// Input parsed cleanly but produced no records.
    #[error("Empty dataset: {0}")]
    EmptyDataset(String),

    /// Unknown collection on read.
    #[error("Collection not found: {0}")]
    NotFound(String),

    /// Failure in the underlying persistence layer.
    #[error("Store error: {0}")]
    Store(String),
}

impl DashbaseError {
    /// Build a parse error from anything displayable.
    pub fn parse(details: impl Into<String>) -> Self {
        DashbaseError::Parse {
            details: details.into(),
        }
    }

    /// Returns true when the error was caused by the caller's input rather
    /// than by the store.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            DashbaseError::UnsupportedFormat(_)
                | DashbaseError::Parse { .. }
                | DashbaseError::EmptyDataset(_)
        )
    }
}

/// Result type alias for dashbase operations.
pub type Result<T> = std::result::Result<T, DashbaseError>;
