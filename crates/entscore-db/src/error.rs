//! Error types for entscore-db.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for entscore-db operations.
pub type DbResult<T> = Result<T, DbError>;

/// Errors that can occur in entscore-db operations.
#[derive(Debug, Error)]
pub enum DbError {
    // ========================================================================
    // Frequency table errors
    // ========================================================================
    /// Frequency table I/O error.
    #[error("Frequency table I/O error at {path}: {message}")]
    TableIo { path: PathBuf, message: String },

    /// Frequency table parse error.
    #[error("Frequency table parse error at {path}: {message}")]
    TableParse { path: PathBuf, message: String },

    /// A row carries a value the scorer cannot use.
    #[error("Invalid value for `{key}`: {message}")]
    InvalidRow { key: String, message: String },

    // ========================================================================
    // External IDF table errors
    // ========================================================================
    /// External IDF table line could not be parsed.
    #[error("External IDF table parse error at {path}:{line}: {message}")]
    ExternalParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    // ========================================================================
    // General errors
    // ========================================================================
    /// IO error wrapper.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error wrapper.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DbError {
    /// Create a table I/O error.
    pub fn table_io(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::TableIo {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a table parse error.
    pub fn table_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::TableParse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an invalid row error.
    pub fn invalid_row(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRow {
            key: key.into(),
            message: message.into(),
        }
    }
}
