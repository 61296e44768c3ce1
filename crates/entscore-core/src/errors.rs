//! Error types for entscore-core.

use std::path::PathBuf;

use thiserror::Error;

/// Domain-specific errors for scoring operations.
#[derive(Error, Debug)]
pub enum ScoreError {
    /// The document has no length row in the frequency index.
    ///
    /// Fatal for that scoring call: a score without a length would bias
    /// every summand. The caller decides whether to skip or abort.
    #[error("Document `{doc_id}` not found: no length record in the frequency index.")]
    DocumentNotFound {
        /// The document that could not be resolved.
        doc_id: String,
    },

    /// A numeric input violates a precondition of the formula.
    #[error("Invalid input: {message}. {hint}")]
    InvalidInput {
        /// Description of the invalid input.
        message: String,
        /// Actionable hint on how to fix it.
        hint: String,
    },

    /// A configuration value is invalid.
    #[error("Invalid configuration: {message}. {hint}")]
    InvalidConfiguration {
        /// Description of the invalid configuration.
        message: String,
        /// Actionable hint on how to fix it.
        hint: String,
    },

    /// Configuration file could not be read or parsed.
    #[error("Config invalid: {0}")]
    InvalidConfigFile(String),

    // =========================================================================
    // Index Errors
    // =========================================================================
    /// Frequency index I/O error.
    #[error("Frequency index I/O error at `{path}`: {message}")]
    IndexIo {
        /// Path to the index file or directory.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// Frequency index parse error.
    #[error("Frequency index parse error at `{path}`: {message}")]
    IndexParse {
        /// Path to the index file.
        path: PathBuf,
        /// Description of the parse error.
        message: String,
    },

    /// No frequency tables exist at the configured location.
    #[error("No frequency tables found at `{0}`. Run `entscore import` first.")]
    IndexNotFound(PathBuf),

    /// The index returned a row the scorer cannot use.
    #[error("Invalid index row `{key}`: {message}")]
    InvalidIndexRow {
        /// Token or document key of the row.
        key: String,
        /// Description of the problem.
        message: String,
    },

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScoreError {
    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_configuration(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Check if this error is a missing document.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::DocumentNotFound { .. })
    }
}
