//! External (general-language) IDF tables.
//!
//! The file format is one entry per line, the IDF value in the last
//! whitespace-separated column:
//!
//! ```text
//! # comments and blank lines are skipped
//! the        0.31
//! influenza  9.87
//! new york   7.12
//! ```
//!
//! Everything before the last column is the token, so multi-word entities
//! are allowed. Values live on the table's own scale, whose declared
//! maximum is supplied by the caller when the table is opened.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{DbError, DbResult};

/// An external IDF table with a declared maximum value.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalIdfTable {
    values: HashMap<String, f64>,
    scale: f64,
    observed_max: f64,
}

impl ExternalIdfTable {
    /// Build a table from `(token, idf)` pairs.
    pub fn from_pairs<I, S>(pairs: I, scale: f64) -> DbResult<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut values = HashMap::new();
        for (token, idf) in pairs {
            let token = token.into();
            if !idf.is_finite() || idf < 0.0 {
                return Err(DbError::invalid_row(
                    token,
                    format!("external idf {} must be finite and non-negative", idf),
                ));
            }
            values.insert(token, idf);
        }
        Self::with_values(values, scale)
    }

    /// Read a table from a file.
    pub fn from_path(path: &Path, scale: f64) -> DbResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            DbError::table_io(path, format!("Failed to read external IDF table: {}", e))
        })?;
        Self::parse(&content, path, scale)
    }

    /// Parse table content. `path` is only used in error messages.
    pub fn parse(content: &str, path: &Path, scale: f64) -> DbResult<Self> {
        let mut values = HashMap::new();

        for (idx, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parse_err = |message: String| DbError::ExternalParse {
                path: path.to_path_buf(),
                line: idx + 1,
                message,
            };

            let (token, value) = line
                .rsplit_once(char::is_whitespace)
                .ok_or_else(|| parse_err(format!("expected `<token> <idf>`, got `{}`", line)))?;
            let token = token.trim();
            if token.is_empty() {
                return Err(parse_err("missing token".to_string()));
            }
            let idf: f64 = value
                .parse()
                .map_err(|_| parse_err(format!("`{}` is not a number", value)))?;
            if !idf.is_finite() || idf < 0.0 {
                return Err(parse_err(format!(
                    "idf {} must be finite and non-negative",
                    idf
                )));
            }

            values.insert(token.to_string(), idf);
        }

        let table = Self::with_values(values, scale)?;
        tracing::debug!(
            "Parsed external IDF table {}: {} entries, max {:.3} (scale {})",
            path.display(),
            table.len(),
            table.observed_max,
            table.scale
        );
        Ok(table)
    }

    fn with_values(values: HashMap<String, f64>, scale: f64) -> DbResult<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(DbError::invalid_row(
                "scale",
                format!("declared external idf maximum {} must be finite and positive", scale),
            ));
        }
        let observed_max = values.values().copied().fold(0.0_f64, f64::max);
        if observed_max > scale {
            tracing::warn!(
                "External IDF table holds {:.3}, above its declared maximum {}; rescaled values will extrapolate",
                observed_max,
                scale
            );
        }
        Ok(Self {
            values,
            scale,
            observed_max,
        })
    }

    /// Raw IDF of a token on the table's own scale.
    pub fn get(&self, token: &str) -> Option<f64> {
        self.values.get(token).copied()
    }

    /// Declared maximum of the table's scale.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Largest value actually present in the table.
    pub fn observed_max(&self) -> f64 {
        self.observed_max
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
