//! Corpus-wide statistics supplied by the caller.

use serde::{Deserialize, Serialize};

use crate::errors::ScoreError;

/// Aggregates the formula needs, computed once per query or session.
///
/// The scorer never mutates these; recompute them when the corpus changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpusStats {
    /// Number of documents in the corpus.
    pub total_docs: u64,
    /// Average document length in words.
    pub avg_length: f64,
    /// Largest corpus IDF; the target scale for external IDF values.
    pub max_idf: f64,
}

impl CorpusStats {
    /// Create validated corpus statistics.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::InvalidInput`] if any precondition of
    /// [`CorpusStats::validate`] fails.
    pub fn new(total_docs: u64, avg_length: f64, max_idf: f64) -> Result<Self, ScoreError> {
        let stats = Self {
            total_docs,
            avg_length,
            max_idf,
        };
        stats.validate()?;
        Ok(stats)
    }

    /// Check the preconditions of the scoring formula.
    ///
    /// - `total_docs` must be at least 1
    /// - `avg_length` must be finite and positive (it is a divisor)
    /// - `max_idf` must be finite and non-negative
    pub fn validate(&self) -> Result<(), ScoreError> {
        if self.total_docs == 0 {
            return Err(ScoreError::invalid_input(
                "total document count is 0",
                "Corpus statistics need at least one document",
            ));
        }
        if !self.avg_length.is_finite() || self.avg_length <= 0.0 {
            return Err(ScoreError::invalid_input(
                format!("average document length {} is not positive", self.avg_length),
                "Compute the average over documents with a length record",
            ));
        }
        if !self.max_idf.is_finite() || self.max_idf < 0.0 {
            return Err(ScoreError::invalid_input(
                format!("max corpus idf {} is not a finite non-negative number", self.max_idf),
                "Use the largest idf value stored in the corpus tables",
            ));
        }
        Ok(())
    }
}
