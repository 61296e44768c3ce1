//! IDF helpers: corpus IDF computation and external IDF normalization.
//!
//! Entities can be weighted by two IDF sources that live on different
//! scales: the corpus IDF and a general-language table whose known maximum
//! is [`EXTERNAL_MAX_IDF`]. Blending maps the external value onto the
//! corpus scale first, then takes the geometric mean:
//!
//! ```text
//! rescale(raw, m)   = (raw / EXTERNAL_MAX) * m
//! blend(c, None, m) = c
//! blend(c, e, m)    = sqrt(c * rescale(e, m))
//! ```

use serde::{Deserialize, Serialize};

use crate::constants::EXTERNAL_MAX_IDF;
use crate::errors::ScoreError;

/// Compute the corpus IDF of a token.
///
/// ```text
/// IDF(t) = log10((N + 1) / df(t))
/// ```
///
/// Where:
/// - N = total number of documents
/// - df(t) = number of documents containing t
///
/// This belongs to the indexing side; the scorer only reads precomputed
/// values.
///
/// # Errors
///
/// Returns [`ScoreError::InvalidInput`] if `docs_containing_term` is 0.
pub fn compute_idf(docs_containing_term: u64, total_docs: u64) -> Result<f64, ScoreError> {
    if docs_containing_term == 0 {
        return Err(ScoreError::invalid_input(
            "cannot compute idf for a token with zero postings",
            "Only compute idf for tokens that occur in at least one document",
        ));
    }
    Ok(((total_docs as f64 + 1.0) / docs_containing_term as f64).log10())
}

/// Map a raw external IDF onto the corpus scale using [`EXTERNAL_MAX_IDF`].
#[inline]
pub fn rescale(raw_idf: f64, corpus_max_idf: f64) -> f64 {
    IdfNormalizer::default().rescale(raw_idf, corpus_max_idf)
}

/// Combine a corpus IDF with an optional external IDF using [`EXTERNAL_MAX_IDF`].
#[inline]
pub fn blend(corpus_idf: f64, external_idf: Option<f64>, corpus_max_idf: f64) -> f64 {
    IdfNormalizer::default().blend(corpus_idf, external_idf, corpus_max_idf)
}

/// Rescales external IDF values and blends them with corpus IDF values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IdfNormalizer {
    /// Maximum value of the external table's scale.
    pub external_max: f64,
}

impl Default for IdfNormalizer {
    fn default() -> Self {
        Self {
            external_max: EXTERNAL_MAX_IDF,
        }
    }
}

impl IdfNormalizer {
    /// Create a normalizer for an external table with the given maximum.
    pub fn new(external_max: f64) -> Self {
        Self { external_max }
    }

    /// Linearly map `raw_idf` from the external scale onto `[0, corpus_max_idf]`.
    ///
    /// Values above the external maximum extrapolate; they are not clamped.
    #[inline]
    pub fn rescale(&self, raw_idf: f64, corpus_max_idf: f64) -> f64 {
        (raw_idf / self.external_max) * corpus_max_idf
    }

    /// Geometric mean of the corpus IDF and the rescaled external IDF.
    ///
    /// A missing external value means no extra evidence, so the corpus IDF
    /// is returned unchanged. A zero corpus IDF always yields zero.
    #[inline]
    pub fn blend(&self, corpus_idf: f64, external_idf: Option<f64>, corpus_max_idf: f64) -> f64 {
        match external_idf {
            None => corpus_idf,
            Some(raw) => (corpus_idf * self.rescale(raw, corpus_max_idf)).sqrt(),
        }
    }
}
