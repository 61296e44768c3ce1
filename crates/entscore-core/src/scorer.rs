//! BM25+ scoring with entity-aware IDF.
//!
//! Implements the BM25+ (delta-smoothed) scoring function:
//!
//! ```text
//! score(D, Q) = Σ IDF(q_i) * ( f(q_i, D) * (k1 + 1) / (f(q_i, D) + k1 * (1 - b + b * |D| / avgdl)) + δ )
//! ```
//!
//! Where:
//! - f(q_i, D) = frequency of query token q_i in document D
//! - |D| = document length (in words)
//! - avgdl = average document length in the corpus
//! - k1 = term frequency saturation parameter (default: 1.2)
//! - b = document length normalization parameter (default: 0.75)
//! - δ = additive floor (default: 1.0)
//!
//! Query tokens come in two kinds, plain terms and named entities. Both go
//! through the same summand. Entities may additionally have their IDF
//! blended with an external general-language IDF (see [`crate::idf`]).

use serde::{Deserialize, Serialize};

use crate::config::ScoringConfig;
use crate::constants::{DEFAULT_B, DEFAULT_DELTA, DEFAULT_K1};
use crate::errors::ScoreError;
use crate::idf::IdfNormalizer;
use crate::index::{ExternalIdfSource, FrequencyIndex, TokenRow};
use crate::stats::CorpusStats;

/// BM25+ scoring parameters.
///
/// Fixed per deployment; every call made by one [`Scorer`] uses the same values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bm25PlusParams {
    /// Term frequency saturation parameter.
    /// Higher values give more weight to term frequency.
    pub k1: f64,

    /// Document length normalization parameter.
    /// 0 = no normalization, 1 = full normalization.
    pub b: f64,

    /// Additive floor applied to every token with a non-zero IDF.
    pub delta: f64,
}

impl Default for Bm25PlusParams {
    fn default() -> Self {
        Self {
            k1: DEFAULT_K1,
            b: DEFAULT_B,
            delta: DEFAULT_DELTA,
        }
    }
}

/// Which IDF an entity token is weighted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityIdfMode {
    /// Corpus IDF only, the same as plain terms.
    #[default]
    Corpus,
    /// Geometric mean of corpus IDF and rescaled external IDF.
    Blended,
}

impl std::fmt::Display for EntityIdfMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Corpus => write!(f, "corpus"),
            Self::Blended => write!(f, "blended"),
        }
    }
}

impl std::str::FromStr for EntityIdfMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "corpus" => Ok(Self::Corpus),
            "blended" | "blend" => Ok(Self::Blended),
            _ => Err(format!(
                "Unknown entity idf mode: '{}'. Use 'corpus' or 'blended'.",
                s
            )),
        }
    }
}

/// Calculate the BM25+ contribution of a single query token.
///
/// # Arguments
///
/// * `tf` - Frequency of the token in the document
/// * `idf` - IDF of the token
/// * `doc_length` - Length of the document (in words)
/// * `avg_length` - Average document length in the corpus
/// * `params` - BM25+ parameters (k1, b, delta)
///
/// With `tf = 0` the result is exactly `idf * delta`, including for an
/// empty document under full length normalization (`b = 1`), where the
/// denominator would otherwise be 0.
#[inline]
pub fn summand(tf: u64, idf: f64, doc_length: u64, avg_length: f64, params: &Bm25PlusParams) -> f64 {
    if tf == 0 {
        return idf * params.delta;
    }

    let tf = tf as f64;
    let dl = doc_length as f64;
    let k1 = params.k1;
    let b = params.b;

    let numerator = tf * (k1 + 1.0);
    let denominator = tf + k1 * (1.0 - b + b * (dl / avg_length));

    idf * (numerator / denominator + params.delta)
}

/// Scores one document at a time against a query of terms and entities.
///
/// Holds only shared references to its collaborators, so it is `Send + Sync`
/// and carries no state between calls.
pub struct Scorer<'a, I: FrequencyIndex + ?Sized> {
    index: &'a I,
    external: Option<&'a dyn ExternalIdfSource>,
    params: Bm25PlusParams,
    entity_idf: EntityIdfMode,
}

impl<'a, I: FrequencyIndex + ?Sized> Scorer<'a, I> {
    /// Create a scorer with default parameters and corpus-only entity IDF.
    pub fn new(index: &'a I) -> Self {
        Self {
            index,
            external: None,
            params: Bm25PlusParams::default(),
            entity_idf: EntityIdfMode::Corpus,
        }
    }

    /// Create a scorer from the `scoring` config section.
    pub fn from_config(index: &'a I, config: &ScoringConfig) -> Self {
        Self::new(index)
            .with_params(config.params())
            .with_entity_idf_mode(config.entity_idf)
    }

    /// Set the BM25+ parameters.
    pub fn with_params(mut self, params: Bm25PlusParams) -> Self {
        self.params = params;
        self
    }

    /// Attach an external IDF source for blended entity weighting.
    pub fn with_external_idf(mut self, source: &'a dyn ExternalIdfSource) -> Self {
        self.external = Some(source);
        self
    }

    /// Choose how entity IDF is computed.
    pub fn with_entity_idf_mode(mut self, mode: EntityIdfMode) -> Self {
        self.entity_idf = mode;
        self
    }

    /// The BM25+ parameters in use.
    pub fn params(&self) -> &Bm25PlusParams {
        &self.params
    }

    /// The entity IDF mode in use.
    pub fn entity_idf_mode(&self) -> EntityIdfMode {
        self.entity_idf
    }

    /// Compute the relevance score of `doc_id` for a query.
    ///
    /// Terms and entities are summed in order; repeated tokens contribute
    /// once per occurrence in the query. Tokens unknown to the index
    /// contribute nothing (their IDF defaults to 0).
    ///
    /// # Errors
    ///
    /// - [`ScoreError::InvalidInput`] if `stats` violates a precondition
    /// - [`ScoreError::DocumentNotFound`] if the document has no length record
    /// - Any error raised by the index lookup
    pub fn score<T, E>(
        &self,
        doc_id: &str,
        terms: &[T],
        entities: &[E],
        stats: &CorpusStats,
    ) -> Result<f64, ScoreError>
    where
        T: AsRef<str>,
        E: AsRef<str>,
    {
        stats.validate()?;

        let term_keys: Vec<&str> = terms.iter().map(AsRef::as_ref).collect();
        let entity_keys: Vec<&str> = entities.iter().map(AsRef::as_ref).collect();

        let rows = self
            .index
            .fetch_document(doc_id, &term_keys, &entity_keys)?;

        let doc_length = rows
            .doc_length
            .ok_or_else(|| ScoreError::DocumentNotFound {
                doc_id: doc_id.to_string(),
            })?;

        if rows.terms.len() != term_keys.len() || rows.entities.len() != entity_keys.len() {
            return Err(ScoreError::InvalidIndexRow {
                key: doc_id.to_string(),
                message: format!(
                    "index returned {} term rows and {} entity rows for {} terms and {} entities",
                    rows.terms.len(),
                    rows.entities.len(),
                    term_keys.len(),
                    entity_keys.len()
                ),
            });
        }

        let mut score = 0.0;

        for (term, row) in term_keys.iter().zip(&rows.terms) {
            let (tf, idf) = unpack(row);
            let contribution = summand(tf, idf, doc_length, stats.avg_length, &self.params);
            tracing::trace!(doc_id, term, tf, idf, contribution, "term summand");
            score += contribution;
        }

        for (entity, row) in entity_keys.iter().zip(&rows.entities) {
            let (tf, corpus_idf) = unpack(row);
            let idf = self.entity_weight(entity, corpus_idf, stats.max_idf);
            let contribution = summand(tf, idf, doc_length, stats.avg_length, &self.params);
            tracing::trace!(doc_id, entity, tf, corpus_idf, idf, contribution, "entity summand");
            score += contribution;
        }

        tracing::debug!(
            "Scored {} ({} terms, {} entities): {}",
            doc_id,
            term_keys.len(),
            entity_keys.len(),
            score
        );

        Ok(score)
    }

    fn entity_weight(&self, entity: &str, corpus_idf: f64, max_idf: f64) -> f64 {
        match (self.entity_idf, self.external) {
            (EntityIdfMode::Blended, Some(source)) => IdfNormalizer::new(source.scale()).blend(
                corpus_idf,
                source.external_idf(entity),
                max_idf,
            ),
            _ => corpus_idf,
        }
    }
}

/// Missing rows count as zero.
#[inline]
fn unpack(row: &TokenRow) -> (u64, f64) {
    (row.tf.unwrap_or(0), row.idf.unwrap_or(0.0))
}
