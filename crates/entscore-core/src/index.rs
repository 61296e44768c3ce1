//! Read interfaces the scorer consumes.
//!
//! The scorer never talks to storage directly. It receives a
//! [`FrequencyIndex`] (and optionally an [`ExternalIdfSource`]) by reference
//! and asks for everything one document needs in a single batched call.
//!
//! ## Implementation Notes
//!
//! - Implementations must be thread-safe (`Send + Sync`); scoring runs in
//!   parallel across candidate documents.
//! - Lookups return `None` for a missing row. Absence must stay
//!   distinguishable from a stored zero at this layer.
//! - `fetch_document` must return one row per requested token, in request
//!   order, duplicates included.

use serde::{Deserialize, Serialize};

use crate::errors::ScoreError;

/// Frequency and IDF row for one query token in one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenRow {
    /// Occurrences of the token in the document, if a row exists.
    pub tf: Option<u64>,
    /// Corpus IDF of the token, if a row exists.
    pub idf: Option<f64>,
}

/// Everything the scorer needs about one document for one query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentFrequencies {
    /// Document length, if a length row exists.
    pub doc_length: Option<u64>,
    /// One row per query term, in query order.
    pub terms: Vec<TokenRow>,
    /// One row per query entity, in query order.
    pub entities: Vec<TokenRow>,
}

/// Point and batch lookups over precomputed frequency tables.
pub trait FrequencyIndex: Send + Sync {
    /// Length of a document in words.
    fn length_of(&self, doc_id: &str) -> Result<Option<u64>, ScoreError>;

    /// Corpus IDF of a plain term.
    fn idf_of(&self, term: &str) -> Result<Option<f64>, ScoreError>;

    /// Occurrences of a plain term in a document.
    fn term_frequency(&self, term: &str, doc_id: &str) -> Result<Option<u64>, ScoreError>;

    /// Corpus IDF of a named entity.
    fn entity_idf_of(&self, entity: &str) -> Result<Option<f64>, ScoreError>;

    /// Occurrences of a named entity in a document.
    fn entity_frequency(&self, entity: &str, doc_id: &str) -> Result<Option<u64>, ScoreError>;

    /// Fetch the length and every token row for one document at once.
    ///
    /// The default implementation issues one point lookup per row. Stores
    /// with a round-trip cost should override it with a bulk fetch.
    fn fetch_document(
        &self,
        doc_id: &str,
        terms: &[&str],
        entities: &[&str],
    ) -> Result<DocumentFrequencies, ScoreError> {
        let doc_length = self.length_of(doc_id)?;

        let terms = terms
            .iter()
            .map(|term| {
                Ok(TokenRow {
                    tf: self.term_frequency(term, doc_id)?,
                    idf: self.idf_of(term)?,
                })
            })
            .collect::<Result<Vec<_>, ScoreError>>()?;

        let entities = entities
            .iter()
            .map(|entity| {
                Ok(TokenRow {
                    tf: self.entity_frequency(entity, doc_id)?,
                    idf: self.entity_idf_of(entity)?,
                })
            })
            .collect::<Result<Vec<_>, ScoreError>>()?;

        Ok(DocumentFrequencies {
            doc_length,
            terms,
            entities,
        })
    }
}

/// General-language IDF values for entities, on their own scale.
pub trait ExternalIdfSource: Send + Sync {
    /// Raw external IDF of an entity.
    fn external_idf(&self, entity: &str) -> Option<f64>;

    /// Known maximum of the external scale.
    fn scale(&self) -> f64;
}
