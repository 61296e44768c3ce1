//! In-memory frequency tables.
//!
//! Holds the rows produced by the offline indexing job:
//! - Document lengths (doc id → word count)
//! - Term and entity postings (token → doc id → frequency)
//! - Precomputed corpus IDF for terms and entities
//!
//! Lookups distinguish an absent row (`None`) from a stored zero. Turning
//! absence into a zero contribution is the scorer's job, not this layer's.

use std::collections::HashMap;

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::error::{DbError, DbResult};

/// Precomputed frequency tables for one corpus.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
#[serde(rename_all = "camelCase")]
pub struct FrequencyTables {
    /// Document id → length in words.
    #[serde(default)]
    document_lengths: HashMap<String, u64>,
    /// Term → (document id → frequency).
    #[serde(default)]
    term_frequencies: HashMap<String, HashMap<String, u64>>,
    /// Entity → (document id → frequency).
    #[serde(default)]
    entity_frequencies: HashMap<String, HashMap<String, u64>>,
    /// Term → corpus IDF.
    #[serde(default)]
    term_idf: HashMap<String, f64>,
    /// Entity → corpus IDF.
    #[serde(default)]
    entity_idf: HashMap<String, f64>,
}

impl FrequencyTables {
    /// Create empty tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the length of a document, replacing any previous value.
    pub fn insert_document_length(&mut self, doc_id: impl Into<String>, length: u64) {
        self.document_lengths.insert(doc_id.into(), length);
    }

    /// Set how often `term` occurs in `doc_id`.
    pub fn insert_term_frequency(
        &mut self,
        term: impl Into<String>,
        doc_id: impl Into<String>,
        frequency: u64,
    ) {
        self.term_frequencies
            .entry(term.into())
            .or_default()
            .insert(doc_id.into(), frequency);
    }

    /// Set how often `entity` occurs in `doc_id`.
    pub fn insert_entity_frequency(
        &mut self,
        entity: impl Into<String>,
        doc_id: impl Into<String>,
        frequency: u64,
    ) {
        self.entity_frequencies
            .entry(entity.into())
            .or_default()
            .insert(doc_id.into(), frequency);
    }

    /// Set the corpus IDF of a term.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::InvalidRow`] if `idf` is negative or not finite.
    pub fn insert_term_idf(&mut self, term: impl Into<String>, idf: f64) -> DbResult<()> {
        let term = term.into();
        check_idf(&term, idf)?;
        self.term_idf.insert(term, idf);
        Ok(())
    }

    /// Set the corpus IDF of an entity.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::InvalidRow`] if `idf` is negative or not finite.
    pub fn insert_entity_idf(&mut self, entity: impl Into<String>, idf: f64) -> DbResult<()> {
        let entity = entity.into();
        check_idf(&entity, idf)?;
        self.entity_idf.insert(entity, idf);
        Ok(())
    }

    /// Length of a document, if a length row exists.
    pub fn document_length(&self, doc_id: &str) -> Option<u64> {
        self.document_lengths.get(doc_id).copied()
    }

    /// Frequency of `term` in `doc_id`, if a row exists.
    pub fn term_frequency(&self, term: &str, doc_id: &str) -> Option<u64> {
        self.term_frequencies
            .get(term)
            .and_then(|postings| postings.get(doc_id))
            .copied()
    }

    /// Frequency of `entity` in `doc_id`, if a row exists.
    pub fn entity_frequency(&self, entity: &str, doc_id: &str) -> Option<u64> {
        self.entity_frequencies
            .get(entity)
            .and_then(|postings| postings.get(doc_id))
            .copied()
    }

    /// Corpus IDF of a term, if a row exists.
    pub fn term_idf(&self, term: &str) -> Option<f64> {
        self.term_idf.get(term).copied()
    }

    /// Corpus IDF of an entity, if a row exists.
    pub fn entity_idf(&self, entity: &str) -> Option<f64> {
        self.entity_idf.get(entity).copied()
    }

    /// Number of documents with a length row.
    pub fn num_documents(&self) -> usize {
        self.document_lengths.len()
    }

    /// Check if the tables hold no documents.
    pub fn is_empty(&self) -> bool {
        self.document_lengths.is_empty()
    }

    /// Check every stored IDF value.
    ///
    /// Deserialized tables bypass the `insert_*_idf` checks, so loaders call
    /// this before handing tables to the scorer.
    pub fn validate(&self) -> DbResult<()> {
        for (term, idf) in &self.term_idf {
            check_idf(term, *idf)?;
        }
        for (entity, idf) in &self.entity_idf {
            check_idf(entity, *idf)?;
        }
        Ok(())
    }

    /// Aggregate statistics over the tables.
    pub fn stats(&self) -> TableStats {
        let total_tokens: u64 = self.document_lengths.values().sum();
        let num_documents = self.document_lengths.len();
        let avg_doc_length = if num_documents == 0 {
            0.0
        } else {
            total_tokens as f64 / num_documents as f64
        };
        let max_idf = self
            .term_idf
            .values()
            .chain(self.entity_idf.values())
            .copied()
            .fold(0.0_f64, f64::max);

        TableStats {
            num_documents,
            term_vocabulary: self.term_idf.len().max(self.term_frequencies.len()),
            entity_vocabulary: self.entity_idf.len().max(self.entity_frequencies.len()),
            total_tokens,
            avg_doc_length,
            max_idf,
        }
    }
}

fn check_idf(key: &str, idf: f64) -> DbResult<()> {
    if !idf.is_finite() {
        return Err(DbError::invalid_row(key, format!("idf {} is not finite", idf)));
    }
    if idf < 0.0 {
        return Err(DbError::invalid_row(key, format!("idf {} is negative", idf)));
    }
    Ok(())
}

/// Statistics about a set of frequency tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableStats {
    /// Number of documents with a length row.
    pub num_documents: usize,
    /// Number of distinct terms.
    pub term_vocabulary: usize,
    /// Number of distinct entities.
    pub entity_vocabulary: usize,
    /// Sum of all document lengths.
    pub total_tokens: u64,
    /// Average document length (0 for empty tables).
    pub avg_doc_length: f64,
    /// Largest corpus IDF across terms and entities.
    pub max_idf: f64,
}
