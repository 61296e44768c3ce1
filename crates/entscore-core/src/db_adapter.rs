//! Adapter layer for entscore-db storage.
//!
//! This module bridges entscore-db implementations with entscore-core's
//! scoring traits. It provides:
//!
//! - Error conversion from `DbError` to `ScoreError`
//! - `DbFrequencyIndex` - implements [`FrequencyIndex`] over `FrequencyTables`
//! - `DbExternalIdf` - implements [`ExternalIdfSource`] over `ExternalIdfTable`
//! - Corpus statistics derived from the stored tables
//!
//! ## Architecture
//!
//! ```text
//! Scorer (scorer.rs)
//!        ↓
//!   FrequencyIndex / ExternalIdfSource (index.rs)
//!        ↓
//!   db_adapter (this module) - wrappers + conversions
//!        ↓
//!   entscore-db (tables, snapshots, external IDF files)
//! ```

use std::path::Path;

use entscore_db::{ExternalIdfTable, FrequencyTables, TableStats};

use crate::errors::ScoreError;
use crate::index::{DocumentFrequencies, ExternalIdfSource, FrequencyIndex, TokenRow};
use crate::stats::CorpusStats;

// ============================================================================
// Error Conversion
// ============================================================================

/// Convert an entscore-db error to an entscore-core error.
pub fn from_db_error(err: entscore_db::DbError) -> ScoreError {
    use entscore_db::DbError;

    match err {
        DbError::TableIo { path, message } => ScoreError::IndexIo { path, message },
        DbError::TableParse { path, message } => ScoreError::IndexParse { path, message },
        DbError::InvalidRow { key, message } => ScoreError::InvalidIndexRow { key, message },
        DbError::ExternalParse {
            path,
            line,
            message,
        } => ScoreError::IndexParse {
            path,
            message: format!("line {}: {}", line, message),
        },
        DbError::Io(io_err) => ScoreError::Io(io_err),
        DbError::Json(json_err) => ScoreError::Json(json_err),
    }
}

/// Extension trait to convert DbResult to Result<T, ScoreError>.
pub trait IntoScoreResult<T> {
    /// Convert a DbResult to a ScoreError result.
    fn into_score_result(self) -> Result<T, ScoreError>;
}

impl<T> IntoScoreResult<T> for entscore_db::DbResult<T> {
    fn into_score_result(self) -> Result<T, ScoreError> {
        self.map_err(from_db_error)
    }
}

// ============================================================================
// Corpus Statistics
// ============================================================================

/// Derive validated corpus statistics from table statistics.
///
/// # Errors
///
/// Returns [`ScoreError::InvalidInput`] for empty tables or tables whose
/// documents all have length 0.
pub fn corpus_stats_from_tables(stats: &TableStats) -> Result<CorpusStats, ScoreError> {
    CorpusStats::new(
        stats.num_documents as u64,
        stats.avg_doc_length,
        stats.max_idf,
    )
}

// ============================================================================
// Frequency Index Wrapper
// ============================================================================

/// [`FrequencyIndex`] backed by in-memory frequency tables.
#[derive(Debug, Clone)]
pub struct DbFrequencyIndex {
    tables: FrequencyTables,
}

impl DbFrequencyIndex {
    /// Wrap already loaded tables.
    pub fn new(tables: FrequencyTables) -> Self {
        Self { tables }
    }

    /// Load a snapshot from `index_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::IndexNotFound`] if no usable snapshot exists.
    pub fn open(index_dir: &Path) -> Result<Self, ScoreError> {
        entscore_db::load_tables(index_dir)
            .into_score_result()?
            .map(Self::new)
            .ok_or_else(|| ScoreError::IndexNotFound(index_dir.to_path_buf()))
    }

    /// The underlying tables.
    pub fn tables(&self) -> &FrequencyTables {
        &self.tables
    }

    /// Statistics of the underlying tables.
    pub fn table_stats(&self) -> TableStats {
        self.tables.stats()
    }

    /// Corpus statistics derived from the underlying tables.
    pub fn corpus_stats(&self) -> Result<CorpusStats, ScoreError> {
        corpus_stats_from_tables(&self.tables.stats())
    }
}

impl FrequencyIndex for DbFrequencyIndex {
    fn length_of(&self, doc_id: &str) -> Result<Option<u64>, ScoreError> {
        Ok(self.tables.document_length(doc_id))
    }

    fn idf_of(&self, term: &str) -> Result<Option<f64>, ScoreError> {
        Ok(self.tables.term_idf(term))
    }

    fn term_frequency(&self, term: &str, doc_id: &str) -> Result<Option<u64>, ScoreError> {
        Ok(self.tables.term_frequency(term, doc_id))
    }

    fn entity_idf_of(&self, entity: &str) -> Result<Option<f64>, ScoreError> {
        Ok(self.tables.entity_idf(entity))
    }

    fn entity_frequency(&self, entity: &str, doc_id: &str) -> Result<Option<u64>, ScoreError> {
        Ok(self.tables.entity_frequency(entity, doc_id))
    }

    fn fetch_document(
        &self,
        doc_id: &str,
        terms: &[&str],
        entities: &[&str],
    ) -> Result<DocumentFrequencies, ScoreError> {
        let tables = &self.tables;
        Ok(DocumentFrequencies {
            doc_length: tables.document_length(doc_id),
            terms: terms
                .iter()
                .map(|term| TokenRow {
                    tf: tables.term_frequency(term, doc_id),
                    idf: tables.term_idf(term),
                })
                .collect(),
            entities: entities
                .iter()
                .map(|entity| TokenRow {
                    tf: tables.entity_frequency(entity, doc_id),
                    idf: tables.entity_idf(entity),
                })
                .collect(),
        })
    }
}

// ============================================================================
// External IDF Wrapper
// ============================================================================

/// [`ExternalIdfSource`] backed by a parsed external IDF table.
#[derive(Debug, Clone)]
pub struct DbExternalIdf {
    table: ExternalIdfTable,
}

impl DbExternalIdf {
    /// Wrap an already parsed table.
    pub fn new(table: ExternalIdfTable) -> Self {
        Self { table }
    }

    /// Read an external IDF table whose known maximum is `scale`.
    pub fn open(path: &Path, scale: f64) -> Result<Self, ScoreError> {
        ExternalIdfTable::from_path(path, scale)
            .into_score_result()
            .map(Self::new)
    }

    /// Number of entries in the table.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl ExternalIdfSource for DbExternalIdf {
    fn external_idf(&self, entity: &str) -> Option<f64> {
        self.table.get(entity)
    }

    fn scale(&self) -> f64 {
        self.table.scale()
    }
}
