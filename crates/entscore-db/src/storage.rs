//! Frequency table snapshots and JSON import.
//!
//! Uses bincode v2 for the table snapshot and JSON for the metadata.
//! Storage layout:
//!
//! ```text
//! <index dir>/
//! ├── tables.bin        # Serialized FrequencyTables
//! └── meta.json         # Snapshot metadata (version, stats, build time)
//! ```

use std::fs;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use bincode::config;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DbError, DbResult};
use crate::tables::{FrequencyTables, TableStats};

/// Filename for the serialized tables.
const TABLES_FILENAME: &str = "tables.bin";

/// Filename for snapshot metadata.
const META_FILENAME: &str = "meta.json";

/// Snapshot metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TablesMeta {
    /// Snapshot format version.
    pub version: u32,
    /// Statistics about the tables at build time.
    pub stats: TableStats,
    /// When the snapshot was written.
    pub built_at: DateTime<Utc>,
}

impl TablesMeta {
    /// Current snapshot version.
    pub const CURRENT_VERSION: u32 = 1;

    /// Create metadata for a snapshot written now.
    pub fn new(stats: TableStats) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            stats,
            built_at: Utc::now(),
        }
    }
}

/// Get the tables file path inside an index directory.
pub fn tables_path(index_dir: &Path) -> PathBuf {
    index_dir.join(TABLES_FILENAME)
}

/// Get the metadata file path inside an index directory.
pub fn meta_path(index_dir: &Path) -> PathBuf {
    index_dir.join(META_FILENAME)
}

/// Save frequency tables to `index_dir`.
///
/// Creates the directory if it doesn't exist.
///
/// # Errors
///
/// Returns an error if:
/// - Directory creation fails
/// - Serialization fails
/// - File write fails
pub fn save_tables(tables: &FrequencyTables, index_dir: &Path) -> DbResult<()> {
    fs::create_dir_all(index_dir).map_err(|e| {
        DbError::table_io(index_dir, format!("Failed to create index directory: {}", e))
    })?;

    let tables_file = tables_path(index_dir);
    let file = fs::File::create(&tables_file).map_err(|e| {
        DbError::table_io(&tables_file, format!("Failed to create tables file: {}", e))
    })?;
    let mut writer = BufWriter::new(file);

    bincode::encode_into_std_write(tables, &mut writer, config::standard()).map_err(|e| {
        DbError::table_parse(&tables_file, format!("Failed to serialize tables: {}", e))
    })?;

    let stats = tables.stats();
    let meta = TablesMeta::new(stats.clone());
    let meta_file = meta_path(index_dir);
    let meta_json = serde_json::to_string_pretty(&meta)?;
    fs::write(&meta_file, meta_json).map_err(|e| {
        DbError::table_io(&meta_file, format!("Failed to write metadata: {}", e))
    })?;

    tracing::debug!(
        "Saved frequency tables to {}: {} docs, {} terms, {} entities",
        index_dir.display(),
        stats.num_documents,
        stats.term_vocabulary,
        stats.entity_vocabulary
    );

    Ok(())
}

/// Load frequency tables from `index_dir`.
///
/// Returns `Ok(None)` when no snapshot exists or when the snapshot was
/// written by an incompatible version.
///
/// # Errors
///
/// Returns an error if the snapshot exists but cannot be read or holds
/// invalid IDF values.
pub fn load_tables(index_dir: &Path) -> DbResult<Option<FrequencyTables>> {
    let tables_file = tables_path(index_dir);

    if !tables_file.exists() {
        tracing::debug!("No frequency tables found at {}", tables_file.display());
        return Ok(None);
    }

    if let Some(meta) = load_meta(index_dir)? {
        if meta.version != TablesMeta::CURRENT_VERSION {
            tracing::warn!(
                "Frequency table version mismatch: found {}, expected {}. Re-import the tables.",
                meta.version,
                TablesMeta::CURRENT_VERSION
            );
            return Ok(None);
        }
    }

    let file = fs::File::open(&tables_file).map_err(|e| {
        DbError::table_io(&tables_file, format!("Failed to open tables file: {}", e))
    })?;
    let mut reader = BufReader::new(file);

    let tables: FrequencyTables = bincode::decode_from_std_read(&mut reader, config::standard())
        .map_err(|e| {
            DbError::table_parse(&tables_file, format!("Failed to deserialize tables: {}", e))
        })?;
    tables.validate()?;

    tracing::debug!(
        "Loaded frequency tables from {}: {} docs",
        index_dir.display(),
        tables.num_documents()
    );

    Ok(Some(tables))
}

/// Load snapshot metadata without loading the tables.
pub fn load_meta(index_dir: &Path) -> DbResult<Option<TablesMeta>> {
    let meta_file = meta_path(index_dir);

    if !meta_file.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&meta_file).map_err(|e| {
        DbError::table_io(&meta_file, format!("Failed to read metadata: {}", e))
    })?;
    let meta: TablesMeta = serde_json::from_str(&content).map_err(|e| {
        DbError::table_parse(&meta_file, format!("Failed to parse metadata: {}", e))
    })?;

    Ok(Some(meta))
}

/// Check if a snapshot exists in `index_dir`.
pub fn tables_exist(index_dir: &Path) -> bool {
    tables_path(index_dir).exists()
}

/// Delete the snapshot files in `index_dir`.
pub fn delete_tables(index_dir: &Path) -> DbResult<()> {
    for path in [tables_path(index_dir), meta_path(index_dir)] {
        if path.exists() {
            fs::remove_file(&path).map_err(|e| {
                DbError::table_io(&path, format!("Failed to delete snapshot file: {}", e))
            })?;
        }
    }
    tracing::debug!("Deleted frequency tables at {}", index_dir.display());
    Ok(())
}

/// Read a JSON dump of precomputed rows.
///
/// The dump is the camelCase form of [`FrequencyTables`]:
///
/// ```json
/// {
///   "documentLengths": { "doc1": 120 },
///   "termFrequencies": { "virus": { "doc1": 3 } },
///   "entityFrequencies": { "sars-cov-2": { "doc1": 1 } },
///   "termIdf": { "virus": 0.42 },
///   "entityIdf": { "sars-cov-2": 2.9 }
/// }
/// ```
///
/// Missing sections default to empty.
pub fn import_json(path: &Path) -> DbResult<FrequencyTables> {
    let content = fs::read_to_string(path)
        .map_err(|e| DbError::table_io(path, format!("Failed to read JSON dump: {}", e)))?;
    let tables: FrequencyTables = serde_json::from_str(&content)
        .map_err(|e| DbError::table_parse(path, format!("Failed to parse JSON dump: {}", e)))?;
    tables.validate()?;

    tracing::debug!(
        "Imported {} documents from {}",
        tables.num_documents(),
        path.display()
    );

    Ok(tables)
}
