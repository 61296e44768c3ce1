//! # entscore-db
//!
//! Storage layer for entscore - frequency tables and external IDF tables.
//!
//! This crate owns everything that touches disk, keeping the scoring kernel
//! in `entscore-core` free of file formats:
//!
//! - Frequency tables can be swapped for another store without changing the scorer
//! - Tests build tables in memory with the same API the loaders use
//!
//! ## Architecture
//!
//! ```text
//! entscore-cli → entscore-core → (FrequencyIndex / ExternalIdfSource traits)
//!                     ↑
//!                entscore-db (tables, snapshots, external IDF files)
//! ```
//!
//! ## Modules
//!
//! - `tables`: in-memory frequency tables and their statistics
//! - `storage`: bincode snapshots, JSON metadata, JSON import
//! - `external`: general-language IDF table parser

pub mod error;
pub mod external;
pub mod storage;
pub mod tables;

pub use error::{DbError, DbResult};
pub use external::ExternalIdfTable;
pub use storage::{
    delete_tables, import_json, load_meta, load_tables, save_tables, tables_exist, TablesMeta,
};
pub use tables::{FrequencyTables, TableStats};
