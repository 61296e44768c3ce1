//! # entscore-core
//!
//! **Entity-aware BM25+ scoring** – core library.
//!
//! This crate scores a document against a query made of plain terms and
//! named entities, using BM25+ (BM25 with an additive δ floor). Entity IDF
//! can optionally be blended with an external general-language IDF table.
//!
//! ## Main Types
//!
//! - [`Scorer`] – scores one document against a query
//! - [`FrequencyIndex`] – read-only source of lengths, frequencies and IDF
//! - [`ExternalIdfSource`] – optional external IDF lookup for entities
//! - [`CorpusStats`] – document count, average length and max corpus IDF
//! - [`ScoreError`] – domain-specific error type
//!
//! ## Modules
//!
//! - [`scorer`] – BM25+ summand and the scorer
//! - [`idf`] – IDF computation, rescaling and blending
//! - [`index`] – index traits and batched row types
//! - [`db_adapter`] – index implementations over entscore-db tables
//! - [`ranking`] – scoring and sorting a candidate set
//! - [`config`] – configuration types
//!
//! ## Example
//!
//! ```ignore
//! use entscore_core::{DbFrequencyIndex, Scorer};
//! use std::path::Path;
//!
//! let index = DbFrequencyIndex::open(Path::new("index"))?;
//! let stats = index.corpus_stats()?;
//! let score = Scorer::new(&index).score("doc1", &["fever"], &["wuhan"], &stats)?;
//! ```

// Modules
pub mod config;
pub mod constants;
pub mod db_adapter;
pub mod errors;
pub mod idf;
pub mod index;
pub mod ranking;
pub mod scorer;
pub mod stats;

// Re-exports for convenience
pub use config::{GlobalConfig, IndexConfig, RankingConfig, ScoringConfig};
pub use db_adapter::{
    corpus_stats_from_tables, from_db_error, DbExternalIdf, DbFrequencyIndex, IntoScoreResult,
};
pub use errors::ScoreError;
pub use idf::{blend, compute_idf, rescale, IdfNormalizer};
pub use index::{DocumentFrequencies, ExternalIdfSource, FrequencyIndex, TokenRow};
pub use ranking::{rank_documents, RankOptions, RankedDocument, Ranking};
pub use scorer::{summand, Bm25PlusParams, EntityIdfMode, Scorer};
pub use stats::CorpusStats;
