//! Common constants used throughout entscore-core.
//!
//! Scoring defaults live here so the config layer, the scorer and the CLI
//! agree on them.

// ============================================================================
// BM25+ Parameters
// ============================================================================

/// Default term frequency saturation parameter.
pub const DEFAULT_K1: f64 = 1.2;

/// Default document length normalization parameter.
pub const DEFAULT_B: f64 = 0.75;

/// Default additive floor of the BM25+ variant.
///
/// Every query token with a non-zero IDF contributes at least `idf * delta`,
/// whether or not it occurs in the document.
pub const DEFAULT_DELTA: f64 = 1.0;

// ============================================================================
// External IDF
// ============================================================================

/// Known maximum of the general-English IDF table.
///
/// Raw external values are divided by this before being mapped onto the
/// corpus scale.
pub const EXTERNAL_MAX_IDF: f64 = 14.0;

// ============================================================================
// Directory Names
// ============================================================================

/// The name of the global entscore configuration directory.
///
/// Located at `~/.entscore/` on Unix-like systems.
pub const ENTSCORE_HOME_DIR: &str = ".entscore";

/// The name of the global configuration file.
pub const GLOBAL_CONFIG_FILENAME: &str = "config.yaml";

/// Default directory (under the home dir) for frequency table snapshots.
pub const DEFAULT_INDEX_DIR: &str = "index";
