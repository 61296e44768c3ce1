//! Configuration types for entscore.
//!
//! This module provides the configuration structures used by the scorer and CLI:
//! - [`GlobalConfig`]: User-level configuration stored in `~/.entscore/config.yaml`
//! - [`ScoringConfig`]: BM25+ parameters and entity IDF policy
//! - [`IndexConfig`]: Where frequency tables and the external IDF table live
//! - [`RankingConfig`]: Caller-side ranking options

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{
    DEFAULT_B, DEFAULT_DELTA, DEFAULT_INDEX_DIR, DEFAULT_K1, ENTSCORE_HOME_DIR, EXTERNAL_MAX_IDF,
    GLOBAL_CONFIG_FILENAME,
};
use crate::errors::ScoreError;
use crate::scorer::{Bm25PlusParams, EntityIdfMode};

// ============================================================================
// GlobalConfig
// ============================================================================

/// Global (user-level) configuration for entscore.
///
/// # Example YAML
///
/// ```yaml
/// scoring:
///   k1: 1.2
///   b: 0.75
///   delta: 1.0
///   entityIdf: blended
///   externalMaxIdf: 14.0
/// index:
///   path: /data/cord19/index
///   externalIdfPath: /data/en-idf.txt
/// ranking:
///   parallel: true
///   topK: 20
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// BM25+ parameters and entity IDF policy.
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Frequency table and external IDF locations.
    #[serde(default)]
    pub index: IndexConfig,

    /// Ranking options used by `entscore rank`.
    #[serde(default)]
    pub ranking: RankingConfig,
}

impl GlobalConfig {
    /// Load the global configuration from the default location (`~/.entscore/config.yaml`).
    ///
    /// If the file does not exist, returns the built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::InvalidConfigFile`] if the file exists but cannot be parsed.
    pub fn load_default() -> Result<Self, ScoreError> {
        match Self::default_path() {
            Some(path) => Self::from_path(&path),
            None => {
                tracing::debug!("Could not determine home directory, using default config");
                Ok(Self::default())
            }
        }
    }

    /// Load the global configuration from a specific path.
    ///
    /// If the file does not exist, returns the built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::InvalidConfigFile`] if the file exists but cannot be parsed.
    /// Returns [`ScoreError::InvalidConfiguration`] if validation fails.
    pub fn from_path(path: &Path) -> Result<Self, ScoreError> {
        if !path.exists() {
            tracing::debug!("Config not found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            ScoreError::InvalidConfigFile(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| {
            ScoreError::InvalidConfigFile(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        let warnings = config.validate()?;
        for warning in warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok(config)
    }

    /// Get the default global config directory (`~/.entscore`).
    pub fn default_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(ENTSCORE_HOME_DIR))
    }

    /// Get the default global config file path (`~/.entscore/config.yaml`).
    pub fn default_path() -> Option<PathBuf> {
        Self::default_dir().map(|d| d.join(GLOBAL_CONFIG_FILENAME))
    }

    /// Validate every section.
    ///
    /// Returns the first critical error encountered. Non-fatal issues are
    /// collected and returned as warnings.
    pub fn validate(&self) -> Result<Vec<String>, ScoreError> {
        let mut all_warnings = Vec::new();

        all_warnings.extend(self.scoring.validate()?);
        all_warnings.extend(self.ranking.validate()?);

        if self.scoring.entity_idf == EntityIdfMode::Blended
            && self.index.external_idf_path.is_none()
        {
            all_warnings.push(
                "scoring.entityIdf is `blended` but index.externalIdfPath is not set; \
                 entities will use corpus idf unless --external-idf is given"
                    .to_string(),
            );
        }

        Ok(all_warnings)
    }
}

// ============================================================================
// ScoringConfig
// ============================================================================

/// BM25+ scoring configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringConfig {
    /// BM25 k1 parameter - term frequency saturation.
    /// Default: 1.2
    #[serde(default = "default_k1")]
    pub k1: f64,

    /// BM25 b parameter - document length normalization.
    /// 0 = no length normalization, 1 = full normalization.
    /// Default: 0.75
    #[serde(default = "default_b")]
    pub b: f64,

    /// BM25+ delta - additive floor per token.
    /// Default: 1.0
    #[serde(default = "default_delta")]
    pub delta: f64,

    /// How entity IDF is computed.
    /// Default: corpus
    #[serde(default)]
    pub entity_idf: EntityIdfMode,

    /// Known maximum of the external IDF table.
    /// Default: 14.0
    #[serde(default = "default_external_max_idf")]
    pub external_max_idf: f64,
}

fn default_k1() -> f64 {
    DEFAULT_K1
}

fn default_b() -> f64 {
    DEFAULT_B
}

fn default_delta() -> f64 {
    DEFAULT_DELTA
}

fn default_external_max_idf() -> f64 {
    EXTERNAL_MAX_IDF
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            k1: default_k1(),
            b: default_b(),
            delta: default_delta(),
            entity_idf: EntityIdfMode::default(),
            external_max_idf: default_external_max_idf(),
        }
    }
}

impl ScoringConfig {
    /// The BM25+ parameters described by this section.
    pub fn params(&self) -> Bm25PlusParams {
        Bm25PlusParams {
            k1: self.k1,
            b: self.b,
            delta: self.delta,
        }
    }

    /// Validates the scoring configuration, returning warnings for questionable values.
    ///
    /// # Errors
    /// Returns an error if:
    /// - `k1` is not positive (tf would no longer increase the score)
    /// - `b` is outside `[0, 1]`
    /// - `delta` is negative
    /// - `externalMaxIdf` is not positive (it is a divisor)
    ///
    /// # Warnings
    /// - `delta` is 0 (plain BM25, no smoothing floor)
    /// - Very large `k1` (> 3) which makes tf almost linear
    pub fn validate(&self) -> Result<Vec<String>, ScoreError> {
        let mut warnings = Vec::new();

        if !self.k1.is_finite() || self.k1 <= 0.0 {
            return Err(ScoreError::invalid_configuration(
                "scoring.k1 must be positive",
                "Set k1 to a positive value (recommended: 1.2)",
            ));
        }

        if !(0.0..=1.0).contains(&self.b) {
            return Err(ScoreError::invalid_configuration(
                "scoring.b must be between 0 and 1",
                "Set b within [0, 1] (recommended: 0.75)",
            ));
        }

        if !self.delta.is_finite() || self.delta < 0.0 {
            return Err(ScoreError::invalid_configuration(
                "scoring.delta cannot be negative",
                "Set delta to 0.0 or higher (recommended: 1.0)",
            ));
        }

        if !self.external_max_idf.is_finite() || self.external_max_idf <= 0.0 {
            return Err(ScoreError::invalid_configuration(
                "scoring.externalMaxIdf must be positive",
                "Set externalMaxIdf to the largest value of the external table (default: 14.0)",
            ));
        }

        if self.delta == 0.0 {
            warnings.push(
                "scoring.delta is 0; non-occurring query tokens will not contribute (plain BM25)"
                    .to_string(),
            );
        }

        if self.k1 > 3.0 {
            warnings.push(format!(
                "scoring.k1={} is very large; term frequency will barely saturate (recommended: 1.2)",
                self.k1
            ));
        }

        Ok(warnings)
    }
}

// ============================================================================
// IndexConfig
// ============================================================================

/// Locations of the frequency tables and the external IDF table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexConfig {
    /// Snapshot directory. Default: `~/.entscore/index`.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// General-language IDF table. Optional.
    #[serde(default)]
    pub external_idf_path: Option<PathBuf>,
}

impl IndexConfig {
    /// The snapshot directory, falling back to `~/.entscore/index`.
    pub fn resolved_path(&self) -> Option<PathBuf> {
        self.path.clone().or_else(|| {
            GlobalConfig::default_dir().map(|d| d.join(DEFAULT_INDEX_DIR))
        })
    }
}

// ============================================================================
// RankingConfig
// ============================================================================

/// Options for ranking a list of candidate documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingConfig {
    /// Score candidates in parallel.
    /// Default: true
    #[serde(default = "default_parallel")]
    pub parallel: bool,

    /// Number of results to keep.
    /// Default: 10
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Skip candidates without a length record instead of failing.
    /// Default: false
    #[serde(default)]
    pub skip_missing: bool,
}

fn default_parallel() -> bool {
    true
}

fn default_top_k() -> usize {
    10
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            parallel: default_parallel(),
            top_k: default_top_k(),
            skip_missing: false,
        }
    }
}

impl RankingConfig {
    /// Validates the ranking configuration.
    ///
    /// # Errors
    /// Returns an error if `topK` is 0.
    pub fn validate(&self) -> Result<Vec<String>, ScoreError> {
        if self.top_k == 0 {
            return Err(ScoreError::invalid_configuration(
                "ranking.topK cannot be 0",
                "Set topK to at least 1 (recommended: 10)",
            ));
        }
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = GlobalConfig::default();
        assert!((config.scoring.k1 - 1.2).abs() < 1e-12);
        assert!((config.scoring.b - 0.75).abs() < 1e-12);
        assert!((config.scoring.delta - 1.0).abs() < 1e-12);
        assert_eq!(config.scoring.entity_idf, EntityIdfMode::Corpus);
        assert_eq!(config.scoring.external_max_idf, 14.0);
        assert!(config.ranking.parallel);
        assert_eq!(config.ranking.top_k, 10);
        assert!(config.validate().unwrap().is_empty());
    }

    #[test]
    fn test_from_missing_path_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = GlobalConfig::from_path(&temp.path().join("config.yaml")).unwrap();
        assert_eq!(config.ranking.top_k, 10);
    }

    #[test]
    fn test_from_path_partial_yaml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(
            &path,
            "scoring:\n  delta: 0.5\n  entityIdf: blended\nindex:\n  externalIdfPath: /tmp/en-idf.txt\nranking:\n  topK: 3\n",
        )
        .unwrap();

        let config = GlobalConfig::from_path(&path).unwrap();
        assert_eq!(config.scoring.delta, 0.5);
        assert_eq!(config.scoring.k1, 1.2);
        assert_eq!(config.scoring.entity_idf, EntityIdfMode::Blended);
        assert_eq!(
            config.index.external_idf_path,
            Some(PathBuf::from("/tmp/en-idf.txt"))
        );
        assert_eq!(config.ranking.top_k, 3);
        assert!(config.ranking.parallel);
    }

    #[test]
    fn test_from_path_invalid_yaml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(&path, "scoring: [not, a, map").unwrap();
        assert!(matches!(
            GlobalConfig::from_path(&path),
            Err(ScoreError::InvalidConfigFile(_))
        ));
    }

    #[test]
    fn test_from_path_rejects_invalid_values() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(&path, "scoring:\n  b: 1.5\n").unwrap();
        let err = GlobalConfig::from_path(&path).unwrap_err();
        assert!(err.to_string().contains("scoring.b"));
    }

    #[test]
    fn test_validate_k1_zero() {
        let config = ScoringConfig {
            k1: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_negative_delta() {
        let config = ScoringConfig {
            delta: -1.0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("delta"));
    }

    #[test]
    fn test_validate_external_max_zero() {
        let config = ScoringConfig {
            external_max_idf: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_delta_warns() {
        let config = ScoringConfig {
            delta: 0.0,
            ..Default::default()
        };
        let warnings = config.validate().unwrap();
        assert!(warnings.iter().any(|w| w.contains("plain BM25")));
    }

    #[test]
    fn test_validate_blended_without_table_warns() {
        let config = GlobalConfig {
            scoring: ScoringConfig {
                entity_idf: EntityIdfMode::Blended,
                ..Default::default()
            },
            ..Default::default()
        };
        let warnings = config.validate().unwrap();
        assert!(warnings.iter().any(|w| w.contains("externalIdfPath")));
    }

    #[test]
    fn test_validate_top_k_zero() {
        let config = RankingConfig {
            top_k: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_params() {
        let params = ScoringConfig::default().params();
        assert_eq!(params, Bm25PlusParams::default());
    }

    #[test]
    fn test_explicit_index_path_wins() {
        let config = IndexConfig {
            path: Some(PathBuf::from("/srv/index")),
            external_idf_path: None,
        };
        assert_eq!(config.resolved_path(), Some(PathBuf::from("/srv/index")));
    }
}
