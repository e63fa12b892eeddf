//! Configuration types and management for shelfscan.
//!
//! Plain-value configuration for the similarity engine, the corpus scan, and
//! the sanity checker, with validation and YAML round-tripping. All seed
//! material lives here so that identical corpora produce identical reports
//! across runs.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::errors::{Result, ShelfscanError};

/// Main configuration for the shelfscan engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShelfscanConfig {
    /// Similarity engine settings
    pub similarity: SimilarityConfig,

    /// Corpus scan settings
    pub scan: ScanConfig,

    /// Sanity checker thresholds
    pub sanity: SanityConfig,

    /// Marketplace name prefixes treated as official sources
    pub official_prefixes: Vec<String>,
}

impl Default for ShelfscanConfig {
    fn default() -> Self {
        Self {
            similarity: SimilarityConfig::default(),
            scan: ScanConfig::default(),
            sanity: SanityConfig::default(),
            official_prefixes: vec![
                "anthropic".to_string(),
                "claude-plugins-official".to_string(),
            ],
        }
    }
}

impl ShelfscanConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            ShelfscanError::io(format!("Failed to read config file: {}", path.display()), e)
        })?;

        serde_yaml::from_str(&content).map_err(Into::into)
    }

    /// Save configuration to a YAML file
    pub fn to_yaml_file(&self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        let content = serde_yaml::to_string(self)?;
        std::fs::write(&path, content).map_err(|e| {
            ShelfscanError::io(
                format!("Failed to write config file: {}", path.display()),
                e,
            )
        })
    }

    /// True when the marketplace name matches the configured official prefixes.
    ///
    /// An observable label, not a privilege.
    pub fn is_official(&self, marketplace: &str) -> bool {
        self.official_prefixes
            .iter()
            .any(|prefix| marketplace.starts_with(prefix.as_str()))
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<()> {
        self.similarity.validate()?;
        self.scan.validate()?;
        self.sanity.validate()?;
        Ok(())
    }
}

/// Similarity engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityConfig {
    /// Number of MinHash permutations (signature width)
    pub num_permutations: usize,

    /// Shingle size for text similarity (words per shingle)
    pub shingle_size: usize,

    /// Minimum Jaccard similarity for two files to be considered duplicates
    pub similarity_threshold: f64,

    /// Seed for the MinHash permutation coefficients.
    ///
    /// Part of the report's identity: scans with different seeds produce
    /// incomparable signatures.
    pub permutation_seed: u64,

    /// Minimum cluster size for scaffold classification
    pub scaffold_min_size: usize,

    /// Weight on false positives when tuning the LSH band layout
    pub false_positive_weight: f64,

    /// Weight on false negatives when tuning the LSH band layout
    pub false_negative_weight: f64,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            num_permutations: 128,
            shingle_size: 3,
            similarity_threshold: 0.7,
            permutation_seed: 0x5348_454c_4653_4341,
            scaffold_min_size: 20,
            // Weighted against false negatives; candidates are
            // re-thresholded downstream anyway.
            false_positive_weight: 0.1,
            false_negative_weight: 0.9,
        }
    }
}

impl SimilarityConfig {
    /// Validate similarity configuration
    pub fn validate(&self) -> Result<()> {
        if self.num_permutations == 0 {
            return Err(ShelfscanError::config_field(
                "num_permutations must be greater than 0",
                "similarity.num_permutations",
            ));
        }

        if self.shingle_size == 0 {
            return Err(ShelfscanError::config_field(
                "shingle_size must be greater than 0",
                "similarity.shingle_size",
            ));
        }

        if self.scaffold_min_size < 2 {
            return Err(ShelfscanError::config_field(
                "scaffold_min_size must be at least 2",
                "similarity.scaffold_min_size",
            ));
        }

        validate_unit_range(self.similarity_threshold, "similarity.similarity_threshold")?;

        if self.false_positive_weight < 0.0 || self.false_negative_weight < 0.0 {
            return Err(ShelfscanError::config(
                "LSH tuning weights must be non-negative",
            ));
        }

        Ok(())
    }
}

/// Corpus scan configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Minimum content length (characters) for a file to be indexed
    pub min_content_length: usize,

    /// File extensions included in the scan
    pub extensions: Vec<String>,

    /// Glob patterns excluded from the scan
    pub exclude_patterns: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            min_content_length: 100,
            extensions: vec!["md".to_string()],
            exclude_patterns: vec!["*backup*".to_string()],
        }
    }
}

impl ScanConfig {
    /// Validate scan configuration
    pub fn validate(&self) -> Result<()> {
        if self.extensions.is_empty() {
            return Err(ShelfscanError::config_field(
                "at least one file extension is required",
                "scan.extensions",
            ));
        }
        Ok(())
    }
}

/// Sanity checker thresholds.
///
/// The exact values are judgement calls; the defaults reproduce the behavior
/// the query commands were calibrated against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SanityConfig {
    /// Dataset size above which extreme ratios are suspicious
    pub large_dataset_floor: usize,

    /// Clustered-file ratio below which a large dataset is suspicious
    pub extreme_low_ratio: f64,

    /// Clustered-file ratio above which a large dataset is suspicious
    pub extreme_high_ratio: f64,

    /// Dataset size above which a near-50/50 split is checked
    pub split_floor: usize,

    /// Lower bound of the suspicious near-50/50 band
    pub split_band_low: f64,

    /// Upper bound of the suspicious near-50/50 band
    pub split_band_high: f64,

    /// Cluster count above which any zero-membership marketplace is suspicious
    pub large_ecosystem_clusters: usize,

    /// Fraction of total files a marketplace must contribute before its
    /// zero-membership is suspicious on its own
    pub significant_marketplace_share: f64,

    /// Dataset size above which finding no clusters at all voids confidence
    pub no_cluster_floor: usize,
}

impl Default for SanityConfig {
    fn default() -> Self {
        Self {
            large_dataset_floor: 500,
            extreme_low_ratio: 0.05,
            extreme_high_ratio: 0.95,
            split_floor: 100,
            split_band_low: 0.45,
            split_band_high: 0.55,
            large_ecosystem_clusters: 1000,
            significant_marketplace_share: 0.25,
            no_cluster_floor: 100,
        }
    }
}

impl SanityConfig {
    /// Validate sanity checker configuration
    pub fn validate(&self) -> Result<()> {
        validate_unit_range(self.extreme_low_ratio, "sanity.extreme_low_ratio")?;
        validate_unit_range(self.extreme_high_ratio, "sanity.extreme_high_ratio")?;
        validate_unit_range(self.split_band_low, "sanity.split_band_low")?;
        validate_unit_range(self.split_band_high, "sanity.split_band_high")?;
        validate_unit_range(
            self.significant_marketplace_share,
            "sanity.significant_marketplace_share",
        )?;

        if self.extreme_low_ratio >= self.extreme_high_ratio {
            return Err(ShelfscanError::config(
                "extreme_low_ratio must be below extreme_high_ratio",
            ));
        }

        if self.split_band_low >= self.split_band_high {
            return Err(ShelfscanError::config(
                "split_band_low must be below split_band_high",
            ));
        }

        Ok(())
    }
}

/// Validate that a value lies in the closed unit interval.
pub fn validate_unit_range(value: f64, field: &str) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ShelfscanError::config_field(
            format!("{field} must be between 0.0 and 1.0, got {value}"),
            field.to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ShelfscanConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_threshold_out_of_range_rejected() {
        let mut config = ShelfscanConfig::default();
        config.similarity.similarity_threshold = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_official_prefix_matching() {
        let config = ShelfscanConfig::default();
        assert!(config.is_official("anthropic-agents"));
        assert!(config.is_official("claude-plugins-official"));
        assert!(!config.is_official("community-hub"));
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = ShelfscanConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: ShelfscanConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(
            parsed.similarity.num_permutations,
            config.similarity.num_permutations
        );
        assert_eq!(parsed.scan.min_content_length, config.scan.min_content_length);
    }

    #[test]
    fn test_zero_permutations_rejected() {
        let mut config = ShelfscanConfig::default();
        config.similarity.num_permutations = 0;
        assert!(config.validate().is_err());
    }
}
