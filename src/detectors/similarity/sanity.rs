//! Sanity checks over scan results.
//!
//! The most dangerous failure mode of a similarity index is silently
//! reporting "no duplicates" when duplicates exist. These checks convert
//! statistically implausible outcomes into explicit warnings and an overall
//! confidence label instead of reassuring numbers.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::config::SanityConfig;

/// Overall confidence in a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// No sanity rule fired
    High,
    /// One mild rule fired
    Medium,
    /// Several rules fired, or a severe one
    Low,
    /// The results should not be trusted at all
    None,
    /// Pre-confidence report (v1.0 artifacts)
    Unknown,
}

impl Confidence {
    /// Step the ladder down by `steps`, never past `None`.
    fn downgrade(self, steps: usize) -> Self {
        let order = [Self::High, Self::Medium, Self::Low, Self::None];
        let position = order.iter().position(|c| *c == self).unwrap_or(3);
        order[(position + steps).min(3)]
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::None => "none",
            Self::Unknown => "unknown",
        };
        write!(f, "{label}")
    }
}

/// Per-marketplace membership counts fed to the checker.
#[derive(Debug, Clone, Default)]
pub struct MarketplaceMembership {
    /// Files the marketplace contributed to the scan
    pub files: usize,
    /// How many of them landed in a cluster
    pub clustered: usize,
}

/// Aggregate statistics the checker inspects.
#[derive(Debug, Clone, Default)]
pub struct SanitySample {
    /// Total files scanned
    pub total_files: usize,
    /// Files assigned to some cluster
    pub files_in_clusters: usize,
    /// Number of clusters found
    pub unique_clusters: usize,
    /// Membership counts per marketplace
    pub marketplace_membership: BTreeMap<String, MarketplaceMembership>,
    /// Sizes of every cluster
    pub cluster_sizes: Vec<usize>,
}

/// Outcome of the sanity pass: warnings plus a confidence label.
#[derive(Debug, Clone)]
pub struct SanityOutcome {
    /// Confidence after all fired rules
    pub confidence: Confidence,
    /// One warning string per fired rule
    pub warnings: Vec<String>,
}

/// Rule-based sanity checker.
#[derive(Debug, Clone)]
pub struct SanityChecker {
    config: SanityConfig,
}

impl SanityChecker {
    /// Create a checker with the given thresholds.
    pub fn new(config: SanityConfig) -> Self {
        Self { config }
    }

    /// Inspect a sample and produce warnings plus a confidence label.
    pub fn check(&self, sample: &SanitySample) -> SanityOutcome {
        let mut warnings = Vec::new();
        let mut confidence = Confidence::High;

        if sample.total_files == 0 {
            return SanityOutcome {
                confidence: Confidence::None,
                warnings: vec!["No files were analyzed".to_string()],
            };
        }

        let ratio = sample.files_in_clusters as f64 / sample.total_files as f64;

        // Zero cluster membership from a marketplace that should have some.
        // This is the documented regression pattern, so it is severe: two
        // confidence steps instead of one.
        for (marketplace, membership) in &sample.marketplace_membership {
            if membership.clustered > 0 || membership.files == 0 {
                continue;
            }
            let share = membership.files as f64 / sample.total_files as f64;
            let large_ecosystem = sample.unique_clusters > self.config.large_ecosystem_clusters;
            if large_ecosystem || share >= self.config.significant_marketplace_share {
                warnings.push(format!(
                    "'{marketplace}' has 0% cluster membership ({} files) despite {} clusters \
                     in the ecosystem",
                    membership.files, sample.unique_clusters
                ));
                confidence = confidence.downgrade(2);
            }
        }

        // Extreme overall ratio on a large dataset. A ratio of exactly zero
        // is owned by the zero-signal rules above and below, not this one.
        if sample.total_files > self.config.large_dataset_floor && sample.files_in_clusters > 0 {
            if ratio < self.config.extreme_low_ratio {
                warnings.push(format!(
                    "Suspiciously low similarity ratio: {:.1}% of {} files in clusters",
                    ratio * 100.0,
                    sample.total_files
                ));
                confidence = confidence.downgrade(1);
            } else if ratio > self.config.extreme_high_ratio {
                warnings.push(format!(
                    "Suspiciously high similarity ratio: {:.1}% of {} files in clusters",
                    ratio * 100.0,
                    sample.total_files
                ));
                confidence = confidence.downgrade(1);
            }
        }

        // Near-50/50 split with a degenerate cluster size distribution reads
        // like an artifact, not an organic corpus.
        if sample.total_files > self.config.split_floor
            && ratio >= self.config.split_band_low
            && ratio <= self.config.split_band_high
            && is_degenerate(&sample.cluster_sizes)
        {
            warnings.push(format!(
                "Suspicious 50/50 split: {:.1}% of files in clusters with no spread of \
                 cluster sizes",
                ratio * 100.0
            ));
            confidence = confidence.downgrade(1);
        }

        // No clusters at all on a non-trivial corpus voids the result.
        if sample.unique_clusters == 0
            && sample.files_in_clusters == 0
            && sample.total_files >= self.config.no_cluster_floor
        {
            warnings.push(format!(
                "No clusters found across {} files; the index may be broken",
                sample.total_files
            ));
            confidence = Confidence::None;
        }

        SanityOutcome {
            confidence,
            warnings,
        }
    }
}

/// True when the size distribution shows no intermediate cluster sizes:
/// nothing recorded, or every cluster the same size.
fn is_degenerate(cluster_sizes: &[usize]) -> bool {
    match cluster_sizes.first() {
        None => true,
        Some(first) => cluster_sizes.iter().all(|size| size == first),
    }
}
