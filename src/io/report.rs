//! The similarity report artifact.
//!
//! A single JSON document (schema version "2.0") holding the file table, the
//! marketplace and filename indices, the cluster table with pairwise
//! similarities, and scan metadata. The loader validates every structural
//! invariant and refuses inconsistent artifacts rather than repairing them;
//! v1.0 reports (no indices, no metadata) are still accepted, with the
//! missing pieces rebuilt from the cluster table alone.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::errors::{Result, ShelfscanError};
use crate::detectors::similarity::sanity::Confidence;

/// Schema version written by this build.
pub const SCHEMA_VERSION: &str = "2.0";

/// Tolerance used when checking recorded similarities against the threshold.
const SIMILARITY_EPSILON: f64 = 1e-9;

/// Cluster classification by participant distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ClusterType {
    /// Members span at least two marketplaces
    #[serde(rename = "cross-marketplace")]
    CrossMarketplace,
    /// All members come from a single marketplace
    #[serde(rename = "internal")]
    Internal,
    /// A widely copied template: many members, one shared filename
    #[serde(rename = "scaffold")]
    Scaffold,
}

impl ClusterType {
    /// All cluster types, in reporting order.
    pub const ALL: [ClusterType; 3] = [
        ClusterType::CrossMarketplace,
        ClusterType::Internal,
        ClusterType::Scaffold,
    ];

    /// Stable string form, used as summary keys.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CrossMarketplace => "cross-marketplace",
            Self::Internal => "internal",
            Self::Scaffold => "scaffold",
        }
    }
}

impl fmt::Display for ClusterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A specific file location in the ecosystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Marketplace the file came from
    pub marketplace: String,
    /// Plugin within the marketplace
    pub plugin: String,
    /// Path relative to the marketplace root
    pub path: String,
    /// Whether the marketplace is an official source
    pub is_official: bool,
}

impl Location {
    /// Basename of the location's path.
    pub fn filename(&self) -> &str {
        basename(&self.path)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.marketplace, self.plugin, self.path)
    }
}

/// One scanned file, immutable once the scan completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Dense index assigned at scan time
    pub file_index: u32,
    /// Marketplace the file came from
    pub marketplace: String,
    /// Plugin within the marketplace
    pub plugin: String,
    /// Path relative to the marketplace root
    pub path: String,
    /// Basename of `path`
    pub filename: String,
    /// Whether the marketplace is an official source
    pub is_official: bool,
    /// Cluster membership; absent for unclustered files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_id: Option<u32>,
    /// Redundant membership flag kept for cheap filtering
    pub in_cluster: bool,
}

impl FileRecord {
    /// Project this record into a [`Location`].
    pub fn location(&self) -> Location {
        Location {
            marketplace: self.marketplace.clone(),
            plugin: self.plugin.clone(),
            path: self.path.clone(),
            is_official: self.is_official,
        }
    }
}

/// A pairwise similarity recorded during cluster assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityPair {
    /// Lower file index of the pair
    pub file1_index: u32,
    /// Higher file index of the pair
    pub file2_index: u32,
    /// Estimated Jaccard similarity of the two signatures
    pub similarity: f64,
}

/// A connected component of the near-duplicate graph, size >= 2.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    /// Dense cluster id
    #[serde(default)]
    pub cluster_id: u32,
    /// Classification by participant distribution
    #[serde(rename = "type")]
    pub cluster_type: ClusterType,
    /// Member count
    pub size: usize,
    /// Mean similarity over the retained pairwise comparisons
    pub avg_similarity: f64,
    /// Whether any member comes from an official source
    pub has_official: bool,
    /// Distinct marketplaces participating, sorted
    pub marketplaces: Vec<String>,
    /// Member file indices, ascending
    #[serde(default)]
    pub members: Vec<u32>,
    /// Member locations, mirroring `members`
    pub locations: Vec<Location>,
    /// All pairs actually compared during assembly
    #[serde(default)]
    pub similarity_pairs: Vec<SimilarityPair>,
}

/// Scan parameters and sanity results recorded alongside the data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Schema version of the artifact
    pub version: String,
    /// UTC timestamp of the scan
    pub generated_at: DateTime<Utc>,
    /// Detection threshold the scan ran with
    pub similarity_threshold: f64,
    /// MinHash signature width
    pub num_permutations: usize,
    /// Words per shingle
    pub shingle_size: usize,
    /// LSH bands used (0 when unknown, as in legacy reports)
    #[serde(default)]
    pub num_bands: usize,
    /// LSH rows per band (0 when unknown)
    #[serde(default)]
    pub rows_per_band: usize,
    /// Overall confidence after sanity checks
    pub confidence: Confidence,
    /// Sanity warnings, one per fired rule
    pub warnings: Vec<String>,
}

impl ReportMetadata {
    /// Metadata stand-in for a v1.0 artifact that predates the field.
    fn legacy(similarity_threshold: f64) -> Self {
        Self {
            version: "1.0".to_string(),
            generated_at: DateTime::UNIX_EPOCH,
            similarity_threshold,
            num_permutations: 128,
            shingle_size: 3,
            num_bands: 0,
            rows_per_band: 0,
            confidence: Confidence::Unknown,
            warnings: Vec::new(),
        }
    }
}

/// Per-type cluster and file counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeBreakdown {
    /// Clusters of this type
    pub clusters: usize,
    /// Files across those clusters
    pub files: usize,
}

/// Aggregate counts over the scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Files that passed the scan input filters
    pub total_files_scanned: usize,
    /// Files assigned to some cluster
    pub files_in_clusters: usize,
    /// Files left unclustered
    pub unclustered_files: usize,
    /// Number of clusters
    pub unique_clusters: usize,
    /// Distinct marketplaces seen in the scan
    pub unique_marketplaces: usize,
    /// Cluster and file counts keyed by cluster type
    pub by_type: BTreeMap<String, TypeBreakdown>,
}

/// The on-disk similarity report.
#[derive(Debug, Clone, Serialize)]
pub struct SimilarityReport {
    /// Scan parameters and sanity results
    pub metadata: ReportMetadata,
    /// Aggregate counts
    pub summary: ReportSummary,
    /// All scanned files, ordered by `file_index`
    pub file_index: Vec<FileRecord>,
    /// Marketplace name -> sorted cluster ids it participates in
    pub marketplace_index: BTreeMap<String, Vec<u32>>,
    /// Basename -> sorted cluster ids containing it
    pub filename_index: BTreeMap<String, Vec<u32>>,
    /// All clusters, ordered by `cluster_id`
    pub clusters: Vec<Cluster>,
}

impl SimilarityReport {
    /// Assemble a report from scan output, computing the summary and the
    /// derived indices.
    pub fn assemble(
        metadata: ReportMetadata,
        file_index: Vec<FileRecord>,
        clusters: Vec<Cluster>,
    ) -> Self {
        let files_in_clusters: usize = clusters.iter().map(|c| c.size).sum();
        let unique_marketplaces = file_index
            .iter()
            .map(|f| f.marketplace.as_str())
            .collect::<BTreeSet<_>>()
            .len();

        let mut by_type: BTreeMap<String, TypeBreakdown> = ClusterType::ALL
            .iter()
            .map(|t| (t.as_str().to_string(), TypeBreakdown::default()))
            .collect();
        for cluster in &clusters {
            let entry = by_type.entry(cluster.cluster_type.as_str().to_string()).or_default();
            entry.clusters += 1;
            entry.files += cluster.size;
        }

        let summary = ReportSummary {
            total_files_scanned: file_index.len(),
            files_in_clusters,
            unclustered_files: file_index.len() - files_in_clusters,
            unique_clusters: clusters.len(),
            unique_marketplaces,
            by_type,
        };

        let marketplace_index = marketplace_index_of(&clusters);
        let filename_index = filename_index_of(&clusters);

        Self {
            metadata,
            summary,
            file_index,
            marketplace_index,
            filename_index,
            clusters,
        }
    }

    /// Serialize to `path` via a temporary sibling and an atomic rename, so a
    /// failed write never clobbers an existing report.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;

        let tmp_name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => format!("{name}.tmp"),
            None => {
                return Err(ShelfscanError::report_at(
                    "report path has no file name",
                    path.display().to_string(),
                ))
            }
        };
        let tmp_path = path.with_file_name(tmp_name);

        fs::write(&tmp_path, json).map_err(|e| {
            ShelfscanError::io(
                format!("Failed to write report: {}", tmp_path.display()),
                e,
            )
        })?;
        fs::rename(&tmp_path, path).map_err(|e| {
            ShelfscanError::io(
                format!("Failed to finalize report: {}", path.display()),
                e,
            )
        })?;

        debug!("report written to {}", path.display());
        Ok(())
    }

    /// Load and validate a report from disk.
    ///
    /// Any mismatch between the file table and the cluster table is a
    /// load-time error. Reports with a schema major version above 2 are
    /// refused.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ShelfscanError::io(format!("Failed to read report: {}", path.display()), e)
        })?;

        let raw: RawReport = serde_json::from_str(&content).map_err(|e| {
            ShelfscanError::report_at(format!("malformed report: {e}"), path.display().to_string())
        })?;

        Self::from_raw(raw)
    }

    /// Look up a cluster by id.
    pub fn cluster(&self, cluster_id: u32) -> Option<&Cluster> {
        self.clusters.get(cluster_id as usize)
    }

    /// Look up a file by index.
    pub fn file(&self, file_index: u32) -> Option<&FileRecord> {
        self.file_index.get(file_index as usize)
    }

    fn from_raw(raw: RawReport) -> Result<Self> {
        let legacy = raw.metadata.is_none();

        let metadata = match raw.metadata {
            Some(metadata) => {
                check_supported_version(&metadata.version)?;
                metadata
            }
            None => {
                warn!("report predates metadata; treating as schema 1.0");
                ReportMetadata::legacy(raw.summary.similarity_threshold.unwrap_or(0.7))
            }
        };

        let mut clusters = raw.clusters;
        let file_index = if legacy {
            rebuild_from_locations(&mut clusters)
        } else {
            raw.file_index.ok_or_else(|| {
                ShelfscanError::report("schema 2.x report is missing its file_index")
            })?
        };

        let marketplace_index = raw
            .marketplace_index
            .unwrap_or_else(|| marketplace_index_of(&clusters));
        let filename_index = raw
            .filename_index
            .unwrap_or_else(|| filename_index_of(&clusters));

        let summary = ReportSummary {
            total_files_scanned: raw.summary.total_files_scanned,
            files_in_clusters: raw.summary.files_in_clusters,
            unclustered_files: raw.summary.unclustered_files.unwrap_or_else(|| {
                raw.summary
                    .total_files_scanned
                    .saturating_sub(raw.summary.files_in_clusters)
            }),
            unique_clusters: raw.summary.unique_clusters,
            unique_marketplaces: raw.summary.unique_marketplaces.unwrap_or_else(|| {
                clusters
                    .iter()
                    .flat_map(|c| c.marketplaces.iter())
                    .collect::<BTreeSet<_>>()
                    .len()
            }),
            by_type: raw.summary.by_type,
        };

        let report = Self {
            metadata,
            summary,
            file_index,
            marketplace_index,
            filename_index,
            clusters,
        };
        report.validate(!legacy)?;
        Ok(report)
    }

    /// Validate the §3 invariants. When `strict`, the stored indices must
    /// also match what the cluster table implies (they are recomputed and
    /// compared); legacy loads skip that check because the indices were just
    /// rebuilt.
    pub fn validate(&self, strict: bool) -> Result<()> {
        let threshold = self.metadata.similarity_threshold - SIMILARITY_EPSILON;
        let mut seen_members: BTreeSet<u32> = BTreeSet::new();

        for (position, file) in self.file_index.iter().enumerate() {
            if file.file_index as usize != position {
                return Err(ShelfscanError::report(format!(
                    "file_index is not dense: position {position} holds index {}",
                    file.file_index
                )));
            }
            if file.in_cluster != file.cluster_id.is_some() {
                return Err(ShelfscanError::report(format!(
                    "file {} has in_cluster={} but cluster_id={:?}",
                    file.file_index, file.in_cluster, file.cluster_id
                )));
            }
            if let Some(cluster_id) = file.cluster_id {
                let cluster = self.cluster(cluster_id).ok_or_else(|| {
                    ShelfscanError::report(format!(
                        "file {} references unknown cluster {cluster_id}",
                        file.file_index
                    ))
                })?;
                if cluster.members.binary_search(&file.file_index).is_err() {
                    return Err(ShelfscanError::report(format!(
                        "file {} claims cluster {cluster_id} but is not among its members",
                        file.file_index
                    )));
                }
            }
        }

        for (position, cluster) in self.clusters.iter().enumerate() {
            if cluster.cluster_id as usize != position {
                return Err(ShelfscanError::report(format!(
                    "cluster ids are not dense: position {position} holds id {}",
                    cluster.cluster_id
                )));
            }
            if cluster.size < 2 {
                return Err(ShelfscanError::report(format!(
                    "cluster {} has size {} below the minimum of 2",
                    cluster.cluster_id, cluster.size
                )));
            }
            if cluster.members.len() != cluster.size || cluster.locations.len() != cluster.size {
                return Err(ShelfscanError::report(format!(
                    "cluster {} size disagrees with its member and location lists",
                    cluster.cluster_id
                )));
            }
            if !cluster.members.windows(2).all(|w| w[0] < w[1]) {
                return Err(ShelfscanError::report(format!(
                    "cluster {} members are not strictly ascending",
                    cluster.cluster_id
                )));
            }

            for &member in &cluster.members {
                if !seen_members.insert(member) {
                    return Err(ShelfscanError::report(format!(
                        "file {member} belongs to more than one cluster"
                    )));
                }
                let file = self.file(member).ok_or_else(|| {
                    ShelfscanError::report(format!(
                        "cluster {} references unknown file {member}",
                        cluster.cluster_id
                    ))
                })?;
                if file.cluster_id != Some(cluster.cluster_id) {
                    return Err(ShelfscanError::report(format!(
                        "file {member} does not point back to cluster {}",
                        cluster.cluster_id
                    )));
                }
            }

            for pair in &cluster.similarity_pairs {
                if cluster.members.binary_search(&pair.file1_index).is_err()
                    || cluster.members.binary_search(&pair.file2_index).is_err()
                {
                    return Err(ShelfscanError::report(format!(
                        "cluster {} records a similarity pair outside its members",
                        cluster.cluster_id
                    )));
                }
                if pair.similarity < threshold {
                    return Err(ShelfscanError::report(format!(
                        "cluster {} records similarity {} below threshold {}",
                        cluster.cluster_id, pair.similarity, self.metadata.similarity_threshold
                    )));
                }
            }

            let marketplaces: BTreeSet<&str> = cluster
                .locations
                .iter()
                .map(|l| l.marketplace.as_str())
                .collect();
            let declared: BTreeSet<&str> =
                cluster.marketplaces.iter().map(String::as_str).collect();
            if marketplaces != declared {
                return Err(ShelfscanError::report(format!(
                    "cluster {} declares marketplaces that disagree with its locations",
                    cluster.cluster_id
                )));
            }
        }

        let clustered: usize = self.clusters.iter().map(|c| c.size).sum();
        if clustered != self.summary.files_in_clusters
            || self.summary.files_in_clusters + self.summary.unclustered_files
                != self.summary.total_files_scanned
        {
            return Err(ShelfscanError::report(
                "summary counts disagree with the cluster table",
            ));
        }

        if strict {
            if self.marketplace_index != marketplace_index_of(&self.clusters) {
                return Err(ShelfscanError::report(
                    "marketplace_index disagrees with the cluster table",
                ));
            }
            if self.filename_index != filename_index_of(&self.clusters) {
                return Err(ShelfscanError::report(
                    "filename_index disagrees with the cluster table",
                ));
            }
        }

        Ok(())
    }
}

/// Raw deserialization target tolerating both schema generations.
#[derive(Deserialize)]
struct RawReport {
    #[serde(default)]
    metadata: Option<ReportMetadata>,
    summary: RawSummary,
    #[serde(default)]
    file_index: Option<Vec<FileRecord>>,
    #[serde(default)]
    marketplace_index: Option<BTreeMap<String, Vec<u32>>>,
    #[serde(default)]
    filename_index: Option<BTreeMap<String, Vec<u32>>>,
    #[serde(default)]
    clusters: Vec<Cluster>,
}

#[derive(Deserialize)]
struct RawSummary {
    total_files_scanned: usize,
    files_in_clusters: usize,
    #[serde(default)]
    unclustered_files: Option<usize>,
    unique_clusters: usize,
    #[serde(default)]
    unique_marketplaces: Option<usize>,
    #[serde(default)]
    similarity_threshold: Option<f64>,
    #[serde(default)]
    by_type: BTreeMap<String, TypeBreakdown>,
}

/// Refuse schema versions this build does not understand.
fn check_supported_version(version: &str) -> Result<()> {
    let major = version
        .split('.')
        .next()
        .and_then(|m| m.parse::<u32>().ok())
        .ok_or_else(|| {
            ShelfscanError::report(format!("unparseable schema version {version:?}"))
        })?;

    if major > 2 {
        return Err(ShelfscanError::report(format!(
            "report schema {version} is newer than this build supports ({SCHEMA_VERSION})"
        )));
    }
    Ok(())
}

/// Rebuild the file table for a legacy report from cluster locations alone,
/// assigning dense indices in cluster order and filling in `members`.
fn rebuild_from_locations(clusters: &mut [Cluster]) -> Vec<FileRecord> {
    let mut file_index = Vec::new();

    for (position, cluster) in clusters.iter_mut().enumerate() {
        cluster.cluster_id = position as u32;
        cluster.members.clear();
        for location in &cluster.locations {
            let index = file_index.len() as u32;
            cluster.members.push(index);
            file_index.push(FileRecord {
                file_index: index,
                marketplace: location.marketplace.clone(),
                plugin: location.plugin.clone(),
                path: location.path.clone(),
                filename: location.filename().to_string(),
                is_official: location.is_official,
                cluster_id: Some(position as u32),
                in_cluster: true,
            });
        }
        cluster.size = cluster.members.len();
        cluster.similarity_pairs.clear();
    }

    file_index
}

/// Marketplace name -> sorted cluster ids, recomputable from clusters alone.
pub fn marketplace_index_of(clusters: &[Cluster]) -> BTreeMap<String, Vec<u32>> {
    let mut index: BTreeMap<String, BTreeSet<u32>> = BTreeMap::new();
    for cluster in clusters {
        for marketplace in &cluster.marketplaces {
            index
                .entry(marketplace.clone())
                .or_default()
                .insert(cluster.cluster_id);
        }
    }
    index
        .into_iter()
        .map(|(k, v)| (k, v.into_iter().collect()))
        .collect()
}

/// Basename -> sorted cluster ids, recomputable from clusters alone.
pub fn filename_index_of(clusters: &[Cluster]) -> BTreeMap<String, Vec<u32>> {
    let mut index: BTreeMap<String, BTreeSet<u32>> = BTreeMap::new();
    for cluster in clusters {
        for location in &cluster.locations {
            index
                .entry(location.filename().to_string())
                .or_default()
                .insert(cluster.cluster_id);
        }
    }
    index
        .into_iter()
        .map(|(k, v)| (k, v.into_iter().collect()))
        .collect()
}

/// Basename of a `/`-separated relative path.
pub fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(index: u32, marketplace: &str, path: &str, cluster: Option<u32>) -> FileRecord {
        FileRecord {
            file_index: index,
            marketplace: marketplace.to_string(),
            plugin: "p1".to_string(),
            path: path.to_string(),
            filename: basename(path).to_string(),
            is_official: false,
            cluster_id: cluster,
            in_cluster: cluster.is_some(),
        }
    }

    fn metadata() -> ReportMetadata {
        ReportMetadata {
            version: SCHEMA_VERSION.to_string(),
            generated_at: DateTime::UNIX_EPOCH,
            similarity_threshold: 0.7,
            num_permutations: 128,
            shingle_size: 3,
            num_bands: 16,
            rows_per_band: 8,
            confidence: Confidence::High,
            warnings: Vec::new(),
        }
    }

    fn small_report() -> SimilarityReport {
        let files = vec![
            file(0, "mA", "skills/x.md", Some(0)),
            file(1, "mB", "skills/x.md", Some(0)),
            file(2, "mA", "skills/y.md", None),
        ];
        let clusters = vec![Cluster {
            cluster_id: 0,
            cluster_type: ClusterType::CrossMarketplace,
            size: 2,
            avg_similarity: 0.92,
            has_official: false,
            marketplaces: vec!["mA".to_string(), "mB".to_string()],
            members: vec![0, 1],
            locations: vec![files[0].location(), files[1].location()],
            similarity_pairs: vec![SimilarityPair {
                file1_index: 0,
                file2_index: 1,
                similarity: 0.92,
            }],
        }];
        SimilarityReport::assemble(metadata(), files, clusters)
    }

    #[test]
    fn test_assemble_summary() {
        let report = small_report();
        assert_eq!(report.summary.total_files_scanned, 3);
        assert_eq!(report.summary.files_in_clusters, 2);
        assert_eq!(report.summary.unclustered_files, 1);
        assert_eq!(report.summary.unique_clusters, 1);
        assert_eq!(report.summary.unique_marketplaces, 2);
        assert_eq!(report.summary.by_type["cross-marketplace"].files, 2);
        assert_eq!(report.summary.by_type["internal"].clusters, 0);
    }

    #[test]
    fn test_assemble_indices() {
        let report = small_report();
        assert_eq!(report.marketplace_index["mA"], vec![0]);
        assert_eq!(report.marketplace_index["mB"], vec![0]);
        assert_eq!(report.filename_index["x.md"], vec![0]);
        assert!(!report.filename_index.contains_key("y.md"));
    }

    #[test]
    fn test_validate_accepts_consistent_report() {
        assert!(small_report().validate(true).is_ok());
    }

    #[test]
    fn test_validate_rejects_dangling_cluster_reference() {
        let mut report = small_report();
        report.file_index[2].cluster_id = Some(9);
        report.file_index[2].in_cluster = true;
        assert!(report.validate(true).is_err());
    }

    #[test]
    fn test_validate_rejects_missing_backpointer() {
        let mut report = small_report();
        report.file_index[1].cluster_id = None;
        report.file_index[1].in_cluster = false;
        assert!(report.validate(true).is_err());
    }

    #[test]
    fn test_validate_rejects_below_threshold_pair() {
        let mut report = small_report();
        report.clusters[0].similarity_pairs[0].similarity = 0.3;
        assert!(report.validate(true).is_err());
    }

    #[test]
    fn test_validate_rejects_stale_index() {
        let mut report = small_report();
        report.filename_index.insert("ghost.md".to_string(), vec![0]);
        assert!(report.validate(true).is_err());
    }

    #[test]
    fn test_newer_schema_refused() {
        assert!(check_supported_version("3.0").is_err());
        assert!(check_supported_version("2.1").is_ok());
        assert!(check_supported_version("1.0").is_ok());
        assert!(check_supported_version("next").is_err());
    }

    #[test]
    fn test_basename() {
        assert_eq!(basename("skills/demo/SKILL.md"), "SKILL.md");
        assert_eq!(basename("README.md"), "README.md");
    }
}
