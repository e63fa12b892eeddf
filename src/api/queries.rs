//! Queries over a loaded similarity report.
//!
//! All queries are read-only projections of the artifact: `locate` resolves a
//! filename pattern to the clusters it appears in, `compare` classifies a
//! candidate subset against a reference subset, `impact` condenses that into
//! a novelty-versus-redundancy summary, and `stats` surfaces the index
//! shape.

use std::collections::BTreeSet;
use std::fmt;

use globset::GlobBuilder;

use crate::core::errors::{Result, ShelfscanError};
use crate::io::report::{basename, Cluster, FileRecord, SimilarityReport, TypeBreakdown};

/// A set of files addressed by marketplace, or by marketplace and plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubsetSpec {
    /// Everything in one marketplace
    Marketplace(String),
    /// Everything in one plugin of one marketplace
    Plugin {
        /// Marketplace name
        marketplace: String,
        /// Plugin name
        plugin: String,
    },
}

impl SubsetSpec {
    /// Parse `marketplace` or `marketplace/plugin`.
    pub fn parse(spec: &str) -> Result<Self> {
        let spec = spec.trim();
        if spec.is_empty() {
            return Err(ShelfscanError::query("empty subset specification"));
        }

        match spec.split_once('/') {
            Some((marketplace, plugin)) if !marketplace.is_empty() && !plugin.is_empty() => {
                Ok(Self::Plugin {
                    marketplace: marketplace.to_string(),
                    plugin: plugin.to_string(),
                })
            }
            Some(_) => Err(ShelfscanError::query(format!(
                "malformed subset specification: {spec:?}"
            ))),
            None => Ok(Self::Marketplace(spec.to_string())),
        }
    }

    /// Whether a file belongs to this subset.
    pub fn matches(&self, file: &FileRecord) -> bool {
        match self {
            Self::Marketplace(marketplace) => file.marketplace == *marketplace,
            Self::Plugin {
                marketplace,
                plugin,
            } => file.marketplace == *marketplace && file.plugin == *plugin,
        }
    }
}

impl fmt::Display for SubsetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Marketplace(marketplace) => f.write_str(marketplace),
            Self::Plugin {
                marketplace,
                plugin,
            } => write!(f, "{marketplace}/{plugin}"),
        }
    }
}

/// One cluster hit from `locate`, with the members that matched the query.
#[derive(Debug)]
pub struct LocateMatch<'a> {
    /// The cluster containing matching files
    pub cluster: &'a Cluster,
    /// The members whose filenames matched
    pub matching: Vec<&'a FileRecord>,
}

/// Result of `locate`: clustered hits plus unclustered matches.
#[derive(Debug, Default)]
pub struct LocateResult<'a> {
    /// Clusters containing at least one matching file
    pub clusters: Vec<LocateMatch<'a>>,
    /// Matching files that belong to no cluster
    pub unclustered: Vec<&'a FileRecord>,
}

/// Classification of one target file by its cluster peers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileClass {
    /// Shares a cluster with at least one reference file
    RedundantWithReference,
    /// Shares a cluster with another target file, but no reference file
    RedundantInternal,
    /// Unclustered, or clustered only with outside files
    Novel,
}

/// One classified target file.
#[derive(Debug)]
pub struct Classified<'a> {
    /// The target file
    pub file: &'a FileRecord,
    /// Its classification
    pub class: FileClass,
}

/// Full result of a `compare` run.
#[derive(Debug)]
pub struct CompareOutcome<'a> {
    /// Target files considered
    pub total: usize,
    /// Files redundant with the reference side
    pub redundant_with_reference: usize,
    /// Files duplicated only within the target itself
    pub redundant_internal: usize,
    /// Files with nothing similar in target or reference
    pub novel: usize,
    /// Per-file classifications, in file order
    pub files: Vec<Classified<'a>>,
}

/// Condensed `impact` numbers.
#[derive(Debug, Clone, Copy)]
pub struct ImpactSummary {
    /// Target files considered
    pub total: usize,
    /// Genuinely new files
    pub novel: usize,
    /// Files already present on the reference side
    pub redundant: usize,
    /// Files duplicated within the target only
    pub internal: usize,
}

impl ImpactSummary {
    /// Redundant share of the target, in [0, 1].
    pub fn redundancy_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.redundant as f64 / self.total as f64
        }
    }
}

/// Read-only statistics projection.
#[derive(Debug)]
pub struct ReportStats<'a> {
    /// Files in the scan
    pub total_files_scanned: usize,
    /// Clusters in the index
    pub unique_clusters: usize,
    /// Marketplaces participating in at least one cluster
    pub marketplaces_covered: usize,
    /// Distinct basenames appearing in clusters
    pub unique_filenames: usize,
    /// Cluster and file counts per type
    pub by_type: &'a std::collections::BTreeMap<String, TypeBreakdown>,
    /// Basenames by cluster occurrence, most frequent first
    pub top_filenames: Vec<(&'a str, usize)>,
}

/// Query surface over a loaded report. Holds only borrows; multiple query
/// values may share one report snapshot.
#[derive(Debug, Clone, Copy)]
pub struct ReportQueries<'a> {
    report: &'a SimilarityReport,
}

impl<'a> ReportQueries<'a> {
    /// Wrap a loaded report.
    pub fn new(report: &'a SimilarityReport) -> Self {
        Self { report }
    }

    /// Resolve a filename query to the clusters it appears in.
    ///
    /// An exact basename match wins; otherwise the query is treated as a
    /// glob over basenames, widened to a substring match when it carries no
    /// glob metacharacters.
    pub fn locate(&self, query: &str) -> Result<LocateResult<'a>> {
        let query_name = basename(query);

        let exact: Vec<&FileRecord> = self
            .report
            .file_index
            .iter()
            .filter(|file| file.filename == query_name)
            .collect();
        if !exact.is_empty() {
            return Ok(self.group_matches(exact));
        }

        let is_glob = query.contains(['*', '?', '[']);
        let pattern = if is_glob {
            query.to_string()
        } else {
            format!("*{query}*")
        };
        let glob = GlobBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| ShelfscanError::query(format!("invalid pattern {query:?}: {e}")))?
            .compile_matcher();

        let substring = (!is_glob).then(|| query.to_lowercase());
        let matches: Vec<&FileRecord> = self
            .report
            .file_index
            .iter()
            .filter(|file| {
                glob.is_match(&file.filename)
                    || substring
                        .as_deref()
                        .is_some_and(|needle| file.path.to_lowercase().contains(needle))
            })
            .collect();

        Ok(self.group_matches(matches))
    }

    fn group_matches(&self, matches: Vec<&'a FileRecord>) -> LocateResult<'a> {
        let mut result = LocateResult::default();
        let mut by_cluster: std::collections::BTreeMap<u32, Vec<&'a FileRecord>> =
            std::collections::BTreeMap::new();

        for file in matches {
            match file.cluster_id {
                Some(cluster_id) => by_cluster.entry(cluster_id).or_default().push(file),
                None => result.unclustered.push(file),
            }
        }

        for (cluster_id, matching) in by_cluster {
            if let Some(cluster) = self.report.cluster(cluster_id) {
                result.clusters.push(LocateMatch { cluster, matching });
            }
        }

        result
    }

    /// Classify every target file against the reference subsets.
    ///
    /// The reference is the stable side; the target is the candidate being
    /// evaluated for installation.
    pub fn compare(
        &self,
        target: &SubsetSpec,
        reference: &[SubsetSpec],
    ) -> Result<CompareOutcome<'a>> {
        let target_files: Vec<&FileRecord> = self
            .report
            .file_index
            .iter()
            .filter(|file| target.matches(file))
            .collect();
        if target_files.is_empty() {
            return Err(ShelfscanError::query(format!(
                "no scanned files match target {target}"
            )));
        }

        let target_set: BTreeSet<u32> = target_files.iter().map(|f| f.file_index).collect();
        let reference_set: BTreeSet<u32> = self
            .report
            .file_index
            .iter()
            .filter(|file| reference.iter().any(|spec| spec.matches(file)))
            .map(|f| f.file_index)
            .collect();

        let mut outcome = CompareOutcome {
            total: target_files.len(),
            redundant_with_reference: 0,
            redundant_internal: 0,
            novel: 0,
            files: Vec::with_capacity(target_files.len()),
        };

        for file in target_files {
            let class = self.classify(file, &target_set, &reference_set);
            match class {
                FileClass::RedundantWithReference => outcome.redundant_with_reference += 1,
                FileClass::RedundantInternal => outcome.redundant_internal += 1,
                FileClass::Novel => outcome.novel += 1,
            }
            outcome.files.push(Classified { file, class });
        }

        Ok(outcome)
    }

    fn classify(
        &self,
        file: &FileRecord,
        target_set: &BTreeSet<u32>,
        reference_set: &BTreeSet<u32>,
    ) -> FileClass {
        let Some(cluster_id) = file.cluster_id else {
            return FileClass::Novel;
        };
        let Some(cluster) = self.report.cluster(cluster_id) else {
            return FileClass::Novel;
        };

        let peers = cluster
            .members
            .iter()
            .filter(|&&member| member != file.file_index);

        let mut shares_target = false;
        for &peer in peers {
            if reference_set.contains(&peer) {
                return FileClass::RedundantWithReference;
            }
            shares_target |= target_set.contains(&peer);
        }

        if shares_target {
            FileClass::RedundantInternal
        } else {
            FileClass::Novel
        }
    }

    /// `compare` condensed to install-impact numbers.
    pub fn impact(
        &self,
        target: &SubsetSpec,
        reference: &[SubsetSpec],
    ) -> Result<ImpactSummary> {
        let outcome = self.compare(target, reference)?;
        Ok(ImpactSummary {
            total: outcome.total,
            novel: outcome.novel,
            redundant: outcome.redundant_with_reference,
            internal: outcome.redundant_internal,
        })
    }

    /// Read-only statistics over the report.
    pub fn stats(&self) -> ReportStats<'a> {
        let mut top_filenames: Vec<(&str, usize)> = self
            .report
            .filename_index
            .iter()
            .map(|(name, clusters)| (name.as_str(), clusters.len()))
            .collect();
        top_filenames.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        top_filenames.truncate(10);

        ReportStats {
            total_files_scanned: self.report.summary.total_files_scanned,
            unique_clusters: self.report.summary.unique_clusters,
            marketplaces_covered: self.report.marketplace_index.len(),
            unique_filenames: self.report.filename_index.len(),
            by_type: &self.report.summary.by_type,
            top_filenames,
        }
    }
}
