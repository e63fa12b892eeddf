//! The scan pipeline.
//!
//! Discovery -> per-file shingling and MinHash (data-parallel, pure) ->
//! LSH insertion (single-threaded, deterministic) -> cluster assembly ->
//! sanity check -> assembled report. The report depends only on the corpus
//! content and the configured seed, never on walk order or thread schedule.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::core::config::ShelfscanConfig;
use crate::core::errors::Result;
use crate::detectors::similarity::sanity::{MarketplaceMembership, SanityChecker, SanitySample};
use crate::detectors::similarity::{
    optimal_params, BandParams, ClusterBuilder, LshIndex, MinHasher, ShingleGenerator,
};
use crate::io::discovery::{discover_corpus, ScannedFile};
use crate::io::report::{
    basename, FileRecord, ReportMetadata, SimilarityReport, SCHEMA_VERSION,
};

/// High-level scan engine.
#[derive(Debug, Clone)]
pub struct ScanEngine {
    config: ShelfscanConfig,
    band_params: BandParams,
}

impl ScanEngine {
    /// Create an engine, validating the configuration and tuning the LSH
    /// band layout for the configured threshold.
    pub fn new(config: ShelfscanConfig) -> Result<Self> {
        config.validate()?;

        let band_params = optimal_params(
            config.similarity.similarity_threshold,
            config.similarity.num_permutations,
            config.similarity.false_positive_weight,
            config.similarity.false_negative_weight,
        );
        debug!(
            "LSH layout: {} bands x {} rows for threshold {}",
            band_params.bands, band_params.rows, config.similarity.similarity_threshold
        );

        Ok(Self {
            config,
            band_params,
        })
    }

    /// The engine's configuration.
    pub fn config(&self) -> &ShelfscanConfig {
        &self.config
    }

    /// The tuned band layout.
    pub fn band_params(&self) -> BandParams {
        self.band_params
    }

    /// Scan the marketplaces under `root` and build a report stamped with
    /// the current time.
    pub fn scan(&self, root: &Path) -> Result<SimilarityReport> {
        self.scan_at(root, Utc::now())
    }

    /// Scan with an explicit timestamp. Two scans of the same corpus with
    /// the same configuration and timestamp serialize byte-identically.
    pub fn scan_at(&self, root: &Path, generated_at: DateTime<Utc>) -> Result<SimilarityReport> {
        let corpus = discover_corpus(root, &self.config.scan)?;
        info!(
            "scanning {} content files ({} skipped as too short)",
            corpus.files.len(),
            corpus.skipped_short
        );

        let mut files = self.to_records(&corpus.files);
        let signatures = self.build_signatures(&corpus.files);

        let signed = signatures.iter().filter(|s| s.is_some()).count();
        if signed < corpus.files.len() {
            info!(
                "{} files produced no signature and stay unclustered",
                corpus.files.len() - signed
            );
        }

        let mut index = LshIndex::new(self.band_params);
        for (file_index, signature) in signatures.iter().enumerate() {
            if let Some(signature) = signature {
                index.insert(file_index as u32, signature);
            }
        }

        let builder = ClusterBuilder::new(
            self.config.similarity.similarity_threshold,
            self.config.similarity.scaffold_min_size,
        );
        let clusters = builder.build(&index, &signatures, &mut files);
        info!("{} clusters assembled", clusters.len());

        let sample = sanity_sample(&files, &clusters);
        let outcome = SanityChecker::new(self.config.sanity.clone()).check(&sample);
        for warning in &outcome.warnings {
            tracing::warn!("sanity: {warning}");
        }

        let metadata = ReportMetadata {
            version: SCHEMA_VERSION.to_string(),
            generated_at,
            similarity_threshold: self.config.similarity.similarity_threshold,
            num_permutations: self.config.similarity.num_permutations,
            shingle_size: self.config.similarity.shingle_size,
            num_bands: self.band_params.bands,
            rows_per_band: self.band_params.rows,
            confidence: outcome.confidence,
            warnings: outcome.warnings,
        };

        Ok(SimilarityReport::assemble(metadata, files, clusters))
    }

    fn to_records(&self, files: &[ScannedFile]) -> Vec<FileRecord> {
        files
            .iter()
            .enumerate()
            .map(|(file_index, file)| FileRecord {
                file_index: file_index as u32,
                marketplace: file.marketplace.clone(),
                plugin: file.plugin.clone(),
                path: file.path.clone(),
                filename: basename(&file.path).to_string(),
                is_official: self.config.is_official(&file.marketplace),
                cluster_id: None,
                in_cluster: false,
            })
            .collect()
    }

    /// Tokenize and hash every file. Pure per file, so the work fans out
    /// across the rayon pool and is gathered back in file order.
    fn build_signatures(&self, files: &[ScannedFile]) -> Vec<Option<Vec<u32>>> {
        let generator = ShingleGenerator::new(self.config.similarity.shingle_size);
        let hasher = MinHasher::new(
            self.config.similarity.num_permutations,
            self.config.similarity.permutation_seed,
        );

        files
            .par_iter()
            .map(|file| {
                let shingles = generator.shingles(&file.content);
                if shingles.is_empty() {
                    return None;
                }
                hasher.signature(&shingles).ok()
            })
            .collect()
    }
}

/// Project the scan output into the statistics the sanity checker inspects.
fn sanity_sample(
    files: &[FileRecord],
    clusters: &[crate::io::report::Cluster],
) -> SanitySample {
    let mut marketplace_membership: BTreeMap<String, MarketplaceMembership> = BTreeMap::new();
    for file in files {
        let entry = marketplace_membership
            .entry(file.marketplace.clone())
            .or_default();
        entry.files += 1;
        if file.in_cluster {
            entry.clustered += 1;
        }
    }

    SanitySample {
        total_files: files.len(),
        files_in_clusters: files.iter().filter(|f| f.in_cluster).count(),
        unique_clusters: clusters.len(),
        marketplace_membership,
        cluster_sizes: clusters.iter().map(|c| c.size).collect(),
    }
}
