//! End-to-end scan scenarios over on-disk corpora.

use std::fs;
use std::path::Path;

use chrono::{TimeZone, Utc};
use tempfile::TempDir;

use shelfscan::api::queries::{ReportQueries, SubsetSpec};
use shelfscan::detectors::similarity::Confidence;
use shelfscan::io::report::ClusterType;
use shelfscan::{ScanEngine, ShelfscanConfig, SimilarityReport};

fn write_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn engine() -> ScanEngine {
    ScanEngine::new(ShelfscanConfig::default()).unwrap()
}

fn fox_body() -> String {
    "The quick brown fox jumps over the lazy dog. ".repeat(20)
}

/// Five paragraphs with no lexical overlap to speak of.
fn dissimilar_bodies() -> [String; 5] {
    [
        "Distributed consensus requires a quorum of voters to acknowledge each \
         proposed log entry before it becomes durable state in the replicated machine."
            .repeat(2),
        "Sourdough fermentation depends on wild yeast cultures maintained through \
         daily feeding of equal parts flour and water at room temperature overnight."
            .repeat(2),
        "Mountain weather changes rapidly above the treeline where exposed ridges \
         funnel wind into violent gusts that can exceed hurricane force without warning."
            .repeat(2),
        "Compiler register allocation maps an unbounded set of virtual registers \
         onto a small fixed machine register file using graph coloring heuristics."
            .repeat(2),
        "Coral reef ecosystems host a quarter of all marine species while covering \
         less than one percent of the ocean floor, making them uniquely fragile habitats."
            .repeat(2),
    ]
}

#[test]
fn identical_files_across_marketplaces() {
    let dir = TempDir::new().unwrap();
    let body = fox_body();
    write_file(dir.path(), "mA/p1/x.md", &body);
    write_file(dir.path(), "mB/p1/x.md", &body);

    let report = engine().scan(dir.path()).unwrap();

    assert_eq!(report.summary.total_files_scanned, 2);
    assert_eq!(report.summary.files_in_clusters, 2);
    assert_eq!(report.summary.unique_clusters, 1);

    let cluster = &report.clusters[0];
    assert_eq!(cluster.cluster_type, ClusterType::CrossMarketplace);
    assert_eq!(cluster.size, 2);
    assert_eq!(cluster.avg_similarity, 1.0);
    assert_eq!(
        cluster.marketplaces,
        vec!["mA".to_string(), "mB".to_string()]
    );
}

#[test]
fn yaml_frontmatter_files_co_cluster() {
    let dir = TempDir::new().unwrap();
    let body = format!(
        "---\nname: backend-architect\ndescription: design backends\n---\n{}",
        "design scalable backend services with clear module boundaries and tests "
            .repeat(5)
    );
    write_file(dir.path(), "mA/arch/skills/SKILL.md", &body);
    write_file(dir.path(), "mB/arch/skills/SKILL.md", &body);

    let report = engine().scan(dir.path()).unwrap();

    // Hyphen-preserving tokenization is load-bearing here: the frontmatter
    // must shingle instead of dissolving into an empty set.
    assert_eq!(report.summary.files_in_clusters, 2);
    assert_eq!(report.summary.unique_clusters, 1);
}

#[test]
fn scaffold_detection() {
    let dir = TempDir::new().unwrap();
    let body = "This scaffold skill file is generated for every plugin and kept \
                byte-identical across the whole marketplace catalog for bootstrap purposes. "
        .repeat(3);
    for i in 0..25 {
        write_file(
            dir.path(),
            &format!("mp{i:02}/plugins/gen{i:02}/skills/demo/SKILL.md"),
            &body,
        );
    }

    let report = engine().scan(dir.path()).unwrap();

    assert_eq!(report.summary.unique_clusters, 1);
    let cluster = &report.clusters[0];
    assert_eq!(cluster.size, 25);
    assert_eq!(cluster.cluster_type, ClusterType::Scaffold);
    assert_eq!(report.summary.by_type["scaffold"].files, 25);
}

#[test]
fn internal_only_cluster() {
    let dir = TempDir::new().unwrap();
    let body = "Shared onboarding copy reused across three sibling plugins within one \
                marketplace, long enough to pass the scan length floor comfortably. "
        .repeat(2);
    write_file(dir.path(), "mA/p1/notes/one.md", &body);
    write_file(dir.path(), "mA/p2/notes/two.md", &body);
    write_file(dir.path(), "mA/p3/notes/three.md", &body);

    let report = engine().scan(dir.path()).unwrap();

    assert_eq!(report.summary.unique_clusters, 1);
    let cluster = &report.clusters[0];
    assert_eq!(cluster.cluster_type, ClusterType::Internal);
    assert_eq!(cluster.marketplaces, vec!["mA".to_string()]);
}

#[test]
fn unclustered_tail() {
    let dir = TempDir::new().unwrap();
    let body = fox_body();
    write_file(dir.path(), "mA/p1/x.md", &body);
    write_file(dir.path(), "mB/p1/x.md", &body);
    for (i, unique) in dissimilar_bodies().iter().enumerate() {
        write_file(dir.path(), &format!("mC/p{i}/unique{i}.md"), unique);
    }

    let report = engine().scan(dir.path()).unwrap();

    assert_eq!(report.summary.total_files_scanned, 7);
    assert_eq!(report.summary.files_in_clusters, 2);
    assert_eq!(report.summary.unclustered_files, 5);
    assert_eq!(report.summary.unique_clusters, 1);
}

#[test]
fn reports_are_deterministic() {
    let dir = TempDir::new().unwrap();
    let body = fox_body();
    write_file(dir.path(), "mA/p1/x.md", &body);
    write_file(dir.path(), "mB/p1/x.md", &body);
    for (i, unique) in dissimilar_bodies().iter().enumerate() {
        write_file(dir.path(), &format!("mC/p{i}/unique{i}.md"), unique);
    }

    let stamp = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let first = engine().scan_at(dir.path(), stamp).unwrap();
    let second = engine().scan_at(dir.path(), stamp).unwrap();

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn report_round_trips_through_disk() {
    let dir = TempDir::new().unwrap();
    let body = fox_body();
    write_file(dir.path(), "mA/p1/x.md", &body);
    write_file(dir.path(), "mB/p1/x.md", &body);
    write_file(dir.path(), "mC/p1/other.md", &dissimilar_bodies()[0]);

    let stamp = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let report = engine().scan_at(dir.path(), stamp).unwrap();

    let out = dir.path().join("similarity_report.json");
    report.save(&out).unwrap();
    let loaded = SimilarityReport::load(&out).unwrap();

    assert_eq!(
        serde_json::to_string(&report).unwrap(),
        serde_json::to_string(&loaded).unwrap()
    );
}

#[test]
fn queries_over_scanned_corpus() {
    let dir = TempDir::new().unwrap();
    let body = fox_body();
    write_file(dir.path(), "installed-hub/writer/skills/guide.md", &body);
    write_file(dir.path(), "candidate-hub/writer/skills/guide.md", &body);
    write_file(
        dir.path(),
        "candidate-hub/writer/skills/original.md",
        &dissimilar_bodies()[1],
    );

    let report = engine().scan(dir.path()).unwrap();
    let queries = ReportQueries::new(&report);

    let located = queries.locate("guide.md").unwrap();
    assert_eq!(located.clusters.len(), 1);
    assert_eq!(located.clusters[0].matching.len(), 2);

    let target = SubsetSpec::parse("candidate-hub").unwrap();
    let reference = vec![SubsetSpec::parse("installed-hub").unwrap()];
    let impact = queries.impact(&target, &reference).unwrap();
    assert_eq!(impact.total, 2);
    assert_eq!(impact.redundant, 1);
    assert_eq!(impact.novel, 1);
}

#[test]
fn official_flag_flows_into_clusters() {
    let dir = TempDir::new().unwrap();
    let body = fox_body();
    write_file(dir.path(), "anthropic-core/p1/x.md", &body);
    write_file(dir.path(), "community/p1/x.md", &body);

    let report = engine().scan(dir.path()).unwrap();

    assert!(report.clusters[0].has_official);
    let official_file = report
        .file_index
        .iter()
        .find(|f| f.marketplace == "anthropic-core")
        .unwrap();
    assert!(official_file.is_official);
}

#[test]
fn empty_corpus_voids_confidence() {
    let dir = TempDir::new().unwrap();

    let report = engine().scan(dir.path()).unwrap();

    assert_eq!(report.summary.total_files_scanned, 0);
    assert_eq!(report.metadata.confidence.to_string(), "none");
    assert!(report
        .metadata
        .warnings
        .iter()
        .any(|w| w.contains("No files were analyzed")));
}

#[test]
fn sanity_warning_fires_on_misconfigured_scan() {
    let dir = TempDir::new().unwrap();

    // Six byte-identical pairs that even a crippled index cannot miss, each
    // pair with its own payload so they stay separate clusters.
    for pair in 0..6 {
        let body = format!("duplicate payload {pair} ").repeat(30);
        write_file(dir.path(), &format!("dup-a/p{pair}/copy{pair}.md"), &body);
        write_file(dir.path(), &format!("dup-b/p{pair}/copy{pair}.md"), &body);
    }

    // 588 mutually dissimilar files spread over ten marketplaces.
    for i in 0..588 {
        let words: Vec<String> = (0..40).map(|j| format!("f{i}w{j}")).collect();
        write_file(
            dir.path(),
            &format!("bulk{:02}/p{}/doc{i}.md", i % 10, i / 10),
            &words.join(" "),
        );
    }

    // Tuning the band layout purely against false positives collapses it to
    // one band spanning the whole signature, so only exact duplicates ever
    // collide and near-duplicate recall is destroyed.
    let mut config = ShelfscanConfig::default();
    config.similarity.false_positive_weight = 1.0;
    config.similarity.false_negative_weight = 0.0;

    let engine = ScanEngine::new(config).unwrap();
    assert_eq!(engine.band_params().bands, 1);

    let report = engine.scan(dir.path()).unwrap();

    // 12 of 600 files cluster: a 2% ratio on a large corpus.
    assert_eq!(report.summary.total_files_scanned, 600);
    assert_eq!(report.summary.files_in_clusters, 12);
    assert_eq!(report.summary.unique_clusters, 6);

    assert!(report
        .metadata
        .warnings
        .iter()
        .any(|w| w.to_lowercase().contains("low similarity ratio")));
    assert_eq!(report.metadata.confidence, Confidence::Medium);
}

#[test]
fn files_below_length_floor_are_skipped() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "mA/p1/tiny.md", "too small to index");
    write_file(dir.path(), "mA/p1/real.md", &fox_body());

    let report = engine().scan(dir.path()).unwrap();
    assert_eq!(report.summary.total_files_scanned, 1);
}
