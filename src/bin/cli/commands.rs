//! Command execution logic.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::{bail, Context};
use console::style;
use serde_json::json;

use shelfscan::api::queries::{FileClass, ReportQueries, SubsetSpec};
use shelfscan::core::config::ShelfscanConfig;
use shelfscan::io::installed::{load_inventory, InstalledPlugin};
use shelfscan::io::report::SimilarityReport;
use shelfscan::ScanEngine;

use crate::cli::args::*;
use crate::cli::capabilities::scan_capabilities;
use crate::cli::output::*;

/// Build the similarity report for a marketplaces root.
pub async fn scan_command(args: ScanArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => ShelfscanConfig::from_yaml_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => ShelfscanConfig::default(),
    };

    println!("Scanning marketplaces in {}...", args.root.display());
    println!(
        "Similarity threshold: {:.0}%\n",
        config.similarity.similarity_threshold * 100.0
    );

    let engine = ScanEngine::new(config)?;
    let report = engine.scan(&args.root)?;

    if let Some(parent) = args.out.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    report.save(&args.out)?;

    print_banner("SCAN COMPLETE");
    println!("Total files:       {}", report.summary.total_files_scanned);
    println!("Files in clusters: {}", report.summary.files_in_clusters);
    println!("Unclustered files: {}", report.summary.unclustered_files);
    println!("Clusters:          {}", report.summary.unique_clusters);
    println!(
        "Confidence:        {}",
        styled_confidence(report.metadata.confidence)
    );

    println!("\nCluster breakdown by type:");
    for (cluster_type, breakdown) in &report.summary.by_type {
        println!(
            "  {cluster_type}: {} clusters, {} files",
            breakdown.clusters, breakdown.files
        );
    }

    print_warnings(&report.metadata.warnings);
    println!("\nReport saved to: {}", args.out.display());
    Ok(())
}

/// Find every location of similar content.
pub async fn where_command(args: WhereArgs) -> anyhow::Result<()> {
    let report = load_report(&args.report)?;
    let queries = ReportQueries::new(&report);
    let result = queries.locate(&args.query)?;

    if result.clusters.is_empty() && result.unclustered.is_empty() {
        println!("No similar files found for: {}", args.query);
        return Ok(());
    }

    let total: usize = result.clusters.iter().map(|m| m.matching.len()).sum();
    println!(
        "Found {} locations across {} clusters:\n",
        total,
        result.clusters.len()
    );

    for located in &result.clusters {
        println!("{}", cluster_headline(located.cluster));
        println!("  Marketplaces: {}", located.cluster.marketplaces.join(", "));
        println!("  Locations:");
        for location in &located.cluster.locations {
            let official = if location.is_official { " [official]" } else { "" };
            println!("    {location}{official}");
        }
        println!();
    }

    if !result.unclustered.is_empty() {
        println!("Matches outside any cluster:");
        for file in &result.unclustered {
            println!("  {}", file.location());
        }
    }

    Ok(())
}

/// Classify a target against a baseline.
pub async fn compare_command(args: CompareArgs) -> anyhow::Result<()> {
    let report = load_report(&args.report)?;
    let queries = ReportQueries::new(&report);

    let target = SubsetSpec::parse(&args.target)?;
    let reference = resolve_baseline(&args.baseline, args.inventory.as_deref())?;
    let outcome = queries.compare(&target, &reference)?;

    if args.json {
        let files: Vec<_> = outcome
            .files
            .iter()
            .map(|classified| {
                json!({
                    "file": classified.file.location().to_string(),
                    "class": class_label(classified.class),
                })
            })
            .collect();
        let payload = json!({
            "target": args.target,
            "baseline": args.baseline,
            "summary": {
                "total_files": outcome.total,
                "redundant_with_reference": outcome.redundant_with_reference,
                "redundant_internal": outcome.redundant_internal,
                "novel": outcome.novel,
            },
            "confidence": report.metadata.confidence.to_string(),
            "warnings": report.metadata.warnings,
            "files": files,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    print_banner(&format!("COMPARISON: {} vs {}", args.target, args.baseline));
    println!("Files in target:      {}", outcome.total);
    println!(
        "Novel:                {} ({})",
        outcome.novel,
        percent(outcome.novel, outcome.total)
    );
    println!(
        "Redundant (baseline): {} ({})",
        outcome.redundant_with_reference,
        percent(outcome.redundant_with_reference, outcome.total)
    );
    println!("Redundant (internal): {}", outcome.redundant_internal);
    println!(
        "Report confidence:    {}",
        styled_confidence(report.metadata.confidence)
    );
    print_warnings(&report.metadata.warnings);

    if args.detailed {
        println!("\nClassified files:");
        for classified in &outcome.files {
            println!(
                "  {} {}",
                style(format!("[{}]", class_label(classified.class))).dim(),
                classified.file.location()
            );
        }
    }

    let ratio = outcome.redundant_with_reference as f64 / outcome.total.max(1) as f64;
    println!();
    if ratio > 0.5 {
        println!("High redundancy: most of the target already exists in the baseline.");
    } else if ratio > 0.2 {
        println!("Some overlap with the baseline ({:.0}%).", ratio * 100.0);
    } else {
        println!("Low overlap - mostly novel content.");
    }

    Ok(())
}

/// Condensed install-impact summary.
pub async fn impact_command(args: ImpactArgs) -> anyhow::Result<()> {
    let report = load_report(&args.report)?;
    let queries = ReportQueries::new(&report);

    let target = SubsetSpec::parse(&args.target)?;
    let reference = resolve_baseline(&args.baseline, args.inventory.as_deref())?;
    let impact = queries.impact(&target, &reference)?;

    println!(
        "{} vs {}: {} files",
        args.target, args.baseline, impact.total
    );
    println!(
        "  -> {} new, {} redundant, {} internal duplicates",
        impact.novel, impact.redundant, impact.internal
    );

    let ratio = impact.redundancy_ratio();
    if ratio > 0.5 {
        println!("  -> High overlap with baseline");
    } else if impact.novel > impact.redundant {
        println!("  -> Mostly new content");
    }

    Ok(())
}

/// Show index statistics.
pub async fn stats_command(args: StatsArgs) -> anyhow::Result<()> {
    let report = load_report(&args.report)?;
    let queries = ReportQueries::new(&report);
    let stats = queries.stats();

    print_banner("Similarity Index Statistics");
    println!("Total files scanned:     {}", stats.total_files_scanned);
    println!("Total clusters indexed:  {}", stats.unique_clusters);
    println!("Unique filenames:        {}", stats.unique_filenames);
    println!("Marketplaces covered:    {}", stats.marketplaces_covered);

    println!("\nMost common filenames in clusters:");
    for (filename, count) in &stats.top_filenames {
        println!("  {filename}: {count} clusters");
    }

    println!("\nClusters by type:");
    for (cluster_type, breakdown) in stats.by_type {
        println!("  {cluster_type}: {}", breakdown.clusters);
    }

    Ok(())
}

/// List installed plugins from the host inventory.
pub async fn installed_command(args: InstalledArgs) -> anyhow::Result<()> {
    let plugins = load_inventory(&args.inventory)?;

    if plugins.is_empty() {
        println!("No installed plugins found.");
        return Ok(());
    }

    println!("Installed plugins: {}\n", plugins.len());

    let mut by_marketplace: BTreeMap<&str, Vec<&InstalledPlugin>> = BTreeMap::new();
    for plugin in &plugins {
        by_marketplace
            .entry(plugin.marketplace.as_str())
            .or_default()
            .push(plugin);
    }

    for (marketplace, entries) in by_marketplace {
        println!("{marketplace}:");
        for plugin in entries {
            if args.detailed {
                println!("  {} (v{})", plugin.name, plugin.version);
                println!("    {}", plugin.install_path.display());
            } else {
                println!("  {}", plugin.name);
            }
        }
        println!();
    }

    Ok(())
}

/// Search skills and agents by capability keywords.
pub async fn find_command(args: FindArgs) -> anyhow::Result<()> {
    println!("Scanning marketplaces...");
    let capabilities = scan_capabilities(&args.root)?;
    println!("Found {} skills and agents.\n", capabilities.len());
    println!("Searching for: {}\n", args.query);

    let mut results: Vec<_> = capabilities
        .iter()
        .filter_map(|capability| {
            capability
                .matches(&args.query)
                .map(|score| (capability, score))
        })
        .collect();
    results.sort_by(|a, b| b.1.total_cmp(&a.1));

    if results.is_empty() {
        println!("No capabilities found matching: {}", args.query);
        return Ok(());
    }

    println!("Found {} matches:\n", results.len());

    let mut by_marketplace: BTreeMap<&str, Vec<&crate::cli::capabilities::Capability>> =
        BTreeMap::new();
    for (capability, _) in results.iter().take(30) {
        by_marketplace
            .entry(capability.marketplace.as_str())
            .or_default()
            .push(capability);
    }

    for (marketplace, entries) in by_marketplace {
        println!("{marketplace}:");
        for capability in entries {
            println!(
                "  {} {} ({})",
                style(format!("[{}]", capability.kind)).cyan(),
                capability.name,
                capability.plugin
            );
            if !capability.description.is_empty() {
                let description: String = capability.description.chars().take(60).collect();
                println!("      {description}");
            }
        }
        println!();
    }

    Ok(())
}

/// Load a report or fail with a pointer at `scan`.
fn load_report(path: &Path) -> anyhow::Result<SimilarityReport> {
    if !path.exists() {
        bail!(
            "similarity report not found at {}; run 'shelfscan scan' first",
            path.display()
        );
    }
    Ok(SimilarityReport::load(path)?)
}

/// Resolve the baseline argument into reference subsets.
fn resolve_baseline(
    baseline: &str,
    inventory: Option<&Path>,
) -> anyhow::Result<Vec<SubsetSpec>> {
    if baseline != "installed" {
        return Ok(vec![SubsetSpec::parse(baseline)?]);
    }

    let Some(inventory_path) = inventory else {
        bail!("baseline 'installed' requires --inventory <installed_plugins.json>");
    };

    let plugins = load_inventory(inventory_path)?;
    if plugins.is_empty() {
        bail!("install inventory is empty: {}", inventory_path.display());
    }

    // Multiple installs of one plugin collapse to a single reference subset.
    let keys: BTreeSet<(String, String)> = plugins
        .into_iter()
        .map(|plugin| (plugin.marketplace, plugin.name))
        .collect();

    Ok(keys
        .into_iter()
        .map(|(marketplace, plugin)| SubsetSpec::Plugin {
            marketplace,
            plugin,
        })
        .collect())
}

fn class_label(class: FileClass) -> &'static str {
    match class {
        FileClass::RedundantWithReference => "redundant",
        FileClass::RedundantInternal => "internal-duplicate",
        FileClass::Novel => "novel",
    }
}
