//! Console rendering helpers.

use console::style;
use shelfscan::detectors::similarity::Confidence;
use shelfscan::io::report::Cluster;

/// Print a section banner.
pub fn print_banner(title: &str) {
    println!("{}", style("=".repeat(50)).dim());
    println!("{}", style(title).bold());
    println!("{}", style("=".repeat(50)).dim());
}

/// `part` as a percentage of `whole`, safe on empty wholes.
pub fn percent(part: usize, whole: usize) -> String {
    if whole == 0 {
        "0%".to_string()
    } else {
        format!("{:.0}%", part as f64 / whole as f64 * 100.0)
    }
}

/// Style a confidence label by how alarming it is.
pub fn styled_confidence(confidence: Confidence) -> String {
    let label = confidence.to_string();
    match confidence {
        Confidence::High => style(label).green().to_string(),
        Confidence::Medium => style(label).yellow().to_string(),
        Confidence::Low | Confidence::None => style(label).red().to_string(),
        Confidence::Unknown => style(label).dim().to_string(),
    }
}

/// Print the warnings block, if there are any.
pub fn print_warnings(warnings: &[String]) {
    if warnings.is_empty() {
        return;
    }
    println!("\n{}", style("WARNINGS:").yellow().bold());
    for warning in warnings {
        println!("  {} {warning}", style("!").yellow());
    }
}

/// One-line cluster header used by `where` and `stats`.
pub fn cluster_headline(cluster: &Cluster) -> String {
    let official = if cluster.has_official {
        " [has official]"
    } else {
        ""
    };
    format!(
        "Cluster #{}: {} files, {:.0}% similar, type={}{}",
        cluster.cluster_id,
        cluster.size,
        cluster.avg_similarity * 100.0,
        cluster.cluster_type,
        official
    )
}
