//! CLI argument structures.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Marketplace similarity awareness before install
#[derive(Parser)]
#[command(name = "shelfscan")]
#[command(version = VERSION)]
#[command(about = "Shelfscan - near-duplicate awareness for plugin marketplaces")]
#[command(long_about = "
Index plugin marketplaces for near-duplicate content and query the result.

Common Usage:

  # Build the similarity report
  shelfscan scan ~/.claude/plugins/marketplaces

  # Where else does this file's content live?
  shelfscan where SKILL.md

  # How much of a marketplace is already installed?
  shelfscan impact community-hub --inventory ~/.claude/plugins/installed_plugins.json

  # Compare one marketplace against another
  shelfscan compare community-hub --baseline curated-hub

  # Index statistics
  shelfscan stats
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan marketplaces and build the similarity report
    Scan(ScanArgs),

    /// Find every location of similar content by filename or pattern
    Where(WhereArgs),

    /// Classify a target marketplace or plugin against a baseline
    Compare(CompareArgs),

    /// Condensed novelty-versus-redundancy summary for a target
    Impact(ImpactArgs),

    /// Show similarity index statistics
    Stats(StatsArgs),

    /// List installed plugins from the host inventory
    Installed(InstalledArgs),

    /// Search skills and agents by capability keywords
    Find(FindArgs),
}

/// Arguments for the scan command
#[derive(Args)]
pub struct ScanArgs {
    /// Marketplaces root directory
    pub root: PathBuf,

    /// Output path for the similarity report
    #[arg(short, long, default_value = "similarity_report.json")]
    pub out: PathBuf,

    /// Optional YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Arguments for the where command
#[derive(Args)]
pub struct WhereArgs {
    /// Filename, glob, or substring to look up
    pub query: String,

    /// Similarity report to query
    #[arg(short, long, default_value = "similarity_report.json")]
    pub report: PathBuf,
}

/// Arguments for the compare command
#[derive(Args)]
pub struct CompareArgs {
    /// Target: marketplace or marketplace/plugin
    pub target: String,

    /// Baseline: 'installed', a marketplace, or marketplace/plugin
    #[arg(short, long, default_value = "installed")]
    pub baseline: String,

    /// Similarity report to query
    #[arg(short, long, default_value = "similarity_report.json")]
    pub report: PathBuf,

    /// Install inventory JSON (required when the baseline is 'installed')
    #[arg(short, long)]
    pub inventory: Option<PathBuf>,

    /// List classified files, not just counts
    #[arg(long)]
    pub detailed: bool,

    /// Emit the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the impact command
#[derive(Args)]
pub struct ImpactArgs {
    /// Target: marketplace or marketplace/plugin
    pub target: String,

    /// Baseline: 'installed', a marketplace, or marketplace/plugin
    #[arg(short, long, default_value = "installed")]
    pub baseline: String,

    /// Similarity report to query
    #[arg(short, long, default_value = "similarity_report.json")]
    pub report: PathBuf,

    /// Install inventory JSON (required when the baseline is 'installed')
    #[arg(short, long)]
    pub inventory: Option<PathBuf>,
}

/// Arguments for the stats command
#[derive(Args)]
pub struct StatsArgs {
    /// Similarity report to query
    #[arg(short, long, default_value = "similarity_report.json")]
    pub report: PathBuf,
}

/// Arguments for the installed command
#[derive(Args)]
pub struct InstalledArgs {
    /// Install inventory JSON
    pub inventory: PathBuf,

    /// Show versions and install paths
    #[arg(long)]
    pub detailed: bool,
}

/// Arguments for the find command
#[derive(Args)]
pub struct FindArgs {
    /// Capability keywords to search for
    pub query: String,

    /// Marketplaces root directory
    pub root: PathBuf,
}
