//! Shelfscan CLI - marketplace similarity awareness before install.
//!
//! Scans plugin marketplaces for near-duplicate content, persists an indexed
//! similarity report, and answers where / compare / impact queries over it.

use clap::Parser;

mod cli;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Scan(args) => cli::scan_command(args).await?,
        Commands::Where(args) => cli::where_command(args).await?,
        Commands::Compare(args) => cli::compare_command(args).await?,
        Commands::Impact(args) => cli::impact_command(args).await?,
        Commands::Stats(args) => cli::stats_command(args).await?,
        Commands::Installed(args) => cli::installed_command(args).await?,
        Commands::Find(args) => cli::find_command(args).await?,
    }

    Ok(())
}
