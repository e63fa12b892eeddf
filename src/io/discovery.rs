//! Corpus discovery.
//!
//! Walks a marketplaces root and yields `(marketplace, plugin, path, content)`
//! tuples for every content file that passes the scan filters. The walk order
//! never leaks into results: files are sorted canonically by
//! `(marketplace, plugin, path)` before index assignment.

use std::fs;
use std::path::Path;

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use tracing::{debug, warn};

use crate::core::config::ScanConfig;
use crate::core::errors::{Result, ShelfscanError};

/// One content file pulled from the corpus.
#[derive(Debug, Clone)]
pub struct ScannedFile {
    /// Marketplace directory name
    pub marketplace: String,
    /// Plugin name derived from the path
    pub plugin: String,
    /// Path relative to the marketplace root, `/`-separated
    pub path: String,
    /// File content
    pub content: String,
}

/// Result of a corpus walk, with skip diagnostics.
#[derive(Debug, Default)]
pub struct CorpusScan {
    /// Files that passed every filter, canonically sorted
    pub files: Vec<ScannedFile>,
    /// Files skipped for being below the content-length floor
    pub skipped_short: usize,
    /// Files that could not be read
    pub skipped_unreadable: usize,
}

/// Walk `root` and collect every content file.
///
/// Each immediate subdirectory of `root` is a marketplace; hidden directories
/// are skipped. A missing or non-directory root is a failed precondition.
pub fn discover_corpus(root: &Path, config: &ScanConfig) -> Result<CorpusScan> {
    if !root.is_dir() {
        return Err(ShelfscanError::validation(format!(
            "marketplaces root not found: {}",
            root.display()
        )));
    }

    let exclude = compile_globset(&config.exclude_patterns)?;

    let mut marketplaces: Vec<_> = fs::read_dir(root)
        .map_err(|e| ShelfscanError::io(format!("Failed to list {}", root.display()), e))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter(|entry| !entry.file_name().to_string_lossy().starts_with('.'))
        .map(|entry| entry.path())
        .collect();
    marketplaces.sort();

    let mut scan = CorpusScan::default();
    for marketplace_path in marketplaces {
        walk_marketplace(&marketplace_path, config, exclude.as_ref(), &mut scan);
    }

    scan.files.sort_by(|a, b| {
        (&a.marketplace, &a.plugin, &a.path).cmp(&(&b.marketplace, &b.plugin, &b.path))
    });

    debug!(
        "discovered {} files ({} too short, {} unreadable)",
        scan.files.len(),
        scan.skipped_short,
        scan.skipped_unreadable
    );

    Ok(scan)
}

fn walk_marketplace(
    marketplace_path: &Path,
    config: &ScanConfig,
    exclude: Option<&GlobSet>,
    scan: &mut CorpusScan,
) {
    let marketplace = marketplace_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let walker = WalkBuilder::new(marketplace_path)
        .standard_filters(false)
        .hidden(true)
        .build();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("skipping unreadable entry under {marketplace}: {err}");
                scan.skipped_unreadable += 1;
                continue;
            }
        };
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }

        let full_path = entry.path();
        if !has_allowed_extension(full_path, &config.extensions) {
            continue;
        }

        let relative = match full_path.strip_prefix(marketplace_path) {
            Ok(relative) => relative_path_string(relative),
            Err(_) => continue,
        };

        if let Some(exclude) = exclude {
            let case_folded = relative.to_lowercase();
            if exclude.is_match(&case_folded) {
                continue;
            }
        }

        let content = match fs::read_to_string(full_path) {
            Ok(content) => content,
            Err(_) => match fs::read(full_path) {
                Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Err(err) => {
                    warn!("could not read {}: {err}", full_path.display());
                    scan.skipped_unreadable += 1;
                    continue;
                }
            },
        };

        if content.chars().count() < config.min_content_length {
            scan.skipped_short += 1;
            continue;
        }

        let plugin = derive_plugin(&relative);
        scan.files.push(ScannedFile {
            marketplace: marketplace.clone(),
            plugin,
            path: relative,
            content,
        });
    }
}

/// Derive the plugin name from a marketplace-relative path: the component
/// after a `plugins` directory when present, otherwise the first directory,
/// otherwise `root`.
pub fn derive_plugin(relative_path: &str) -> String {
    let parts: Vec<&str> = relative_path.split('/').collect();

    if let Some(idx) = parts.iter().position(|part| *part == "plugins") {
        if let Some(name) = parts.get(idx + 1) {
            return (*name).to_string();
        }
    } else if parts.len() > 1 {
        return parts[0].to_string();
    }

    "root".to_string()
}

fn has_allowed_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    extensions.iter().any(|allowed| allowed == ext)
}

fn relative_path_string(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Compile glob patterns, matching anywhere in the path.
fn compile_globset(patterns: &[String]) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(false)
            .build()
            .map_err(|e| {
                ShelfscanError::config_field(
                    format!("invalid exclude pattern {pattern:?}: {e}"),
                    "scan.exclude_patterns",
                )
            })?;
        builder.add(glob);
    }

    builder
        .build()
        .map(Some)
        .map_err(|e| ShelfscanError::config(format!("failed to compile exclude patterns: {e}")))
}
