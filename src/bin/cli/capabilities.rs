//! Capability search over skill and agent frontmatter.
//!
//! A keyword grep, not a similarity query: walks the marketplaces root,
//! parses YAML frontmatter from skill and agent markdown files, and scores
//! name and description matches.

use std::path::Path;

use ignore::WalkBuilder;
use serde_yaml::Value;
use tracing::debug;

use shelfscan::core::errors::{Result, ShelfscanError};
use shelfscan::io::discovery::derive_plugin;

/// Minimum content length for a capability file to be considered.
const MIN_CAPABILITY_LENGTH: usize = 50;

/// A skill or agent found in a marketplace.
#[derive(Debug, Clone)]
pub struct Capability {
    /// Capability name (frontmatter name or file stem)
    pub name: String,
    /// "skill" or "agent"
    pub kind: &'static str,
    /// Description from frontmatter, or the first prose line
    pub description: String,
    /// Marketplace the capability came from
    pub marketplace: String,
    /// Plugin within the marketplace
    pub plugin: String,
    /// Path relative to the marketplace root
    pub path: String,
}

impl Capability {
    /// Score a keyword query against this capability. `None` when nothing
    /// matches.
    pub fn matches(&self, query: &str) -> Option<f64> {
        let query_lower = query.to_lowercase();
        let query_words: Vec<&str> = query_lower.split_whitespace().collect();
        let mut score = 0.0;

        let name_lower = self.name.to_lowercase();
        if name_lower.contains(&query_lower) {
            score += 10.0;
        } else if query_words.iter().any(|w| name_lower.contains(w)) {
            score += 5.0;
        }

        let desc_lower = self.description.to_lowercase();
        if desc_lower.contains(&query_lower) {
            score += 5.0;
        } else {
            let matching = query_words.iter().filter(|w| desc_lower.contains(*w)).count();
            score += matching as f64 * 2.0;
        }

        (score > 0.0).then_some(score)
    }
}

/// Scan every marketplace under `root` for skills and agents.
pub fn scan_capabilities(root: &Path) -> Result<Vec<Capability>> {
    if !root.is_dir() {
        return Err(ShelfscanError::validation(format!(
            "marketplaces root not found: {}",
            root.display()
        )));
    }

    let mut marketplaces: Vec<_> = std::fs::read_dir(root)
        .map_err(|e| ShelfscanError::io(format!("Failed to list {}", root.display()), e))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter(|entry| !entry.file_name().to_string_lossy().starts_with('.'))
        .map(|entry| entry.path())
        .collect();
    marketplaces.sort();

    let mut capabilities = Vec::new();
    for marketplace_path in &marketplaces {
        scan_marketplace(marketplace_path, &mut capabilities);
    }

    debug!("found {} capabilities", capabilities.len());
    Ok(capabilities)
}

fn scan_marketplace(marketplace_path: &Path, capabilities: &mut Vec<Capability>) {
    let marketplace = marketplace_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let walker = WalkBuilder::new(marketplace_path)
        .standard_filters(false)
        .hidden(true)
        .build();

    for entry in walker.filter_map(|e| e.ok()) {
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("md") {
            continue;
        }

        let relative = match path.strip_prefix(marketplace_path) {
            Ok(relative) => relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/"),
            Err(_) => continue,
        };
        if relative.to_lowercase().contains("backup") {
            continue;
        }

        let kind = if relative.split('/').any(|part| part == "skills") {
            "skill"
        } else if relative.split('/').any(|part| part == "agents") {
            "agent"
        } else {
            continue;
        };

        let Ok(content) = std::fs::read_to_string(path) else {
            continue;
        };
        if content.len() < MIN_CAPABILITY_LENGTH {
            continue;
        }

        let frontmatter = parse_frontmatter(&content);
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = if stem == "SKILL" {
            path.parent()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or(stem)
        } else {
            stem
        };

        let description = frontmatter_description(frontmatter.as_ref())
            .unwrap_or_else(|| first_prose_line(&content));

        capabilities.push(Capability {
            name,
            kind,
            description,
            marketplace: marketplace.clone(),
            plugin: derive_plugin(&relative),
            path: relative,
        });
    }
}

/// Parse the YAML frontmatter block of a markdown document, if any.
pub fn parse_frontmatter(content: &str) -> Option<Value> {
    let rest = content.strip_prefix("---")?;
    let end = rest.find("\n---")?;
    serde_yaml::from_str(&rest[..end]).ok()
}

fn frontmatter_description(frontmatter: Option<&Value>) -> Option<String> {
    let description = frontmatter?.get("description")?;
    match description {
        Value::String(s) => Some(s.clone()),
        Value::Sequence(items) => Some(
            items
                .iter()
                .filter_map(|v| v.as_str())
                .collect::<Vec<_>>()
                .join(" "),
        ),
        _ => None,
    }
}

/// First body line that is neither a heading nor a list item, truncated.
fn first_prose_line(content: &str) -> String {
    let body = match content.strip_prefix("---").and_then(|rest| {
        rest.find("\n---")
            .map(|end| &rest[end + 4..])
    }) {
        Some(body) => body,
        None => content,
    };

    for line in body.lines() {
        let line = line.trim();
        if !line.is_empty() && !line.starts_with('#') && !line.starts_with('-') {
            return line.chars().take(200).collect();
        }
    }
    String::new()
}
