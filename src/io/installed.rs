//! The externally supplied install inventory.
//!
//! The host environment records which plugins are installed in a JSON file of
//! the shape `{"plugins": {"name@marketplace": [{"installPath": ..,
//! "version": ..}]}}`. Shelfscan only reads it: the inventory defines the
//! reference side of `impact` and the listing behind `installed`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::core::errors::{Result, ShelfscanError};

/// A currently installed plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledPlugin {
    /// Plugin name
    pub name: String,
    /// Marketplace it was installed from
    pub marketplace: String,
    /// Where the install lives on disk
    pub install_path: PathBuf,
    /// Installed version string
    pub version: String,
}

#[derive(Deserialize)]
struct InventoryFile {
    #[serde(default)]
    plugins: BTreeMap<String, Vec<InventoryEntry>>,
}

#[derive(Deserialize)]
struct InventoryEntry {
    #[serde(rename = "installPath", default)]
    install_path: String,
    #[serde(default)]
    version: String,
}

/// Load the install inventory from `path`.
///
/// Plugin keys are `name@marketplace`; a key without the `@` separator maps
/// to the `unknown` marketplace.
pub fn load_inventory(path: &Path) -> Result<Vec<InstalledPlugin>> {
    let content = fs::read_to_string(path).map_err(|e| {
        ShelfscanError::io(format!("Failed to read inventory: {}", path.display()), e)
    })?;

    let inventory: InventoryFile = serde_json::from_str(&content).map_err(|e| {
        ShelfscanError::report_at(format!("malformed inventory: {e}"), path.display().to_string())
    })?;

    let mut plugins = Vec::new();
    for (key, installs) in inventory.plugins {
        let (name, marketplace) = match key.rsplit_once('@') {
            Some((name, marketplace)) => (name.to_string(), marketplace.to_string()),
            None => (key, "unknown".to_string()),
        };

        for install in installs {
            plugins.push(InstalledPlugin {
                name: name.clone(),
                marketplace: marketplace.clone(),
                install_path: PathBuf::from(install.install_path),
                version: install.version,
            });
        }
    }

    Ok(plugins)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_load_inventory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("installed_plugins.json");
        fs::write(
            &path,
            r#"{
                "plugins": {
                    "writer@community": [
                        {"installPath": "/tmp/writer", "version": "1.2.0"}
                    ],
                    "bare-key": [
                        {"installPath": "/tmp/bare"}
                    ]
                }
            }"#,
        )
        .unwrap();

        let plugins = load_inventory(&path).unwrap();
        assert_eq!(plugins.len(), 2);

        let writer = plugins.iter().find(|p| p.name == "writer").unwrap();
        assert_eq!(writer.marketplace, "community");
        assert_eq!(writer.version, "1.2.0");

        let bare = plugins.iter().find(|p| p.name == "bare-key").unwrap();
        assert_eq!(bare.marketplace, "unknown");
    }

    #[test]
    fn test_missing_inventory_is_error() {
        let dir = TempDir::new().unwrap();
        assert!(load_inventory(&dir.path().join("absent.json")).is_err());
    }

    #[test]
    fn test_empty_inventory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("installed_plugins.json");
        fs::write(&path, "{}").unwrap();
        assert!(load_inventory(&path).unwrap().is_empty());
    }
}
