//! Application configuration management

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use super::store::DEFAULT_INDENT;

/// How many recently imported files are remembered
const MAX_RECENT_FILES: usize = 10;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Last imported file
    pub last_file: Option<PathBuf>,
    /// Recently imported files, most recent first
    pub recent_files: Vec<PathBuf>,
    /// Document store settings
    pub store: StoreConfig,
}

/// Settings for rewriting documents
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Indentation width in spaces
    pub indent: usize,
    /// Escape non-ASCII characters as `\uXXXX` when rewriting
    pub ascii_only: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
            ascii_only: true,
        }
    }
}

impl AppConfig {
    /// Get the default config file path
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "jsonlist", "JsonList")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from `path`, falling back to defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure config directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;

        tracing::info!("Saved config to: {}", path.display());
        Ok(())
    }

    /// Record `path` as the last imported file and move it to the front of
    /// the recent list
    pub fn add_recent_file(&mut self, path: PathBuf) {
        self.recent_files.retain(|p| p != &path);
        self.recent_files.insert(0, path.clone());
        self.recent_files.truncate(MAX_RECENT_FILES);
        self.last_file = Some(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("config.json")).unwrap();
        assert!(config.last_file.is_none());
        assert_eq!(config.store.indent, 4);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = AppConfig::default();
        config.add_recent_file(PathBuf::from("/data/a.json"));
        config.store.indent = 2;
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.last_file, Some(PathBuf::from("/data/a.json")));
        assert_eq!(loaded.recent_files, vec![PathBuf::from("/data/a.json")]);
        assert_eq!(loaded.store.indent, 2);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"last_file": "/x.json"}"#).unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.last_file, Some(PathBuf::from("/x.json")));
        assert_eq!(config.store.indent, 4);
        assert!(config.store.ascii_only);
        assert!(config.recent_files.is_empty());
    }

    #[test]
    fn test_malformed_config_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{").unwrap();
        assert!(AppConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_recent_files_dedup_and_cap() {
        let mut config = AppConfig::default();
        for i in 0..12 {
            config.add_recent_file(PathBuf::from(format!("/f{i}.json")));
        }
        config.add_recent_file(PathBuf::from("/f5.json"));

        assert_eq!(config.recent_files.len(), 10);
        assert_eq!(config.recent_files[0], PathBuf::from("/f5.json"));
        assert_eq!(
            config.recent_files.iter().filter(|p| p.ends_with("f5.json")).count(),
            1
        );
        assert_eq!(config.last_file, Some(PathBuf::from("/f5.json")));
    }
}
