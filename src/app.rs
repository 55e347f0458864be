//! Main application state: the imported document and the import, print and add flows

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::core::{
    config::AppConfig,
    document::Document,
    store::{self, DocumentStore, StoreError},
};

/// Result of importing a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    /// The file was loaded with this many entries
    Loaded { entries: usize },
    /// The file has zero bytes; nothing was imported
    Empty,
}

/// Result of adding a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The value was appended at this index
    Added { index: usize },
    /// Empty input, nothing to do
    Ignored,
    /// The value is not valid JSON. Nothing was written; the caller may
    /// confirm with [`JsonListApp::add_raw`].
    InvalidFormat,
}

/// Main application state
pub struct JsonListApp {
    /// Application configuration
    pub config: AppConfig,
    /// Where the configuration is persisted, if anywhere
    config_path: Option<PathBuf>,
    /// Store used for appends
    store: DocumentStore,
    /// Currently imported document
    pub document: Option<Document>,
}

impl JsonListApp {
    /// Create a new application instance
    pub fn new(config: AppConfig, config_path: Option<PathBuf>) -> Self {
        let store = DocumentStore::new(config.store.indent).ascii_only(config.store.ascii_only);
        Self {
            config,
            config_path,
            store,
            document: None,
        }
    }

    /// Import a file, replacing the current checklist
    ///
    /// An empty file is a notice, not an error, and leaves no document open.
    pub fn import(&mut self, path: PathBuf) -> Result<ImportOutcome> {
        let value = match store::load(&path) {
            Ok(value) => value,
            Err(StoreError::EmptyFile { .. }) => {
                tracing::warn!("Selected file is empty: {}", path.display());
                self.document = None;
                return Ok(ImportOutcome::Empty);
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to import file: {}", path.display()))
            }
        };

        let document = Document::from_value(path.clone(), &value);
        let entries = document.len();
        tracing::info!("Imported {} ({} entries)", document.title(), entries);
        self.document = Some(document);

        self.config.add_recent_file(path);
        self.save_config();

        Ok(ImportOutcome::Loaded { entries })
    }

    /// Mark the items at `indices` as checked
    ///
    /// Nothing is checked if any index is out of range.
    pub fn check(&mut self, indices: &[usize]) -> Result<()> {
        self.require_document_mut()?.check_all(indices)
    }

    /// Labels of all checked items, in list order
    pub fn print_checked(&self) -> Result<Vec<String>> {
        let document = self.require_document()?;
        Ok(document
            .checked_labels()
            .into_iter()
            .map(str::to_string)
            .collect())
    }

    /// Add `text` to the imported file if it is valid JSON
    ///
    /// The text is parsed once and the parsed value is committed, so there is
    /// no second read between validation and write.
    pub fn add(&mut self, text: &str) -> Result<AddOutcome> {
        if text.is_empty() {
            return Ok(AddOutcome::Ignored);
        }

        let document = self
            .document
            .as_mut()
            .context("No file imported")?;

        let value = match store::parse_entry(text) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!("Rejected value {:?}: {}", text, e);
                return Ok(AddOutcome::InvalidFormat);
            }
        };

        self.store
            .append_value(&document.path, value)
            .with_context(|| format!("Failed to add value to {}", document.path.display()))?;
        document.push(text);

        Ok(AddOutcome::Added {
            index: document.len() - 1,
        })
    }

    /// Add `text` verbatim as a string entry, without JSON validation
    pub fn add_raw(&mut self, text: &str) -> Result<AddOutcome> {
        if text.is_empty() {
            return Ok(AddOutcome::Ignored);
        }

        let document = self
            .document
            .as_mut()
            .context("No file imported")?;

        self.store
            .append_raw(&document.path, text)
            .with_context(|| format!("Failed to add value to {}", document.path.display()))?;
        document.push(text);

        Ok(AddOutcome::Added {
            index: document.len() - 1,
        })
    }

    /// Get the imported document
    pub fn require_document(&self) -> Result<&Document> {
        self.document.as_ref().context("No file imported")
    }

    fn require_document_mut(&mut self) -> Result<&mut Document> {
        self.document.as_mut().context("No file imported")
    }

    fn save_config(&self) {
        if let Some(ref path) = self.config_path {
            if let Err(e) = self.config.save_to(path) {
                tracing::error!("Failed to save config: {:#}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn setup(content: &str) -> (TempDir, PathBuf, JsonListApp) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.json");
        fs::write(&path, content).unwrap();
        let config_path = dir.path().join("config").join("config.json");
        let app = JsonListApp::new(AppConfig::default(), Some(config_path));
        (dir, path, app)
    }

    #[test]
    fn test_import_and_print_checked() {
        let (_dir, path, mut app) = setup(r#"["a", "b", {"c": 1}]"#);

        let outcome = app.import(path).unwrap();
        assert_eq!(outcome, ImportOutcome::Loaded { entries: 3 });

        app.check(&[2, 0]).unwrap();
        assert_eq!(app.print_checked().unwrap(), vec!["a", r#"{"c":1}"#]);
    }

    #[test]
    fn test_import_empty_file_is_notice() {
        let (dir, path, mut app) = setup("");

        assert_eq!(app.import(path).unwrap(), ImportOutcome::Empty);
        assert!(app.document.is_none());
        assert!(app.config.last_file.is_none());
        assert!(!dir.path().join("config").exists());
    }

    #[test]
    fn test_import_malformed_is_error() {
        let (_dir, path, mut app) = setup("[1,");
        assert!(app.import(path).is_err());
    }

    #[test]
    fn test_import_records_recent_file() {
        let (dir, path, mut app) = setup("[]");
        app.import(path.clone()).unwrap();

        let saved = AppConfig::load_from(&dir.path().join("config").join("config.json")).unwrap();
        assert_eq!(saved.last_file, Some(path.clone()));
        assert_eq!(saved.recent_files, vec![path]);
    }

    #[test]
    fn test_reimport_replaces_checklist() {
        let (_dir, path, mut app) = setup(r#"["a", "b"]"#);
        app.import(path.clone()).unwrap();
        app.check(&[0]).unwrap();

        app.import(path).unwrap();
        let document = app.require_document().unwrap();
        assert_eq!(document.len(), 2);
        assert!(app.print_checked().unwrap().is_empty());
    }

    #[test]
    fn test_check_out_of_range_leaves_selection() {
        let (_dir, path, mut app) = setup(r#"["a", "b"]"#);
        app.import(path).unwrap();

        assert!(app.check(&[0, 99]).is_err());
        assert!(app.print_checked().unwrap().is_empty());

        app.check(&[1]).unwrap();
        assert_eq!(app.print_checked().unwrap(), vec!["b"]);
    }

    #[test]
    fn test_add_valid_json() {
        let (_dir, path, mut app) = setup(r#"["a","b"]"#);
        app.import(path.clone()).unwrap();

        assert_eq!(app.add("3").unwrap(), AddOutcome::Added { index: 2 });
        assert_eq!(store::load(&path).unwrap(), json!(["a", "b", 3]));
        assert_eq!(app.require_document().unwrap().items[2].label, "3");
    }

    #[test]
    fn test_add_invalid_then_confirm_raw() {
        let (_dir, path, mut app) = setup(r#"["a","b",3]"#);
        app.import(path.clone()).unwrap();
        let before = fs::read(&path).unwrap();

        assert_eq!(app.add("c").unwrap(), AddOutcome::InvalidFormat);
        assert_eq!(fs::read(&path).unwrap(), before);
        assert_eq!(app.require_document().unwrap().len(), 3);

        assert_eq!(app.add_raw("c").unwrap(), AddOutcome::Added { index: 3 });
        assert_eq!(store::load(&path).unwrap(), json!(["a", "b", 3, "c"]));
    }

    #[test]
    fn test_add_empty_is_ignored() {
        let (_dir, path, mut app) = setup("[]");
        app.import(path.clone()).unwrap();

        assert_eq!(app.add("").unwrap(), AddOutcome::Ignored);
        assert_eq!(app.add_raw("").unwrap(), AddOutcome::Ignored);
        assert_eq!(store::load(&path).unwrap(), json!([]));
    }

    #[test]
    fn test_operations_require_import() {
        let (_dir, _path, mut app) = setup("[]");
        assert!(app.add("1").is_err());
        assert!(app.add_raw("x").is_err());
        assert!(app.check(&[0]).is_err());
        assert!(app.print_checked().is_err());
    }

    #[test]
    fn test_add_uses_configured_indent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.json");
        fs::write(&path, "[]").unwrap();

        let mut config = AppConfig::default();
        config.store.indent = 2;
        let mut app = JsonListApp::new(config, None);
        app.import(path.clone()).unwrap();
        app.add("true").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "[\n  true\n]");
    }

    #[test]
    fn test_add_respects_ascii_only_setting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.json");
        fs::write(&path, "[]").unwrap();

        let mut config = AppConfig::default();
        config.store.ascii_only = false;
        let mut app = JsonListApp::new(config, None);
        app.import(path.clone()).unwrap();
        app.add_raw("é").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "[\n    \"é\"\n]");
    }
}
