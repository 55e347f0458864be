//! Checklist view of an imported JSON document

use std::path::PathBuf;

use anyhow::{bail, Result};
use serde_json::Value;

/// One row of the checklist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistItem {
    /// Text shown for the entry
    pub label: String,
    /// Whether the entry is selected for printing
    pub checked: bool,
}

impl ChecklistItem {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            checked: false,
        }
    }
}

/// An imported document shown as a list of checkable entries
#[derive(Debug, Clone)]
pub struct Document {
    /// File path
    pub path: PathBuf,
    /// One item per top-level array element
    pub items: Vec<ChecklistItem>,
}

impl Document {
    /// Build the checklist from a loaded document value
    ///
    /// Array roots yield one unchecked item per element. Any other root is
    /// shown as a single item.
    pub fn from_value(path: PathBuf, value: &Value) -> Self {
        let items = match value {
            Value::Array(entries) => entries
                .iter()
                .map(|entry| ChecklistItem::new(Self::label_for(entry)))
                .collect(),
            other => vec![ChecklistItem::new(Self::label_for(other))],
        };

        Self { path, items }
    }

    /// Display text for an entry: strings as-is, everything else as compact JSON
    pub fn label_for(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Get the document title (file name without extension)
    pub fn title(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "Untitled".to_string())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append an unchecked item
    pub fn push(&mut self, label: impl Into<String>) {
        self.items.push(ChecklistItem::new(label));
    }

    /// Set the check state of the item at `index`
    pub fn set_checked(&mut self, index: usize, checked: bool) -> Result<()> {
        self.item_mut(index)?.checked = checked;
        Ok(())
    }

    /// Check every item in `indices`
    ///
    /// All indices are validated first, so a failed call leaves the check
    /// state as it was.
    pub fn check_all(&mut self, indices: &[usize]) -> Result<()> {
        if let Some(&index) = indices.iter().find(|&&index| index >= self.items.len()) {
            bail!(
                "no entry at index {} ({} entries in {})",
                index,
                self.items.len(),
                self.path.display()
            );
        }

        for &index in indices {
            self.items[index].checked = true;
        }
        Ok(())
    }

    /// Flip the check state of the item at `index`, returning the new state
    pub fn toggle(&mut self, index: usize) -> Result<bool> {
        let item = self.item_mut(index)?;
        item.checked = !item.checked;
        Ok(item.checked)
    }

    /// Labels of checked items, in list order
    pub fn checked_labels(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter(|item| item.checked)
            .map(|item| item.label.as_str())
            .collect()
    }

    fn item_mut(&mut self, index: usize) -> Result<&mut ChecklistItem> {
        let len = self.items.len();
        match self.items.get_mut(index) {
            Some(item) => Ok(item),
            None => bail!("no entry at index {} ({} entries in {})", index, len, self.path.display()),
        }
    }
}
