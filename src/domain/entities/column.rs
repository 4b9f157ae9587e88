use serde::{Deserialize, Serialize};

pub const DEFAULT_MIN_VISIBLE: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub key: String,
    pub label: String,
}

impl ColumnDef {
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
        }
    }
}

/// Every column a screen could show, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnCatalogue {
    columns: Vec<ColumnDef>,
}

impl ColumnCatalogue {
    pub fn new(columns: Vec<ColumnDef>) -> Self {
        Self { columns }
    }

    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self::new(
            pairs
                .iter()
                .map(|(key, label)| ColumnDef::new(key, label))
                .collect(),
        )
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.columns.iter().any(|column| column.key == key)
    }

    pub fn label(&self, key: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|column| column.key == key)
            .map(|column| column.label.as_str())
    }

    /// An empty catalogue accepts any key.
    pub fn accepts(&self, key: &str) -> bool {
        self.is_empty() || self.contains(key)
    }

    pub fn visible<'a>(&'a self, visible: &[String]) -> Vec<&'a ColumnDef> {
        self.columns
            .iter()
            .filter(|column| visible.iter().any(|key| *key == column.key))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleColumns {
    keys: Vec<String>,
    min_visible: usize,
}

impl VisibleColumns {
    pub fn new(keys: Vec<String>, min_visible: usize) -> Self {
        Self { keys, min_visible }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn min_visible(&self) -> usize {
        self.min_visible
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Whether the checkbox for `key` should be locked on.
    pub fn is_locked(&self, key: &str) -> bool {
        self.contains(key) && self.keys.len() <= self.min_visible
    }

    /// Returns false when the toggle was refused.
    pub fn toggle(&mut self, key: &str) -> bool {
        if self.contains(key) {
            if self.keys.len() <= self.min_visible {
                return false;
            }
            self.keys.retain(|k| k != key);
        } else {
            self.keys.push(key.to_string());
        }
        true
    }

    pub fn replace(&mut self, keys: Vec<String>) {
        self.keys = keys;
    }
}
