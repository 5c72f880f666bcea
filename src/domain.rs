//! Core data types shared by the loader, locator and updaters.

use indexmap::IndexMap;
use std::fmt;
use std::path::PathBuf;

/// File name suffix identifying agent controller descriptors.
pub const XML_TARGET_SUFFIX: &str = "controller-info.xml";

/// File name suffix identifying analytics agent properties files.
pub const PROPERTIES_TARGET_SUFFIX: &str = "analytics-agent.properties";

/// Desired configuration values, keyed by element tag or properties key.
///
/// Entries keep the order in which keys first appear in the input file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideSet {
    entries: IndexMap<String, String>,
}

impl OverrideSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a desired value. A repeated key keeps its first
    /// position and its latest value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for OverrideSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (key, value) in iter {
            set.insert(key, value);
        }
        set
    }
}

/// A single value that was (or, when simulating, would be) rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub key: String,
    pub old: String,
    pub new: String,
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Update {}: {} --> {}", self.key, self.old, self.new)
    }
}

/// Outcome of running one updater over one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpdate {
    pub path: PathBuf,
    pub changes: Vec<Change>,
    /// Whether new content was persisted to disk.
    pub written: bool,
}

impl FileUpdate {
    pub fn is_changed(&self) -> bool {
        !self.changes.is_empty()
    }
}

/// Target files discovered under a package root, split by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetFiles {
    pub xml: Vec<PathBuf>,
    pub properties: Vec<PathBuf>,
}

impl TargetFiles {
    pub fn is_empty(&self) -> bool {
        self.xml.is_empty() && self.properties.is_empty()
    }
}
