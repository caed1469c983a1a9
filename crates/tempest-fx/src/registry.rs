//! Load registry: which files a descriptor load touched, and who asked.
//!
//! Shared mutable output of every load; the dependency tracker and the
//! hot-reload invalidator walk it after asset loads complete.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One recorded reference: the logical loader that referenced the file and
/// the relative path the referencing document used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReference {
    pub loader: String,
    pub relative_path: String,
}

/// Mapping from resolved file path to the ordered list of references to it.
#[derive(Debug, Clone, Default)]
pub struct LoadRegistry {
    entries: BTreeMap<PathBuf, Vec<FileReference>>,
}

impl LoadRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `loader` referenced `path` as `relative_path`.
    /// References to the same file accumulate in call order.
    pub fn record(&mut self, path: &Path, loader: &str, relative_path: &str) {
        self.entries
            .entry(path.to_path_buf())
            .or_default()
            .push(FileReference {
                loader: loader.to_string(),
                relative_path: relative_path.to_string(),
            });
    }

    pub fn references(&self, path: &Path) -> &[FileReference] {
        self.entries.get(path).map_or(&[], Vec::as_slice)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PathBuf, &[FileReference])> {
        self.entries.iter().map(|(k, v)| (k, v.as_slice()))
    }
}
