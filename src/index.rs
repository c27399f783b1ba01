use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;

/// Shared cache of the remote's folder/file names.
///
/// Cloning the handle shares the same index. Entries are only ever added:
/// a file deleted upstream stays listed until the process restarts.
#[derive(Debug, Clone, Default)]
pub struct TopologyIndex {
    inner: Arc<RwLock<BTreeMap<String, Vec<String>>>>,
}

impl TopologyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `folder` exists, without adding any file.
    pub fn record_folder(&self, folder: &str) -> bool {
        let mut map = self.inner.write();
        if map.contains_key(folder) {
            return false;
        }
        map.insert(folder.to_string(), Vec::new());
        true
    }

    /// Append the names not yet known under `folder`, keeping discovery
    /// order. Returns how many were added.
    pub fn record_files<I, S>(&self, folder: &str, files: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = self.inner.write();
        let known = map.entry(folder.to_string()).or_default();
        let mut added = 0;
        for file in files {
            let file = file.as_ref();
            if !known.iter().any(|f| f == file) {
                known.push(file.to_string());
                added += 1;
            }
        }
        added
    }

    /// All known folders, sorted by name.
    pub fn folders(&self) -> Vec<String> {
        self.inner.read().keys().cloned().collect()
    }

    /// Files known under `folder`, in discovery order. Empty for an unknown
    /// folder.
    pub fn files(&self, folder: &str) -> Vec<String> {
        self.inner.read().get(folder).cloned().unwrap_or_default()
    }

    pub fn snapshot(&self) -> BTreeMap<String, Vec<String>> {
        self.inner.read().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}
