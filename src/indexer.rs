//! Background refresh of the [`TopologyIndex`].
//!
//! Each cycle clones the remote into a fresh working copy, lists the
//! top-level folders and the files directly inside them, merges the names
//! into the index and deletes the working copy again.

use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::sync::watch;
use tracing::debug;
use tracing::info;
use tracing::instrument;
use tracing::warn;

use crate::clients::git::METADATA_DIR;
use crate::clients::git::RemoteOps;
use crate::clients::git::WorkingCopy;
use crate::error::RepoError;
use crate::index::TopologyIndex;

pub struct Indexer<R> {
    remote: R,
    index: TopologyIndex,
    interval: Duration,
}

/// Outcome of one refresh cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub folders: usize,
    pub files_added: usize,
    /// Folders that could not be read this cycle.
    pub skipped: Vec<String>,
}

impl<R: RemoteOps> Indexer<R> {
    pub fn new(remote: R, index: TopologyIndex, interval: Duration) -> Self {
        Self {
            remote,
            index,
            interval,
        }
    }

    pub fn index(&self) -> &TopologyIndex {
        &self.index
    }

    /// Run a single refresh cycle.
    #[instrument(skip_all)]
    pub async fn sync_once(&self) -> Result<SyncReport, RepoError> {
        let wc = self.remote.acquire().await?;
        let result = self.scan(&wc).await;
        if let Err(e) = wc.release() {
            warn!(error = %e, "failed to remove working copy");
        }
        result
    }

    /// Refresh the index every interval until `shutdown` flips to true or
    /// its sender goes away. The first cycle runs immediately.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!(
            interval_secs = self.interval.as_secs(),
            "topology indexer started"
        );

        while !*shutdown.borrow() {
            tokio::select! {
                result = self.sync_once() => match result {
                    Ok(report) => info!(
                        folders = report.folders,
                        files_added = report.files_added,
                        skipped = report.skipped.len(),
                        "index refreshed"
                    ),
                    Err(e) => warn!(error = %e, kind = e.kind(), "index refresh failed"),
                },
                _ = shutdown.changed() => break,
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = shutdown.changed() => break,
            }
        }

        info!("topology indexer stopped");
    }

    async fn scan(&self, wc: &WorkingCopy) -> Result<SyncReport, RepoError> {
        let root = wc.path();
        let entries = read_entries(root).await.map_err(|source| RepoError::Read {
            path: PathBuf::from("."),
            source,
        })?;

        let folders: Vec<String> = entries
            .into_iter()
            .filter(|(name, is_dir)| *is_dir && name != METADATA_DIR)
            .map(|(name, _)| name)
            .collect();

        let listings = join_all(folders.iter().map(|folder| read_entries_in(root, folder))).await;
        Ok(self.merge(folders.into_iter().zip(listings)))
    }

    /// Merge per-folder listings into the index. A folder whose listing
    /// failed is reported as skipped and leaves its entry untouched.
    fn merge(
        &self,
        listings: impl IntoIterator<Item = (String, io::Result<Vec<(String, bool)>>)>,
    ) -> SyncReport {
        let mut report = SyncReport::default();
        for (folder, listing) in listings {
            report.folders += 1;
            match listing {
                Ok(entries) => {
                    self.index.record_folder(&folder);
                    let files = entries
                        .into_iter()
                        .filter(|(_, is_dir)| !is_dir)
                        .map(|(name, _)| name);
                    let added = self.index.record_files(&folder, files);
                    debug!(folder = %folder, added, "indexed folder");
                    report.files_added += added;
                }
                Err(e) => {
                    warn!(folder = %folder, error = %e, "failed to read folder, skipping");
                    report.skipped.push(folder);
                }
            }
        }
        report
    }
}

async fn read_entries_in(root: &Path, folder: &str) -> io::Result<Vec<(String, bool)>> {
    read_entries(&root.join(folder)).await
}

/// Immediate children of `dir` as (name, is_dir), sorted by name. Names that
/// are not valid UTF-8 are skipped.
async fn read_entries(dir: &Path) -> io::Result<Vec<(String, bool)>> {
    let mut read_dir = tokio::fs::read_dir(dir).await?;
    let mut entries = Vec::new();
    while let Some(entry) = read_dir.next_entry().await? {
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        let is_dir = entry.file_type().await?.is_dir();
        entries.push((name, is_dir));
    }
    entries.sort();
    Ok(entries)
}
