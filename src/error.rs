use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Failures raised by working-copy and mutation operations.
///
/// Every variant is terminal for the operation that raised it. Messages are
/// shown to chat users as-is (with `{:#}` to include the I/O cause), so they
/// never carry credentials.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("failed to clone repository: {0}")]
    Clone(String),

    #[error("failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to stage changes: {0}")]
    Stage(String),

    #[error("failed to commit: {0}")]
    Commit(String),

    #[error("nothing to commit: the file already has this content")]
    NoChanges,

    #[error("failed to push: {0}")]
    Push(String),

    #[error("invalid path {path:?}: {reason}")]
    InvalidPath { path: String, reason: &'static str },

    #[error("failed to serialize whitelist")]
    Serialize(#[from] serde_json::Error),

    #[error("git {operation} timed out after {}s", .after.as_secs())]
    Timeout {
        operation: &'static str,
        after: Duration,
    },
}

impl RepoError {
    /// Stable short name, used as a structured logging field.
    pub fn kind(&self) -> &'static str {
        match self {
            RepoError::Clone(_) => "clone",
            RepoError::Read { .. } => "read",
            RepoError::Write { .. } => "write",
            RepoError::Stage(_) => "stage",
            RepoError::Commit(_) => "commit",
            RepoError::NoChanges => "no_changes",
            RepoError::Push(_) => "push",
            RepoError::InvalidPath { .. } => "invalid_path",
            RepoError::Serialize(_) => "serialize",
            RepoError::Timeout { .. } => "timeout",
        }
    }
}
