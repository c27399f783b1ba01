use chrono::Utc;
use tokio::sync::Mutex;
use tracing::info;
use tracing::instrument;
use tracing::warn;

use crate::clients::git::CommitId;
use crate::clients::git::RemoteOps;
use crate::clients::git::WorkingCopy;
use crate::clients::git::validate_relative;
use crate::config::Author;
use crate::config::Credentials;
use crate::error::RepoError;
use crate::whitelist::Whitelist;

pub const REPLACE_FILE_MESSAGE: &str = "Replace file content";
pub const UPDATE_WHITELIST_MESSAGE: &str = "Update whitelist";

// -----------------------------------------------------------------------------
// Types

/// Overwrite `target_folder/target_file` with the bytes of
/// `source_folder/source_file`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceFileRequest {
    pub source_folder: String,
    pub source_file: String,
    pub target_folder: String,
    pub target_file: String,
}

/// Overwrite `folder/file` with a serialized whitelist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhitelistRequest {
    pub folder: String,
    pub file: String,
    pub document: Whitelist,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    ReplaceFile(ReplaceFileRequest),
    UpdateWhitelist(WhitelistRequest),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationOutcome {
    pub commit: CommitId,
}

/// Applies single-file edits to the remote as clone, write, commit, push.
///
/// Mutations are serialized through one lock per mutator, so a process
/// holding a single mutator per remote never races its own pushes.
pub struct Mutator<R> {
    remote: R,
    credentials: Option<Credentials>,
    author: Author,
    lock: Mutex<()>,
}

// -----------------------------------------------------------------------------
// Mutation impl

impl Mutation {
    pub fn commit_message(&self) -> &'static str {
        match self {
            Mutation::ReplaceFile(_) => REPLACE_FILE_MESSAGE,
            Mutation::UpdateWhitelist(_) => UPDATE_WHITELIST_MESSAGE,
        }
    }

    fn validate(&self) -> Result<(), RepoError> {
        match self {
            Mutation::ReplaceFile(r) => {
                validate_relative(&r.source_folder)?;
                validate_relative(&r.source_file)?;
                validate_relative(&r.target_folder)?;
                validate_relative(&r.target_file)
            }
            Mutation::UpdateWhitelist(w) => {
                validate_relative(&w.folder)?;
                validate_relative(&w.file)
            }
        }
    }

    async fn write(&self, wc: &WorkingCopy) -> Result<(), RepoError> {
        match self {
            Mutation::ReplaceFile(r) => {
                let bytes = wc.read_file(&r.source_folder, &r.source_file).await?;
                wc.write_file(&r.target_folder, &r.target_file, &bytes)
                    .await
            }
            Mutation::UpdateWhitelist(w) => {
                let body = w.document.to_json()?;
                wc.write_file(&w.folder, &w.file, &body).await
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Mutator impl

impl<R: RemoteOps> Mutator<R> {
    pub fn new(remote: R, credentials: Option<Credentials>, author: Author) -> Self {
        Self {
            remote,
            credentials,
            author,
            lock: Mutex::new(()),
        }
    }

    pub async fn replace_file(
        &self,
        request: ReplaceFileRequest,
    ) -> Result<MutationOutcome, RepoError> {
        self.apply(&Mutation::ReplaceFile(request)).await
    }

    pub async fn update_whitelist(
        &self,
        request: WhitelistRequest,
    ) -> Result<MutationOutcome, RepoError> {
        self.apply(&Mutation::UpdateWhitelist(request)).await
    }

    /// Run `mutation` as one transaction against a fresh working copy.
    ///
    /// The working copy is deleted whatever the outcome. Nothing reaches the
    /// remote unless every step up to and including the push succeeds.
    #[instrument(skip_all, fields(message = mutation.commit_message()))]
    pub async fn apply(&self, mutation: &Mutation) -> Result<MutationOutcome, RepoError> {
        mutation.validate()?;

        let _guard = self.lock.lock().await;
        let wc = self.remote.acquire().await?;
        let result = self.apply_in(&wc, mutation).await;
        if let Err(e) = wc.release() {
            warn!(error = %e, "failed to remove working copy");
        }

        match &result {
            Ok(outcome) => info!(commit = %outcome.commit, "mutation pushed"),
            Err(e) => warn!(error = %e, kind = e.kind(), "mutation failed"),
        }
        result
    }

    async fn apply_in(
        &self,
        wc: &WorkingCopy,
        mutation: &Mutation,
    ) -> Result<MutationOutcome, RepoError> {
        mutation.write(wc).await?;
        wc.stage_all().await?;
        let commit = wc
            .commit(mutation.commit_message(), &self.author, Utc::now())
            .await?;
        wc.push(self.credentials.as_ref()).await?;
        Ok(MutationOutcome { commit })
    }
}
