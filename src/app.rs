use anyhow::Result;
use anyhow::bail;

use crate::clients::git::RemoteClient;
use crate::clients::git::RemoteOps;
use crate::config::Config;
use crate::index::TopologyIndex;
use crate::indexer::Indexer;
use crate::mutator::Mutator;
use crate::mutator::ReplaceFileRequest;
use crate::mutator::WhitelistRequest;

/// Number of commit id characters shown to users.
pub const SHORT_COMMIT_LENGTH: usize = 7;

pub struct App<R> {
    pub config: Config,
    pub index: TopologyIndex,
    pub mutator: Mutator<R>,
}

impl App<RemoteClient> {
    /// Wire up the app and its indexer against the configured remote. Both
    /// share the returned index.
    pub fn from_config(config: Config) -> (Self, Indexer<RemoteClient>) {
        let index = TopologyIndex::new();
        let indexer = Indexer::new(
            RemoteClient::from_config(&config),
            index.clone(),
            config.refresh_interval,
        );
        let app = Self::new(config.clone(), index, RemoteClient::from_config(&config));
        (app, indexer)
    }
}

impl<R: RemoteOps> App<R> {
    pub fn new(config: Config, index: TopologyIndex, remote: R) -> Self {
        let mutator = Mutator::new(remote, config.credentials.clone(), config.author.clone());
        Self {
            config,
            index,
            mutator,
        }
    }

    /// Replace a file and describe the result for the user.
    pub async fn replace_file(&self, request: ReplaceFileRequest) -> Result<String> {
        let source = format!("{}/{}", request.source_folder, request.source_file);
        let target = format!("{}/{}", request.target_folder, request.target_file);
        let outcome = self.mutator.replace_file(request).await?;
        Ok(format!(
            "Replaced `{}` with the contents of `{}` (commit {}).",
            target,
            source,
            short_commit(&outcome.commit.0)
        ))
    }

    /// Write a whitelist and describe the result for the user. An empty
    /// member list is refused; whitelists cannot be cleared from chat.
    pub async fn update_whitelist(&self, request: WhitelistRequest) -> Result<String> {
        let target = format!("{}/{}", request.folder, request.file);
        let members = request.document.exclusive_join.len();
        if members == 0 {
            bail!("no player IDs given");
        }
        let outcome = self.mutator.update_whitelist(request).await?;
        Ok(format!(
            "Updated whitelist `{}` with {} member{} (commit {}).",
            target,
            members,
            if members == 1 { "" } else { "s" },
            short_commit(&outcome.commit.0)
        ))
    }
}

fn short_commit(id: &str) -> &str {
    &id[..SHORT_COMMIT_LENGTH.min(id.len())]
}
