use std::time::Duration;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;

/// Default time between two index refreshes.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30 * 60);

/// Default budget for a single git invocation (clone, push, ...).
pub const DEFAULT_GIT_TIMEOUT: Duration = Duration::from_secs(5 * 60);

pub const DEFAULT_AUTHOR_NAME: &str = "Ark Whitelist Bot";

/// Username/token pair used for HTTP(S) remotes.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub token: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("token", &"***")
            .finish()
    }
}

/// Identity recorded on commits made by the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub email: String,
}

impl Default for Author {
    fn default() -> Self {
        Self {
            name: DEFAULT_AUTHOR_NAME.to_string(),
            email: String::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub remote_url: String,
    pub credentials: Option<Credentials>,
    pub refresh_interval: Duration,
    pub git_timeout: Duration,
    pub author: Author,
}

impl Config {
    /// Load config from the environment, after loading `.env` if present.
    pub fn load() -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(e).context("Failed to load .env file");
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let Some(remote_url) = lookup("GITHUB_URL").filter(|s| !s.trim().is_empty()) else {
            bail!("GITHUB_URL is not set");
        };

        let credentials = match (lookup("GITHUB_USERNAME"), lookup("GITHUB_TOKEN")) {
            (Some(username), Some(token)) if !username.is_empty() && !token.is_empty() => {
                Some(Credentials { username, token })
            }
            _ => None,
        };

        let refresh_interval = secs_var(&lookup, "ARK_REFRESH_INTERVAL_SECS")?
            .unwrap_or(DEFAULT_REFRESH_INTERVAL);
        let git_timeout =
            secs_var(&lookup, "ARK_GIT_TIMEOUT_SECS")?.unwrap_or(DEFAULT_GIT_TIMEOUT);

        let mut author = Author::default();
        if let Some(name) = lookup("ARK_AUTHOR_NAME").filter(|s| !s.is_empty()) {
            author.name = name;
        }
        if let Some(email) = lookup("ARK_AUTHOR_EMAIL") {
            author.email = email;
        }

        Ok(Self {
            remote_url: remote_url.trim().to_string(),
            credentials,
            refresh_interval,
            git_timeout,
            author,
        })
    }

    /// Create a new config with explicit values (useful for tests)
    pub fn new(remote_url: String) -> Self {
        Self {
            remote_url,
            credentials: None,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            git_timeout: DEFAULT_GIT_TIMEOUT,
            author: Author::default(),
        }
    }
}

fn secs_var(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<Duration>> {
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    let secs: u64 = raw
        .trim()
        .parse()
        .with_context(|| format!("{} must be a whole number of seconds, got {:?}", key, raw))?;
    if secs == 0 {
        bail!("{} must be greater than zero", key);
    }
    Ok(Some(Duration::from_secs(secs)))
}
