use std::path::Path;
use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::Command;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::Layer as _;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

async fn git(dir: &Path, args: &[&str]) -> anyhow::Result<String> {
    let output = Command::new("git")
        .args(["-c", "user.name=Test User", "-c", "user.email=test@example.com"])
        .args(["-c", "commit.gpgsign=false"])
        .args(args)
        .current_dir(dir)
        .env("GIT_TERMINAL_PROMPT", "0")
        .stdin(Stdio::null())
        .output()
        .await?;
    anyhow::ensure!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    Ok(String::from_utf8(output.stdout)?)
}

/// Creates a bare repository at `dir/remote.git` whose `main` branch holds
/// `files`, and returns its path.
pub async fn create_remote(dir: &Path, files: &[(&str, &str)]) -> anyhow::Result<PathBuf> {
    let bare = dir.join("remote.git");
    let seed = dir.join("seed");

    git(dir, &["init", "--quiet", "--bare", "remote.git"]).await?;
    git(&bare, &["symbolic-ref", "HEAD", "refs/heads/main"]).await?;
    git(dir, &["init", "--quiet", "seed"]).await?;
    git(&seed, &["symbolic-ref", "HEAD", "refs/heads/main"]).await?;

    for (path, body) in files {
        let full = seed.join(path);
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&full, body).await?;
    }
    git(&seed, &["add", "--all", "."]).await?;
    git(&seed, &["commit", "--quiet", "-m", "Initial config"]).await?;
    git(
        &seed,
        &["push", "--quiet", &bare.display().to_string(), "HEAD:refs/heads/main"],
    )
    .await?;

    Ok(bare)
}

/// Reads a file at the tip of `main` in a bare repository.
pub async fn read_file(bare: &Path, path: &str) -> anyhow::Result<String> {
    git(bare, &["show", &format!("main:{}", path)]).await
}

/// Gets `git log` subjects of `main`, newest first.
pub async fn log_subjects(bare: &Path) -> anyhow::Result<String> {
    git(bare, &["log", "--format=%s <%ae>", "main"]).await
}

pub fn setup_logging() -> anyhow::Result<()> {
    let timer = tracing_subscriber::fmt::time::ChronoLocal::new("%H:%M:%S%.3f".into());
    let format = tracing_subscriber::fmt::format().with_timer(timer);
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env()?;
    let subscriber = tracing_subscriber::fmt::layer()
        .event_format(format)
        .with_test_writer()
        .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
        .with_filter(filter);
    tracing_subscriber::registry().with(subscriber).init();
    Ok(())
}

pub enum TestDir {
    Temp(tempfile::TempDir),
    Kept(std::path::PathBuf),
}

impl TestDir {
    pub fn new() -> std::io::Result<Self> {
        let temp_dir = tempfile::tempdir()?;

        if std::env::var("DEBUG_TESTS").is_ok() {
            let path = temp_dir.keep();
            eprintln!("Test directory kept at: {}", path.display());
            Ok(TestDir::Kept(path))
        } else {
            Ok(TestDir::Temp(temp_dir))
        }
    }

    pub fn path(&self) -> &std::path::Path {
        match self {
            TestDir::Temp(t) => t.path(),
            TestDir::Kept(p) => p.as_path(),
        }
    }
}
