//! Local bare repositories standing in for the real remote in unit tests.

use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

use tempfile::TempDir;

use crate::clients::git::RemoteClient;
use crate::clients::git::WorkingCopy;

pub struct Remote {
    root: TempDir,
}

impl Remote {
    /// Create a bare remote on `main` whose first commit holds `files`.
    pub fn with_files(files: &[(&str, &str)]) -> Self {
        let root = tempfile::tempdir().unwrap();
        let remote = Self { root };

        git(remote.root.path(), &["init", "--quiet", "--bare", "remote.git"]);
        git(
            &remote.bare(),
            &["symbolic-ref", "HEAD", "refs/heads/main"],
        );
        git(remote.root.path(), &["init", "--quiet", "seed"]);
        git(&remote.seed(), &["symbolic-ref", "HEAD", "refs/heads/main"]);

        let changes: Vec<(&str, Option<&str>)> =
            files.iter().map(|(path, body)| (*path, Some(*body))).collect();
        remote.commit_change(&changes);
        remote
    }

    pub fn url(&self) -> String {
        self.bare().display().to_string()
    }

    pub fn client(&self) -> RemoteClient {
        RemoteClient::new(self.url(), None, Duration::from_secs(60))
    }

    /// Apply `changes` (None deletes) in the seed clone and push them.
    pub fn commit_change(&self, changes: &[(&str, Option<&str>)]) {
        let seed = self.seed();
        if self.has_main() {
            git(&seed, &["pull", "--quiet", "--ff-only", &self.url(), "main"]);
        }
        for (path, body) in changes {
            let full = seed.join(path);
            match body {
                Some(body) => {
                    std::fs::create_dir_all(full.parent().unwrap()).unwrap();
                    std::fs::write(&full, body).unwrap();
                }
                None => std::fs::remove_file(&full).unwrap(),
            }
        }
        git(&seed, &["add", "--all", "."]);
        git(&seed, &["commit", "--quiet", "-m", "seed"]);
        git(&seed, &["push", "--quiet", &self.url(), "HEAD:refs/heads/main"]);
    }

    /// Contents of `path` at the tip of `main`.
    pub fn read(&self, path: &str) -> String {
        git_output(&self.bare(), &["show", &format!("main:{}", path)])
    }

    pub fn commit_count(&self) -> usize {
        git_output(&self.bare(), &["rev-list", "--count", "main"])
            .trim()
            .parse()
            .unwrap()
    }

    /// Files touched by the tip commit of `main`.
    pub fn last_commit_paths(&self) -> Vec<String> {
        git_output(
            &self.bare(),
            &["diff-tree", "--no-commit-id", "--name-only", "-r", "main"],
        )
        .lines()
        .map(str::to_string)
        .collect()
    }

    pub fn last_commit_subject(&self) -> String {
        git_output(&self.bare(), &["log", "-1", "--format=%s", "main"])
            .trim()
            .to_string()
    }

    fn has_main(&self) -> bool {
        command(&self.bare(), &["rev-parse", "--verify", "--quiet", "refs/heads/main"])
            .output()
            .unwrap()
            .status
            .success()
    }

    fn bare(&self) -> PathBuf {
        self.root.path().join("remote.git")
    }

    fn seed(&self) -> PathBuf {
        self.root.path().join("seed")
    }
}

fn command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::new("git");
    cmd.current_dir(dir)
        .args(["-c", "user.name=Test User", "-c", "user.email=test@example.com"])
        .args(["-c", "commit.gpgsign=false"])
        .args(args)
        .env("GIT_TERMINAL_PROMPT", "0");
    cmd
}

fn git(dir: &Path, args: &[&str]) {
    let output = command(dir, args).output().unwrap();
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

fn git_output(dir: &Path, args: &[&str]) -> String {
    let output = command(dir, args).output().unwrap();
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap()
}

/// A committed working copy whose remote does not exist, so pushes fail.
pub fn detached_working_copy(files: &[(&str, &str)]) -> WorkingCopy {
    let dir = tempfile::tempdir().unwrap();
    git(dir.path(), &["init", "--quiet"]);
    for (path, body) in files {
        let full = dir.path().join(path);
        std::fs::create_dir_all(full.parent().unwrap()).unwrap();
        std::fs::write(&full, body).unwrap();
    }
    git(dir.path(), &["add", "--all", "."]);
    git(dir.path(), &["commit", "--quiet", "-m", "seed"]);

    let missing = dir.path().join("no-such-remote.git").display().to_string();
    WorkingCopy::new(dir, missing, Duration::from_secs(60))
}
