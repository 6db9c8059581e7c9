#![allow(clippy::unwrap_used)] // Tests use unwrap for simplicity

use anyhow::{Context, Result};
use assert_fs::TempDir;
use assert_fs::fixture::ChildPath;
use assert_fs::prelude::*;

use std::path::Path;
use std::process::Command;

/// An `origin` repository plus a clone of it in the gwt layout:
///
/// ```text
/// <tmp>/origin         branches main, remote-only
/// <tmp>/repo           root worktree on a placeholder branch
/// <tmp>/repo/main      worktree for main
/// ```
pub struct CliTestEnvironment {
    pub origin_dir: ChildPath,
    pub repo_dir: ChildPath,
    zoxide_dir: ChildPath,
    _temp_dir: TempDir, // Keep temp_dir private to ensure cleanup, but don't expose it
}

impl CliTestEnvironment {
    /// Creates the origin repository and the worktree-layout clone
    ///
    /// # Errors
    /// Returns an error if any git command used for the setup fails
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new().context("Failed to create temporary directory")?;
        let origin_dir = temp_dir.child("origin");
        let repo_dir = temp_dir.child("repo");
        let zoxide_dir = temp_dir.child("zoxide");
        origin_dir.create_dir_all()?;
        zoxide_dir.create_dir_all()?;

        git(&origin_dir, &["init"])?;
        configure_identity(&origin_dir)?;
        origin_dir.child("README.md").write_str("# Test Repo")?;
        git(&origin_dir, &["add", "."])?;
        git(&origin_dir, &["commit", "-m", "Initial commit"])?;
        // Some git versions default to 'master'
        git(&origin_dir, &["branch", "-M", "main"])?;

        git(&origin_dir, &["checkout", "-b", "remote-only"])?;
        origin_dir.child("remote.txt").write_str("remote work")?;
        git(&origin_dir, &["add", "."])?;
        git(&origin_dir, &["commit", "-m", "Remote work"])?;
        git(&origin_dir, &["checkout", "main"])?;

        git_output(temp_dir.path(), &["clone", "--no-checkout", "origin", "repo"])?;
        configure_identity(&repo_dir)?;
        git(&repo_dir, &["checkout", "-b", "gwt-placeholder"])?;
        git(&repo_dir, &["worktree", "add", "main", "main"])?;

        Ok(Self {
            origin_dir,
            repo_dir,
            zoxide_dir,
            _temp_dir: temp_dir,
        })
    }

    /// Builds a `gwt` invocation run from the Repository Root
    ///
    /// # Errors
    /// Returns an error if the binary cannot be found
    pub fn run_command(&self, args: &[&str]) -> Result<assert_cmd::Command> {
        self.run_command_in(self.repo_dir.path(), args)
    }

    /// Builds a `gwt` invocation run from `dir`
    ///
    /// # Errors
    /// Returns an error if the binary cannot be found
    pub fn run_command_in(&self, dir: &Path, args: &[&str]) -> Result<assert_cmd::Command> {
        let mut cmd =
            assert_cmd::Command::cargo_bin("gwt").context("Failed to find gwt binary")?;

        cmd.current_dir(dir)
            .env("_ZO_DATA_DIR", self.zoxide_dir.path())
            .env_remove("GWT_LOG");

        cmd.args(args);
        Ok(cmd)
    }

    /// Runs git inside the Repository Root and returns its trimmed stdout
    ///
    /// # Errors
    /// Returns an error if git exits with a failure
    pub fn git(&self, args: &[&str]) -> Result<String> {
        git_output(self.repo_dir.path(), args)
    }

    /// Runs git inside the origin repository
    ///
    /// # Errors
    /// Returns an error if git exits with a failure
    pub fn origin_git(&self, args: &[&str]) -> Result<String> {
        git_output(self.origin_dir.path(), args)
    }

    /// Path of the worktree at `relative` below the Repository Root
    pub fn worktree_path(&self, relative: &str) -> ChildPath {
        self.repo_dir.child(relative)
    }

    /// Whether a local branch named exactly `branch` exists in the clone
    ///
    /// # Errors
    /// Returns an error if git fails
    pub fn local_branch_exists(&self, branch: &str) -> Result<bool> {
        let output = self.git(&["branch", "--list", "--format=%(refname:short)", branch])?;
        Ok(output == branch)
    }
}

fn git(dir: &ChildPath, args: &[&str]) -> Result<()> {
    git_output(dir.path(), args).map(|_| ())
}

fn configure_identity(dir: &ChildPath) -> Result<()> {
    git(dir, &["config", "user.name", "Test User"])?;
    git(dir, &["config", "user.email", "test@example.com"])
}

/// Runs git in `dir` and returns its trimmed stdout
///
/// # Errors
/// Returns an error if git cannot be started or exits with a failure
pub fn git_output(dir: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .context("Failed to execute git command")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("Git command failed: git {}: {}", args.join(" "), stderr);
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use predicates::prelude::*;

    #[test]
    fn test_cli_test_environment_creation() -> Result<()> {
        let env = CliTestEnvironment::new()?;

        env.repo_dir.child(".git").assert(predicate::path::is_dir());
        env.worktree_path("main")
            .child("README.md")
            .assert(predicate::str::contains("# Test Repo"));
        assert_eq!(env.git(&["branch", "--show-current"])?, "gwt-placeholder");
        assert!(env.local_branch_exists("main")?);
        assert!(!env.local_branch_exists("remote-only")?);

        Ok(())
    }
}
