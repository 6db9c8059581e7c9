//! Everything that talks to the `git` executable.
//!
//! [`Git`] owns the command runner and the Repository Root. The root is
//! discovered on first use and never re-read for the rest of the process.

pub mod branch;
pub mod clone;
pub mod parse;
pub mod repo;
pub mod worktree;

use std::cell::OnceCell;
use std::path::{Path, PathBuf};

use crate::error::{GwtError, Result};
use crate::runner::SystemRunner;
use crate::traits::{CommandOutput, CommandRunner};

pub use repo::RepoRoot;

/// Remote that remote-qualified branch names refer to
pub const REMOTE: &str = "origin";

/// Strips a leading `origin/` from `branch`
#[must_use]
pub fn strip_remote(branch: &str) -> &str {
    branch
        .strip_prefix(REMOTE)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(branch)
}

#[must_use]
pub fn is_remote_qualified(branch: &str) -> bool {
    strip_remote(branch) != branch
}

/// Prefixes `branch` with `origin/` unless it already carries it
#[must_use]
pub fn qualify_remote(branch: &str) -> String {
    if is_remote_qualified(branch) {
        branch.to_string()
    } else {
        format!("{REMOTE}/{branch}")
    }
}

pub struct Git {
    runner: Box<dyn CommandRunner>,
    cwd: PathBuf,
    root: OnceCell<RepoRoot>,
}

impl Git {
    /// Creates a handle whose root will be discovered from `cwd` on first use
    #[must_use]
    pub fn new(runner: Box<dyn CommandRunner>, cwd: PathBuf) -> Self {
        Self {
            runner,
            cwd,
            root: OnceCell::new(),
        }
    }

    /// Creates a handle using real processes and the current directory
    ///
    /// # Errors
    /// Returns an error if the current directory cannot be determined
    pub fn system() -> Result<Self> {
        let cwd = std::env::current_dir().map_err(|e| GwtError::io(".", e))?;
        Ok(Self::new(Box::new(SystemRunner), cwd))
    }

    /// Creates a handle with an already established root
    #[must_use]
    pub fn with_root(runner: Box<dyn CommandRunner>, root: RepoRoot) -> Self {
        let cwd = root.path().to_path_buf();
        let cell = OnceCell::new();
        let _ = cell.set(root);
        Self {
            runner,
            cwd,
            root: cell,
        }
    }

    /// The Repository Root, discovered on the first call
    ///
    /// # Errors
    /// Returns an error if the working directory is not inside a recognised repository
    pub fn root(&self) -> Result<&RepoRoot> {
        if let Some(root) = self.root.get() {
            return Ok(root);
        }
        let root = repo::locate_root(self.runner.as_ref(), &self.cwd)?;
        Ok(self.root.get_or_init(|| root))
    }

    /// Runs `git args` inside the Repository Root
    pub(crate) fn run(&self, args: &[&str]) -> Result<CommandOutput> {
        let root = self.root()?.path().to_path_buf();
        self.run_in(&root, args)
    }

    pub(crate) fn run_in(&self, dir: &Path, args: &[&str]) -> Result<CommandOutput> {
        self.runner.run("git", args, Some(dir))
    }

    /// Runs `git args` inside the root and returns its output, failing on a non-zero exit
    pub(crate) fn run_checked(&self, args: &[&str]) -> Result<String> {
        let output = self.run(args)?;
        if output.success {
            Ok(output.output)
        } else {
            Err(GwtError::CommandFailed(output.output))
        }
    }

    /// Fetches all remotes
    ///
    /// # Errors
    /// Returns the raw git output if the fetch fails
    pub fn fetch(&self) -> Result<()> {
        self.run_checked(&["fetch"]).map(|_| ())
    }
}
