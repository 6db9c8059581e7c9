use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::parse;
use crate::error::{GwtError, Result};
use crate::traits::CommandRunner;

/// Absolute directory shared by every worktree of a repository (the parent of `.git`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRoot(PathBuf);

impl RepoRoot {
    /// Wraps `path`, resolving symlinks so it compares equal to the paths git reports
    ///
    /// # Errors
    /// Returns an error if `path` does not exist
    pub fn resolve(path: &Path) -> Result<Self> {
        let canonical = std::fs::canonicalize(path).map_err(|e| GwtError::io(path, e))?;
        Ok(Self(canonical))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.0
    }

    #[must_use]
    pub fn join(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.0.join(relative)
    }

    /// Repository name, i.e. the root directory's file name
    #[must_use]
    pub fn name(&self) -> String {
        self.0
            .file_name()
            .map_or_else(String::new, |name| name.to_string_lossy().into_owned())
    }
}

impl fmt::Display for RepoRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.0.display(), std::path::MAIN_SEPARATOR)
    }
}

/// Discovers the Repository Root from `git rev-parse --git-common-dir` run in `cwd`
///
/// # Errors
/// Returns an error if `cwd` is not inside a git repository, or if the common
/// directory is not a `.git` directory (for example a bare clone)
pub fn locate_root(runner: &dyn CommandRunner, cwd: &Path) -> Result<RepoRoot> {
    let output = runner.run("git", &["rev-parse", "--git-common-dir"], Some(cwd))?;
    if !output.success {
        return Err(GwtError::NotARepository);
    }

    let root = parse::common_dir_root(&output.output, cwd)
        .ok_or_else(|| GwtError::UnrecognizedLayout(output.output.trim().to_string()))?;
    let root = RepoRoot::resolve(&root)?;
    debug!(root = %root, "located repository root");
    Ok(root)
}
