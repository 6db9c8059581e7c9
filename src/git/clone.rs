use std::path::{Path, PathBuf};

use tracing::debug;

use super::{Git, RepoRoot, parse};
use crate::error::{GwtError, Result};
use crate::traits::CommandRunner;

/// Result of [`clone_repository`]
pub struct ClonedRepository {
    /// Default branch of the remote, now checked out in its own worktree
    pub branch: String,
    pub worktree_path: PathBuf,
}

/// Clones `url` into a worktree layout.
///
/// The clone is made without a checkout, the root worktree is moved onto a
/// throwaway `gwt-placeholder-*` branch so the default branch is free, and
/// the default branch is then added as a worktree named after itself.
///
/// # Errors
/// Returns the raw git output of whichever step fails, or a parse error if
/// the default branch or the new worktree path cannot be determined
pub fn clone_repository(
    runner: Box<dyn CommandRunner>,
    url: &str,
    dir: Option<&str>,
    cwd: &Path,
) -> Result<ClonedRepository> {
    let mut args = vec!["clone", "--no-checkout", url];
    if let Some(dir) = dir {
        args.push(dir);
    }
    let output = runner.run("git", &args, Some(cwd))?;
    if !output.success {
        return Err(GwtError::CommandFailed(output.output));
    }

    let repo_dir = dir.map_or_else(|| parse::clone_dir_name(url), str::to_string);
    let root = RepoRoot::resolve(&cwd.join(repo_dir))?;
    debug!(root = %root, "cloned repository");

    let git = Git::with_root(runner, root.clone());
    let branch = git.current_branch()?;

    let placeholder = placeholder_branch_name();
    git.run_checked(&["checkout", "-b", placeholder.as_str()])?;

    let output = git.run_checked(&["worktree", "add", branch.as_str(), branch.as_str()])?;
    let directory =
        parse::worktree_path_from_add(&output).ok_or_else(|| GwtError::Parse {
            what: "worktree path",
            output: output.clone(),
        })?;

    Ok(ClonedRepository {
        branch,
        worktree_path: root.join(directory),
    })
}

fn placeholder_branch_name() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("gwt-placeholder-{}", &id[..8])
}
