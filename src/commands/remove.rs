use anyhow::Result;
use console::style;
use tracing::debug;

use crate::config::GwtConfig;
use crate::connect::Toolbox;
use crate::git::Git;
use crate::git::worktree::RemoveRequest;
use crate::hooks::{self, HookTarget, Phase};
use crate::selection::{self, SelectionProvider};

/// Removes worktrees one at a time, stopping at the first failure
///
/// # Errors
/// Returns an error if:
/// - The current directory is not inside a recognised repository
/// - The configuration file cannot be read
/// - A target lies outside the Repository Root or has no bound branch
/// - A destroy command fails
/// - A worktree or its branch cannot be removed
/// - Interactive selection fails
pub fn remove_worktrees(targets: &[String], force: bool, keep_branch: bool) -> Result<()> {
    let git = Git::system()?;
    let provider = selection::default_provider();
    remove_worktrees_with_provider(
        &git,
        provider.as_ref(),
        &Toolbox::system(),
        targets,
        force,
        keep_branch,
    )
}

/// Removes worktrees with custom git, selection and integration backends (for testing)
///
/// # Errors
/// Returns an error if:
/// - The current directory is not inside a recognised repository
/// - The configuration file cannot be read
/// - A target lies outside the Repository Root or has no bound branch
/// - A destroy command fails
/// - A worktree or its branch cannot be removed
/// - Interactive selection fails
pub fn remove_worktrees_with_provider(
    git: &Git,
    provider: &dyn SelectionProvider,
    toolbox: &Toolbox,
    targets: &[String],
    force: bool,
    keep_branch: bool,
) -> Result<()> {
    let root = git.root()?;
    let config = GwtConfig::load_from_repo(root.path())?;

    let targets = if targets.is_empty() {
        let available = git.list_worktrees()?;
        provider.select_multiple("Select worktrees to remove:", available)?
    } else {
        targets.to_vec()
    };

    for (index, worktree) in targets.iter().enumerate() {
        let target = git.resolve_removal(worktree)?;
        hooks::run_commands(
            Phase::Destroy,
            &config.destroy_commands,
            HookTarget::Directory(&target.path),
            Some(&target.worktree),
        )?;
        if !config.destroy_commands.is_empty() {
            println!();
        }

        let removed = git.remove_worktree(&RemoveRequest {
            target: &target,
            force,
            keep_branch,
        })?;
        debug!(branch = %removed.branch, pruned = ?removed.pruned, "removed worktree");

        if let Err(e) = toolbox.zoxide_remove(&removed.path) {
            eprintln!("{} zoxide remove failed: {e}", style("⚠").yellow());
        }

        println!("Worktree {} removed successfully.", style(&target.worktree).bold());
        if removed.branch_deleted {
            println!("  Deleted branch {}", removed.branch);
        }
        if index + 1 < targets.len() {
            println!();
        }
    }

    Ok(())
}
