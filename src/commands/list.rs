use anyhow::Result;
use std::io::Write;

use crate::git::Git;

/// Prints every worktree path, relative to the Repository Root unless `absolute`
///
/// # Errors
/// Returns an error if the current directory is not inside a recognised
/// repository or the worktree listing fails
pub fn list_worktrees(absolute: bool) -> Result<()> {
    let git = Git::system()?;
    list_worktrees_to(&git, absolute, &mut std::io::stdout().lock())
}

/// Writes the listing to `out` (for testing)
///
/// # Errors
/// Returns an error if the worktree listing fails or `out` cannot be written
pub fn list_worktrees_to(git: &Git, absolute: bool, out: &mut dyn Write) -> Result<()> {
    let root = git.root()?;
    for worktree in git.list_worktrees()? {
        if absolute {
            writeln!(out, "{}", root.join(&worktree).display())?;
        } else {
            writeln!(out, "{worktree}")?;
        }
    }
    Ok(())
}
