use anyhow::Result;
use console::style;

use crate::git::clone::clone_repository;
use crate::paths;
use crate::runner::SystemRunner;

/// Clones `url` into the worktree layout and prints where the default branch landed
///
/// # Errors
/// Returns an error if the clone or any of the follow-up git steps fail
pub fn clone(url: &str, dir: Option<&str>) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let cloned = clone_repository(Box::new(SystemRunner), url, dir, &cwd)?;

    println!(
        "Cloned {} with branch {} checked out at {}",
        url,
        style(&cloned.branch).bold(),
        paths::shorten_home(&cloned.worktree_path)
    );
    Ok(())
}
