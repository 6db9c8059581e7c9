use std::collections::HashSet;

use tracing::debug;

use super::parse::{self, BranchRef};
use super::{Git, REMOTE, qualify_remote, strip_remote};
use crate::error::{GwtError, Result};

const SHORT_NAME_FORMAT: &str = "--format=%(refname:short)";

impl Git {
    /// Checks whether a local branch named exactly `branch` exists
    ///
    /// # Errors
    /// Returns the raw git output if the listing fails
    pub fn exists_locally(&self, branch: &str) -> Result<bool> {
        let output = self.run_checked(&["branch", "--list", SHORT_NAME_FORMAT, branch])?;
        Ok(output.trim() == branch)
    }

    /// Checks whether `origin/<branch>` exists, whether or not `branch` carries the prefix
    ///
    /// # Errors
    /// Returns the raw git output if the listing fails
    pub fn exists_remotely(&self, branch: &str) -> Result<bool> {
        let qualified = qualify_remote(branch);
        let output =
            self.run_checked(&["branch", "-r", "--list", SHORT_NAME_FORMAT, qualified.as_str()])?;
        Ok(output.trim() == qualified)
    }

    /// Lists branch names a new worktree could be created for.
    ///
    /// Local branches come first in git's order, followed by remote-tracking
    /// branches unless `only_local`. A remote branch is left out when a local
    /// branch of the same name exists, `origin/HEAD` is always left out, and
    /// with `hide_bound_to_worktree` every branch already checked out in a
    /// worktree is left out too.
    ///
    /// # Errors
    /// Returns an error if any git query fails or the worktree listing cannot
    /// be parsed; partial results are never returned
    pub fn list_branches(
        &self,
        only_local: bool,
        hide_bound_to_worktree: bool,
    ) -> Result<Vec<String>> {
        let bound = if hide_bound_to_worktree {
            self.bound_branches()?
        } else {
            HashSet::new()
        };

        let mut args = vec!["branch", "--format=%(refname)"];
        if !only_local {
            args.push("-a");
        }
        let refs = parse::branch_refs(&self.run_checked(&args)?);

        let local: HashSet<&str> = refs
            .iter()
            .filter_map(|r| match r {
                BranchRef::Local(name) => Some(name.as_str()),
                BranchRef::Remote(_) => None,
            })
            .collect();
        let head_marker = format!("{REMOTE}/HEAD");

        let branches: Vec<String> = refs
            .iter()
            .filter(|r| match r {
                BranchRef::Local(_) => true,
                BranchRef::Remote(name) => {
                    !only_local
                        && *name != head_marker
                        && *name != REMOTE
                        && !local.contains(strip_remote(name))
                }
            })
            .filter(|r| !bound.contains(strip_remote(r.name())))
            .map(|r| r.name().to_string())
            .collect();

        debug!(count = branches.len(), only_local, hide_bound_to_worktree, "listed branches");
        Ok(branches)
    }

    /// Name of the branch checked out in the root worktree
    ///
    /// # Errors
    /// Returns an error if git fails or HEAD is detached
    pub fn current_branch(&self) -> Result<String> {
        let output = self.run_checked(&["branch", "--show-current"])?;
        let branch = output.trim();
        if branch.is_empty() {
            return Err(GwtError::Parse {
                what: "current branch",
                output,
            });
        }
        Ok(branch.to_string())
    }

    /// Force-deletes a local branch
    ///
    /// # Errors
    /// Returns the raw git output if the deletion fails
    pub fn delete_branch(&self, branch: &str) -> Result<()> {
        self.run_checked(&["branch", "-D", branch]).map(|_| ())
    }

    fn bound_branches(&self) -> Result<HashSet<String>> {
        let listing = self.run_checked(&["worktree", "list"])?;
        parse::worktree_rows(&listing)
            .into_iter()
            .map(|row| {
                row.branch.ok_or_else(|| GwtError::Parse {
                    what: "worktree list",
                    output: listing.clone(),
                })
            })
            .collect()
    }
}
