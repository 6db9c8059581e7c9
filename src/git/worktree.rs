//! Worktree inventory and lifecycle.
//!
//! Adding a worktree resolves an [`AddStrategy`] from the branch's local and
//! remote existence, optionally brings the base branch up to date, runs
//! `git worktree add` and recovers the created directory from git's
//! announcement. Removing resolves the bound branch first, removes the
//! worktree, deletes the branch and prunes directories left empty below the
//! Repository Root.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info, warn};

use super::parse;
use super::{Git, REMOTE, is_remote_qualified, qualify_remote, strip_remote};
use crate::error::{GwtError, Result};
use crate::interrupt::{self, Skippable};

/// How `git worktree add` will be invoked for a requested branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddStrategy {
    /// New local branch rooted at an explicit commit-ish
    FromCommitish { branch: String, commitish: String },
    /// Attach a worktree to an existing local branch
    ExistingLocal { branch: String },
    /// New local branch tracking `origin/<branch>`
    TrackRemote { branch: String, remote_ref: String },
    /// New local branch rooted at the configured default base branch
    FromDefaultBase { branch: String, base: String },
}

impl AddStrategy {
    /// Picks the strategy for `requested`.
    ///
    /// `exists_locally` refers to the branch name without any `origin/`
    /// prefix and `exists_remotely` to its `origin/` counterpart. An explicit
    /// commit-ish always wins over both flags.
    ///
    /// # Errors
    /// Returns [`GwtError::RemoteBranchMissing`] when `requested` carries the
    /// remote prefix but the remote has no such branch
    pub fn resolve(
        requested: &str,
        commitish: Option<&str>,
        exists_locally: bool,
        exists_remotely: bool,
        default_base: &str,
    ) -> Result<Self> {
        if is_remote_qualified(requested) && !exists_remotely {
            return Err(GwtError::RemoteBranchMissing {
                branch: requested.to_string(),
                remote: REMOTE.to_string(),
            });
        }

        let branch = strip_remote(requested).to_string();
        let strategy = if let Some(commitish) = commitish {
            Self::FromCommitish {
                branch,
                commitish: commitish.to_string(),
            }
        } else if exists_locally {
            Self::ExistingLocal { branch }
        } else if exists_remotely {
            let remote_ref = qualify_remote(&branch);
            Self::TrackRemote { branch, remote_ref }
        } else {
            Self::FromDefaultBase {
                branch,
                base: default_base.to_string(),
            }
        };
        Ok(strategy)
    }

    /// Local branch the worktree ends up on
    #[must_use]
    pub fn branch(&self) -> &str {
        match self {
            Self::FromCommitish { branch, .. }
            | Self::ExistingLocal { branch }
            | Self::TrackRemote { branch, .. }
            | Self::FromDefaultBase { branch, .. } => branch,
        }
    }

    /// Starting point reported to the user and considered for the pre-creation pull
    #[must_use]
    pub fn base_branch(&self) -> &str {
        match self {
            Self::FromCommitish { commitish, .. } => commitish,
            Self::ExistingLocal { branch } => branch,
            Self::TrackRemote { remote_ref, .. } => remote_ref,
            Self::FromDefaultBase { base, .. } => base,
        }
    }

    /// Arguments following `git worktree add`. The worktree directory is named after the branch.
    #[must_use]
    pub fn worktree_add_args(&self) -> Vec<&str> {
        match self {
            Self::FromCommitish { branch, commitish } => {
                vec!["-b", branch.as_str(), branch.as_str(), "--checkout", commitish.as_str()]
            }
            Self::ExistingLocal { branch } => vec![branch.as_str(), "--checkout", branch.as_str()],
            Self::TrackRemote { branch, remote_ref } => {
                vec!["-b", branch.as_str(), branch.as_str(), "--checkout", remote_ref.as_str()]
            }
            Self::FromDefaultBase { branch, base } => {
                vec!["-b", branch.as_str(), branch.as_str(), base.as_str()]
            }
        }
    }
}

/// Options for [`Git::add_worktree`], built once by the caller
#[derive(Debug, Clone, Copy)]
pub struct AddRequest<'a> {
    pub branch: &'a str,
    pub commitish: Option<&'a str>,
    pub default_base: &'a str,
    /// Bring the base branch up to date before creating the worktree
    pub pull: bool,
    /// Pass `--force` to `git worktree add`
    pub force: bool,
}

#[derive(Debug, Clone)]
pub struct CreatedWorktree {
    pub path: PathBuf,
    pub branch: String,
    pub base_branch: String,
}

/// How the base branch gets refreshed before a worktree is created from it
#[derive(Debug, Clone, PartialEq, Eq)]
enum BaseUpdate {
    /// `git pull` inside the base branch's own worktree
    PullInWorktree(PathBuf),
    /// `git fetch origin base:base` without checking the branch out
    FetchRef,
}

/// A worktree that passed every removal precondition, from [`Git::resolve_removal`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalTarget {
    /// Path relative to the Repository Root, without trailing separators
    pub worktree: String,
    pub path: PathBuf,
    /// Branch bound to the worktree
    pub branch: String,
}

/// Options for [`Git::remove_worktree`]
#[derive(Debug, Clone, Copy)]
pub struct RemoveRequest<'a> {
    pub target: &'a RemovalTarget,
    /// Pass `--force` to remove a worktree with uncommitted changes
    pub force: bool,
    pub keep_branch: bool,
}

#[derive(Debug, Clone)]
pub struct RemovedWorktree {
    pub path: PathBuf,
    pub branch: String,
    pub branch_deleted: bool,
    /// Ancestor directories deleted because the removal left them empty
    pub pruned: Vec<PathBuf>,
}

impl Git {
    /// Lists worktree paths relative to the Repository Root, excluding the root worktree
    ///
    /// # Errors
    /// Returns the raw git output if `git worktree list` fails
    pub fn list_worktrees(&self) -> Result<Vec<String>> {
        let root = self.root()?.path().to_path_buf();
        let listing = self.run_checked(&["worktree", "list"])?;
        Ok(parse::worktree_rows(&listing)
            .into_iter()
            .skip(1)
            .map(|row| parse::relative_to_root(&row.path, &root))
            .collect())
    }

    /// Branch checked out in the worktree at `worktree` (relative to the root)
    ///
    /// # Errors
    /// Returns [`GwtError::WorktreeNotFound`] if no worktree lives at that path
    /// and [`GwtError::Parse`] if its row has no branch column
    pub fn worktree_branch(&self, worktree: &str) -> Result<String> {
        let root = self.root()?.path().to_path_buf();
        let listing = self.run_checked(&["worktree", "list"])?;

        let row = parse::worktree_rows(&listing)
            .into_iter()
            .find(|row| parse::relative_to_root(&row.path, &root) == worktree)
            .ok_or_else(|| GwtError::WorktreeNotFound(worktree.to_string()))?;

        row.branch.ok_or(GwtError::Parse {
            what: "worktree branch",
            output: listing,
        })
    }

    /// Whether a worktree bound to a branch lives at `worktree`
    ///
    /// # Errors
    /// Propagates every failure of [`Git::worktree_branch`] except "not found"
    pub fn worktree_exists(&self, worktree: &str) -> Result<bool> {
        match self.worktree_branch(worktree) {
            Ok(branch) => Ok(!branch.is_empty()),
            Err(GwtError::WorktreeNotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Creates a worktree for `request.branch` and returns where it was created.
    ///
    /// The caller is expected to have checked [`Git::worktree_exists`] for the
    /// branch beforehand.
    ///
    /// # Errors
    /// Returns an error if the branch is remote-qualified without a remote
    /// counterpart, if refreshing the base branch fails, if `git worktree add`
    /// fails, or if its output does not announce the created directory
    pub fn add_worktree(&self, request: &AddRequest<'_>) -> Result<CreatedWorktree> {
        let root = self.root()?.clone();

        let exists_locally = self.exists_locally(strip_remote(request.branch))?;
        let exists_remotely = self.exists_remotely(request.branch)?;
        let strategy = AddStrategy::resolve(
            request.branch,
            request.commitish,
            exists_locally,
            exists_remotely,
            request.default_base,
        )?;
        debug!(?strategy, exists_locally, exists_remotely, "resolved add strategy");

        let base = strategy.base_branch().to_string();
        if request.pull && !is_remote_qualified(&base) {
            self.refresh_base(&base)?;
        }

        let mut args = vec!["worktree", "add"];
        args.extend(strategy.worktree_add_args());
        if request.force {
            args.push("--force");
        }

        let output = self.run(&args)?;
        if !output.success {
            return Err(GwtError::CommandFailed(output.output));
        }

        let directory =
            parse::worktree_path_from_add(&output.output).ok_or_else(|| GwtError::Parse {
                what: "worktree path",
                output: output.output.clone(),
            })?;

        Ok(CreatedWorktree {
            path: root.join(directory),
            branch: strategy.branch().to_string(),
            base_branch: base,
        })
    }

    fn base_update(&self, base: &str) -> Result<Option<BaseUpdate>> {
        if self.worktree_exists(base)? {
            return Ok(Some(BaseUpdate::PullInWorktree(self.root()?.join(base))));
        }
        if self.exists_locally(base)? && self.exists_remotely(base)? {
            return Ok(Some(BaseUpdate::FetchRef));
        }
        Ok(None)
    }

    fn refresh_base(&self, base: &str) -> Result<()> {
        let Some(update) = self.base_update(base)? else {
            debug!(base, "base branch has no worktree or remote counterpart, not pulling");
            return Ok(());
        };

        let refspec = format!("{base}:{base}");
        let title = format!("Pulling base branch '{base}'...");
        let outcome = interrupt::skippable(&title, || match &update {
            BaseUpdate::PullInWorktree(dir) => self.run_in(dir, &["pull", REMOTE, refspec.as_str()]),
            BaseUpdate::FetchRef => self.run(&["fetch", REMOTE, refspec.as_str()]),
        });

        match outcome {
            Skippable::Skipped => {
                warn!(base, "pull interrupted, continuing with the local base branch");
                Ok(())
            }
            Skippable::Completed(result) => {
                let output = result?;
                if output.success {
                    info!(base, ?update, "base branch up to date");
                    Ok(())
                } else {
                    Err(GwtError::PullFailed {
                        branch: base.to_string(),
                        output: output.output,
                    })
                }
            }
        }
    }

    /// Checks that `worktree` lies below the Repository Root and resolves its bound branch.
    ///
    /// Only reads the worktree listing. Callers resolve a target before running
    /// its destroy commands.
    ///
    /// # Errors
    /// Returns [`GwtError::PathOutsideRoot`] if the path leaves the root,
    /// [`GwtError::WorktreeNotFound`] if no worktree lives there and
    /// [`GwtError::Parse`] if its row carries no `[branch]` column
    pub fn resolve_removal(&self, worktree: &str) -> Result<RemovalTarget> {
        let worktree = worktree.trim_end_matches('/');
        ensure_below_root(worktree)?;

        let branch = self.worktree_branch(worktree)?;
        Ok(RemovalTarget {
            worktree: worktree.to_string(),
            path: self.root()?.join(worktree),
            branch,
        })
    }

    /// Removes a resolved worktree, deletes its branch unless kept, and prunes
    /// ancestor directories the removal left empty.
    ///
    /// # Errors
    /// Returns an error if git fails. A failed branch deletion is reported as
    /// [`GwtError::BranchCleanup`] because the worktree is already gone at
    /// that point.
    pub fn remove_worktree(&self, request: &RemoveRequest<'_>) -> Result<RemovedWorktree> {
        let target = request.target;
        let root = self.root()?.clone();

        let mut args = vec!["worktree", "remove"];
        if request.force {
            args.push("--force");
        }
        args.push(target.worktree.as_str());
        self.run_checked(&args)?;

        if !request.keep_branch {
            self.delete_branch(&target.branch)
                .map_err(|e| GwtError::BranchCleanup {
                    worktree: target.worktree.clone(),
                    branch: target.branch.clone(),
                    output: e.to_string(),
                })?;
        }

        let pruned = prune_empty_parents(root.path(), &target.path)?;
        Ok(RemovedWorktree {
            path: target.path.clone(),
            branch: target.branch.clone(),
            branch_deleted: !request.keep_branch,
            pruned,
        })
    }
}

fn ensure_below_root(worktree: &str) -> Result<()> {
    let path = Path::new(worktree);
    let escapes = worktree.is_empty()
        || path
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(GwtError::PathOutsideRoot(worktree.to_string()));
    }
    Ok(())
}

/// Deletes the empty ancestors of `worktree`, walking up towards `root`.
///
/// Stops at the first non-empty directory and never touches `root` itself or
/// anything outside it. Missing directories are skipped over.
///
/// # Errors
/// Returns an error if a directory cannot be read or removed
pub fn prune_empty_parents(root: &Path, worktree: &Path) -> Result<Vec<PathBuf>> {
    let mut pruned = Vec::new();
    let mut current = worktree.parent();

    while let Some(dir) = current {
        if dir == root || !dir.starts_with(root) {
            break;
        }

        match fs::read_dir(dir) {
            Ok(mut entries) => {
                if entries.next().is_some() {
                    break;
                }
                fs::remove_dir(dir).map_err(|e| GwtError::io(dir, e))?;
                debug!(dir = %dir.display(), "pruned empty directory");
                pruned.push(dir.to_path_buf());
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(GwtError::io(dir, e)),
        }
        current = dir.parent();
    }

    Ok(pruned)
}
