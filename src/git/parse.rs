//! Parsers for git's human-readable output.
//!
//! Everything the rest of the crate knows about git's text formats lives
//! here, so a structured source (`--porcelain`, libgit2) can replace these
//! functions without touching the decision logic in [`super::worktree`].

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

const GIT_DIR_SUFFIX: &str = ".git";

#[allow(clippy::expect_used)]
static PREPARING_WORKTREE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Preparing worktree.*'(.*)'").expect("worktree announcement pattern is valid")
});

/// Repository root from `git rev-parse --git-common-dir` output.
///
/// The output must name a directory ending in `.git`; relative answers are
/// resolved against `cwd`. Returns `None` for any other shape (bare clones,
/// `GIT_DIR` overrides).
#[must_use]
pub fn common_dir_root(output: &str, cwd: &Path) -> Option<PathBuf> {
    let git_dir = output.trim();
    if !git_dir.ends_with(GIT_DIR_SUFFIX) {
        return None;
    }

    let git_dir = Path::new(git_dir);
    let absolute = if git_dir.is_absolute() {
        git_dir.to_path_buf()
    } else {
        cwd.join(git_dir)
    };
    absolute.parent().map(Path::to_path_buf)
}

/// Directory name announced by `git worktree add`.
///
/// `Preparing worktree (new branch 'feature/x')` yields `feature/x`. Only the
/// announcement line is considered, so later lines quoting other names (for
/// example the upstream tracking notice) do not interfere.
#[must_use]
pub fn worktree_path_from_add(output: &str) -> Option<String> {
    PREPARING_WORKTREE
        .captures(output)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
}

/// One row of `git worktree list`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorktreeRow {
    pub path: String,
    /// Third column with its brackets removed. `None` when the row has fewer
    /// than three fields or the third is not `[branch]`, as for detached or
    /// bare worktrees.
    pub branch: Option<String>,
}

/// Splits `git worktree list` output into rows. Blank lines are ignored.
#[must_use]
pub fn worktree_rows(listing: &str) -> Vec<WorktreeRow> {
    listing
        .lines()
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            let path = (*fields.first()?).to_string();
            let branch = fields.get(2).copied().and_then(bracketed).map(str::to_string);
            Some(WorktreeRow { path, branch })
        })
        .collect()
}

fn bracketed(field: &str) -> Option<&str> {
    field
        .strip_prefix('[')?
        .strip_suffix(']')
        .filter(|name| !name.is_empty())
}

/// Path of `absolute` relative to `root`, or `absolute` unchanged when it lies elsewhere
#[must_use]
pub fn relative_to_root(absolute: &str, root: &Path) -> String {
    Path::new(absolute)
        .strip_prefix(root)
        .map_or_else(|_| absolute.to_string(), |p| p.to_string_lossy().into_owned())
}

/// A branch from `git branch -a --format=%(refname)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchRef {
    Local(String),
    /// Remote-qualified name such as `origin/feature`
    Remote(String),
}

impl BranchRef {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            BranchRef::Local(name) | BranchRef::Remote(name) => name,
        }
    }
}

/// Parses full ref names, dropping anything outside `refs/heads/` and `refs/remotes/`
#[must_use]
pub fn branch_refs(output: &str) -> Vec<BranchRef> {
    output
        .lines()
        .map(str::trim)
        .filter_map(|line| {
            if let Some(name) = line.strip_prefix("refs/heads/") {
                Some(BranchRef::Local(name.to_string()))
            } else {
                line.strip_prefix("refs/remotes/")
                    .map(|name| BranchRef::Remote(name.to_string()))
            }
        })
        .collect()
}

/// Repository directory `git clone` creates for `url` when no directory is given
#[must_use]
pub fn clone_dir_name(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    let last = trimmed
        .rsplit(['/', ':'])
        .next()
        .unwrap_or(trimmed);
    last.strip_suffix(GIT_DIR_SUFFIX).unwrap_or(last).to_string()
}
