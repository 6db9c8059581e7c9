use std::path::PathBuf;

use thiserror::Error;

/// Every failure the git, config and hook layers can report.
///
/// `CommandFailed` carries the raw combined output of the failing tool so the
/// user sees git's own diagnostic text.
#[derive(Error, Debug)]
pub enum GwtError {
    #[error("not in a git repository")]
    NotARepository,

    #[error(
        "could not find git repository root containing .git (git reported '{0}'). Please use gwt clone to clone the repository"
    )]
    UnrecognizedLayout(String),

    #[error("worktree for branch '{0}' already exists")]
    WorktreeExists(String),

    #[error(
        "branch '{branch}' does not exist remotely. Remove the '{remote}/' prefix to create a new branch"
    )]
    RemoteBranchMissing { branch: String, remote: String },

    #[error("{0}")]
    CommandFailed(String),

    #[error(
        "{output}\nfailed to pull base branch '{branch}'. You can retry without pulling using the --no-pull flag"
    )]
    PullFailed { branch: String, output: String },

    #[error("could not parse {what} from git output")]
    Parse { what: &'static str, output: String },

    #[error("worktree not found: {0}")]
    WorktreeNotFound(String),

    #[error(
        "worktree '{worktree}' was removed but deleting branch '{branch}' failed; the branch is left behind without a worktree\n{output}"
    )]
    BranchCleanup {
        worktree: String,
        branch: String,
        output: String,
    },

    #[error("worktree path '{0}' is not inside the repository root")]
    PathOutsideRoot(String),

    #[error("error running {phase} command '{command}': {reason}")]
    Hook {
        phase: &'static str,
        command: String,
        reason: String,
    },

    #[error("{0} command not found in PATH")]
    ToolMissing(String),

    #[error("failed to run {program}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read config file {}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl GwtError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, GwtError>;
