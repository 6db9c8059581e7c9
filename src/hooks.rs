//! Execution of the configured `init_commands` and `destroy_commands`.
//!
//! Commands run one at a time with the terminal attached, and the first one
//! that fails stops the sequence.

use std::path::Path;
use std::process::Command;

use console::style;

use crate::error::{GwtError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    Destroy,
}

impl Phase {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Destroy => "destroy",
        }
    }
}

/// Where hook commands are executed
#[derive(Debug, Clone, Copy)]
pub enum HookTarget<'a> {
    /// `sh -c <command>` with the worktree as working directory
    Directory(&'a Path),
    /// `tmux send-keys -t <session> <command> C-m`
    Session(&'a str),
}

impl HookTarget<'_> {
    fn command(&self, hook: &str) -> Command {
        match self {
            Self::Directory(dir) => {
                let mut cmd = Command::new("sh");
                cmd.args(["-c", hook]).current_dir(dir);
                cmd
            }
            Self::Session(session) => {
                let mut cmd = Command::new("tmux");
                cmd.args(["send-keys", "-t", session, hook, "C-m"]);
                cmd
            }
        }
    }

    fn describe(&self, hook: &str) -> String {
        match self {
            Self::Directory(_) => style(hook).green().to_string(),
            Self::Session(session) => format!(
                "{}{}{}",
                style(format!("tmux send-keys -t {session} ")).green(),
                style(hook).color256(214),
                style(" C-m").green()
            ),
        }
    }
}

/// Runs `commands` in order against `target`, stopping at the first failure.
///
/// `worktree` names the worktree in the progress lines when several are
/// processed in one invocation.
///
/// # Errors
/// Returns [`GwtError::Hook`] for the first command that cannot be started or
/// exits with a non-zero status; later commands are not run
pub fn run_commands(
    phase: Phase,
    commands: &[String],
    target: HookTarget<'_>,
    worktree: Option<&str>,
) -> Result<()> {
    let total = commands.len();
    for (index, hook) in commands.iter().enumerate() {
        let location = worktree
            .map(|name| format!(" in worktree {}", style(name).color256(214)))
            .unwrap_or_default();
        println!(
            "{}",
            style(format!(
                "➡️ Running {} command {} of {total}{location}: {}...",
                phase.label(),
                index + 1,
                target.describe(hook)
            ))
            .bold()
        );

        let status = target.command(hook).status().map_err(|e| GwtError::Hook {
            phase: phase.label(),
            command: hook.clone(),
            reason: e.to_string(),
        })?;

        if !status.success() {
            return Err(GwtError::Hook {
                phase: phase.label(),
                command: hook.clone(),
                reason: status.to_string(),
            });
        }
    }
    Ok(())
}
