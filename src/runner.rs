use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::{GwtError, Result};
use crate::traits::{CommandOutput, CommandRunner};

/// Runs commands as real child processes, capturing stdout and stderr together
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str], dir: Option<&Path>) -> Result<CommandOutput> {
        let mut cmd = Command::new(program);
        cmd.args(args);
        if let Some(dir) = dir {
            cmd.current_dir(dir);
        }

        let output = cmd.output().map_err(|source| GwtError::Spawn {
            program: program.to_string(),
            source,
        })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        debug!(
            program,
            ?args,
            dir = ?dir,
            success = output.status.success(),
            "command finished"
        );

        Ok(CommandOutput {
            output: combined,
            success: output.status.success(),
        })
    }
}

/// A single recorded call made through a [`ScriptedRunner`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command_line: String,
    pub dir: Option<PathBuf>,
}

/// Runner with canned responses keyed by the full command line.
///
/// Unknown command lines succeed with empty output, which reads as "no such
/// branch" / "no worktrees" to every caller.
#[derive(Default)]
pub struct ScriptedRunner {
    responses: HashMap<String, CommandOutput>,
    calls: RefCell<Vec<Invocation>>,
}

impl ScriptedRunner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the response for `command_line` (program and args joined by spaces)
    #[must_use]
    pub fn on(mut self, command_line: &str, response: CommandOutput) -> Self {
        self.responses.insert(command_line.to_string(), response);
        self
    }

    #[must_use]
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    #[must_use]
    pub fn command_lines(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|call| call.command_line.clone())
            .collect()
    }

    #[must_use]
    pub fn was_called(&self, command_line: &str) -> bool {
        self.calls
            .borrow()
            .iter()
            .any(|call| call.command_line == command_line)
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, program: &str, args: &[&str], dir: Option<&Path>) -> Result<CommandOutput> {
        let mut command_line = program.to_string();
        for arg in args {
            command_line.push(' ');
            command_line.push_str(arg);
        }

        self.calls.borrow_mut().push(Invocation {
            command_line: command_line.clone(),
            dir: dir.map(Path::to_path_buf),
        });

        Ok(self
            .responses
            .get(&command_line)
            .cloned()
            .unwrap_or_else(|| CommandOutput::ok("")))
    }
}
