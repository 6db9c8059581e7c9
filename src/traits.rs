use std::path::Path;

use crate::error::Result;

/// Combined stdout/stderr of a finished process plus its success flag
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub output: String,
    pub success: bool,
}

impl CommandOutput {
    #[must_use]
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            success: true,
        }
    }

    #[must_use]
    pub fn failed(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            success: false,
        }
    }
}

/// Trait for running external commands to enable scripted responses in tests
pub trait CommandRunner {
    /// Runs `program` with `args`, optionally inside `dir`, and waits for it.
    ///
    /// # Errors
    /// Returns an error only if the process could not be started. A non-zero
    /// exit status is reported through [`CommandOutput::success`].
    fn run(&self, program: &str, args: &[&str], dir: Option<&Path>) -> Result<CommandOutput>;
}

impl<T: CommandRunner + ?Sized> CommandRunner for std::rc::Rc<T> {
    fn run(&self, program: &str, args: &[&str], dir: Option<&Path>) -> Result<CommandOutput> {
        (**self).run(program, args, dir)
    }
}
