//! Best-effort integrations with tools around a worktree: zoxide, sesh and
//! JetBrains IDEs.
//!
//! Nothing here touches git state. Callers run these after the worktree has
//! been created or removed and report failures as warnings.

pub mod ide;
pub mod zoxide;

use std::path::Path;

use tracing::debug;

use crate::error::{GwtError, Result};
use crate::runner::SystemRunner;
use crate::traits::CommandRunner;

pub use ide::{JetBrainsIde, Launcher};

/// Reports whether `program` can be found on `PATH`
#[must_use]
pub fn on_path(program: &str) -> bool {
    which::which(program).is_ok()
}

/// Runner plus `PATH` probe shared by every integration
pub struct Toolbox {
    runner: Box<dyn CommandRunner>,
    probe: fn(&str) -> bool,
}

impl Toolbox {
    #[must_use]
    pub fn new(runner: Box<dyn CommandRunner>, probe: fn(&str) -> bool) -> Self {
        Self { runner, probe }
    }

    /// Real processes, real `PATH`
    #[must_use]
    pub fn system() -> Self {
        Self::new(Box::new(SystemRunner), on_path)
    }

    pub(crate) fn available(&self, program: &str) -> bool {
        (self.probe)(program)
    }

    pub(crate) fn run_checked(&self, program: &str, args: &[&str]) -> Result<String> {
        let output = self.runner.run(program, args, None)?;
        if output.success {
            Ok(output.output)
        } else {
            Err(GwtError::CommandFailed(output.output))
        }
    }

    /// Opens (or switches to) a sesh session rooted at `path`
    ///
    /// # Errors
    /// Returns an error if sesh is not installed or exits with a failure
    pub fn sesh_connect(&self, path: &Path) -> Result<()> {
        if !self.available("sesh") {
            return Err(GwtError::ToolMissing("sesh".to_string()));
        }
        let dir = path.to_string_lossy();
        self.run_checked("sesh", &["connect", &dir])?;
        debug!(path = %path.display(), "connected sesh session");
        Ok(())
    }
}

/// Name of the tmux session sesh creates for a worktree, i.e. its last path component
#[must_use]
pub fn session_name(worktree_path: &Path) -> String {
    worktree_path
        .file_name()
        .map_or_else(String::new, |name| name.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::ScriptedRunner;
    use crate::traits::CommandOutput;
    use std::rc::Rc;

    #[test]
    fn test_session_name_is_last_component() {
        assert_eq!(session_name(Path::new("/repo/feature/login")), "login");
        assert_eq!(session_name(Path::new("/repo/main")), "main");
    }

    #[test]
    fn test_sesh_connect_runs_sesh() -> anyhow::Result<()> {
        let runner = Rc::new(ScriptedRunner::new());
        let toolbox = Toolbox::new(Box::new(Rc::clone(&runner)), |_| true);

        toolbox.sesh_connect(Path::new("/repo/feature-x"))?;
        assert_eq!(runner.command_lines(), vec!["sesh connect /repo/feature-x"]);
        Ok(())
    }

    #[test]
    fn test_sesh_connect_without_sesh_installed() {
        let runner = Rc::new(ScriptedRunner::new());
        let toolbox = Toolbox::new(Box::new(Rc::clone(&runner)), |_| false);

        let result = toolbox.sesh_connect(Path::new("/repo/feature-x"));
        assert!(matches!(result, Err(GwtError::ToolMissing(ref tool)) if tool == "sesh"));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_sesh_failure_carries_output() {
        let runner = ScriptedRunner::new().on(
            "sesh connect /repo/x",
            CommandOutput::failed("no server running"),
        );
        let toolbox = Toolbox::new(Box::new(runner), |_| true);

        let result = toolbox.sesh_connect(Path::new("/repo/x"));
        assert!(matches!(result, Err(GwtError::CommandFailed(ref out)) if out == "no server running"));
    }
}
