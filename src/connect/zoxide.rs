use std::path::Path;

use tracing::debug;

use super::Toolbox;
use crate::error::Result;

impl Toolbox {
    /// Registers `path` with zoxide; returns `false` when zoxide is not installed
    ///
    /// # Errors
    /// Returns the zoxide output if it exits with a failure
    pub fn zoxide_add(&self, path: &Path) -> Result<bool> {
        self.zoxide("add", path)
    }

    /// Forgets `path` in zoxide; returns `false` when zoxide is not installed
    ///
    /// # Errors
    /// Returns the zoxide output if it exits with a failure
    pub fn zoxide_remove(&self, path: &Path) -> Result<bool> {
        self.zoxide("remove", path)
    }

    fn zoxide(&self, action: &str, path: &Path) -> Result<bool> {
        if !self.available("zoxide") {
            debug!(action, "zoxide not found, skipping");
            return Ok(false);
        }
        let dir = path.to_string_lossy();
        self.run_checked("zoxide", &[action, &dir])?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GwtError;
    use crate::runner::ScriptedRunner;
    use crate::traits::CommandOutput;
    use std::rc::Rc;

    #[test]
    fn test_zoxide_add_and_remove() -> anyhow::Result<()> {
        let runner = Rc::new(ScriptedRunner::new());
        let toolbox = Toolbox::new(Box::new(Rc::clone(&runner)), |program| program == "zoxide");

        assert!(toolbox.zoxide_add(Path::new("/repo/feature-x"))?);
        assert!(toolbox.zoxide_remove(Path::new("/repo/feature-x"))?);
        assert_eq!(
            runner.command_lines(),
            vec!["zoxide add /repo/feature-x", "zoxide remove /repo/feature-x"]
        );
        Ok(())
    }

    #[test]
    fn test_zoxide_skipped_when_absent() -> anyhow::Result<()> {
        let runner = Rc::new(ScriptedRunner::new());
        let toolbox = Toolbox::new(Box::new(Rc::clone(&runner)), |_| false);

        assert!(!toolbox.zoxide_add(Path::new("/repo/x"))?);
        assert!(runner.calls().is_empty());
        Ok(())
    }

    #[test]
    fn test_zoxide_failure_is_reported() {
        let runner = ScriptedRunner::new()
            .on("zoxide remove /repo/x", CommandOutput::failed("path not found"));
        let toolbox = Toolbox::new(Box::new(runner), |_| true);

        assert!(matches!(
            toolbox.zoxide_remove(Path::new("/repo/x")),
            Err(GwtError::CommandFailed(_))
        ));
    }
}
