use anyhow::Result;
use console::style;

use crate::config::GwtConfig;
use crate::git::Git;
use crate::selection::{InquireSelectionProvider, SelectionProvider};

/// Writes the default `.gwt.toml` at the Repository Root
///
/// # Errors
/// Returns an error if the current directory is not inside a recognised
/// repository, the confirmation prompt fails, or the file cannot be written
pub fn init_config() -> Result<()> {
    let git = Git::system()?;
    init_config_with_provider(&git, &InquireSelectionProvider)
}

/// Writes the default configuration, asking `provider` before overwriting (for testing)
///
/// # Errors
/// Returns an error if the confirmation prompt fails or the file cannot be written
pub fn init_config_with_provider(git: &Git, provider: &dyn SelectionProvider) -> Result<()> {
    let root = git.root()?;
    if GwtConfig::path_in(root.path()).exists()
        && !provider.confirm("Config file already exists. Do you want to overwrite it?")?
    {
        return Ok(());
    }

    let path = GwtConfig::write_default(root.path())?;
    println!(
        "{} Initialized gwt configuration at {}",
        style("✓").green().bold(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_TEMPLATE;
    use crate::git::RepoRoot;
    use crate::runner::ScriptedRunner;
    use crate::selection::MockSelectionProvider;

    fn git_at(dir: &std::path::Path) -> anyhow::Result<Git> {
        Ok(Git::with_root(Box::new(ScriptedRunner::new()), RepoRoot::resolve(dir)?))
    }

    #[test]
    fn test_init_writes_template() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        init_config_with_provider(&git_at(dir.path())?, &MockSelectionProvider::new(""))?;

        assert_eq!(std::fs::read_to_string(dir.path().join(".gwt.toml"))?, DEFAULT_TEMPLATE);
        Ok(())
    }

    #[test]
    fn test_init_keeps_existing_file_when_declined() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join(".gwt.toml"), "init_commands = [\"make\"]\n")?;

        init_config_with_provider(&git_at(dir.path())?, &MockSelectionProvider::new(""))?;

        assert_eq!(
            std::fs::read_to_string(dir.path().join(".gwt.toml"))?,
            "init_commands = [\"make\"]\n"
        );
        Ok(())
    }

    #[test]
    fn test_init_overwrites_when_confirmed() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join(".gwt.toml"), "stale")?;

        let provider = MockSelectionProvider::new("").confirming(true);
        init_config_with_provider(&git_at(dir.path())?, &provider)?;

        assert_eq!(std::fs::read_to_string(dir.path().join(".gwt.toml"))?, DEFAULT_TEMPLATE);
        Ok(())
    }
}
