//! Per-repository configuration stored in `.gwt.toml` at the Repository Root.
//!
//! Every field is optional; a missing or blank file yields the defaults.
//!
//! ```toml
//! version = "1.0"
//! init_commands = ["npm install"]
//! destroy_commands = ["docker compose down"]
//!
//! [defaults]
//! base_branch = "main"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{GwtError, Result};

pub const CONFIG_FILE_NAME: &str = ".gwt.toml";

const DEFAULT_VERSION: &str = "1.0";
const DEFAULT_BASE_BRANCH: &str = "main";

/// Contents written by `gwt init`
pub const DEFAULT_TEMPLATE: &str = r#"version = "1.0"
init_commands = ["echo \"Worktree initialized!\""]
destroy_commands = ["echo \"Worktree removed!\""]

[defaults]
base_branch = "main"
"#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GwtConfig {
    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub defaults: Defaults,

    /// Run inside a new worktree after it is created
    #[serde(default)]
    pub init_commands: Vec<String>,

    /// Run inside a worktree before it is removed
    #[serde(default, alias = "remove_commands")]
    pub destroy_commands: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Defaults {
    /// Base for new branches that exist neither locally nor remotely
    #[serde(default)]
    pub base_branch: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            base_branch: DEFAULT_BASE_BRANCH.to_string(),
        }
    }
}

impl Default for GwtConfig {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
            defaults: Defaults::default(),
            init_commands: Vec::new(),
            destroy_commands: Vec::new(),
        }
    }
}

impl GwtConfig {
    #[must_use]
    pub fn path_in(root: &Path) -> PathBuf {
        root.join(CONFIG_FILE_NAME)
    }

    /// Loads the configuration from the repository at `root`.
    ///
    /// A missing or whitespace-only file yields [`GwtConfig::default`]. Empty
    /// `version` and `base_branch` values are replaced by their defaults.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or is not valid TOML
    pub fn load_from_repo(root: &Path) -> Result<Self> {
        let config_path = Self::path_in(root);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|source| GwtError::ConfigRead {
            path: config_path.clone(),
            source,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Self = toml::from_str(&content).map_err(|source| GwtError::ConfigParse {
            path: config_path,
            source,
        })?;
        Ok(config.with_defaults_filled())
    }

    fn with_defaults_filled(mut self) -> Self {
        if self.version.trim().is_empty() {
            self.version = DEFAULT_VERSION.to_string();
        }
        if self.defaults.base_branch.trim().is_empty() {
            self.defaults.base_branch = DEFAULT_BASE_BRANCH.to_string();
        }
        self
    }

    /// Writes [`DEFAULT_TEMPLATE`] to the repository at `root`, replacing any existing file
    ///
    /// # Errors
    /// Returns an error if the file cannot be written
    pub fn write_default(root: &Path) -> Result<PathBuf> {
        let config_path = Self::path_in(root);
        fs::write(&config_path, DEFAULT_TEMPLATE).map_err(|e| GwtError::io(&config_path, e))?;
        Ok(config_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let config = GwtConfig::load_from_repo(dir.path())?;

        assert_eq!(config, GwtConfig::default());
        assert_eq!(config.version, "1.0");
        assert_eq!(config.defaults.base_branch, "main");
        assert!(config.init_commands.is_empty());
        Ok(())
    }

    #[test]
    fn test_blank_file_yields_defaults() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join(CONFIG_FILE_NAME), "  \n\t\n")?;

        assert_eq!(GwtConfig::load_from_repo(dir.path())?, GwtConfig::default());
        Ok(())
    }

    #[test]
    fn test_template_round_trips() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = GwtConfig::write_default(dir.path())?;
        assert_eq!(path, dir.path().join(".gwt.toml"));

        let config = GwtConfig::load_from_repo(dir.path())?;
        assert_eq!(config.init_commands, vec!["echo \"Worktree initialized!\""]);
        assert_eq!(config.destroy_commands, vec!["echo \"Worktree removed!\""]);
        assert_eq!(config.defaults.base_branch, "main");
        Ok(())
    }

    #[test]
    fn test_partial_file_fills_defaults() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "version = \"\"\ninit_commands = [\"make setup\", \"make seed\"]\n[defaults]\nbase_branch = \"\"\n",
        )?;

        let config = GwtConfig::load_from_repo(dir.path())?;
        assert_eq!(config.version, "1.0");
        assert_eq!(config.defaults.base_branch, "main");
        assert_eq!(config.init_commands, vec!["make setup", "make seed"]);
        Ok(())
    }

    #[test]
    fn test_custom_base_branch_and_remove_commands_alias() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "remove_commands = [\"docker compose down\"]\n[defaults]\nbase_branch = \"develop\"\n",
        )?;

        let config = GwtConfig::load_from_repo(dir.path())?;
        assert_eq!(config.defaults.base_branch, "develop");
        assert_eq!(config.destroy_commands, vec!["docker compose down"]);
        Ok(())
    }

    #[test]
    fn test_invalid_toml_is_an_error() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join(CONFIG_FILE_NAME), "init_commands = [unterminated")?;

        let result = GwtConfig::load_from_repo(dir.path());
        assert!(matches!(result, Err(GwtError::ConfigParse { .. })));
        Ok(())
    }
}
