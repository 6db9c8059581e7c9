use anyhow::Result;
use console::style;
use std::path::Path;
use tracing::{debug, warn};

use crate::config::GwtConfig;
use crate::connect::{self, JetBrainsIde, Toolbox};
use crate::error::GwtError;
use crate::git::worktree::AddRequest;
use crate::git::{Git, strip_remote};
use crate::hooks::{self, HookTarget, Phase};
use crate::interrupt::{self, Skippable};
use crate::paths;
use crate::selection::{self, SelectionProvider};

/// Everything `gwt add` was asked to do
#[derive(Debug, Clone, Default)]
pub struct AddOptions {
    /// Branch to create the worktree for; prompts when absent
    pub branch: Option<String>,
    pub commitish: Option<String>,
    pub no_pull: bool,
    pub no_sync: bool,
    pub force: bool,
    pub sesh: bool,
    /// IDEs to open the new worktree in, in order
    pub ides: Vec<JetBrainsIde>,
}

/// Creates a worktree and runs the configured integrations and init commands
///
/// # Errors
/// Returns an error if:
/// - The current directory is not inside a recognised repository
/// - The configuration file cannot be read
/// - A worktree for the branch already exists
/// - Any git step fails
/// - An init command fails
pub fn add_worktree(options: &AddOptions) -> Result<()> {
    let git = Git::system()?;
    let provider = selection::default_provider();
    add_worktree_with_provider(&git, provider.as_ref(), &Toolbox::system(), options)
}

/// Creates a worktree with custom git, selection and integration backends (for testing)
///
/// # Errors
/// Returns an error if:
/// - The current directory is not inside a recognised repository
/// - The configuration file cannot be read
/// - A worktree for the branch already exists
/// - Any git step fails
/// - An init command fails
pub fn add_worktree_with_provider(
    git: &Git,
    provider: &dyn SelectionProvider,
    toolbox: &Toolbox,
    options: &AddOptions,
) -> Result<()> {
    let root = git.root()?;
    let config = GwtConfig::load_from_repo(root.path())?;

    if !options.no_sync {
        match interrupt::skippable("Fetching remote branches...", || git.fetch()) {
            Skippable::Completed(result) => result?,
            Skippable::Skipped => warn!("fetch skipped"),
        }
    }

    let branch = match &options.branch {
        Some(branch) => branch.clone(),
        None => {
            let candidates = git.list_branches(false, true)?;
            if candidates.is_empty() {
                anyhow::bail!("no branches available to select from");
            }
            match provider.select("Select a branch to create a worktree:", candidates)? {
                Some(branch) => branch,
                None => {
                    debug!("no branch selected");
                    return Ok(());
                }
            }
        }
    };

    if git.worktree_exists(strip_remote(&branch))? {
        return Err(GwtError::WorktreeExists(branch).into());
    }

    let created = git.add_worktree(&AddRequest {
        branch: &branch,
        commitish: options.commitish.as_deref(),
        default_base: &config.defaults.base_branch,
        pull: !options.no_pull,
        force: options.force,
    })?;

    println!(
        "Worktree for branch '{}' added successfully.",
        style(&branch).bold()
    );
    println!("  Path: {}", paths::shorten_home(&created.path));
    println!("  Base: {}\n", created.base_branch);

    connect_integrations(toolbox, &created.path, options);

    let session = connect::session_name(&created.path);
    let target = if options.sesh {
        HookTarget::Session(&session)
    } else {
        HookTarget::Directory(&created.path)
    };
    hooks::run_commands(Phase::Init, &config.init_commands, target, None)?;

    Ok(())
}

/// Runs the best-effort integrations; failures only produce warnings
fn connect_integrations(toolbox: &Toolbox, path: &Path, options: &AddOptions) {
    if let Err(e) = toolbox.zoxide_add(path) {
        eprintln!("{} zoxide add failed: {e}", style("⚠").yellow());
    }

    if options.sesh {
        if let Err(e) = toolbox.sesh_connect(path) {
            eprintln!("{} sesh connect failed: {e}", style("⚠").yellow());
        }
    }

    for ide in &options.ides {
        match toolbox.launch_ide(*ide, path) {
            Ok(launcher) => debug!(ide = ide.binary(), ?launcher, "opened worktree in IDE"),
            Err(e) => eprintln!(
                "{} failed to launch {}: {e}",
                style("⚠").yellow(),
                ide.app_name()
            ),
        }
    }
}
