use clap::{CommandFactory, Parser, Subcommand, ValueHint};
use gwt::Result;
use gwt::commands::add::AddOptions;
use gwt::commands::completions::Shell;
use gwt::commands::{add, clone, completions, init, list, remove};
use gwt::connect::JetBrainsIde;
use gwt::{interrupt, logging};

#[derive(Parser)]
#[command(name = "gwt")]
#[command(about = "A git worktree wrapper that makes life easier")]
#[command(version)]
pub struct Cli {
    /// Print debug logs to stderr (GWT_LOG overrides the filter)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new worktree
    #[command(visible_alias = "a")]
    Add {
        /// Branch for the worktree. If not provided, opens interactive selection
        #[arg(value_hint = ValueHint::Other)]
        branch: Option<String>,
        /// Commit, tag or branch to start the new branch from
        #[arg(value_hint = ValueHint::Other)]
        commitish: Option<String>,
        /// Do not pull the base branch before creating the worktree
        #[arg(long)]
        no_pull: bool,
        /// Do not fetch remote branches before creating the worktree
        #[arg(long)]
        no_sync: bool,
        /// Checkout branch even if already checked out in another worktree
        #[arg(short, long)]
        force: bool,
        /// Connect to the worktree with sesh
        #[arg(long)]
        sesh: bool,
        /// Open the new worktree in WebStorm
        #[arg(long)]
        webstorm: bool,
        /// Open the new worktree in IntelliJ IDEA
        #[arg(long)]
        idea: bool,
        /// Open the new worktree in PyCharm
        #[arg(long)]
        pycharm: bool,
        /// Open the new worktree in CLion
        #[arg(long)]
        clion: bool,
        /// Open the new worktree in Rider
        #[arg(long)]
        rider: bool,
        /// Open the new worktree in GoLand
        #[arg(long)]
        goland: bool,
        /// Open the new worktree in DataGrip
        #[arg(long)]
        datagrip: bool,
    },
    /// Clone a repository into the worktree layout
    Clone {
        /// Repository URL
        #[arg(value_hint = ValueHint::Url)]
        repo: String,
        /// Directory to clone into
        #[arg(value_hint = ValueHint::DirPath)]
        dir: Option<String>,
    },
    /// List all worktrees
    #[command(visible_alias = "ls")]
    List {
        /// Show absolute paths
        #[arg(short, long)]
        absolute: bool,
    },
    /// Remove worktrees and their branches
    #[command(visible_alias = "rm")]
    Remove {
        /// Worktrees to remove. If not provided, opens interactive selection
        #[arg(value_hint = ValueHint::Other)]
        worktrees: Vec<String>,
        /// Remove the worktree even if it has uncommitted changes
        #[arg(short, long)]
        force: bool,
        /// Keep the branch (only remove the worktree)
        #[arg(short, long)]
        keep_branch: bool,
    },
    /// Initialize gwt configuration in the current repository
    Init,
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn selected_ides(flags: [(bool, JetBrainsIde); 7]) -> Vec<JetBrainsIde> {
    flags
        .into_iter()
        .filter_map(|(enabled, ide)| enabled.then_some(ide))
        .collect()
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Add {
            branch,
            commitish,
            no_pull,
            no_sync,
            force,
            sesh,
            webstorm,
            idea,
            pycharm,
            clion,
            rider,
            goland,
            datagrip,
        } => {
            let options = AddOptions {
                branch,
                commitish,
                no_pull,
                no_sync,
                force,
                sesh,
                ides: selected_ides([
                    (webstorm, JetBrainsIde::WebStorm),
                    (idea, JetBrainsIde::Idea),
                    (pycharm, JetBrainsIde::PyCharm),
                    (clion, JetBrainsIde::CLion),
                    (rider, JetBrainsIde::Rider),
                    (goland, JetBrainsIde::GoLand),
                    (datagrip, JetBrainsIde::DataGrip),
                ]),
            };
            add::add_worktree(&options)?;
        }
        Commands::Clone { repo, dir } => {
            clone::clone(&repo, dir.as_deref())?;
        }
        Commands::List { absolute } => {
            list::list_worktrees(absolute)?;
        }
        Commands::Remove {
            worktrees,
            force,
            keep_branch,
        } => {
            remove::remove_worktrees(&worktrees, force, keep_branch)?;
        }
        Commands::Init => {
            init::init_config()?;
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            completions::generate_completions(shell, &mut cmd);
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    if let Err(e) = interrupt::install() {
        tracing::warn!("could not install Ctrl-C handler: {e}");
    }

    if let Err(e) = run(cli.command) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
