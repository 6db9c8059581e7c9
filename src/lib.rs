//! # gwt
//!
//! A git worktree wrapper. Every worktree of a repository lives in a
//! directory named after its branch, directly below the Repository Root (the
//! directory holding `.git`), and `gwt` creates, lists and removes them while
//! keeping branches and empty directories tidy.
//!
//! ## Quick Start
//!
//! ```bash
//! # Clone into the worktree layout; the default branch lands in ./repo/main
//! gwt clone git@github.com:acme/repo.git
//!
//! # New worktree for a new, local or remote branch
//! gwt add feature/login
//!
//! # List and remove
//! gwt list
//! gwt remove feature/login
//! ```
//!
//! ## Module Structure
//!
//! - [`git`] - Repository discovery, branch queries and the worktree add/remove lifecycle
//! - [`commands`] - One driver per subcommand
//! - [`config`] - `.gwt.toml` loading and the `init` template
//! - [`hooks`] - Fail-fast execution of init and destroy commands
//! - [`connect`] - Best-effort zoxide, sesh and JetBrains IDE integrations
//! - [`selection`] - Interactive pickers (fzf or built-in prompts) behind a trait
//! - [`traits`] / [`runner`] - The command runner seam and its implementations

pub mod commands;
pub mod config;
pub mod connect;
pub mod error;
pub mod git;
pub mod hooks;
pub mod interrupt;
pub mod logging;
pub mod paths;
pub mod runner;
pub mod selection;
pub mod traits;

pub use anyhow::Result;
pub use error::GwtError;
