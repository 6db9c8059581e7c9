#![allow(clippy::unwrap_used)] // Tests use unwrap for simplicity

//! Integration tests for the remove command
//!
//! These tests validate worktree removal, branch deletion, directory pruning
//! and destroy commands using real CLI execution.

use anyhow::Result;
use assert_fs::prelude::*;
use predicates::prelude::*;

use test_support::CliTestEnvironment;

fn add(env: &CliTestEnvironment, branch: &str) -> Result<()> {
    env.run_command(&["add", "--no-sync", "--no-pull", branch])?
        .assert()
        .success();
    Ok(())
}

#[test]
fn test_remove_deletes_worktree_and_branch() -> Result<()> {
    let env = CliTestEnvironment::new()?;
    add(&env, "feature-x")?;

    env.run_command(&["remove", "feature-x"])?
        .assert()
        .success()
        .stdout(predicate::str::contains("Worktree feature-x removed successfully."));

    env.worktree_path("feature-x").assert(predicate::path::missing());
    assert!(!env.local_branch_exists("feature-x")?);
    env.run_command(&["list"])?
        .assert()
        .success()
        .stdout(predicate::str::contains("feature-x").not());

    Ok(())
}

#[test]
fn test_remove_keep_branch() -> Result<()> {
    let env = CliTestEnvironment::new()?;
    add(&env, "feature-x")?;

    env.run_command(&["rm", "--keep-branch", "feature-x"])?
        .assert()
        .success();

    env.worktree_path("feature-x").assert(predicate::path::missing());
    assert!(env.local_branch_exists("feature-x")?);

    Ok(())
}

#[test]
fn test_remove_prunes_empty_parents() -> Result<()> {
    let env = CliTestEnvironment::new()?;
    add(&env, "team/feature/login")?;

    env.run_command(&["remove", "team/feature/login"])?
        .assert()
        .success();

    env.worktree_path("team").assert(predicate::path::missing());
    env.repo_dir.assert(predicate::path::is_dir());

    Ok(())
}

#[test]
fn test_remove_stops_pruning_at_non_empty_parent() -> Result<()> {
    let env = CliTestEnvironment::new()?;
    add(&env, "team/one")?;
    add(&env, "team/two")?;

    env.run_command(&["remove", "team/one"])?.assert().success();

    env.worktree_path("team/one").assert(predicate::path::missing());
    env.worktree_path("team/two").assert(predicate::path::is_dir());

    Ok(())
}

#[test]
fn test_remove_dirty_worktree_needs_force() -> Result<()> {
    let env = CliTestEnvironment::new()?;
    add(&env, "feature-dirty")?;
    env.worktree_path("feature-dirty")
        .child("scratch.txt")
        .write_str("uncommitted")?;

    env.run_command(&["remove", "feature-dirty"])?
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
    env.worktree_path("feature-dirty").assert(predicate::path::is_dir());

    env.run_command(&["remove", "--force", "feature-dirty"])?
        .assert()
        .success();
    env.worktree_path("feature-dirty").assert(predicate::path::missing());

    Ok(())
}

#[test]
fn test_remove_unknown_worktree_fails() -> Result<()> {
    let env = CliTestEnvironment::new()?;

    env.run_command(&["remove", "does-not-exist"])?
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("worktree not found: does-not-exist"));

    Ok(())
}

#[test]
fn test_remove_batch_stops_at_first_failure() -> Result<()> {
    let env = CliTestEnvironment::new()?;
    add(&env, "first")?;
    add(&env, "third")?;

    env.run_command(&["remove", "first", "missing", "third"])?
        .assert()
        .failure();

    env.worktree_path("first").assert(predicate::path::missing());
    env.worktree_path("third").assert(predicate::path::is_dir());

    Ok(())
}

#[test]
fn test_remove_runs_destroy_commands_before_removal() -> Result<()> {
    let env = CliTestEnvironment::new()?;
    add(&env, "feature-x")?;
    env.repo_dir
        .child(".gwt.toml")
        .write_str("destroy_commands = [\"test -d .git || test -f .git\", \"cp README.md ../saved.md\"]\n")?;

    env.run_command(&["remove", "feature-x"])?
        .assert()
        .success()
        .stdout(predicate::str::contains("Running destroy command 2 of 2"));

    env.repo_dir.child("saved.md").assert(predicate::path::exists());

    Ok(())
}

#[test]
fn test_failing_destroy_command_keeps_worktree() -> Result<()> {
    let env = CliTestEnvironment::new()?;
    add(&env, "feature-x")?;
    env.repo_dir
        .child(".gwt.toml")
        .write_str("destroy_commands = [\"exit 3\"]\n")?;

    env.run_command(&["remove", "feature-x"])?
        .assert()
        .failure()
        .stderr(predicate::str::contains("error running destroy command 'exit 3'"));

    env.worktree_path("feature-x").assert(predicate::path::is_dir());
    assert!(env.local_branch_exists("feature-x")?);

    Ok(())
}

#[test]
fn test_rejected_targets_never_run_destroy_commands() -> Result<()> {
    let env = CliTestEnvironment::new()?;
    env.repo_dir
        .child(".gwt.toml")
        .write_str("destroy_commands = [\"touch destroy-ran\"]\n")?;

    env.run_command(&["remove", "../origin"])?
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "worktree path '../origin' is not inside the repository root",
        ));
    env.origin_dir
        .child("destroy-ran")
        .assert(predicate::path::missing());

    env.run_command(&["remove", "typo-name"])?
        .assert()
        .failure()
        .stderr(predicate::str::contains("worktree not found: typo-name"));
    env.repo_dir
        .child("destroy-ran")
        .assert(predicate::path::missing());

    Ok(())
}

#[test]
fn test_remove_detached_worktree_is_refused_up_front() -> Result<()> {
    let env = CliTestEnvironment::new()?;
    env.git(&["worktree", "add", "--detach", "detached", "main"])?;

    env.run_command(&["remove", "detached"])?
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not parse worktree branch"));

    env.worktree_path("detached").assert(predicate::path::is_dir());

    Ok(())
}
