use anyhow::{Context, Result};
use inquire::error::InquireError;
use inquire::{Confirm, MultiSelect, Select};
use std::io::Write;
use std::process::{Command, Stdio};

/// Exit status fzf uses when the user aborts with Esc or Ctrl-C
const FZF_ABORTED: i32 = 130;

/// Trait for providing interactive selection functionality
/// This allows us to abstract away the interactive prompts for testing
pub trait SelectionProvider {
    /// Presents `options` and returns the chosen one, or `None` if the user backed out
    ///
    /// # Errors
    /// Returns an error if the selection process itself fails
    fn select(&self, prompt: &str, options: Vec<String>) -> Result<Option<String>>;

    /// Presents `options` and returns every chosen entry, possibly none
    ///
    /// # Errors
    /// Returns an error if the selection process itself fails
    fn select_multiple(&self, prompt: &str, options: Vec<String>) -> Result<Vec<String>>;

    /// Asks a yes/no question, defaulting to no
    ///
    /// # Errors
    /// Returns an error if the prompt cannot be shown
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

/// Picks fzf when it is installed, otherwise the built-in prompts
#[must_use]
pub fn default_provider() -> Box<dyn SelectionProvider> {
    if which::which("fzf").is_ok() {
        Box::new(FzfSelectionProvider)
    } else {
        Box::new(InquireSelectionProvider)
    }
}

/// Pipes the options through the `fzf` executable
pub struct FzfSelectionProvider;

impl FzfSelectionProvider {
    fn run(prompt: &str, options: &[String], multi: bool) -> Result<Vec<String>> {
        let mut cmd = Command::new("fzf");
        cmd.args(["--header", prompt]);
        if multi {
            cmd.arg("--multi");
        }
        let mut child = cmd
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .context("Failed to start fzf")?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(options.join("\n").as_bytes())
                .context("Failed to send options to fzf")?;
        }

        let output = child.wait_with_output().context("Failed to wait for fzf")?;
        if output.status.code() == Some(FZF_ABORTED) {
            return Ok(Vec::new());
        }
        if !output.status.success() {
            anyhow::bail!("fzf exited with {}", output.status);
        }

        Ok(parse_fzf_output(&String::from_utf8_lossy(&output.stdout)))
    }
}

fn parse_fzf_output(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

impl SelectionProvider for FzfSelectionProvider {
    fn select(&self, prompt: &str, options: Vec<String>) -> Result<Option<String>> {
        if options.is_empty() {
            return Ok(None);
        }
        Ok(Self::run(prompt, &options, false)?.into_iter().next())
    }

    fn select_multiple(&self, prompt: &str, options: Vec<String>) -> Result<Vec<String>> {
        if options.is_empty() {
            return Ok(Vec::new());
        }
        Self::run(prompt, &options, true)
    }

    fn confirm(&self, prompt: &str) -> Result<bool> {
        InquireSelectionProvider.confirm(prompt)
    }
}

/// Built-in terminal prompts
pub struct InquireSelectionProvider;

/// Folds user cancellation into `None`
fn cancelled_as_none<T>(result: std::result::Result<T, InquireError>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl SelectionProvider for InquireSelectionProvider {
    fn select(&self, prompt: &str, options: Vec<String>) -> Result<Option<String>> {
        if options.is_empty() {
            return Ok(None);
        }
        cancelled_as_none(
            Select::new(prompt, options)
                .with_page_size(10)
                .with_vim_mode(true)
                .prompt(),
        )
    }

    fn select_multiple(&self, prompt: &str, options: Vec<String>) -> Result<Vec<String>> {
        if options.is_empty() {
            return Ok(Vec::new());
        }
        Ok(cancelled_as_none(
            MultiSelect::new(prompt, options)
                .with_page_size(10)
                .with_vim_mode(true)
                .prompt(),
        )?
        .unwrap_or_default())
    }

    fn confirm(&self, prompt: &str) -> Result<bool> {
        Ok(cancelled_as_none(Confirm::new(prompt).with_default(false).prompt())?
            .unwrap_or(false))
    }
}

/// Mock implementation for testing that returns predetermined answers
pub struct MockSelectionProvider {
    pub responses: Vec<String>,
    pub confirmation: bool,
}

impl MockSelectionProvider {
    /// Answers `select` with `response`; an empty string stands for backing out
    pub fn new(response: impl Into<String>) -> Self {
        let response = response.into();
        Self {
            responses: if response.is_empty() {
                Vec::new()
            } else {
                vec![response]
            },
            confirmation: false,
        }
    }

    /// Answers `select_multiple` with `responses`
    #[must_use]
    pub fn multiple(responses: &[&str]) -> Self {
        Self {
            responses: responses.iter().map(|r| (*r).to_string()).collect(),
            confirmation: false,
        }
    }

    #[must_use]
    pub fn confirming(mut self, confirmation: bool) -> Self {
        self.confirmation = confirmation;
        self
    }
}

impl SelectionProvider for MockSelectionProvider {
    fn select(&self, _prompt: &str, options: Vec<String>) -> Result<Option<String>> {
        let Some(response) = self.responses.first() else {
            return Ok(None);
        };
        // Validate that the response is actually in the options
        if options.contains(response) {
            Ok(Some(response.clone()))
        } else {
            anyhow::bail!("Mock response '{}' not found in options", response)
        }
    }

    fn select_multiple(&self, _prompt: &str, options: Vec<String>) -> Result<Vec<String>> {
        if let Some(missing) = self.responses.iter().find(|r| !options.contains(r)) {
            anyhow::bail!("Mock response '{}' not found in options", missing);
        }
        Ok(self.responses.clone())
    }

    fn confirm(&self, _prompt: &str) -> Result<bool> {
        Ok(self.confirmation)
    }
}
