//! Ctrl-C handling for the long-running network steps.
//!
//! The handler is installed once by `main`. While no section is armed, Ctrl-C
//! ends the process with status 130 as usual. Inside [`skippable`] it only
//! marks the section as interrupted: the git child shares our foreground
//! process group, so it receives the same SIGINT and exits on its own.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

static ARMED: AtomicBool = AtomicBool::new(false);
static INTERRUPTED: AtomicBool = AtomicBool::new(false);
/// Held for the whole of a skippable section; sections never overlap
static SECTION: Mutex<()> = Mutex::new(());

/// Installs the process-wide Ctrl-C handler.
///
/// # Errors
/// Returns an error if a handler has already been registered.
pub fn install() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(|| {
        if !request_skip() {
            std::process::exit(130);
        }
    })
}

/// Marks the armed section as interrupted. Returns `false` when no section is armed.
pub(crate) fn request_skip() -> bool {
    if ARMED.load(Ordering::SeqCst) {
        INTERRUPTED.store(true, Ordering::SeqCst);
        true
    } else {
        false
    }
}

/// Outcome of a section run through [`skippable`]
#[derive(Debug)]
pub enum Skippable<T> {
    Completed(T),
    Skipped,
}

/// Runs `action` behind a spinner titled `title`, letting the user skip it with Ctrl-C.
pub fn skippable<T>(title: &str, action: impl FnOnce() -> T) -> Skippable<T> {
    let _section = SECTION.lock().unwrap_or_else(PoisonError::into_inner);
    INTERRUPTED.store(false, Ordering::SeqCst);
    ARMED.store(true, Ordering::SeqCst);

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
    }
    spinner.set_message(format!("{title} (press ctrl-c to skip)"));
    spinner.enable_steady_tick(Duration::from_millis(80));

    let result = action();

    spinner.finish_and_clear();
    ARMED.store(false, Ordering::SeqCst);

    if INTERRUPTED.swap(false, Ordering::SeqCst) {
        Skippable::Skipped
    } else {
        Skippable::Completed(result)
    }
}
