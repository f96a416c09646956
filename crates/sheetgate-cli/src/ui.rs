use std::io::IsTerminal;
use std::sync::OnceLock;

use crate::cli::{GlobalFlags, OutputFormat};

#[derive(Clone, Copy, Debug)]
pub struct UiPrefs {
    pub progress: bool,
    pub quiet: bool,
}

static UI_PREFS: OnceLock<UiPrefs> = OnceLock::new();

pub fn init(flags: &GlobalFlags) {
    let is_tty = std::io::stderr().is_terminal();
    let progress = is_tty && !flags.quiet && flags.format == OutputFormat::Text;

    let _ = UI_PREFS.set(UiPrefs {
        progress,
        quiet: flags.quiet,
    });
}

#[must_use]
pub fn prefs() -> UiPrefs {
    *UI_PREFS.get().unwrap_or(&UiPrefs {
        progress: false,
        quiet: false,
    })
}

/// Print an informational notice to stderr unless `--quiet` is set.
pub fn notice(message: &str) {
    if !prefs().quiet {
        eprintln!("{message}");
    }
}
