//! Top-level subcommand orchestration (`scan`, `migrate`, `version`).
pub mod migrate;
pub mod scan;
pub mod version;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;
use crate::config::Settings;
use crate::logging::Logger;

/// Load the settings file named by `--config`, or the default one.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read, parsed, or
/// validated.
pub fn load_settings(global: &GlobalOpts, log: &Logger) -> Result<Settings> {
    let path = Settings::path_or_default(global.config.as_deref());
    log.debug(&format!("settings file: {}", path.display()));
    Settings::load(&path).context("cannot load settings")
}

/// Install a Ctrl-C handler that raises the returned flag.
///
/// The walker checks the flag between directories and a migration between
/// steps. A second install in the same process fails; that is logged and the
/// flag simply never rises.
#[must_use]
pub fn interrupt_flag(log: &Logger) -> Arc<AtomicBool> {
    let flag = Arc::new(AtomicBool::new(false));
    let raised = Arc::clone(&flag);
    if let Err(e) = ctrlc::set_handler(move || raised.store(true, Ordering::Relaxed)) {
        log.warn(&format!("cannot install Ctrl-C handler: {e}"));
    }
    flag
}
