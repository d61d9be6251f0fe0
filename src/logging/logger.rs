//! Structured logger with dry-run awareness and summary collection.
use std::path::PathBuf;
use std::sync::Mutex;

use super::subscriber::{DRY_RUN_TARGET, STAGE_TARGET, STEP_TARGET};
use super::types::{StepEntry, StepStatus};
use super::paths::log_file_path;

/// Structured logger with dry-run awareness and step summary collection.
///
/// Messages go through [`tracing`]; the subscriber installed by
/// [`init_subscriber`](super::subscriber::init_subscriber) decides where they
/// land. The logger itself only remembers step results and the log file path
/// for the summary.
#[derive(Debug)]
pub struct Logger {
    steps: Mutex<Vec<StepEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a logger for `command`, pointing the summary at its log file.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self::with_log_file(log_file_path(command))
    }

    /// Create a logger that reports `log_file` in the summary.
    #[must_use]
    pub const fn with_log_file(log_file: Option<PathBuf>) -> Self {
        Self {
            steps: Mutex::new(Vec::new()),
            log_file,
        }
    }

    /// Return the log file path, if available.
    #[must_use]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (console only when verbose; always in the log file).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log an action that dry-run mode skipped.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }

    /// Record a step result for the summary.
    pub fn record_step(&self, name: &str, status: StepStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.steps.lock() {
            guard.push(StepEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Return a clone of all recorded steps.
    #[must_use]
    pub fn step_entries(&self) -> Vec<StepEntry> {
        self.steps.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Count the number of failed steps.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.steps.lock().map_or(0, |guard| {
            guard
                .iter()
                .filter(|s| s.status == StepStatus::Failed)
                .count()
        })
    }

    /// Log the summary of all recorded steps.
    pub fn print_summary(&self) {
        let steps = self.step_entries();
        if steps.is_empty() {
            return;
        }

        self.stage("Summary");
        for step in &steps {
            let suffix = step
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));
            tracing::info!(target: STEP_TARGET, status = step.status.label(), "{}{suffix}", step.name);
        }

        if let Some(path) = &self.log_file {
            self.info(&format!("log: {}", path.display()));
        }
    }
}
