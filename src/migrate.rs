//! Migration orchestration: probe both hosts, discover on the source, and
//! publish the canonical file on the destination.
//!
//! The destination is only touched after discovery succeeded, so a failed
//! probe or an unreachable source tree leaves the previous file in place.
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::Settings;
use crate::discover::{self, DiscoverOptions, Discovery};
use crate::error::{HostRole, MigrateError};
use crate::logging::{Logger, StepStatus};
use crate::merge::KeyMode;
use crate::report;
use crate::walk::WalkOptions;

const CLEAR_STEP: &str = "Clear destination";
const WRITE_STEP: &str = "Write printer file";

/// Checks whether a host answers before it is used.
#[cfg_attr(test, mockall::automock)]
pub trait Probe {
    /// Return `true` if `host` is reachable.
    fn is_reachable(&self, host: &str) -> bool;
}

/// Asks the operator for a host name.
#[cfg_attr(test, mockall::automock)]
pub trait HostPrompt {
    /// Ask for the host playing `role`; `None` if the operator gave nothing.
    fn ask(&self, role: HostRole) -> Option<String>;
}

/// Prompt on the terminal with [`dialoguer`].
#[derive(Debug, Clone, Copy)]
pub struct TerminalPrompt;

impl HostPrompt for TerminalPrompt {
    fn ask(&self, role: HostRole) -> Option<String> {
        let prompt = match role {
            HostRole::Source => "Source print server",
            HostRole::Destination => "Destination server",
        };
        match dialoguer::Input::<String>::new()
            .with_prompt(prompt)
            .interact_text()
        {
            Ok(value) => Some(value),
            Err(dialoguer::Error::IO(err)) if err.kind() == ErrorKind::Interrupted => None,
            Err(err) => {
                tracing::warn!("cannot read {role} host: {err}");
                None
            }
        }
    }
}

/// Use `given` if present, otherwise ask. Blank answers count as missing.
///
/// # Errors
///
/// Returns [`MigrateError::MissingHost`] if no non-blank name is available.
pub fn resolve_host(
    given: Option<&str>,
    role: HostRole,
    prompt: &dyn HostPrompt,
) -> Result<String, MigrateError> {
    given
        .map(str::to_string)
        .or_else(|| prompt.ask(role))
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
        .ok_or(MigrateError::MissingHost(role))
}

/// What a completed migration did.
#[derive(Debug)]
pub struct MigrationReport {
    /// Discovery result from the source tree.
    pub discovery: Discovery,
    /// Path of the published file.
    pub output_path: PathBuf,
    /// Entries removed from the destination (or that would be, in dry-run).
    pub cleared: usize,
    /// Whether the file was actually written.
    pub written: bool,
}

/// One configured migration run.
pub struct Migration<'a> {
    settings: &'a Settings,
    probe: Option<&'a dyn Probe>,
    key_mode: KeyMode,
    dry_run: bool,
    cancel: Option<Arc<AtomicBool>>,
}

impl std::fmt::Debug for Migration<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Migration")
            .field("probe", &self.probe.is_some())
            .field("key_mode", &self.key_mode)
            .field("dry_run", &self.dry_run)
            .finish_non_exhaustive()
    }
}

impl<'a> Migration<'a> {
    /// Create a run from settings. Probing follows `settings.probe.enabled`
    /// once a probe is attached with [`Self::with_probe`].
    #[must_use]
    pub const fn new(settings: &'a Settings) -> Self {
        Self {
            settings,
            probe: None,
            key_mode: settings.discovery.key_mode(),
            dry_run: false,
            cancel: None,
        }
    }

    /// Check hosts with `probe` before using them.
    #[must_use]
    pub const fn with_probe(mut self, probe: &'a dyn Probe) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Override the deduplication key mode.
    #[must_use]
    pub const fn with_key_mode(mut self, key_mode: KeyMode) -> Self {
        self.key_mode = key_mode;
        self
    }

    /// Log destination changes instead of making them.
    #[must_use]
    pub const fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Stop when `flag` is raised: between steps, after a failed probe, and
    /// between directories during discovery.
    #[must_use]
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Run every step in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the [`MigrateError`] of the first failed step.
    pub fn run(
        &self,
        source: &str,
        destination: &str,
        log: &Logger,
    ) -> Result<MigrationReport, MigrateError> {
        self.check_host(HostRole::Source, source, log)?;
        self.check_host(HostRole::Destination, destination, log)?;

        let discovery = self.discover(source, log)?;

        let dest_dir = self.settings.destination_dir(destination);
        let output_path = dest_dir.join(&self.settings.destination.file_name);

        self.checkpoint(CLEAR_STEP, log)?;
        let cleared = self.clear_destination(&dest_dir, log)?;
        self.checkpoint(WRITE_STEP, log)?;
        let written = self.write_output(&output_path, &discovery, log)?;

        Ok(MigrationReport {
            discovery,
            output_path,
            cleared,
            written,
        })
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Fail with [`MigrateError::Interrupted`] if the cancel flag is up.
    fn checkpoint(&self, step: &str, log: &Logger) -> Result<(), MigrateError> {
        if !self.is_cancelled() {
            return Ok(());
        }
        log.warn(&format!("interrupted, stopping at: {step}"));
        log.record_step(step, StepStatus::Skipped, Some("interrupted"));
        Err(MigrateError::Interrupted {
            step: step.to_string(),
        })
    }

    fn check_host(&self, role: HostRole, host: &str, log: &Logger) -> Result<(), MigrateError> {
        let step = format!("Probe {role} host");
        self.checkpoint(&step, log)?;
        let Some(probe) = self.probe.filter(|_| self.settings.probe.enabled) else {
            log.record_step(&step, StepStatus::Skipped, Some("probing disabled"));
            return Ok(());
        };

        log.stage(&format!("Checking {role} host {host}"));
        if probe.is_reachable(host) {
            log.info(&format!("{host} is reachable"));
            log.record_step(&step, StepStatus::Ok, Some(host));
            Ok(())
        } else if self.is_cancelled() {
            // The interrupt also reaches `ping`, which then reports failure.
            self.checkpoint(&step, log)
        } else {
            let err = MigrateError::Unreachable {
                role,
                host: host.to_string(),
            };
            log.error(&err.to_string());
            log.record_step(&step, StepStatus::Failed, Some(host));
            Err(err)
        }
    }

    fn discover(&self, source: &str, log: &Logger) -> Result<Discovery, MigrateError> {
        const STEP: &str = "Discover printers";
        let root = self.settings.source_root(source);
        log.stage(&format!(
            "Searching {}",
            dunce::simplified(&root).display()
        ));

        let opts = DiscoverOptions {
            walk: WalkOptions {
                extension: self.settings.discovery.extension.clone(),
                cancel: self.cancel.clone(),
            },
            key_mode: self.key_mode,
        };
        match discover::discover(&root, &opts) {
            Ok(found) => {
                log.info(&format!(
                    "{} directives in {} files across {} directories",
                    found.raw_count, found.files_scanned, found.dirs_visited
                ));
                log.info(&format!(
                    "{} unique printers ({} duplicates merged)",
                    found.printers.len(),
                    found.duplicates()
                ));
                if !found.issues.is_empty() {
                    log.warn(&format!("{} path(s) could not be read", found.issues.len()));
                }
                log.record_step(
                    STEP,
                    StepStatus::Ok,
                    Some(&format!("{} printers", found.printers.len())),
                );
                Ok(found)
            }
            Err(e) => {
                log.error(&e.to_string());
                log.record_step(STEP, StepStatus::Failed, Some(&e.to_string()));
                Err(e.into())
            }
        }
    }

    fn clear_destination(&self, dir: &Path, log: &Logger) -> Result<usize, MigrateError> {
        if !self.settings.destination.clear_existing {
            log.record_step(CLEAR_STEP, StepStatus::Skipped, Some("disabled"));
            return Ok(0);
        }

        log.stage(&format!("Clearing {}", dunce::simplified(dir).display()));
        let result = if self.dry_run {
            list_entries(dir).map(|entries| {
                for entry in &entries {
                    log.dry_run(&format!("would remove {}", entry.display()));
                }
                entries.len()
            })
        } else {
            clear_dir(dir)
        };

        match result {
            Ok(count) => {
                let status = if self.dry_run {
                    StepStatus::DryRun
                } else {
                    StepStatus::Ok
                };
                log.record_step(CLEAR_STEP, status, Some(&format!("{count} entries")));
                Ok(count)
            }
            Err(e) => {
                log.error(&e.to_string());
                log.record_step(CLEAR_STEP, StepStatus::Failed, None);
                Err(e)
            }
        }
    }

    fn write_output(
        &self,
        path: &Path,
        discovery: &Discovery,
        log: &Logger,
    ) -> Result<bool, MigrateError> {
        let document =
            report::render_with(&discovery.printers, self.settings.destination.line_ending);

        if self.dry_run {
            log.dry_run(&format!(
                "would write {} printers to {}",
                discovery.printers.len(),
                path.display()
            ));
            log.record_step(WRITE_STEP, StepStatus::DryRun, None);
            return Ok(false);
        }

        log.stage(&format!("Writing {}", path.display()));
        let result = path
            .parent()
            .map_or(Ok(()), std::fs::create_dir_all)
            .and_then(|()| std::fs::write(path, document))
            .map_err(|source| MigrateError::WriteOutput {
                path: path.to_path_buf(),
                source,
            });

        match result {
            Ok(()) => {
                log.record_step(WRITE_STEP, StepStatus::Ok, Some(&path.display().to_string()));
                Ok(true)
            }
            Err(e) => {
                log.error(&e.to_string());
                log.record_step(WRITE_STEP, StepStatus::Failed, None);
                Err(e)
            }
        }
    }
}

/// Entries directly inside `dir`; a missing directory has none.
fn list_entries(dir: &Path) -> Result<Vec<PathBuf>, MigrateError> {
    let to_err = |source: std::io::Error| MigrateError::ClearDestination {
        path: dir.to_path_buf(),
        source,
    };
    match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .map(|e| e.map(|e| e.path()).map_err(to_err))
            .collect(),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(to_err(e)),
    }
}

/// Remove every file and subdirectory inside `dir`, keeping `dir` itself.
/// Creates `dir` if it does not exist. Returns the number of entries removed.
fn clear_dir(dir: &Path) -> Result<usize, MigrateError> {
    let entries = list_entries(dir)?;
    for path in &entries {
        let removed = if path.is_dir() && path.symlink_metadata().is_ok_and(|m| !m.is_symlink()) {
            std::fs::remove_dir_all(path)
        } else {
            std::fs::remove_file(path)
        };
        removed.map_err(|source| MigrateError::ClearDestination {
            path: path.clone(),
            source,
        })?;
    }
    std::fs::create_dir_all(dir).map_err(|source| MigrateError::ClearDestination {
        path: dir.to_path_buf(),
        source,
    })?;
    Ok(entries.len())
}
