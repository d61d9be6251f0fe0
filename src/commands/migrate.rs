//! Command: move the printer list from the source server to the destination.
use anyhow::{Context as _, Result};

use crate::cli::{GlobalOpts, MigrateOpts};
use crate::error::HostRole;
use crate::logging::Logger;
use crate::merge::KeyMode;
use crate::migrate::{self, HostPrompt, Migration, TerminalPrompt};
use crate::probe::PingProbe;

use super::version::VERSION;

/// Run the `migrate` subcommand, prompting for any host not given.
///
/// # Errors
///
/// Returns an error if settings cannot be loaded, a host name is missing, or
/// any migration step fails.
pub fn run(global: &GlobalOpts, opts: &MigrateOpts, log: &Logger) -> Result<()> {
    run_with_prompt(global, opts, log, &TerminalPrompt)
}

/// Run the `migrate` subcommand with a custom host prompt.
///
/// # Errors
///
/// See [`run`].
pub fn run_with_prompt(
    global: &GlobalOpts,
    opts: &MigrateOpts,
    log: &Logger,
    prompt: &dyn HostPrompt,
) -> Result<()> {
    log.info(&format!("printer-migrate {VERSION}"));

    let mut settings = super::load_settings(global, log)?;
    if opts.no_probe {
        settings.probe.enabled = false;
    }

    let source = migrate::resolve_host(opts.source.as_deref(), HostRole::Source, prompt)?;
    let destination =
        migrate::resolve_host(opts.destination.as_deref(), HostRole::Destination, prompt)?;
    log.info(&format!("migrating printers from {source} to {destination}"));
    if opts.dry_run {
        log.info("dry run: the destination will not be modified");
    }

    let probe = PingProbe::new(settings.probe.count, settings.probe.timeout_secs);
    let mut migration = Migration::new(&settings)
        .with_probe(&probe)
        .dry_run(opts.dry_run)
        .with_cancel(super::interrupt_flag(log));
    if opts.case_insensitive {
        migration = migration.with_key_mode(KeyMode::CaseInsensitive);
    }

    let result = migration.run(&source, &destination, log);
    log.print_summary();
    let report = result.context("migration failed")?;

    if report.written {
        log.info(&format!(
            "published {} printers to {}",
            report.discovery.printers.len(),
            report.output_path.display()
        ));
    }
    Ok(())
}
