//! `printer-migrate` command-line entry point.

use anyhow::Result;
use clap::Parser;

use printer_migrate::{cli, commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();

    if matches!(args.command, cli::Command::Version) {
        commands::version::run();
        return Ok(());
    }

    let command = args.command.name();
    logging::init_subscriber(args.verbose, command);
    let log = logging::Logger::new(command);

    match &args.command {
        cli::Command::Scan(opts) => commands::scan::run(&args.global, opts, &log),
        cli::Command::Migrate(opts) => commands::migrate::run(&args.global, opts, &log),
        cli::Command::Version => Ok(()),
    }
}
