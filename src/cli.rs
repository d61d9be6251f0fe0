//! Command-line argument definitions.
use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI entry point for the printer migration tool.
#[derive(Parser, Debug)]
#[command(
    name = "printer-migrate",
    about = "Collect printer install directives from logon scripts and publish them on a new server",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared across all subcommands.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Settings file (defaults to ./printer-migrate.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search a directory tree and print the merged printer file
    Scan(ScanOpts),
    /// Move the printer list from one server to another
    Migrate(MigrateOpts),
    /// Print version information
    Version,
}

impl Command {
    /// Name used for the log file of this command.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Scan(_) => "scan",
            Self::Migrate(_) => "migrate",
            Self::Version => "version",
        }
    }
}

/// Options for the `scan` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct ScanOpts {
    /// Root of the script tree
    pub root: PathBuf,

    /// Write the result to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Emit the merged printers as JSON
    #[arg(long)]
    pub json: bool,

    /// Treat printer paths differing only in case as the same printer
    #[arg(long)]
    pub case_insensitive: bool,

    /// Eligible file extension (overrides the settings file)
    #[arg(long)]
    pub extension: Option<String>,
}

/// Options for the `migrate` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct MigrateOpts {
    /// Host currently serving the logon scripts (prompted if omitted)
    #[arg(short, long)]
    pub source: Option<String>,

    /// Host receiving the printer file (prompted if omitted)
    #[arg(short = 't', long)]
    pub destination: Option<String>,

    /// Preview changes without applying
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Do not ping hosts before using them
    #[arg(long)]
    pub no_probe: bool,

    /// Treat printer paths differing only in case as the same printer
    #[arg(long)]
    pub case_insensitive: bool,
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_scan_with_root() {
        let cli = Cli::parse_from(["printer-migrate", "scan", "/srv/netlogon"]);
        let Command::Scan(opts) = cli.command else {
            panic!("expected scan");
        };
        assert_eq!(opts.root, PathBuf::from("/srv/netlogon"));
        assert!(opts.output.is_none());
        assert!(!opts.json);
    }

    #[test]
    fn parse_scan_flags() {
        let cli = Cli::parse_from([
            "printer-migrate",
            "scan",
            "/srv",
            "-o",
            "out.txt",
            "--json",
            "--case-insensitive",
            "--extension",
            "bat",
        ]);
        let Command::Scan(opts) = cli.command else {
            panic!("expected scan");
        };
        assert_eq!(opts.output, Some(PathBuf::from("out.txt")));
        assert!(opts.json);
        assert!(opts.case_insensitive);
        assert_eq!(opts.extension.as_deref(), Some("bat"));
    }

    #[test]
    fn scan_requires_root() {
        assert!(Cli::try_parse_from(["printer-migrate", "scan"]).is_err());
    }

    #[test]
    fn parse_migrate_hosts() {
        let cli = Cli::parse_from([
            "printer-migrate",
            "migrate",
            "--source",
            "OLD",
            "-t",
            "NEW",
            "--dry-run",
            "--no-probe",
        ]);
        let Command::Migrate(opts) = cli.command else {
            panic!("expected migrate");
        };
        assert_eq!(opts.source.as_deref(), Some("OLD"));
        assert_eq!(opts.destination.as_deref(), Some("NEW"));
        assert!(opts.dry_run);
        assert!(opts.no_probe);
    }

    #[test]
    fn migrate_hosts_are_optional() {
        let cli = Cli::parse_from(["printer-migrate", "migrate"]);
        let Command::Migrate(opts) = cli.command else {
            panic!("expected migrate");
        };
        assert!(opts.source.is_none());
        assert!(opts.destination.is_none());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["printer-migrate", "version", "-v", "--config", "a.toml"]);
        assert!(cli.verbose);
        assert_eq!(cli.global.config, Some(PathBuf::from("a.toml")));
        assert!(matches!(cli.command, Command::Version));
    }

    #[test]
    fn command_names() {
        let cli = Cli::parse_from(["printer-migrate", "migrate"]);
        assert_eq!(cli.command.name(), "migrate");
        assert_eq!(Command::Version.name(), "version");
    }
}
