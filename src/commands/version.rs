//! Command: print version information.

/// Version string, from the release pipeline or `git describe` when available.
pub const VERSION: &str = match option_env!("PRINTER_MIGRATE_VERSION") {
    Some(version) => version,
    None => env!("CARGO_PKG_VERSION"),
};

/// Print the version to stdout.
pub fn run() {
    println!("printer-migrate {VERSION}");
}
