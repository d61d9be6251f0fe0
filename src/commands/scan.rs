//! Command: discover printers under a local path and print the merged file.
use std::io::{ErrorKind, Write};
use std::path::Path;

use anyhow::{Context as _, Result};

use crate::cli::{GlobalOpts, ScanOpts};
use crate::discover::{self, DiscoverOptions, Discovery};
use crate::logging::Logger;
use crate::merge::KeyMode;
use crate::report::{self, LineEnding};
use crate::walk::WalkOptions;

/// Run the `scan` subcommand.
///
/// Unreadable files and subdirectories are logged and skipped; only a root
/// that cannot be searched at all is an error.
///
/// # Errors
///
/// Returns an error if settings cannot be loaded, the root cannot be listed,
/// or the output cannot be written.
pub fn run(global: &GlobalOpts, opts: &ScanOpts, log: &Logger) -> Result<()> {
    let settings = super::load_settings(global, log)?;

    let key_mode = if opts.case_insensitive {
        KeyMode::CaseInsensitive
    } else {
        settings.discovery.key_mode()
    };
    let discover_opts = DiscoverOptions {
        walk: WalkOptions {
            extension: opts
                .extension
                .clone()
                .unwrap_or_else(|| settings.discovery.extension.clone()),
            cancel: Some(super::interrupt_flag(log)),
        },
        key_mode,
    };

    log.stage(&format!(
        "Searching {}",
        dunce::simplified(&opts.root).display()
    ));
    let found = discover::discover(&opts.root, &discover_opts)
        .with_context(|| format!("cannot search {}", opts.root.display()))?;
    log_stats(&found, log);

    match &opts.output {
        Some(path) => {
            let document = build_document(&found, opts.json, settings.destination.line_ending)?;
            write_document(path, &document)?;
            log.info(&format!(
                "wrote {} printers to {}",
                found.printers.len(),
                path.display()
            ));
        }
        None => {
            let document = build_document(&found, opts.json, LineEnding::Lf)?;
            emit(&mut std::io::stdout().lock(), &document)?;
        }
    }
    Ok(())
}

/// Write `document` to `out`. A reader that went away early (`scan | head`)
/// is not an error.
fn emit(out: &mut impl Write, document: &str) -> Result<()> {
    match out.write_all(document.as_bytes()).and_then(|()| out.flush()) {
        Err(e) if e.kind() != ErrorKind::BrokenPipe => {
            Err(e).context("cannot write to standard output")
        }
        _ => Ok(()),
    }
}

fn log_stats(found: &Discovery, log: &Logger) {
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
}

fn build_document(found: &Discovery, json: bool, line_ending: LineEnding) -> Result<String> {
    if json {
        let mut out =
            serde_json::to_string_pretty(&found.printers).context("cannot serialize printers")?;
        out.push('\n');
        Ok(out)
    } else {
        Ok(report::render_with(&found.printers, line_ending))
    }
}

fn write_document(path: &Path, document: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("cannot create {}", parent.display()))?;
    }
    std::fs::write(path, document).with_context(|| format!("cannot write {}", path.display()))
}
