//! Discovery: walk a tree, merge what was found, and report statistics.
//!
//! This is the boundary the migration orchestrator calls; together with
//! [`report::render`](crate::report::render) it is the whole core.
use std::path::Path;

use crate::error::{DiscoveryError, ScanIssue};
use crate::merge::{self, KeyMode, MergedPrinter};
use crate::walk::{self, WalkOptions};

/// Options for a discovery run.
#[derive(Debug, Clone, Default)]
pub struct DiscoverOptions {
    /// Walk options (eligible extension, cancel flag).
    pub walk: WalkOptions,
    /// How printer paths are compared for deduplication.
    pub key_mode: KeyMode,
}

/// Result of a successful discovery run.
#[derive(Debug, Default)]
pub struct Discovery {
    /// Unique printers sorted by path.
    pub printers: Vec<MergedPrinter>,
    /// Directives found before merging.
    pub raw_count: usize,
    /// Directories listed, root included.
    pub dirs_visited: usize,
    /// Eligible files read.
    pub files_scanned: usize,
    /// Subtrees and files that were skipped.
    pub issues: Vec<ScanIssue>,
}

impl Discovery {
    /// Number of directives that were folded into an existing printer.
    #[must_use]
    pub const fn duplicates(&self) -> usize {
        self.raw_count.saturating_sub(self.printers.len())
    }
}

/// Discover every printer directive under `root`.
///
/// "Searched and found nothing" is `Ok` with no printers; "could not search"
/// is an `Err`.
///
/// # Errors
///
/// Returns a [`DiscoveryError`] if `root` cannot be listed or the walk was
/// cancelled.
pub fn discover(root: &Path, opts: &DiscoverOptions) -> Result<Discovery, DiscoveryError> {
    tracing::debug!("discovering under {}", dunce::simplified(root).display());
    let outcome = walk::walk(root, &opts.walk)?;
    let printers = merge::merge(&outcome.directives, opts.key_mode).into_sorted();

    Ok(Discovery {
        raw_count: outcome.directives.len(),
        printers,
        dirs_visited: outcome.dirs_visited,
        files_scanned: outcome.files_scanned,
        issues: outcome.issues,
    })
}
