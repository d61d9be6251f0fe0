//! Recursive, depth-first collection of directives from a script tree.
//!
//! Traversal is pre-order: a directory's eligible files are scanned before
//! any of its subdirectories are entered. Within a directory, files and
//! subdirectories are taken in the order the platform's listing yields them,
//! which is not guaranteed to be stable and only matters for display and for
//! which sighting of a printer counts as the first.
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::directive::RawDirective;
use crate::error::{DiscoveryError, ScanIssue};
use crate::scan;

/// Default extension of script files that are scanned.
pub const DEFAULT_EXTENSION: &str = "txt";

/// Options controlling a walk.
#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// File extension (without the dot) of eligible files; compared ASCII case-insensitively.
    pub extension: String,
    /// When set and raised, the walk stops before visiting the next directory.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            cancel: None,
        }
    }
}

impl WalkOptions {
    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    fn is_eligible(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(&self.extension))
    }
}

/// Everything a walk produced.
#[derive(Debug, Default)]
pub struct WalkOutcome {
    /// Directives in traversal order.
    pub directives: Vec<RawDirective>,
    /// Directories and files that were skipped.
    pub issues: Vec<ScanIssue>,
    /// Number of directories listed successfully, root included.
    pub dirs_visited: usize,
    /// Number of eligible files read successfully.
    pub files_scanned: usize,
}

impl WalkOutcome {
    fn absorb(&mut self, other: Self) {
        self.directives.extend(other.directives);
        self.issues.extend(other.issues);
        self.dirs_visited += other.dirs_visited;
        self.files_scanned += other.files_scanned;
    }

    fn issue(&mut self, issue: ScanIssue) {
        tracing::warn!("{issue}");
        self.issues.push(issue);
    }
}

/// Walk `root` and collect every directive from its eligible files.
///
/// # Errors
///
/// Returns [`DiscoveryError::UnreachableRoot`] or
/// [`DiscoveryError::NotADirectory`] when the root itself cannot be searched,
/// and [`DiscoveryError::Cancelled`] when the cancel flag is raised. Problems
/// below the root are recorded in [`WalkOutcome::issues`] instead.
pub fn walk(root: &Path, opts: &WalkOptions) -> Result<WalkOutcome, DiscoveryError> {
    let metadata = std::fs::metadata(root).map_err(|source| DiscoveryError::UnreachableRoot {
        path: root.to_path_buf(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(DiscoveryError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(root).map_err(|source| DiscoveryError::UnreachableRoot {
        path: root.to_path_buf(),
        source,
    })?;
    visit_listing(root, entries, opts)
}

/// Visit a descendant directory, absorbing a listing failure as an issue.
fn visit_dir(dir: &Path, opts: &WalkOptions) -> Result<WalkOutcome, DiscoveryError> {
    match std::fs::read_dir(dir) {
        Ok(entries) => visit_listing(dir, entries, opts),
        Err(source) => {
            let mut outcome = WalkOutcome::default();
            outcome.issue(ScanIssue::UnreadableDirectory {
                path: dir.to_path_buf(),
                source,
            });
            Ok(outcome)
        }
    }
}

fn visit_listing(
    dir: &Path,
    entries: std::fs::ReadDir,
    opts: &WalkOptions,
) -> Result<WalkOutcome, DiscoveryError> {
    if opts.is_cancelled() {
        return Err(DiscoveryError::Cancelled);
    }
    tracing::trace!("visiting {}", dir.display());

    let mut outcome = WalkOutcome {
        dirs_visited: 1,
        ..WalkOutcome::default()
    };
    let mut files = Vec::new();
    let mut subdirs = Vec::new();

    for entry in entries {
        match entry {
            Ok(entry) => {
                let path = entry.path();
                if path.is_dir() {
                    subdirs.push(path);
                } else if opts.is_eligible(&path) {
                    files.push(path);
                }
            }
            Err(source) => outcome.issue(ScanIssue::UnreadableDirectory {
                path: dir.to_path_buf(),
                source,
            }),
        }
    }

    for file in files {
        match scan::scan_file(&file) {
            Ok(found) => {
                for d in &found {
                    tracing::debug!(
                        "{}:{}: {}",
                        d.source.display(),
                        d.line_number,
                        d.trimmed
                    );
                }
                outcome.files_scanned += 1;
                outcome.directives.extend(found);
            }
            Err(issue) => outcome.issue(issue),
        }
    }

    for sub in subdirs {
        let child = visit_dir(&sub, opts)?;
        outcome.absorb(child);
    }

    Ok(outcome)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use std::fs;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn printer_paths(outcome: &WalkOutcome) -> Vec<&str> {
        outcome
            .directives
            .iter()
            .map(|d| d.fields.printer_path.as_str())
            .collect()
    }

    #[test]
    fn empty_root_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = walk(dir.path(), &WalkOptions::default()).unwrap();
        assert!(outcome.directives.is_empty());
        assert!(outcome.issues.is_empty());
        assert_eq!(outcome.dirs_visited, 1);
        assert_eq!(outcome.files_scanned, 0);
    }

    #[test]
    fn missing_root_is_unreachable() {
        let dir = tempfile::tempdir().unwrap();
        let err = walk(&dir.path().join("nope"), &WalkOptions::default()).unwrap_err();
        assert!(matches!(err, DiscoveryError::UnreachableRoot { .. }));
    }

    #[test]
    fn file_root_is_not_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.txt", "");
        let err = walk(&dir.path().join("a.txt"), &WalkOptions::default()).unwrap_err();
        assert!(matches!(err, DiscoveryError::NotADirectory { .. }));
    }

    #[test]
    fn files_before_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        // "a" sorts before "z.txt" but its contents must come after.
        write(dir.path(), "a/inner.txt", r"/i \\SRV\Inner");
        write(dir.path(), "z.txt", r"/i \\SRV\Outer");
        let outcome = walk(dir.path(), &WalkOptions::default()).unwrap();
        assert_eq!(printer_paths(&outcome), [r"\\SRV\Outer", r"\\SRV\Inner"]);
        assert_eq!(outcome.dirs_visited, 2);
        assert_eq!(outcome.files_scanned, 2);
    }

    #[test]
    fn recurses_into_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "sites/east/floor1/logon.txt", r"/id \\SRV\Deep");
        let outcome = walk(dir.path(), &WalkOptions::default()).unwrap();
        assert_eq!(printer_paths(&outcome), [r"\\SRV\Deep"]);
        assert_eq!(outcome.dirs_visited, 4);
    }

    #[test]
    fn only_eligible_extension_is_scanned() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "logon.bat", r"/i \\SRV\Bat");
        write(dir.path(), "notes", r"/i \\SRV\NoExt");
        write(dir.path(), "upper.TXT", r"/i \\SRV\Upper");
        let outcome = walk(dir.path(), &WalkOptions::default()).unwrap();
        assert_eq!(printer_paths(&outcome), [r"\\SRV\Upper"]);
    }

    #[test]
    fn custom_extension() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "logon.cfg", r"/i \\SRV\Cfg");
        write(dir.path(), "logon.txt", r"/i \\SRV\Txt");
        let opts = WalkOptions {
            extension: "cfg".to_string(),
            ..WalkOptions::default()
        };
        let outcome = walk(dir.path(), &opts).unwrap();
        assert_eq!(printer_paths(&outcome), [r"\\SRV\Cfg"]);
    }

    #[test]
    fn non_utf8_file_still_contributes_its_directives() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("legacy.txt"),
            b"REM \xc9tage 2\r\n/id \\\\SRV1\\HP\r\n",
        )
        .unwrap();
        write(dir.path(), "sub/good.txt", r"/i \\SRV\Good");
        let outcome = walk(dir.path(), &WalkOptions::default()).unwrap();
        assert_eq!(printer_paths(&outcome), [r"\\SRV1\HP", r"\\SRV\Good"]);
        assert!(outcome.issues.is_empty());
        assert_eq!(outcome.files_scanned, 2);
    }

    #[cfg(unix)]
    #[test]
    fn dangling_script_link_is_recorded_and_siblings_continue() {
        let dir = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone.txt"), dir.path().join("bad.txt"))
            .unwrap();
        write(dir.path(), "sub/good.txt", r"/i \\SRV\Good");
        let outcome = walk(dir.path(), &WalkOptions::default()).unwrap();
        assert_eq!(printer_paths(&outcome), [r"\\SRV\Good"]);
        assert_eq!(outcome.issues.len(), 1);
        assert!(matches!(
            outcome.issues[0],
            ScanIssue::UnreadableFile { .. }
        ));
    }

    #[test]
    fn raised_cancel_flag_stops_the_walk() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.txt", r"/i \\SRV\A");
        let opts = WalkOptions {
            cancel: Some(Arc::new(AtomicBool::new(true))),
            ..WalkOptions::default()
        };
        assert!(matches!(
            walk(dir.path(), &opts),
            Err(DiscoveryError::Cancelled)
        ));
    }

    #[cfg(unix)]
    #[test]
    fn unlistable_subdirectory_is_recorded() {
        use std::os::unix::fs::PermissionsExt as _;

        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "locked/hidden.txt", r"/i \\SRV\Hidden");
        write(dir.path(), "open/seen.txt", r"/i \\SRV\Seen");
        let locked = dir.path().join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let listable = fs::read_dir(&locked).is_ok();
        let outcome = walk(dir.path(), &WalkOptions::default()).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        // Running as root bypasses permission bits; nothing to assert then.
        if listable {
            return;
        }
        assert_eq!(printer_paths(&outcome), [r"\\SRV\Seen"]);
        assert_eq!(outcome.issues.len(), 1);
        assert!(matches!(
            outcome.issues[0],
            ScanIssue::UnreadableDirectory { .. }
        ));
    }
}
