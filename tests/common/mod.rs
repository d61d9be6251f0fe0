// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed tree of logon scripts and a fluent
// builder so each integration test can lay out its own share without
// repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use printer_migrate::config::Settings;
use printer_migrate::report::LineEnding;

/// A tree of printer scripts backed by a [`tempfile::TempDir`].
///
/// The directory is automatically deleted when dropped.
pub struct ScriptTree {
    /// Temporary directory holding the tree.
    pub dir: tempfile::TempDir,
}

impl ScriptTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    /// Path to the tree root.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write `contents` to `rel`, creating parent directories as needed.
    #[must_use]
    pub fn with_file(self, rel: &str, contents: &str) -> Self {
        let path = self.root().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        std::fs::write(&path, contents).expect("write script");
        self
    }

    /// Create an empty directory at `rel`.
    #[must_use]
    pub fn with_dir(self, rel: &str) -> Self {
        std::fs::create_dir_all(self.root().join(rel)).expect("create dir");
        self
    }

    /// Absolute path of `rel` inside the tree.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }
}

/// The three-file tree used throughout: the same printer installed plainly
/// at the top and as default one level down, and a second printer deeper.
pub fn three_file_tree() -> ScriptTree {
    ScriptTree::new()
        .with_file("a.txt", "REM logon script\n/i \\\\SRV1\\HP\n")
        .with_file("site/b.txt", "/id \\\\SRV1\\HP\n")
        .with_file("site/floor2/c.txt", "   /i \\\\SRV2\\Canon   \n")
}

/// Settings resolving `{host}` under `base`, writing LF files.
pub fn settings_under(base: &Path) -> Settings {
    let mut settings = Settings::default();
    settings.source.path = format!("{}/{{host}}/netlogon", base.display());
    settings.destination.path = format!("{}/{{host}}/repo", base.display());
    settings.destination.line_ending = LineEnding::Lf;
    settings
}
