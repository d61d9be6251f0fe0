//! Domain-specific error types for the printer migration engine.
//!
//! Library modules return the typed errors below; command handlers at the CLI
//! boundary convert them to [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! DiscoveryError — the whole discovery run failed (root unreachable, cancelled)
//! ScanIssue      — one directory or file was skipped; the run continues
//! ConfigError    — settings file could not be read or is invalid
//! MigrateError   — an orchestration step failed
//! ```

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure of an entire discovery run.
///
/// Only these conditions abort a walk; everything else is absorbed into
/// [`ScanIssue`]s alongside a best-effort result.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// The starting directory cannot be opened at all.
    #[error("cannot open root directory {}: {source}", path.display())]
    UnreachableRoot {
        /// Root that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The root exists but is not a directory.
    #[error("root path {} is not a directory", path.display())]
    NotADirectory {
        /// Root that was requested.
        path: PathBuf,
    },

    /// The caller raised its cancel flag between directory visits.
    #[error("discovery cancelled")]
    Cancelled,
}

/// A recoverable problem encountered while walking a tree.
#[derive(Error, Debug)]
pub enum ScanIssue {
    /// A descendant directory could not be listed; its subtree contributes nothing.
    #[error("cannot list directory {}: {source}", path.display())]
    UnreadableDirectory {
        /// Directory that could not be listed.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A candidate text file could not be read; it contributes nothing.
    #[error("cannot read file {}: {source}", path.display())]
    UnreadableFile {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

impl ScanIssue {
    /// Path of the directory or file the issue refers to.
    #[must_use]
    pub const fn path(&self) -> &PathBuf {
        match self {
            Self::UnreadableDirectory { path, .. } | Self::UnreadableFile { path, .. } => path,
        }
    }
}

/// Errors that arise from loading the settings file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The settings file exists but could not be read.
    #[error("IO error reading config file {}: {source}", path.display())]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The settings file is not valid TOML or has unknown values.
    #[error("invalid TOML in {}: {source}", path.display())]
    Parse {
        /// Path to the offending file.
        path: PathBuf,
        /// Underlying parse error.
        source: toml::de::Error,
    },

    /// A host path template lacks the `{host}` placeholder.
    #[error("path template for [{section}] must contain {{host}}: {template}")]
    InvalidTemplate {
        /// Settings section holding the template (`source` or `destination`).
        section: String,
        /// The template as written.
        template: String,
    },
}

/// Role a host plays in a migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostRole {
    /// Host whose script tree is searched.
    Source,
    /// Host that receives the canonical printer file.
    Destination,
}

impl std::fmt::Display for HostRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source => write!(f, "source"),
            Self::Destination => write!(f, "destination"),
        }
    }
}

/// Errors that stop a migration run.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// No host name was supplied or entered.
    #[error("no {0} host given")]
    MissingHost(HostRole),

    /// The reachability probe failed for a host.
    #[error("{role} host '{host}' is not reachable")]
    Unreachable {
        /// Which side of the migration.
        role: HostRole,
        /// Host name that was probed.
        host: String,
    },

    /// Ctrl-C arrived; the named step did not complete and nothing after it ran.
    #[error("interrupted at step '{step}'")]
    Interrupted {
        /// Step that was about to run or was running.
        step: String,
    },

    /// Discovery on the source tree failed.
    #[error("discovery failed: {0}")]
    Discovery(#[from] DiscoveryError),

    /// The destination's prior contents could not be removed.
    #[error("cannot clear destination {}: {source}", path.display())]
    ClearDestination {
        /// Destination directory or entry that could not be cleared.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The rendered document could not be written.
    #[error("cannot write {}: {source}", path.display())]
    WriteOutput {
        /// Output file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn unreachable_root_display_names_path() {
        let e = DiscoveryError::UnreachableRoot {
            path: PathBuf::from("/srv/netlogon"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        assert!(e.to_string().contains("/srv/netlogon"));
        assert!(e.to_string().starts_with("cannot open root directory"));
    }

    #[test]
    fn unreachable_root_has_source() {
        use std::error::Error as StdError;
        let e = DiscoveryError::UnreachableRoot {
            path: PathBuf::from("/x"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(e.source().is_some());
    }

    #[test]
    fn scan_issue_path_accessor() {
        let e = ScanIssue::UnreadableFile {
            path: PathBuf::from("a/b.txt"),
            source: io::Error::new(io::ErrorKind::InvalidData, "bad utf-8"),
        };
        assert_eq!(e.path(), &PathBuf::from("a/b.txt"));
    }

    #[test]
    fn invalid_template_display() {
        let e = ConfigError::InvalidTemplate {
            section: "source".to_string(),
            template: "\\\\server\\share".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "path template for [source] must contain {host}: \\\\server\\share"
        );
    }

    #[test]
    fn unreachable_host_display() {
        let e = MigrateError::Unreachable {
            role: HostRole::Destination,
            host: "PRINT02".to_string(),
        };
        assert_eq!(e.to_string(), "destination host 'PRINT02' is not reachable");
    }

    #[test]
    fn migrate_error_from_discovery_error() {
        let e: MigrateError = DiscoveryError::Cancelled.into();
        assert_eq!(e.to_string(), "discovery failed: discovery cancelled");
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn all_error_types_are_send_sync() {
        assert_send_sync::<DiscoveryError>();
        assert_send_sync::<ScanIssue>();
        assert_send_sync::<ConfigError>();
        assert_send_sync::<MigrateError>();
    }

    #[test]
    fn discovery_error_converts_to_anyhow() {
        let _anyhow_err: anyhow::Error = DiscoveryError::Cancelled.into();
    }
}
