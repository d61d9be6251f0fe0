//! Settings file for discovery and migration.
//!
//! Every field has a default, so an absent file or an empty section is valid.
//!
//! ```toml
//! [discovery]
//! extension = "txt"
//! case_insensitive_paths = false
//!
//! [source]
//! path = '\\{host}\NETLOGON'
//!
//! [destination]
//! path = '\\{host}\PrinterRepo'
//! file_name = "printers.txt"
//! clear_existing = true
//! line_ending = "crlf"
//!
//! [probe]
//! enabled = true
//! count = 1
//! timeout_secs = 2
//! ```
pub mod toml_loader;

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::merge::KeyMode;
use crate::report::LineEnding;
use crate::walk::DEFAULT_EXTENSION;

/// File name looked up in the working directory when `--config` is not given.
pub const DEFAULT_SETTINGS_FILE: &str = "printer-migrate.toml";

/// Placeholder replaced by a host name in path templates.
pub const HOST_PLACEHOLDER: &str = "{host}";

/// All settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// How script trees are searched.
    pub discovery: DiscoverySettings,
    /// Where the source host's script tree lives.
    pub source: SourceSettings,
    /// Where the canonical file is published.
    pub destination: DestinationSettings,
    /// Host reachability checks.
    pub probe: ProbeSettings,
}

/// `[discovery]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiscoverySettings {
    /// Extension of eligible script files.
    pub extension: String,
    /// Deduplicate printer paths ignoring case.
    pub case_insensitive_paths: bool,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            case_insensitive_paths: false,
        }
    }
}

impl DiscoverySettings {
    /// Key mode implied by `case_insensitive_paths`.
    #[must_use]
    pub const fn key_mode(&self) -> KeyMode {
        if self.case_insensitive_paths {
            KeyMode::CaseInsensitive
        } else {
            KeyMode::CaseSensitive
        }
    }
}

/// `[source]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceSettings {
    /// Root of the script tree; `{host}` is replaced by the source host.
    pub path: String,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            path: r"\\{host}\NETLOGON".to_string(),
        }
    }
}

/// `[destination]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DestinationSettings {
    /// Directory receiving the file; `{host}` is replaced by the destination host.
    pub path: String,
    /// Name of the published file.
    pub file_name: String,
    /// Remove everything already in the destination directory before writing.
    pub clear_existing: bool,
    /// Line terminator of the published file.
    pub line_ending: LineEnding,
}

impl Default for DestinationSettings {
    fn default() -> Self {
        Self {
            path: r"\\{host}\PrinterRepo".to_string(),
            file_name: "printers.txt".to_string(),
            clear_existing: true,
            line_ending: LineEnding::Crlf,
        }
    }
}

/// `[probe]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProbeSettings {
    /// Check that hosts answer before touching them.
    pub enabled: bool,
    /// Echo requests sent per host.
    pub count: u32,
    /// Seconds to wait for each reply.
    pub timeout_secs: u32,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            count: 1,
            timeout_secs: 2,
        }
    }
}

impl Settings {
    /// Load settings from `path`, falling back to defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or a path
    /// template lacks the `{host}` placeholder.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let settings: Self = toml_loader::load_config(path)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Resolve the settings file path from an optional override.
    #[must_use]
    pub fn path_or_default(path: Option<&Path>) -> PathBuf {
        path.map_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE), Path::to_path_buf)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (section, template) in [
            ("source", &self.source.path),
            ("destination", &self.destination.path),
        ] {
            if !template.contains(HOST_PLACEHOLDER) {
                return Err(ConfigError::InvalidTemplate {
                    section: section.to_string(),
                    template: template.clone(),
                });
            }
        }
        Ok(())
    }

    /// Root of the source host's script tree.
    #[must_use]
    pub fn source_root(&self, host: &str) -> PathBuf {
        expand(&self.source.path, host)
    }

    /// Directory on the destination host that receives the file.
    #[must_use]
    pub fn destination_dir(&self, host: &str) -> PathBuf {
        expand(&self.destination.path, host)
    }
}

fn expand(template: &str, host: &str) -> PathBuf {
    PathBuf::from(template.replace(HOST_PLACEHOLDER, host))
}
