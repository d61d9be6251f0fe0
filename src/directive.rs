//! Printer-install directive parsing.
//!
//! A directive is one line of a logon script of the form
//!
//! ```text
//! /i  \\PrintServer\PrinterName     install the queue
//! /id \\PrintServer\PrinterName     install and make it the default
//! ```
//!
//! Tokens are matched case-insensitively. Anything else on the line after the
//! first whitespace following the path is ignored.
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// Line prefixes (after trimming) that mark a line as commentary.
pub const COMMENT_MARKERS: &[&str] = &["REM", "#", "===", "NOTE:"];

/// What a directive asks the logon script to do with a printer queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    /// `/i`: install the queue.
    InstallOnly,
    /// `/id`: install the queue and make it the default printer.
    InstallAndSetDefault,
}

impl CommandKind {
    /// The install token written in front of the printer path.
    ///
    /// # Examples
    ///
    /// ```
    /// use printer_migrate::directive::CommandKind;
    ///
    /// assert_eq!(CommandKind::InstallOnly.token(), "/i");
    /// assert_eq!(CommandKind::InstallAndSetDefault.token(), "/id");
    /// ```
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::InstallOnly => "/i",
            Self::InstallAndSetDefault => "/id",
        }
    }

    /// Combine two sightings of the same printer. Upgrade-only: once a
    /// printer is a default it stays one.
    #[must_use]
    pub const fn upgrade(self, other: Self) -> Self {
        match (self, other) {
            (Self::InstallOnly, Self::InstallOnly) => Self::InstallOnly,
            _ => Self::InstallAndSetDefault,
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Fields extracted from a single directive line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveFields {
    /// Install token found on the line.
    pub kind: CommandKind,
    /// Full shared-resource path, e.g. `\\SRV1\HP`.
    pub printer_path: String,
    /// Host segment of the path (`SRV1`); empty if the path could not be split.
    pub server: String,
    /// Resource segment of the path (`HP`); empty if the path could not be split.
    pub printer: String,
}

/// One directive found in a file, with its location. Never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDirective {
    /// File the directive was read from.
    pub source: PathBuf,
    /// 1-based line number within `source`.
    pub line_number: usize,
    /// The line exactly as read.
    pub line: String,
    /// The line with surrounding whitespace removed.
    pub trimmed: String,
    /// Parsed fields.
    pub fields: DirectiveFields,
}

/// Decide whether `line` is a printer-install directive and extract its fields.
///
/// Returns `None` for blank lines, commentary lines (see [`COMMENT_MARKERS`]),
/// and lines that do not match the directive shape. None of these are errors.
///
/// # Examples
///
/// ```
/// use printer_migrate::directive::{CommandKind, parse};
///
/// let fields = parse("  /ID \\\\PRINT01\\Floor2-Color  ").unwrap();
/// assert_eq!(fields.kind, CommandKind::InstallAndSetDefault);
/// assert_eq!(fields.printer_path, "\\\\PRINT01\\Floor2-Color");
/// assert_eq!(fields.server, "PRINT01");
/// assert_eq!(fields.printer, "Floor2-Color");
///
/// assert!(parse("REM /i \\\\PRINT01\\Old").is_none());
/// ```
#[must_use]
pub fn parse(line: &str) -> Option<DirectiveFields> {
    let trimmed = line.trim();
    if trimmed.is_empty() || is_comment(trimmed) {
        return None;
    }

    let (kind, rest) = parse_token(trimmed)?;
    let printer_path = match_share_path(rest)?;

    let (server, printer) = split_share_path(printer_path)
        .map_or_else(Default::default, |(s, p)| (s.to_string(), p.to_string()));

    Some(DirectiveFields {
        kind,
        printer_path: printer_path.to_string(),
        server,
        printer,
    })
}

/// Return `true` if the trimmed line starts with a commentary marker.
fn is_comment(trimmed: &str) -> bool {
    COMMENT_MARKERS.iter().any(|m| trimmed.starts_with(m))
}

/// Match `/i` or `/id` (any case) followed by at least one whitespace
/// character. Returns the kind and the text after the whitespace run.
fn parse_token(s: &str) -> Option<(CommandKind, &str)> {
    let rest = s.strip_prefix('/')?;
    let rest = rest
        .strip_prefix('i')
        .or_else(|| rest.strip_prefix('I'))?;

    let (kind, rest) = match rest.strip_prefix(['d', 'D']) {
        Some(after) if after.starts_with(char::is_whitespace) => {
            (CommandKind::InstallAndSetDefault, after)
        }
        _ => (CommandKind::InstallOnly, rest),
    };

    let after_ws = rest.trim_start();
    (after_ws.len() < rest.len()).then_some((kind, after_ws))
}

/// Match the leading `\\host\resource` of `s`, where the host holds at least
/// one non-backslash character and the resource is the run of non-whitespace
/// characters after the separating backslash.
fn match_share_path(s: &str) -> Option<&str> {
    let after_prefix = s.strip_prefix(r"\\")?;
    let host_len = after_prefix.find('\\')?;
    if host_len == 0 {
        return None;
    }
    let resource_start = 2 + host_len + 1;
    let resource = s.get(resource_start..)?;
    let resource_len = resource.find(char::is_whitespace).unwrap_or(resource.len());
    if resource_len == 0 {
        return None;
    }
    s.get(..resource_start + resource_len)
}

/// Split a shared-resource path into its host and resource segments.
///
/// The resource is everything after the first backslash following the host,
/// verbatim, so nested paths keep their inner backslashes.
///
/// # Examples
///
/// ```
/// use printer_migrate::directive::split_share_path;
///
/// assert_eq!(split_share_path("\\\\SRV\\Queues\\HP"), Some(("SRV", "Queues\\HP")));
/// assert_eq!(split_share_path("SRV\\HP"), None);
/// ```
#[must_use]
pub fn split_share_path(path: &str) -> Option<(&str, &str)> {
    let rest = path.strip_prefix(r"\\")?;
    let (host, resource) = rest.split_once('\\')?;
    (!host.is_empty() && !resource.is_empty()).then_some((host, resource))
}
