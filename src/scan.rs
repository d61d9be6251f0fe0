//! Per-file directive extraction.
use std::path::Path;

use crate::directive::{self, RawDirective};
use crate::error::ScanIssue;

/// Apply the directive parser to every line of one file, in order.
///
/// Line numbers start at 1. Lines that do not parse are skipped silently.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use printer_migrate::scan::scan_lines;
///
/// let lines = ["REM office printers", "/i \\\\SRV1\\HP", "", "/id \\\\SRV1\\Canon"];
/// let found = scan_lines(Path::new("logon.txt"), lines);
/// assert_eq!(found.len(), 2);
/// assert_eq!(found[0].line_number, 2);
/// assert_eq!(found[1].line_number, 4);
/// ```
#[must_use]
pub fn scan_lines<I, S>(path: &Path, lines: I) -> Vec<RawDirective>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .enumerate()
        .filter_map(|(idx, line)| {
            let line = line.as_ref();
            let fields = directive::parse(line)?;
            Some(RawDirective {
                source: path.to_path_buf(),
                line_number: idx + 1,
                line: line.to_string(),
                trimmed: line.trim().to_string(),
                fields,
            })
        })
        .collect()
}

/// Read `path` and scan its lines.
///
/// The file is read in one call and its handle released before parsing, so
/// scanning thousands of files never holds more than one descriptor open.
///
/// # Errors
///
/// Returns [`ScanIssue::UnreadableFile`] if the file cannot be opened or read.
///
/// Bytes that are not UTF-8 (legacy code-page comments) become U+FFFD and
/// only affect their own line. A leading byte order mark is ignored.
pub fn scan_file(path: &Path) -> Result<Vec<RawDirective>, ScanIssue> {
    let bytes = std::fs::read(path).map_err(|source| ScanIssue::UnreadableFile {
        path: path.to_path_buf(),
        source,
    })?;
    let content = String::from_utf8_lossy(&bytes);
    // Notepad-saved scripts start with a byte order mark.
    let text = content.strip_prefix('\u{feff}').unwrap_or(&content);
    Ok(scan_lines(path, text.lines()))
}
