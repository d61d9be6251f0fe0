//! Rendering the canonical printer repository file.
use std::fmt::Write as _;

use serde::Deserialize;

use crate::merge::MergedPrinter;

/// Boilerplate at the top of every printer repository file.
pub const HEADER: &[&str] = &[
    "Printer queue repository file.",
    "Enter each printer on a separate line.",
    "",
    "Line Format:                      -Leading and trailing spaces ok, no quotes",
    r"\\PrintServer\PrinterName         -Skip",
    r"#/i \\PrintServer\PrinterName     -Install (omit #)",
    r"#/id \\PrintServer\PrinterName    -Install and make default (omit #)",
    "",
    "NOTE: DO NOT use the # in the format: used here so the examples do not install.",
    SEPARATOR,
    "Papercut Printer",
];

/// Rule closing the header and the printer list.
pub const SEPARATOR: &str =
    "===========================================================================================";

/// Line terminator used when rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// `\n`
    #[default]
    Lf,
    /// `\r\n`, as expected by Windows logon scripts.
    Crlf,
}

impl LineEnding {
    /// The terminator characters.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::Crlf => "\r\n",
        }
    }
}

/// Render printers, in the order given, with `\n` line endings.
///
/// No filtering, sorting or deduplication happens here; the same input always
/// produces the same bytes.
///
/// # Examples
///
/// ```
/// use printer_migrate::report::{SEPARATOR, render};
///
/// let doc = render(&[]);
/// assert!(doc.starts_with("Printer queue repository file.\n"));
/// assert!(doc.ends_with(&format!("Papercut Printer\n{SEPARATOR}\n")));
/// ```
#[must_use]
pub fn render(printers: &[MergedPrinter]) -> String {
    render_with(printers, LineEnding::Lf)
}

/// Render printers with an explicit line ending.
#[must_use]
pub fn render_with(printers: &[MergedPrinter], eol: LineEnding) -> String {
    let eol = eol.as_str();
    let mut out = String::new();
    for line in HEADER {
        out.push_str(line);
        out.push_str(eol);
    }
    for p in printers {
        let _ = write!(out, "{} {}{eol}", p.kind.token(), p.printer_path);
    }
    out.push_str(SEPARATOR);
    out.push_str(eol);
    out
}
