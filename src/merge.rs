//! Folding raw directives into one canonical record per printer.
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::PathBuf;

use serde::Serialize;

use crate::directive::{CommandKind, RawDirective};

/// How printer paths are compared when deciding whether two directives name
/// the same printer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyMode {
    /// Exact string equality.
    #[default]
    CaseSensitive,
    /// Equality after Unicode lowercasing, matching how Windows resolves UNC
    /// paths. The spelling of the first sighting is kept for output.
    CaseInsensitive,
}

impl KeyMode {
    fn key(self, path: &str) -> String {
        match self {
            Self::CaseSensitive => path.to_string(),
            Self::CaseInsensitive => path.to_lowercase(),
        }
    }
}

/// Where a printer was first seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
    /// File containing the directive.
    pub file: PathBuf,
    /// 1-based line number.
    pub line: usize,
}

/// Canonical record for one unique printer path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergedPrinter {
    /// Printer path as first written, e.g. `\\SRV1\HP`.
    pub printer_path: String,
    /// Print-server name from the first sighting.
    pub server: String,
    /// Printer name from the first sighting.
    pub printer: String,
    /// Resolved command; upgraded to a default install if any sighting asked for one.
    pub kind: CommandKind,
    /// How many directives named this printer, across all files.
    pub occurrences: usize,
    /// Location of the first sighting.
    pub first_seen: SourceLocation,
}

impl MergedPrinter {
    fn first(d: &RawDirective) -> Self {
        Self {
            printer_path: d.fields.printer_path.clone(),
            server: d.fields.server.clone(),
            printer: d.fields.printer.clone(),
            kind: d.fields.kind,
            occurrences: 1,
            first_seen: SourceLocation {
                file: d.source.clone(),
                line: d.line_number,
            },
        }
    }

    fn sighted_again(&mut self, kind: CommandKind) {
        self.occurrences += 1;
        self.kind = self.kind.upgrade(kind);
    }
}

/// Printers keyed by their (mode-normalised) path.
#[derive(Debug, Default)]
pub struct MergedSet {
    mode: KeyMode,
    by_key: HashMap<String, MergedPrinter>,
}

impl MergedSet {
    /// Number of unique printers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    /// Return `true` if no printer was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Look up a printer by path, honouring the key mode used to build the set.
    #[must_use]
    pub fn get(&self, printer_path: &str) -> Option<&MergedPrinter> {
        self.by_key.get(&self.mode.key(printer_path))
    }

    /// Extract all printers sorted by path (ordinal, case-sensitive, ascending).
    #[must_use]
    pub fn into_sorted(self) -> Vec<MergedPrinter> {
        let mut printers: Vec<MergedPrinter> = self.by_key.into_values().collect();
        printers.sort_by(|a, b| a.printer_path.cmp(&b.printer_path));
        printers
    }
}

/// Fold directives, in encounter order, into one record per printer path.
///
/// The first sighting fixes the server and printer names and the
/// `first_seen` location. Later sightings bump the occurrence count and may
/// upgrade an install-only printer to install-and-set-default, never the
/// reverse.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use printer_migrate::directive::CommandKind;
/// use printer_migrate::merge::{KeyMode, merge};
/// use printer_migrate::scan::scan_lines;
///
/// let raw = scan_lines(
///     Path::new("logon.txt"),
///     ["/i \\\\SRV1\\HP", "/id \\\\SRV1\\HP", "/i \\\\SRV2\\Canon"],
/// );
/// let printers = merge(&raw, KeyMode::CaseSensitive).into_sorted();
/// assert_eq!(printers.len(), 2);
/// assert_eq!(printers[0].kind, CommandKind::InstallAndSetDefault);
/// assert_eq!(printers[0].occurrences, 2);
/// ```
#[must_use]
pub fn merge<'a, I>(records: I, mode: KeyMode) -> MergedSet
where
    I: IntoIterator<Item = &'a RawDirective>,
{
    let mut set = MergedSet {
        mode,
        by_key: HashMap::new(),
    };
    for d in records {
        match set.by_key.entry(mode.key(&d.fields.printer_path)) {
            Entry::Occupied(mut existing) => existing.get_mut().sighted_again(d.fields.kind),
            Entry::Vacant(slot) => {
                slot.insert(MergedPrinter::first(d));
            }
        }
    }
    set
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::directive::DirectiveFields;
    use crate::directive::split_share_path;
    use proptest::prelude::*;
    use std::path::Path;

    fn raw(file: &str, line: usize, kind: CommandKind, path: &str) -> RawDirective {
        let (server, printer) = split_share_path(path).unwrap_or_default();
        RawDirective {
            source: PathBuf::from(file),
            line_number: line,
            line: format!("{} {path}", kind.token()),
            trimmed: format!("{} {path}", kind.token()),
            fields: DirectiveFields {
                kind,
                printer_path: path.to_string(),
                server: server.to_string(),
                printer: printer.to_string(),
            },
        }
    }

    use CommandKind::{InstallAndSetDefault as SetDefault, InstallOnly as Only};

    #[test]
    fn three_file_scenario() {
        let records = [
            raw("a.txt", 1, Only, r"\\SRV1\HP"),
            raw("b.txt", 1, SetDefault, r"\\SRV1\HP"),
            raw("c.txt", 1, Only, r"\\SRV2\Canon"),
        ];
        let printers = merge(&records, KeyMode::CaseSensitive).into_sorted();
        assert_eq!(printers.len(), 2);
        assert_eq!(printers[0].printer_path, r"\\SRV1\HP");
        assert_eq!(printers[0].kind, SetDefault);
        assert_eq!(printers[0].occurrences, 2);
        assert_eq!(printers[1].printer_path, r"\\SRV2\Canon");
        assert_eq!(printers[1].kind, Only);
        assert_eq!(printers[1].occurrences, 1);
    }

    #[test]
    fn default_never_downgrades() {
        let records = [
            raw("a.txt", 1, SetDefault, r"\\SRV1\HP"),
            raw("a.txt", 2, Only, r"\\SRV1\HP"),
            raw("a.txt", 3, Only, r"\\SRV1\HP"),
        ];
        let set = merge(&records, KeyMode::CaseSensitive);
        let hp = set.get(r"\\SRV1\HP").unwrap();
        assert_eq!(hp.kind, SetDefault);
        assert_eq!(hp.occurrences, 3);
    }

    #[test]
    fn first_sighting_fixes_names_and_location() {
        let records = [
            raw("first.txt", 7, Only, r"\\SRV1\HP"),
            raw("second.txt", 2, SetDefault, r"\\SRV1\HP"),
        ];
        let printers = merge(&records, KeyMode::CaseSensitive).into_sorted();
        assert_eq!(printers[0].server, "SRV1");
        assert_eq!(printers[0].printer, "HP");
        assert_eq!(printers[0].first_seen.file, Path::new("first.txt"));
        assert_eq!(printers[0].first_seen.line, 7);
    }

    #[test]
    fn case_sensitive_keeps_case_variants_apart() {
        let records = [
            raw("a.txt", 1, Only, r"\\SRV1\HP"),
            raw("a.txt", 2, Only, r"\\srv1\hp"),
        ];
        assert_eq!(merge(&records, KeyMode::CaseSensitive).len(), 2);
    }

    #[test]
    fn case_insensitive_merges_case_variants_keeping_first_spelling() {
        let records = [
            raw("a.txt", 1, Only, r"\\srv1\hp"),
            raw("a.txt", 2, SetDefault, r"\\SRV1\HP"),
        ];
        let set = merge(&records, KeyMode::CaseInsensitive);
        assert_eq!(set.len(), 1);
        let printers = set.into_sorted();
        assert_eq!(printers[0].printer_path, r"\\srv1\hp");
        assert_eq!(printers[0].kind, SetDefault);
        assert_eq!(printers[0].occurrences, 2);
    }

    #[test]
    fn sort_is_ordinal() {
        let records = [
            raw("a.txt", 1, Only, r"\\srv\a"),
            raw("a.txt", 2, Only, r"\\SRV\b"),
            raw("a.txt", 3, Only, r"\\SRV\B"),
        ];
        let paths: Vec<String> = merge(&records, KeyMode::CaseSensitive)
            .into_sorted()
            .into_iter()
            .map(|p| p.printer_path)
            .collect();
        assert_eq!(paths, [r"\\SRV\B", r"\\SRV\b", r"\\srv\a"]);
    }

    #[test]
    fn empty_input_empty_set() {
        let none: Vec<RawDirective> = Vec::new();
        let set = merge(&none, KeyMode::CaseSensitive);
        assert!(set.is_empty());
        assert!(set.into_sorted().is_empty());
    }

    fn record_strategy() -> impl Strategy<Value = Vec<RawDirective>> {
        let one = (
            prop::sample::select(vec![r"\\S1\A", r"\\S1\B", r"\\S2\A", r"\\s1\a"]),
            any::<bool>(),
        );
        prop::collection::vec(one, 0..24).prop_map(|items| {
            items
                .into_iter()
                .enumerate()
                .map(|(i, (path, default))| {
                    let kind = if default { SetDefault } else { Only };
                    raw("f.txt", i + 1, kind, path)
                })
                .collect()
        })
    }

    fn kinds(records: &[RawDirective]) -> Vec<(String, CommandKind)> {
        merge(records, KeyMode::CaseSensitive)
            .into_sorted()
            .into_iter()
            .map(|p| (p.printer_path, p.kind))
            .collect()
    }

    proptest! {
        #[test]
        fn final_kind_is_order_independent(
            (records, shuffled) in record_strategy()
                .prop_flat_map(|r| (Just(r.clone()), Just(r).prop_shuffle()))
        ) {
            prop_assert_eq!(kinds(&records), kinds(&shuffled));
        }

        #[test]
        fn default_sighting_always_wins(records in record_strategy()) {
            let set = merge(&records, KeyMode::CaseSensitive);
            for r in &records {
                let merged = set.get(&r.fields.printer_path).unwrap();
                if r.fields.kind == SetDefault {
                    prop_assert_eq!(merged.kind, SetDefault);
                }
            }
        }

        #[test]
        fn occurrences_sum_to_input_length(records in record_strategy()) {
            let total: usize = merge(&records, KeyMode::CaseSensitive)
                .into_sorted()
                .iter()
                .map(|p| p.occurrences)
                .sum();
            prop_assert_eq!(total, records.len());
        }

        #[test]
        fn sorted_output_is_strictly_ascending(records in record_strategy()) {
            let printers = merge(&records, KeyMode::CaseSensitive).into_sorted();
            for pair in printers.windows(2) {
                prop_assert!(pair[0].printer_path < pair[1].printer_path);
            }
        }
    }
}
