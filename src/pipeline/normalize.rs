//! Whitespace normalisation of extracted TSV.
//!
//! Stream-mode extraction pads short rows with empty cells, quotes empty
//! leading fields and sometimes leaves runs of spaces where glyph gaps were
//! uneven. Four regex rules, applied to the whole text in this exact order,
//! reduce that to one tab between fields and no empty cells at either end of
//! a line:
//!
//! 1. Remove every `""`
//! 2. Collapse each run of spaces/tabs into a single tab
//! 3. Drop a tab run directly before a newline
//! 4. Drop a tab run directly after a newline
//!
//! Rule 1 must run first: removing `""` from `"\t""\tb"` is what exposes the
//! `\t\t` that rule 2 collapses. The rules are idempotent as a whole, so
//! normalising an already-normalised file leaves it unchanged.

use crate::error::Pdf2TsvError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tracing::debug;

/// Apply all four normalisation rules to TSV text.
pub fn normalize_tsv(input: &str) -> String {
    let s = remove_empty_quotes(input);
    let s = collapse_blank_runs(&s);
    let s = strip_trailing_cells(&s);
    strip_leading_cells(&s)
}

/// Normalise the file at `path` in place.
///
/// The whole file is read into memory, transformed, and written back over
/// the original. Returns the number of bytes removed.
pub fn normalize_file(path: impl AsRef<Path>) -> Result<usize, Pdf2TsvError> {
    let path = path.as_ref();

    let contents = std::fs::read_to_string(path)
        .map_err(|e| Pdf2TsvError::from_read(path.to_path_buf(), e))?;

    let normalized = normalize_tsv(&contents);

    std::fs::write(path, &normalized).map_err(|e| Pdf2TsvError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    let removed = contents.len() - normalized.len();
    debug!("Normalised {}: {} bytes removed", path.display(), removed);
    Ok(removed)
}

// ── Rule 1: Remove empty-quoted fields ───────────────────────────────────────

fn remove_empty_quotes(input: &str) -> String {
    input.replace("\"\"", "")
}

// ── Rule 2: Collapse space/tab runs into one tab ─────────────────────────────

static RE_BLANK_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());

fn collapse_blank_runs(input: &str) -> String {
    RE_BLANK_RUN.replace_all(input, "\t").into_owned()
}

// ── Rule 3: Strip empty cells at line end ────────────────────────────────────

static RE_TRAILING_TABS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\t+\n").unwrap());

fn strip_trailing_cells(input: &str) -> String {
    RE_TRAILING_TABS.replace_all(input, "\n").into_owned()
}

// ── Rule 4: Strip empty cells at line start ──────────────────────────────────

static RE_LEADING_TABS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\t+").unwrap());

fn strip_leading_cells(input: &str) -> String {
    RE_LEADING_TABS.replace_all(input, "\n").into_owned()
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_empty_quotes() {
        assert_eq!(remove_empty_quotes("\"\"\tx\t\"\""), "\tx\t");
        // Odd runs keep one quote.
        assert_eq!(remove_empty_quotes("a\"\"\"b"), "a\"b");
    }

    #[test]
    fn test_collapse_blank_runs() {
        assert_eq!(collapse_blank_runs("a  \t b\t\t\tc"), "a\tb\tc");
        assert_eq!(collapse_blank_runs("New York"), "New\tYork");
    }

    #[test]
    fn test_strip_trailing_cells() {
        assert_eq!(strip_trailing_cells("a\tb\t\t\nc\t\n"), "a\tb\nc\n");
    }

    #[test]
    fn test_strip_leading_cells() {
        assert_eq!(strip_leading_cells("a\n\t\tb\n\tc"), "a\nb\nc");
    }

    #[test]
    fn test_collapses_tab_runs_and_edge_cells() {
        assert_eq!(normalize_tsv("a\t\t\tb\n\t\tc\td\t\n"), "a\tb\nc\td\n");
    }

    #[test]
    fn test_empty_quotes_removed_before_collapsing() {
        assert_eq!(normalize_tsv("a\t\"\"\tb\n"), "a\tb\n");
    }

    #[test]
    fn test_padded_extractor_rows() {
        // Row padding as the TSV writer produces it.
        let raw = "\"\"\tName\t\tScore\t\n001\tAnn  Lee\t\t91\t\n\"\"\t\t\tfootnote\n";
        assert_eq!(
            normalize_tsv(raw),
            "\tName\tScore\n001\tAnn\tLee\t91\nfootnote\n"
        );
    }

    #[test]
    fn test_first_line_leading_tab_is_kept() {
        // Rule 4 needs a preceding newline; the very first line has none.
        assert_eq!(normalize_tsv("\t\ta\n\tb\n"), "\ta\nb\n");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "a\t\t\tb\n\t\tc\td\t\n",
            "\"\"\t\"\"\"x\t \n\n\t\t\n y",
            "plain\ttext\n",
            "",
        ];
        for input in inputs {
            let once = normalize_tsv(input);
            assert_eq!(normalize_tsv(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn test_normalize_file_rewrites_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tsv");
        std::fs::write(&path, "a\t\t\tb\n\t\tc\td\t\n").unwrap();

        let removed = normalize_file(&path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\tb\nc\td\n");
        assert_eq!(removed, 5);
    }

    #[test]
    fn test_normalize_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = normalize_file(dir.path().join("nope.tsv")).unwrap_err();
        assert!(matches!(err, Pdf2TsvError::FileNotFound { .. }));
    }
}
