//! TSV serialisation of extracted tables.
//!
//! Writing follows the minimal-quoting tab-delimited dialect table
//! extractors traditionally emit: a field is quoted only when it contains a
//! tab, a quote or a line break, and an empty *first* field is written as
//! `""` so a row never starts with a bare delimiter. Those `""` artefacts are
//! exactly what [`super::normalize`] strips afterwards.

use crate::error::Pdf2TsvError;
use crate::output::Table;
use std::path::Path;

/// Serialise every table, in order, as one block of TSV rows.
pub fn format_tables(tables: &[Table]) -> String {
    let mut out = String::new();
    for table in tables {
        for row in &table.rows {
            write_row(&mut out, row);
        }
    }
    out
}

fn write_row(out: &mut String, row: &[String]) {
    for (i, field) in row.iter().enumerate() {
        if i > 0 {
            out.push('\t');
        }
        write_field(out, field, i == 0);
    }
    out.push('\n');
}

fn write_field(out: &mut String, field: &str, first: bool) {
    let needs_quotes = (first && field.is_empty())
        || field.contains(['\t', '"', '\n', '\r']);

    if needs_quotes {
        out.push('"');
        out.push_str(&field.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(field);
    }
}

/// Split normalised TSV text into rows of fields.
///
/// Blank lines are skipped; a trailing `\r` on a line is ignored.
pub fn parse_tsv(text: &str) -> Vec<Vec<String>> {
    text.lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.is_empty())
        .map(|line| line.split('\t').map(str::to_string).collect())
        .collect()
}

/// Read a normalised TSV file back into rows of fields.
pub fn read_tsv(path: impl AsRef<Path>) -> Result<Vec<Vec<String>>, Pdf2TsvError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|e| Pdf2TsvError::from_read(path.to_path_buf(), e))?;
    Ok(parse_tsv(&text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(page_num: usize, rows: &[&[&str]]) -> Table {
        Table {
            page_num,
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn rows_are_tab_separated_lines() {
        let t = table(1, &[&["a", "b", "c"], &["1", "2", "3"]]);
        assert_eq!(format_tables(&[t]), "a\tb\tc\n1\t2\t3\n");
    }

    #[test]
    fn empty_first_field_is_quoted() {
        let t = table(1, &[&["", "x", ""]]);
        assert_eq!(format_tables(&[t]), "\"\"\tx\t\n");
    }

    #[test]
    fn fields_with_quotes_are_escaped() {
        let t = table(1, &[&["5\" pipe", "ok"]]);
        assert_eq!(format_tables(&[t]), "\"5\"\" pipe\"\tok\n");
    }

    #[test]
    fn tables_are_concatenated_in_order() {
        let first = table(1, &[&["p1"]]);
        let empty = table(2, &[]);
        let last = table(3, &[&["p3"]]);
        assert_eq!(format_tables(&[first, empty, last]), "p1\np3\n");
    }

    #[test]
    fn parse_tsv_splits_rows_and_fields() {
        let rows = parse_tsv("a\tb\r\n\nc\td\te\n");
        assert_eq!(
            rows,
            vec![
                vec!["a".to_string(), "b".to_string()],
                vec!["c".to_string(), "d".to_string(), "e".to_string()],
            ]
        );
    }

    #[test]
    fn read_tsv_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_tsv(dir.path().join("missing.tsv")).unwrap_err();
        assert!(matches!(err, Pdf2TsvError::FileNotFound { .. }));
    }
}
