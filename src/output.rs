//! Result types returned by the extraction entry points.

use serde::{Deserialize, Serialize};

/// The table reconstructed from one page's crop area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// 1-indexed page number.
    pub page_num: usize,
    /// Rows top to bottom; every row of a table has the same cell count.
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }
}

/// Everything [`crate::extract_tables`] found in a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionOutput {
    /// One table per selected page, in document order.
    pub tables: Vec<Table>,
    pub metadata: DocumentMetadata,
    pub stats: ExtractionStats,
}

impl ExtractionOutput {
    /// The tables serialised as un-normalised TSV.
    pub fn to_tsv(&self) -> String {
        crate::pipeline::tsv::format_tables(&self.tables)
    }
}

/// Counters and timings for one extraction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Pages in the document.
    pub total_pages: usize,
    /// Selected pages that were read.
    pub processed_pages: usize,
    /// Processed pages with no text inside the crop area.
    pub empty_pages: usize,
    /// Rows across all tables.
    pub total_rows: usize,
    /// Bytes in the output file after normalisation (0 for in-memory runs).
    pub output_bytes: usize,
    pub extract_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// Document-level metadata read through pdfium.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub modification_date: Option<String>,
    pub page_count: usize,
    pub pdf_version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_column_count() {
        let t = Table {
            page_num: 1,
            rows: vec![vec!["a".into(), "b".into()], vec!["".into(), "c".into()]],
        };
        assert_eq!(t.column_count(), 2);
        assert!(!t.is_empty());

        let empty = Table {
            page_num: 2,
            rows: vec![],
        };
        assert_eq!(empty.column_count(), 0);
        assert!(empty.is_empty());
    }

    #[test]
    fn output_serialises_to_json() {
        let output = ExtractionOutput {
            tables: vec![Table {
                page_num: 3,
                rows: vec![vec!["x".into()]],
            }],
            metadata: DocumentMetadata {
                page_count: 3,
                ..Default::default()
            },
            stats: ExtractionStats::default(),
        };

        let json = serde_json::to_string(&output).unwrap();
        assert!(json.contains("\"page_num\":3"));

        let back: ExtractionOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(back.tables, output.tables);
        assert_eq!(output.to_tsv(), "x\n");
    }
}
