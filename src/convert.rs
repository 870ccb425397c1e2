//! Extraction entry points.
//!
//! [`convert_into`] is the full two-step run: extract every selected page to
//! the output file, then normalise that file in place.
//! [`parse_publication_pdf`] is the same run with the fixed publication
//! configuration. [`extract_tables`] stops after extraction and returns the
//! tables in memory.

use crate::config::{ExtractionConfig, OutputFormat};
use crate::error::Pdf2TsvError;
use crate::output::{DocumentMetadata, ExtractionOutput, ExtractionStats, Table};
use crate::pipeline::glyphs::Glyph;
use crate::pipeline::stream::StreamSettings;
use crate::pipeline::{area, engine, glyphs, input, normalize, stream, tsv};
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Extract the tables of a publication PDF into a normalised TSV file.
///
/// Uses [`ExtractionConfig::publication`]: stream mode, all pages, relative
/// area `[4.2, 6.5, 97, 100]`. The output file is created or overwritten.
///
/// # Example
/// ```rust,no_run
/// let stats = pdf2tsv::parse_publication_pdf("results.pdf", "results.tsv")?;
/// eprintln!("{} rows", stats.total_rows);
/// # Ok::<(), pdf2tsv::Pdf2TsvError>(())
/// ```
pub fn parse_publication_pdf(
    input_file: impl AsRef<Path>,
    output_file: impl AsRef<Path>,
) -> Result<ExtractionStats, Pdf2TsvError> {
    convert_into(input_file, output_file, &ExtractionConfig::publication())
}

/// Extract tables from `input` and write them to `output`.
///
/// For [`OutputFormat::Tsv`] with `config.normalize` set, the written file
/// is then read back and normalised in place.
///
/// # Errors
/// Any failure is fatal: missing or unreadable input, a PDF pdfium cannot
/// open, a missing pdfium library, a page without a readable text layer, or
/// an output file that cannot be written.
pub fn convert_into(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionStats, Pdf2TsvError> {
    let total_start = Instant::now();
    let input_path = input_path.as_ref();
    let output_path = output_path.as_ref();
    info!(
        "extracting data from {} to {}...",
        input_path.display(),
        output_path.display()
    );

    // ── Step 1: Extract ──────────────────────────────────────────────────
    let extracted = extract_tables(input_path, config)?;

    let body = match config.output_format {
        OutputFormat::Tsv => tsv::format_tables(&extracted.tables),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&extracted.tables)
                .map_err(|e| Pdf2TsvError::Internal(format!("JSON serialisation: {e}")))?;
            json.push('\n');
            json
        }
    };
    write_output(output_path, &body)?;

    // ── Step 2: Normalise ────────────────────────────────────────────────
    let mut output_bytes = body.len();
    if config.output_format == OutputFormat::Tsv && config.normalize {
        output_bytes -= normalize::normalize_file(output_path)?;
    }

    let stats = ExtractionStats {
        output_bytes,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
        ..extracted.stats
    };

    info!(
        "done. {} rows from {}/{} pages in {}ms",
        stats.total_rows, stats.processed_pages, stats.total_pages, stats.total_duration_ms
    );
    Ok(stats)
}

/// Extract tables from `input` without writing anything.
pub fn extract_tables(
    input_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, Pdf2TsvError> {
    let start = Instant::now();
    let pdf_path = input::resolve_input(input_path.as_ref())?;

    let pdfium = engine::bind_pdfium(config)?;
    let document = engine::load_document(&pdfium, &pdf_path, config.password.as_deref())?;
    let metadata = engine::document_metadata(&document);
    let total_pages = metadata.page_count;
    info!("PDF loaded: {} pages", total_pages);

    let page_indices = config.pages.to_indices(total_pages);
    if page_indices.is_empty() {
        return Err(Pdf2TsvError::PageOutOfRange {
            page: config.pages.first_requested(),
            total: total_pages,
        });
    }
    debug!("Selected {} pages for extraction", page_indices.len());

    let pages = document.pages();
    let tables = extract_pages(&page_indices, config, |idx, page_num| {
        let page = pages
            .get(idx as u16)
            .map_err(|e| Pdf2TsvError::TextExtractionFailed {
                page: page_num,
                detail: format!("{:?}", e),
            })?;
        Ok(PageText {
            glyphs: glyphs::page_glyphs(&page, page_num)?,
            width: page.width().value,
            height: page.height().value,
        })
    })?;
    let total_rows = tables.iter().map(|t| t.rows.len()).sum();

    let extract_duration_ms = start.elapsed().as_millis() as u64;
    let stats = ExtractionStats {
        total_pages,
        processed_pages: tables.len(),
        empty_pages: tables.iter().filter(|t| t.is_empty()).count(),
        total_rows,
        output_bytes: 0,
        extract_duration_ms,
        total_duration_ms: extract_duration_ms,
    };

    Ok(ExtractionOutput {
        tables,
        metadata,
        stats,
    })
}

/// Extract tables from PDF bytes held in memory.
///
/// pdfium is handed a managed [`tempfile`] that is removed on return.
pub fn extract_tables_from_bytes(
    bytes: &[u8],
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, Pdf2TsvError> {
    let mut tmp = tempfile::NamedTempFile::new()
        .map_err(|e| Pdf2TsvError::Internal(format!("tempfile: {e}")))?;
    tmp.write_all(bytes)
        .map_err(|e| Pdf2TsvError::Internal(format!("tempfile write: {e}")))?;
    extract_tables(tmp.path(), config)
}

/// Read PDF metadata without extracting any table.
pub fn inspect(
    input_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<DocumentMetadata, Pdf2TsvError> {
    let pdf_path = input::resolve_input(input_path.as_ref())?;
    let pdfium = engine::bind_pdfium(config)?;
    let document = engine::load_document(&pdfium, &pdf_path, config.password.as_deref())?;
    Ok(engine::document_metadata(&document))
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Glyphs of one page plus its display size.
struct PageText {
    glyphs: Vec<Glyph>,
    width: f32,
    height: f32,
}

/// Run stream extraction over `page_indices`, firing progress events.
///
/// `load_page` receives the 0-indexed page and its 1-indexed number.
fn extract_pages<F>(
    page_indices: &[usize],
    config: &ExtractionConfig,
    mut load_page: F,
) -> Result<Vec<Table>, Pdf2TsvError>
where
    F: FnMut(usize, usize) -> Result<PageText, Pdf2TsvError>,
{
    let selected = page_indices.len();
    if let Some(ref cb) = config.progress_callback {
        cb.on_extraction_start(selected);
    }

    let settings = StreamSettings::from(config);
    let mut tables = Vec::with_capacity(selected);

    for &idx in page_indices {
        let page_num = idx + 1;
        if let Some(ref cb) = config.progress_callback {
            cb.on_page_start(page_num, selected);
        }

        let page = load_page(idx, page_num)?;
        let crop = area::crop_rect(&config.area, page.width, page.height);
        let rows = stream::extract_table(&page.glyphs, &crop, &settings);

        debug!(
            "Page {}: {} glyphs → {} rows",
            page_num,
            page.glyphs.len(),
            rows.len()
        );
        if rows.is_empty() {
            warn!("Page {} has no text inside the crop area", page_num);
        }

        if let Some(ref cb) = config.progress_callback {
            cb.on_page_complete(page_num, selected, rows.len());
        }
        tables.push(Table { page_num, rows });
    }

    if let Some(ref cb) = config.progress_callback {
        let total_rows = tables.iter().map(|t| t.rows.len()).sum();
        cb.on_extraction_complete(selected, total_rows);
    }
    Ok(tables)
}

/// Write `body` to `path` through a sibling temp file so a failed write never
/// leaves a truncated output behind.
fn write_output(path: &Path, body: &str) -> Result<(), Pdf2TsvError> {
    let write_err = |source: std::io::Error| Pdf2TsvError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(write_err)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(write_err)?;
    tmp.write_all(body.as_bytes()).map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::area::Rect;
    use crate::progress::ExtractionProgressCallback;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct EventLog(Mutex<Vec<String>>);

    impl EventLog {
        fn push(&self, event: String) {
            self.0.lock().unwrap().push(event);
        }
    }

    impl ExtractionProgressCallback for EventLog {
        fn on_extraction_start(&self, total_pages: usize) {
            self.push(format!("start {total_pages}"));
        }
        fn on_page_start(&self, page_num: usize, total_pages: usize) {
            self.push(format!("page {page_num}/{total_pages}"));
        }
        fn on_page_complete(&self, page_num: usize, _total_pages: usize, rows: usize) {
            self.push(format!("done {page_num}: {rows} rows"));
        }
        fn on_extraction_complete(&self, total_pages: usize, total_rows: usize) {
            self.push(format!("complete {total_pages}: {total_rows} rows"));
        }
    }

    /// A 612 x 792 page with one glyph per entry, each on its own line.
    fn text_page(lines: &[char]) -> PageText {
        let glyphs = lines
            .iter()
            .enumerate()
            .map(|(i, &ch)| {
                let top = 100.0 + 20.0 * i as f32;
                Glyph {
                    ch,
                    bounds: Rect::new(100.0, top, 106.0, top + 10.0),
                }
            })
            .collect();
        PageText {
            glyphs,
            width: 612.0,
            height: 792.0,
        }
    }

    #[test]
    fn extract_pages_fires_events_in_order() {
        let log = Arc::new(EventLog::default());
        let config = ExtractionConfig::builder()
            .progress_callback(log.clone())
            .build()
            .unwrap();

        let tables = extract_pages(&[0, 2], &config, |idx, _| {
            Ok(if idx == 0 {
                text_page(&['a', 'b'])
            } else {
                text_page(&[])
            })
        })
        .unwrap();

        assert_eq!(
            tables.iter().map(|t| t.page_num).collect::<Vec<_>>(),
            vec![1, 3]
        );
        assert_eq!(
            *log.0.lock().unwrap(),
            vec![
                "start 2",
                "page 1/2",
                "done 1: 2 rows",
                "page 3/2",
                "done 3: 0 rows",
                "complete 2: 2 rows",
            ]
        );
    }

    #[test]
    fn extract_pages_stops_at_first_failing_page() {
        let log = Arc::new(EventLog::default());
        let config = ExtractionConfig::builder()
            .progress_callback(log.clone())
            .build()
            .unwrap();

        let err = extract_pages(&[0, 1, 2], &config, |idx, page_num| {
            if idx == 1 {
                Err(Pdf2TsvError::TextExtractionFailed {
                    page: page_num,
                    detail: "no text layer".into(),
                })
            } else {
                Ok(text_page(&['x']))
            }
        })
        .unwrap_err();

        assert!(matches!(
            err,
            Pdf2TsvError::TextExtractionFailed { page: 2, .. }
        ));
        let events = log.0.lock().unwrap();
        assert_eq!(events.last().map(String::as_str), Some("page 2/3"));
        assert!(!events.iter().any(|e| e.starts_with("complete")));
    }

    #[test]
    fn extract_pages_crops_with_the_configured_area() {
        // The publication area starts 33pt down a letter page; a glyph at
        // the very top is a running header.
        let tables = extract_pages(&[0], &ExtractionConfig::default(), |_, _| {
            let mut page = text_page(&['t']);
            page.glyphs.push(Glyph {
                ch: 'h',
                bounds: Rect::new(100.0, 5.0, 106.0, 15.0),
            });
            Ok(page)
        })
        .unwrap();

        assert_eq!(tables[0].rows, vec![vec!["t".to_string()]]);
    }

    #[test]
    fn write_output_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/out.tsv");

        write_output(&path, "a\tb\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\tb\n");
    }

    #[test]
    fn write_output_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tsv");
        std::fs::write(&path, "stale contents that are longer\n").unwrap();

        write_output(&path, "x\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "x\n");
    }

    #[test]
    fn convert_into_missing_input_fails_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.tsv");

        let err = convert_into(
            dir.path().join("missing.pdf"),
            &output,
            &ExtractionConfig::default(),
        )
        .unwrap_err();

        assert!(matches!(err, Pdf2TsvError::FileNotFound { .. }));
        assert!(!output.exists());
    }

    #[test]
    fn extract_tables_rejects_non_pdf_bytes() {
        let err = extract_tables_from_bytes(b"ID\tName\n", &ExtractionConfig::default())
            .unwrap_err();
        assert!(matches!(err, Pdf2TsvError::NotAPdf { .. }));
    }
}
