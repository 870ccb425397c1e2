//! Progress-callback trait for per-page extraction events.
//!
//! Inject an [`Arc<dyn ExtractionProgressCallback>`] via
//! [`crate::config::ExtractionConfigBuilder::progress_callback`] to receive
//! events as the pipeline walks the selected pages. The CLI uses it to drive
//! its progress bar; library callers can forward events anywhere.
//!
//! # Example
//!
//! ```rust
//! use pdf2tsv::{ExtractionProgressCallback, ExtractionConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct RowCounter {
//!     rows: AtomicUsize,
//! }
//!
//! impl ExtractionProgressCallback for RowCounter {
//!     fn on_page_complete(&self, page_num: usize, total_pages: usize, rows: usize) {
//!         self.rows.fetch_add(rows, Ordering::SeqCst);
//!         eprintln!("Page {}/{}: {} rows", page_num, total_pages, rows);
//!     }
//! }
//!
//! let counter = Arc::new(RowCounter { rows: AtomicUsize::new(0) });
//!
//! let config = ExtractionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ExtractionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the extraction pipeline as it processes each page.
///
/// Pages are processed sequentially on the calling thread. The trait is still
/// `Send + Sync` so a callback can be shared with other threads (a progress
/// bar ticker, a UI). All methods default to no-ops.
pub trait ExtractionProgressCallback: Send + Sync {
    /// Called once before the first page is read.
    fn on_extraction_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called before the text layer of a page is loaded.
    ///
    /// `page_num` is 1-indexed; `total_pages` is the number of selected pages.
    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called once a page's table has been reconstructed.
    ///
    /// `rows` is the number of table rows found inside the crop area.
    fn on_page_complete(&self, page_num: usize, total_pages: usize, rows: usize) {
        let _ = (page_num, total_pages, rows);
    }

    /// Called after the last page, before the output file is written.
    fn on_extraction_complete(&self, total_pages: usize, total_rows: usize) {
        let _ = (total_pages, total_rows);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ExtractionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ExtractionConfig`].
pub type ProgressCallback = Arc<dyn ExtractionProgressCallback>;
