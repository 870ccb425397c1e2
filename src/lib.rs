//! # pdf2tsv
//!
//! Extract the tables of text-based publication PDFs into tab-separated
//! values.
//!
//! Pages are read through pdfium's text layer; no rendering or OCR is
//! involved. Rows and columns are rebuilt from glyph positions alone
//! ("stream" mode): text on the same baseline becomes a row, and the gaps
//! that stay open down the whole page become column boundaries.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input      check the file exists and is a PDF
//!  ├─ 2. Engine     bind pdfium, open the document
//!  ├─ 3. Glyphs     characters + boxes for each selected page
//!  ├─ 4. Stream     crop to the page area, group rows, find columns
//!  ├─ 5. Write      TSV (or JSON) to the output file
//!  └─ 6. Normalise  four whitespace rules, file rewritten in place
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! fn main() -> Result<(), pdf2tsv::Pdf2TsvError> {
//!     let stats = pdf2tsv::parse_publication_pdf("results.pdf", "results.tsv")?;
//!     eprintln!("{} rows from {} pages", stats.total_rows, stats.processed_pages);
//!     Ok(())
//! }
//! ```
//!
//! A custom area or page range goes through [`ExtractionConfig::builder`]
//! and [`convert_into`].
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2tsv` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdf2tsv = { version = "0.1", default-features = false }
//! ```
//!
//! ## pdfium
//!
//! A pdfium shared library must be available at run time. See
//! [`pipeline::engine`] for the lookup order.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    AreaUnits, ExtractionConfig, ExtractionConfigBuilder, OutputFormat, PageArea, PageSelection,
};
pub use convert::{
    convert_into, extract_tables, extract_tables_from_bytes, inspect, parse_publication_pdf,
};
pub use error::Pdf2TsvError;
pub use output::{DocumentMetadata, ExtractionOutput, ExtractionStats, Table};
pub use pipeline::input::default_output_path;
pub use pipeline::normalize::{normalize_file, normalize_tsv};
pub use pipeline::tsv::{parse_tsv, read_tsv};
pub use progress::{ExtractionProgressCallback, NoopProgressCallback, ProgressCallback};
