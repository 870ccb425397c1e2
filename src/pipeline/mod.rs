//! Pipeline stages for PDF-to-TSV table extraction.
//!
//! Each submodule implements one transformation step. Everything after
//! [`glyphs`] works on plain data and is tested without pdfium.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ engine ──▶ glyphs ──▶ stream ──▶ tsv ──▶ normalize
//! (path)    (pdfium)   (chars)    (layout)   (write)  (in place)
//! ```
//!
//! 1. [`input`]: check the user-supplied path exists and starts with `%PDF`
//! 2. [`engine`]: bind pdfium and open the document
//! 3. [`glyphs`]: read each character with its box in top-left coordinates
//! 4. [`area`]: turn the configured crop area into page points
//! 5. [`stream`]: rebuild rows and columns from glyph positions alone
//! 6. [`tsv`]: serialise tables with minimal quoting
//! 7. [`normalize`]: the four whitespace rules applied to the written file

pub mod area;
pub mod engine;
pub mod glyphs;
pub mod input;
pub mod normalize;
pub mod stream;
pub mod tsv;
