//! Error types for the pdf2tsv library.
//!
//! Every failure is fatal: the first unreadable file, broken PDF or failing
//! page aborts the whole conversion and is returned as
//! `Err(Pdf2TsvError)` from the top-level entry points. There is no
//! per-page error channel and no retry.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdf2tsv library.
#[derive(Debug, Error)]
pub enum Pdf2TsvError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}\nTry repairing with: qpdf --decrypt input.pdf output.pdf")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// The page selection matched no page of the document.
    #[error("Page {page} is out of range (document has {total} pages)")]
    PageOutOfRange { page: usize, total: usize },

    /// pdfium could not load a page or its text layer.
    #[error("Text extraction failed for page {page}: {detail}")]
    TextExtractionFailed { page: usize, detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not read back the TSV file for normalisation.
    #[error("Failed to read output file '{path}': {source}")]
    OutputReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not create or write the output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
You can:\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing copy.\n\
  • Pass --pdfium-lib /path/to/libpdfium.\n\
  • Place libpdfium next to the working directory or install it system-wide.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Pdf2TsvError {
    /// Map an `io::Error` raised while reading `path` to the closest variant.
    pub(crate) fn from_read(path: PathBuf, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => Pdf2TsvError::FileNotFound { path },
            std::io::ErrorKind::PermissionDenied => Pdf2TsvError::PermissionDenied { path },
            _ => Pdf2TsvError::OutputReadFailed { path, source },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_out_of_range_display() {
        let e = Pdf2TsvError::PageOutOfRange { page: 7, total: 3 };
        let msg = e.to_string();
        assert!(msg.contains("Page 7"), "got: {msg}");
        assert!(msg.contains("3 pages"), "got: {msg}");
    }

    #[test]
    fn text_extraction_failed_display() {
        let e = Pdf2TsvError::TextExtractionFailed {
            page: 2,
            detail: "no text layer".into(),
        };
        assert!(e.to_string().contains("page 2"));
        assert!(e.to_string().contains("no text layer"));
    }

    #[test]
    fn from_read_maps_not_found() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let e = Pdf2TsvError::from_read(PathBuf::from("out.tsv"), err);
        assert!(matches!(e, Pdf2TsvError::FileNotFound { .. }));
    }

    #[test]
    fn from_read_maps_permission_denied() {
        let err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let e = Pdf2TsvError::from_read(PathBuf::from("out.tsv"), err);
        assert!(matches!(e, Pdf2TsvError::PermissionDenied { .. }));
    }

    #[test]
    fn from_read_keeps_other_io_errors() {
        let err = std::io::Error::new(std::io::ErrorKind::InvalidData, "not utf-8");
        let e = Pdf2TsvError::from_read(PathBuf::from("out.tsv"), err);
        assert!(matches!(e, Pdf2TsvError::OutputReadFailed { .. }));
        assert!(e.to_string().contains("out.tsv"));
    }
}
