//! Input validation: check the user-supplied path before pdfium sees it.
//!
//! pdfium reports a missing file, a permission problem and a non-PDF file
//! all as the same opaque load failure. Checking existence, readability and
//! the `%PDF` magic bytes up front turns those into distinct errors.

use crate::error::Pdf2TsvError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Validate a local PDF path, returning it as an owned `PathBuf`.
pub fn resolve_input(path: &Path) -> Result<PathBuf, Pdf2TsvError> {
    let path = path.to_path_buf();

    if !path.exists() {
        return Err(Pdf2TsvError::FileNotFound { path });
    }

    match std::fs::File::open(&path) {
        Ok(mut f) => {
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && !is_pdf_magic(&magic) {
                return Err(Pdf2TsvError::NotAPdf { path, magic });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(Pdf2TsvError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(Pdf2TsvError::FileNotFound { path });
        }
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(path)
}

/// Check the first four bytes of a file for the `%PDF` signature.
pub fn is_pdf_magic(bytes: &[u8]) -> bool {
    bytes.starts_with(b"%PDF")
}

/// Default output path for `input`: same location, `.tsv` extension.
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("tsv")
}
