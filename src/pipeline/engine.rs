//! pdfium binding and document loading.
//!
//! The library is resolved in this order, first match wins:
//!
//! 1. the explicit path in [`ExtractionConfig::pdfium_library`]
//! 2. `PDFIUM_LIB_PATH`
//! 3. the platform library name in the current directory
//! 4. the system library search path
//!
//! pdfium keeps thread-local state, so a fresh binding is created for every
//! conversion and dropped with it.

use crate::config::ExtractionConfig;
use crate::error::Pdf2TsvError;
use crate::output::DocumentMetadata;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Bind to a pdfium library according to the resolution order above.
pub fn bind_pdfium(config: &ExtractionConfig) -> Result<Pdfium, Pdf2TsvError> {
    if let Some(path) = library_override(config) {
        return bind_pdfium_from_path(&path);
    }

    let local = Pdfium::pdfium_platform_library_name_at_path("./");
    let bindings = Pdfium::bind_to_library(&local)
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|e| Pdf2TsvError::PdfiumBindingFailed(format!("{:?}", e)))?;

    debug!("Bound pdfium from the working directory or system path");
    Ok(Pdfium::new(bindings))
}

/// Bind to a pdfium library at an explicit `path`.
pub fn bind_pdfium_from_path(path: &Path) -> Result<Pdfium, Pdf2TsvError> {
    let bindings = Pdfium::bind_to_library(path).map_err(|e| {
        Pdf2TsvError::PdfiumBindingFailed(format!("{}: {:?}", path.display(), e))
    })?;
    debug!("Bound pdfium from {}", path.display());
    Ok(Pdfium::new(bindings))
}

fn library_override(config: &ExtractionConfig) -> Option<PathBuf> {
    config.pdfium_library.clone().or_else(|| {
        std::env::var_os("PDFIUM_LIB_PATH")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    })
}

/// Open a PDF, mapping pdfium's load error to a specific variant.
pub fn load_document<'a>(
    pdfium: &'a Pdfium,
    pdf_path: &Path,
    password: Option<&'a str>,
) -> Result<PdfDocument<'a>, Pdf2TsvError> {
    pdfium.load_pdf_from_file(pdf_path, password).map_err(|e| {
        let err_str = format!("{:?}", e);
        if err_str.contains("Password") || err_str.contains("password") {
            if password.is_some() {
                Pdf2TsvError::WrongPassword {
                    path: pdf_path.to_path_buf(),
                }
            } else {
                Pdf2TsvError::PasswordRequired {
                    path: pdf_path.to_path_buf(),
                }
            }
        } else {
            Pdf2TsvError::CorruptPdf {
                path: pdf_path.to_path_buf(),
                detail: err_str,
            }
        }
    })
}

/// Read document metadata from an open document.
pub fn document_metadata(document: &PdfDocument) -> DocumentMetadata {
    let metadata = document.metadata();

    let get_meta = |tag: PdfDocumentMetadataTagType| -> Option<String> {
        metadata.get(tag).and_then(|t| {
            let v = t.value().to_string();
            if v.is_empty() {
                None
            } else {
                Some(v)
            }
        })
    };

    DocumentMetadata {
        title: get_meta(PdfDocumentMetadataTagType::Title),
        author: get_meta(PdfDocumentMetadataTagType::Author),
        subject: get_meta(PdfDocumentMetadataTagType::Subject),
        creator: get_meta(PdfDocumentMetadataTagType::Creator),
        producer: get_meta(PdfDocumentMetadataTagType::Producer),
        creation_date: get_meta(PdfDocumentMetadataTagType::CreationDate),
        modification_date: get_meta(PdfDocumentMetadataTagType::ModificationDate),
        page_count: document.pages().len() as usize,
        pdf_version: format!("{:?}", document.version()),
    }
}
