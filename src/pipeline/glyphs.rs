//! Read positioned characters from a pdfium page.

use super::area::{user_to_display, PageRotation, Rect};
use crate::error::Pdf2TsvError;
use pdfium_render::prelude::*;

/// One visible character and its box in top-left-origin page points.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub ch: char,
    pub bounds: Rect,
}

impl Glyph {
    /// Height of the glyph box, used as the font size for gap thresholds.
    pub fn size(&self) -> f32 {
        self.bounds.height().max(1.0)
    }
}

/// Collect every non-whitespace character on `page` with its loose bounds,
/// in display space.
///
/// Whitespace and control characters are dropped: cell boundaries are
/// inferred from gaps between visible glyphs, never from space characters.
pub fn page_glyphs(page: &PdfPage, page_num: usize) -> Result<Vec<Glyph>, Pdf2TsvError> {
    let (display_width, display_height) = (page.width().value, page.height().value);
    let rotation = page_rotation(page);
    let text = page.text().map_err(|e| Pdf2TsvError::TextExtractionFailed {
        page: page_num,
        detail: format!("{:?}", e),
    })?;

    let mut glyphs = Vec::new();
    for char_info in text.chars().iter() {
        let Some(ch) = char_info.unicode_char() else {
            continue;
        };
        if ch.is_whitespace() || ch.is_control() {
            continue;
        }
        let Ok(bounds) = char_info.loose_bounds() else {
            continue;
        };

        let rect = user_to_display(
            bounds.left().value,
            bounds.bottom().value,
            bounds.right().value,
            bounds.top().value,
            rotation,
            display_width,
            display_height,
        );
        if rect.width() <= 0.0 && rect.height() <= 0.0 {
            continue;
        }

        glyphs.push(Glyph { ch, bounds: rect });
    }

    Ok(glyphs)
}

/// A page whose rotation cannot be read is treated as unrotated.
fn page_rotation(page: &PdfPage) -> PageRotation {
    match page.rotation() {
        Ok(PdfPageRenderRotation::Degrees90) => PageRotation::Quarter,
        Ok(PdfPageRenderRotation::Degrees180) => PageRotation::Half,
        Ok(PdfPageRenderRotation::Degrees270) => PageRotation::ThreeQuarter,
        _ => PageRotation::None,
    }
}
