//! Configuration types for PDF-to-TSV table extraction.
//!
//! All extraction behaviour is controlled through [`ExtractionConfig`], built
//! via its [`ExtractionConfigBuilder`]. The defaults reproduce the publication
//! layout this tool was written for: stream mode, every page, and a relative
//! crop of `[4.2, 6.5, 97, 100]` percent that cuts away running headers and
//! the left margin.

use crate::error::Pdf2TsvError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Configuration for a PDF-to-TSV extraction.
///
/// Built via [`ExtractionConfig::builder()`] or using
/// [`ExtractionConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf2tsv::{ExtractionConfig, PageArea, PageSelection};
///
/// let config = ExtractionConfig::builder()
///     .area(PageArea::percent(10.0, 0.0, 90.0, 100.0))
///     .pages(PageSelection::Range(2, 5))
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Region of each page that is searched for table text.
    /// Default: [`PageArea::PUBLICATION`].
    pub area: PageArea,

    /// Page selection. Default: All pages.
    pub pages: PageSelection,

    /// Serialisation of the extracted tables. Default: [`OutputFormat::Tsv`].
    pub output_format: OutputFormat,

    /// Run the whitespace normaliser over the written TSV. Default: true.
    ///
    /// Ignored for [`OutputFormat::Json`].
    pub normalize: bool,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Explicit path to the pdfium shared library.
    ///
    /// When unset, `PDFIUM_LIB_PATH`, the working directory and finally the
    /// system library search path are tried in that order.
    pub pdfium_library: Option<PathBuf>,

    /// Horizontal gap, as a multiple of the glyph font size, that splits two
    /// neighbouring glyphs into separate text chunks. Default: 0.5.
    pub chunk_gap_ratio: f32,

    /// Minimum vertical overlap, as a fraction of the smaller height, for a
    /// chunk to join an existing line. Default: 0.5.
    pub line_overlap_ratio: f32,

    /// Optional per-page progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            area: PageArea::PUBLICATION,
            pages: PageSelection::default(),
            output_format: OutputFormat::default(),
            normalize: true,
            password: None,
            pdfium_library: None,
            chunk_gap_ratio: 0.5,
            line_overlap_ratio: 0.5,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("area", &self.area)
            .field("pages", &self.pages)
            .field("output_format", &self.output_format)
            .field("normalize", &self.normalize)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("pdfium_library", &self.pdfium_library)
            .field("chunk_gap_ratio", &self.chunk_gap_ratio)
            .field("line_overlap_ratio", &self.line_overlap_ratio)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ExtractionProgressCallback>"),
            )
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }

    /// The fixed configuration used by [`crate::parse_publication_pdf`].
    pub fn publication() -> Self {
        Self::default()
    }
}

/// Builder for [`ExtractionConfig`].
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl fmt::Debug for ExtractionConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl ExtractionConfigBuilder {
    pub fn area(mut self, area: PageArea) -> Self {
        self.config.area = area;
        self
    }

    pub fn pages(mut self, selection: PageSelection) -> Self {
        self.config.pages = selection;
        self
    }

    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.config.output_format = format;
        self
    }

    pub fn normalize(mut self, v: bool) -> Self {
        self.config.normalize = v;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn pdfium_library(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_library = Some(path.into());
        self
    }

    pub fn chunk_gap_ratio(mut self, ratio: f32) -> Self {
        self.config.chunk_gap_ratio = ratio;
        self
    }

    pub fn line_overlap_ratio(mut self, ratio: f32) -> Self {
        self.config.line_overlap_ratio = ratio;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, Pdf2TsvError> {
        let c = &self.config;
        c.area.validate()?;
        if c.chunk_gap_ratio.is_nan() || c.chunk_gap_ratio <= 0.0 {
            return Err(Pdf2TsvError::InvalidConfig(format!(
                "chunk gap ratio must be > 0, got {}",
                c.chunk_gap_ratio
            )));
        }
        if c.line_overlap_ratio.is_nan()
            || c.line_overlap_ratio <= 0.0
            || c.line_overlap_ratio > 1.0
        {
            return Err(Pdf2TsvError::InvalidConfig(format!(
                "line overlap ratio must be in (0, 1], got {}",
                c.line_overlap_ratio
            )));
        }
        Ok(self.config)
    }
}

// ── Area ─────────────────────────────────────────────────────────────────

/// Units of a [`PageArea`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AreaUnits {
    /// Percentages of page height (top/bottom) and width (left/right). (default)
    #[default]
    Percent,
    /// PDF points measured from the top-left corner of the page.
    Points,
}

/// Crop region searched for table text, as `[top, left, bottom, right]`.
///
/// With [`AreaUnits::Percent`] the same area lands on proportionally
/// equivalent locations of pages with different physical sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageArea {
    pub top: f32,
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
    pub units: AreaUnits,
}

impl PageArea {
    /// Table region of the publication layout.
    pub const PUBLICATION: PageArea = PageArea::percent(4.2, 6.5, 97.0, 100.0);

    /// The whole page.
    pub const FULL_PAGE: PageArea = PageArea::percent(0.0, 0.0, 100.0, 100.0);

    pub const fn percent(top: f32, left: f32, bottom: f32, right: f32) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
            units: AreaUnits::Percent,
        }
    }

    pub const fn points(top: f32, left: f32, bottom: f32, right: f32) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
            units: AreaUnits::Points,
        }
    }

    fn validate(&self) -> Result<(), Pdf2TsvError> {
        let [t, l, b, r] = [self.top, self.left, self.bottom, self.right];
        if [t, l, b, r].iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(Pdf2TsvError::InvalidConfig(format!(
                "area values must be finite and non-negative, got [{t}, {l}, {b}, {r}]"
            )));
        }
        if t >= b || l >= r {
            return Err(Pdf2TsvError::InvalidConfig(format!(
                "area must satisfy top < bottom and left < right, got [{t}, {l}, {b}, {r}]"
            )));
        }
        if self.units == AreaUnits::Percent && (b > 100.0 || r > 100.0) {
            return Err(Pdf2TsvError::InvalidConfig(format!(
                "relative area cannot exceed 100%, got [{t}, {l}, {b}, {r}]"
            )));
        }
        Ok(())
    }
}

impl Default for PageArea {
    fn default() -> Self {
        Self::PUBLICATION
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// How the extracted tables are written to the output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Tab-separated rows, one per line. (default)
    #[default]
    Tsv,
    /// Pretty-printed JSON array of [`crate::output::Table`].
    Json,
}

/// Specifies which pages of the PDF to extract.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum PageSelection {
    /// Extract all pages (default).
    #[default]
    All,
    /// Extract a single page (1-indexed).
    Single(usize),
    /// Extract a contiguous range of pages (1-indexed, inclusive).
    Range(usize, usize),
    /// Extract specific pages (1-indexed, deduplicated).
    Set(Vec<usize>),
}

impl PageSelection {
    /// Expand the selection into a sorted, deduplicated list of 0-indexed page numbers.
    pub fn to_indices(&self, total_pages: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = match self {
            PageSelection::All => (0..total_pages).collect(),
            PageSelection::Single(p) => {
                if *p >= 1 && *p <= total_pages {
                    vec![p - 1]
                } else {
                    vec![]
                }
            }
            PageSelection::Range(start, end) => {
                let s = (*start).max(1) - 1;
                let e = (*end).min(total_pages);
                (s..e).collect()
            }
            PageSelection::Set(pages) => pages
                .iter()
                .filter(|&&p| p >= 1 && p <= total_pages)
                .map(|p| p - 1)
                .collect(),
        };
        indices.sort_unstable();
        indices.dedup();
        indices
    }

    /// The lowest 1-indexed page the selection asks for, used in range errors.
    pub fn first_requested(&self) -> usize {
        match self {
            PageSelection::All => 1,
            PageSelection::Single(p) => *p,
            PageSelection::Range(start, _) => *start,
            PageSelection::Set(pages) => pages.iter().copied().min().unwrap_or(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_publication_layout() {
        let c = ExtractionConfig::default();
        assert_eq!(c.area, PageArea::percent(4.2, 6.5, 97.0, 100.0));
        assert_eq!(c.area.units, AreaUnits::Percent);
        assert!(matches!(c.pages, PageSelection::All));
        assert_eq!(c.output_format, OutputFormat::Tsv);
        assert!(c.normalize);
    }

    #[test]
    fn builder_accepts_valid_area() {
        let c = ExtractionConfig::builder()
            .area(PageArea::points(36.0, 18.0, 756.0, 594.0))
            .build()
            .unwrap();
        assert_eq!(c.area.units, AreaUnits::Points);
    }

    #[test]
    fn builder_rejects_inverted_area() {
        let err = ExtractionConfig::builder()
            .area(PageArea::percent(90.0, 0.0, 10.0, 100.0))
            .build()
            .unwrap_err();
        assert!(matches!(err, Pdf2TsvError::InvalidConfig(_)));
    }

    #[test]
    fn builder_rejects_percent_over_100() {
        assert!(ExtractionConfig::builder()
            .area(PageArea::percent(0.0, 0.0, 120.0, 100.0))
            .build()
            .is_err());
    }

    #[test]
    fn builder_rejects_negative_area() {
        assert!(ExtractionConfig::builder()
            .area(PageArea::points(-1.0, 0.0, 10.0, 10.0))
            .build()
            .is_err());
    }

    #[test]
    fn builder_rejects_bad_ratios() {
        assert!(ExtractionConfig::builder()
            .chunk_gap_ratio(0.0)
            .build()
            .is_err());
        assert!(ExtractionConfig::builder()
            .line_overlap_ratio(1.5)
            .build()
            .is_err());
        assert!(ExtractionConfig::builder()
            .chunk_gap_ratio(f32::NAN)
            .build()
            .is_err());
    }

    #[test]
    fn debug_redacts_password() {
        let c = ExtractionConfig::builder().password("hunter2").build().unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("hunter2"));
        assert!(dbg.contains("<redacted>"));
    }

    #[test]
    fn page_selection_to_indices() {
        assert_eq!(PageSelection::All.to_indices(5), vec![0, 1, 2, 3, 4]);
        assert_eq!(PageSelection::Single(3).to_indices(5), vec![2]);
        assert_eq!(PageSelection::Single(6).to_indices(5), Vec::<usize>::new());
        assert_eq!(PageSelection::Range(2, 4).to_indices(5), vec![1, 2, 3]);
        assert_eq!(PageSelection::Range(4, 9).to_indices(5), vec![3, 4]);
        assert_eq!(
            PageSelection::Set(vec![3, 1, 3]).to_indices(5),
            vec![0, 2] // deduplicated and sorted
        );
    }

    #[test]
    fn page_selection_first_requested() {
        assert_eq!(PageSelection::All.first_requested(), 1);
        assert_eq!(PageSelection::Single(7).first_requested(), 7);
        assert_eq!(PageSelection::Range(4, 9).first_requested(), 4);
        assert_eq!(PageSelection::Set(vec![12, 9]).first_requested(), 9);
    }
}
