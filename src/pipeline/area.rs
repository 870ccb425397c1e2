//! Page geometry: rectangles and relative-area cropping.
//!
//! Every coordinate in the pipeline uses a top-left origin with y growing
//! downwards in *display* space, the page as a viewer shows it after its
//! `/Rotate` entry is applied. That is the convention [`PageArea`] is
//! expressed in. Glyph bounds coming out of pdfium are in unrotated user
//! space with a bottom-left origin; [`user_to_display`] maps them once in
//! [`super::glyphs`] so nothing downstream has to think about it.

use crate::config::{AreaUnits, PageArea};

/// Axis-aligned rectangle in page points, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center_x(&self) -> f32 {
        (self.left + self.right) / 2.0
    }

    pub fn center_y(&self) -> f32 {
        (self.top + self.bottom) / 2.0
    }

    /// Inclusive on all four edges.
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }

    /// Length of the shared vertical extent, zero when disjoint.
    pub fn vertical_overlap(&self, other: &Rect) -> f32 {
        (self.bottom.min(other.bottom) - self.top.max(other.top)).max(0.0)
    }

    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }
}

/// Resolve `area` against a page of the given size.
///
/// Percentages scale with the page; absolute areas are clamped to it.
pub fn crop_rect(area: &PageArea, page_width: f32, page_height: f32) -> Rect {
    match area.units {
        AreaUnits::Percent => Rect {
            left: page_width * area.left / 100.0,
            top: page_height * area.top / 100.0,
            right: page_width * area.right / 100.0,
            bottom: page_height * area.bottom / 100.0,
        },
        AreaUnits::Points => Rect {
            left: area.left.min(page_width),
            top: area.top.min(page_height),
            right: area.right.min(page_width),
            bottom: area.bottom.min(page_height),
        },
    }
}

/// Clockwise rotation a viewer applies to a page (its `/Rotate` entry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageRotation {
    #[default]
    None,
    Quarter,
    Half,
    ThreeQuarter,
}

/// Map a user-space box (bottom-left origin, unrotated) into display space.
///
/// `display_width` and `display_height` are the page size as displayed,
/// which is what pdfium reports for `width()` and `height()`.
pub fn user_to_display(
    left: f32,
    bottom: f32,
    right: f32,
    top: f32,
    rotation: PageRotation,
    display_width: f32,
    display_height: f32,
) -> Rect {
    // Unrotated page size.
    let (w, h) = match rotation {
        PageRotation::None | PageRotation::Half => (display_width, display_height),
        PageRotation::Quarter | PageRotation::ThreeQuarter => (display_height, display_width),
    };
    let map = |x: f32, y: f32| match rotation {
        PageRotation::None => (x, h - y),
        PageRotation::Quarter => (y, x),
        PageRotation::Half => (w - x, y),
        PageRotation::ThreeQuarter => (h - y, w - x),
    };

    let (x1, y1) = map(left, bottom);
    let (x2, y2) = map(right, top);
    Rect::new(x1.min(x2), y1.min(y2), x1.max(x2), y1.max(y2))
}
