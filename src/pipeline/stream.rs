//! Stream-mode table reconstruction.
//!
//! Tables are inferred purely from where text sits on the page. No ruling
//! lines are read and no table region is guessed: the crop area *is* the
//! table, and everything inside it becomes rows and columns.
//!
//! ```text
//! glyphs ──▶ crop ──▶ lines ──▶ chunks ──▶ columns ──▶ cells
//! ```
//!
//! 1. **crop**    keep glyphs whose centre lies inside the area
//! 2. **lines**   group glyphs that overlap vertically into visual lines
//! 3. **chunks**  split each line wherever the horizontal gap is wider than
//!    `chunk_gap_ratio × font size`
//! 4. **columns** merge the horizontal spans of all chunks on all lines
//!    until they are disjoint; each merged span is one column
//! 5. **cells**   each line becomes one row with one cell per column

use super::area::Rect;
use super::glyphs::Glyph;
use crate::config::ExtractionConfig;

/// Gaps narrower than this fraction of the font size are kerning, not spaces.
const WORD_SPACE_RATIO: f32 = 0.15;

/// Tuning knobs for [`extract_table`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamSettings {
    pub chunk_gap_ratio: f32,
    pub line_overlap_ratio: f32,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            chunk_gap_ratio: 0.5,
            line_overlap_ratio: 0.5,
        }
    }
}

impl From<&ExtractionConfig> for StreamSettings {
    fn from(config: &ExtractionConfig) -> Self {
        Self {
            chunk_gap_ratio: config.chunk_gap_ratio,
            line_overlap_ratio: config.line_overlap_ratio,
        }
    }
}

/// A run of glyphs on one line with no column-sized gap inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct TextChunk {
    pub text: String,
    pub bounds: Rect,
}

/// Reconstruct the table inside `crop` from a page's glyphs.
///
/// Returns one row per visual line, top to bottom; every row has the same
/// number of cells and missing cells are empty strings.
pub fn extract_table(glyphs: &[Glyph], crop: &Rect, settings: &StreamSettings) -> Vec<Vec<String>> {
    let inside: Vec<&Glyph> = glyphs
        .iter()
        .filter(|g| crop.contains_point(g.bounds.center_x(), g.bounds.center_y()))
        .collect();

    let lines: Vec<Vec<TextChunk>> = group_lines(inside, settings.line_overlap_ratio)
        .iter()
        .map(|line| split_chunks(line, settings.chunk_gap_ratio))
        .collect();

    let columns = column_spans(&lines);
    lines
        .iter()
        .map(|line| assign_cells(line, &columns))
        .collect()
}

/// Group glyphs into visual lines, each sorted left to right.
fn group_lines(mut glyphs: Vec<&Glyph>, overlap_ratio: f32) -> Vec<Vec<&Glyph>> {
    glyphs.sort_by(|a, b| {
        a.bounds
            .top
            .total_cmp(&b.bounds.top)
            .then(a.bounds.left.total_cmp(&b.bounds.left))
    });

    let mut lines: Vec<(Rect, Vec<&Glyph>)> = Vec::new();
    for glyph in glyphs {
        let joins_last = lines
            .last()
            .is_some_and(|(bounds, _)| shares_line(bounds, &glyph.bounds, overlap_ratio));

        match lines.last_mut() {
            Some((bounds, members)) if joins_last => {
                *bounds = bounds.union(&glyph.bounds);
                members.push(glyph);
            }
            _ => lines.push((glyph.bounds, vec![glyph])),
        }
    }

    lines
        .into_iter()
        .map(|(_, mut members)| {
            members.sort_by(|a, b| a.bounds.left.total_cmp(&b.bounds.left));
            members
        })
        .collect()
}

/// Whether a glyph box belongs to the line spanning `line`.
///
/// Boxes overlap by at least `overlap_ratio` of the smaller height. A
/// zero-height box (rules, underscores) joins when either vertical centre
/// falls inside the other's band.
fn shares_line(line: &Rect, glyph: &Rect, overlap_ratio: f32) -> bool {
    let min_height = line.height().min(glyph.height());
    if min_height > 0.0 {
        return line.vertical_overlap(glyph) >= overlap_ratio * min_height;
    }
    let within = |band: &Rect, y: f32| y >= band.top && y <= band.bottom;
    within(line, glyph.center_y()) || within(glyph, line.center_y())
}

/// Split one line of glyphs at every column-sized gap.
fn split_chunks(line: &[&Glyph], gap_ratio: f32) -> Vec<TextChunk> {
    let mut chunks: Vec<TextChunk> = Vec::new();
    let mut prev: Option<&Glyph> = None;

    for &glyph in line {
        let gap = prev.map(|p| (glyph.bounds.left - p.bounds.right, p.size().max(glyph.size())));

        match (chunks.last_mut(), gap) {
            (Some(chunk), Some((gap, size))) if gap <= gap_ratio * size => {
                if gap > WORD_SPACE_RATIO * size {
                    chunk.text.push(' ');
                }
                chunk.text.push(glyph.ch);
                chunk.bounds = chunk.bounds.union(&glyph.bounds);
            }
            _ => chunks.push(TextChunk {
                text: glyph.ch.to_string(),
                bounds: glyph.bounds,
            }),
        }
        prev = Some(glyph);
    }

    chunks
}

/// Merge the horizontal spans of every chunk into disjoint, sorted columns.
fn column_spans(lines: &[Vec<TextChunk>]) -> Vec<(f32, f32)> {
    let mut spans: Vec<(f32, f32)> = lines
        .iter()
        .flatten()
        .map(|c| (c.bounds.left, c.bounds.right))
        .collect();
    spans.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut merged: Vec<(f32, f32)> = Vec::with_capacity(spans.len());
    for (left, right) in spans {
        match merged.last_mut() {
            Some(last) if left < last.1 => last.1 = last.1.max(right),
            _ => merged.push((left, right)),
        }
    }
    merged
}

fn assign_cells(line: &[TextChunk], columns: &[(f32, f32)]) -> Vec<String> {
    let mut row = vec![String::new(); columns.len()];
    for chunk in line {
        let x = chunk.bounds.center_x();
        let col = columns
            .iter()
            .position(|&(left, right)| x >= left && x <= right)
            .unwrap_or_else(|| columns.partition_point(|&(left, _)| left <= x).saturating_sub(1));

        let cell = &mut row[col];
        if !cell.is_empty() {
            cell.push(' ');
        }
        cell.push_str(&chunk.text);
    }
    row
}
