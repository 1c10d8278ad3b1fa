//! Line positions and item rectangles from solved tracks.

use std::ops::Range;

use tracing::warn;

use crate::{Axis, LayoutError, Rect};

/// The solved tracks of one axis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolvedAxis {
    breadths: Vec<f64>,
    flexible: Vec<bool>,
    gap: f64,
}

impl SolvedAxis {
    pub fn new(breadths: Vec<f64>, flexible: Vec<bool>, gap: f64) -> Self {
        debug_assert_eq!(breadths.len(), flexible.len());
        Self {
            breadths,
            flexible,
            gap,
        }
    }

    pub fn track_count(&self) -> usize {
        self.breadths.len()
    }

    pub fn breadths(&self) -> &[f64] {
        &self.breadths
    }

    pub fn gap(&self) -> f64 {
        self.gap
    }

    pub fn is_flexible(&self, track: usize) -> bool {
        self.flexible.get(track).copied().unwrap_or(false)
    }

    /// Gaps that precede `line`. The end line sits after the last track,
    /// which has no trailing gap.
    fn gaps_before(&self, line: usize) -> usize {
        let count = self.track_count();
        if line >= count {
            count.saturating_sub(1)
        } else {
            line
        }
    }

    /// Offset of grid line `line` from the start of the grid.
    ///
    /// Lines past the end clamp to the end line. With `exclude_flex`, flexible
    /// tracks contribute nothing.
    pub fn calc_pos(&self, line: usize, exclude_flex: bool) -> f64 {
        let line = line.min(self.track_count());
        let tracks: f64 = self.breadths[..line]
            .iter()
            .zip(&self.flexible)
            .filter(|(_, flex)| !(exclude_flex && **flex))
            .map(|(breadth, _)| breadth)
            .sum();
        tracks + self.gap * self.gaps_before(line) as f64
    }

    /// Total extent of the axis, gaps included.
    pub fn calc_size(&self, exclude_flex: bool) -> f64 {
        self.calc_pos(self.track_count(), exclude_flex)
    }

    /// Start offset and size of the area covering `span`.
    ///
    /// The size includes the gaps between spanned tracks but not the gap
    /// after the last one.
    pub fn span_extent(&self, span: &Range<usize>) -> (f64, f64) {
        let count = self.track_count();
        let start = self.calc_pos(span.start, false);
        let end = if span.end >= count {
            self.calc_pos(count, false)
        } else {
            self.calc_pos(span.end, false) - self.gap
        };
        (start, (end - start).max(0.0))
    }

    fn check_span(&self, axis: Axis, span: &Range<usize>) -> Result<(), LayoutError> {
        if span.start >= span.end || span.end > self.track_count() {
            return Err(LayoutError::InvalidLineRange {
                axis,
                range: span.clone(),
                track_count: self.track_count(),
            });
        }
        Ok(())
    }

    /// Rectangles for every cell, row-major, with `self` as the columns.
    pub fn cell_areas(&self, rows: &SolvedAxis) -> Vec<Rect> {
        let mut areas = Vec::with_capacity(self.track_count() * rows.track_count());
        for row in 0..rows.track_count() {
            for column in 0..self.track_count() {
                areas.push(calc_area(self, rows, &(column..column + 1), &(row..row + 1)));
            }
        }
        areas
    }
}

/// Rectangle covering the given column and row spans.
///
/// Out-of-range lines are clamped to the grid.
pub fn calc_area(
    columns: &SolvedAxis,
    rows: &SolvedAxis,
    column_span: &Range<usize>,
    row_span: &Range<usize>,
) -> Rect {
    let (x, width) = columns.span_extent(column_span);
    let (y, height) = rows.span_extent(row_span);
    Rect::new(x, y, width, height)
}

/// Rectangle covering the given spans, rejecting empty or out-of-range spans.
pub fn try_calc_area(
    columns: &SolvedAxis,
    rows: &SolvedAxis,
    column_span: &Range<usize>,
    row_span: &Range<usize>,
) -> Result<Rect, LayoutError> {
    let checked = columns
        .check_span(Axis::Column, column_span)
        .and_then(|_| rows.check_span(Axis::Row, row_span));
    if let Err(err) = checked {
        warn!(%err, "Area outside the grid");
        return Err(err);
    }
    Ok(calc_area(columns, rows, column_span, row_span))
}
