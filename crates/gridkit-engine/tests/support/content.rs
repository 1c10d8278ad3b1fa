//! Content fixtures.

use gridkit_engine::{Axis, ContentMeasurable};

/// A run of equal-width words that wraps to the width it is given.
///
/// Min-content width is one word, max-content width is every word on one
/// line. Height depends on the column width the row pass supplies.
#[derive(Debug, Clone, Copy)]
pub struct WrappingText {
    pub words: usize,
    pub word_width: f64,
    pub line_height: f64,
}

impl WrappingText {
    pub fn new(words: usize, word_width: f64, line_height: f64) -> Self {
        Self {
            words,
            word_width,
            line_height,
        }
    }

    fn lines_at(&self, width: f64) -> usize {
        if self.words == 0 {
            return 0;
        }
        let per_line = ((width / self.word_width).floor() as usize).max(1);
        self.words.div_ceil(per_line)
    }

    fn height_at(&self, width: Option<f64>) -> f64 {
        let width = width.unwrap_or(self.words as f64 * self.word_width);
        self.lines_at(width) as f64 * self.line_height
    }
}

impl ContentMeasurable for WrappingText {
    fn min_content(&self, axis: Axis, cross_size: Option<f64>) -> f64 {
        match axis {
            Axis::Column => self.word_width,
            Axis::Row => self.height_at(cross_size),
        }
    }

    fn max_content(&self, axis: Axis, cross_size: Option<f64>) -> f64 {
        match axis {
            Axis::Column => self.words as f64 * self.word_width,
            Axis::Row => self.height_at(cross_size),
        }
    }
}
