//! # GridKit Layout
//!
//! Track sizing and placement for the GridKit grid engine.
//!
//! ## Overview
//!
//! Given the tracks of one axis and the items spanning them, the sizing
//! algorithm computes every track's used breadth in four ordered phases:
//!
//! 1. Initialize base sizes and growth limits from the sizing functions
//! 2. Grow intrinsic tracks to fit item content, smallest spans first
//! 3. Grow non-flexible tracks toward their growth limits
//! 4. Share the leftover space among `fr` tracks
//!
//! Geometry then turns solved breadths into line positions and rectangles.
//!
//! ## References
//!
//! - [CSS Grid Layout Module Level 1, §11 Grid Sizing](https://www.w3.org/TR/css-grid-1/#layout-algorithm)

pub mod distribution;
pub mod flexible;
pub mod geometry;
pub mod measure_cache;
pub mod state;
pub mod track_sizing;

pub use distribution::{distribute_space_to_tracks, Accumulator};
pub use flexible::{calculate_remaining_space, find_fr_size};
pub use geometry::{calc_area, try_calc_area, SolvedAxis};
pub use measure_cache::{CacheStats, ContentSizingMode, MeasureCache};
pub use state::{SolverState, SpanGroup, TrackState};
pub use track_sizing::{
    compute_used_breadth, compute_used_breadth_with_state, AxisItem, ItemContributions,
    SizingParams,
};

pub use gridkit_css::{DimensionValue, SizingFunction, Track, TrackKind};

use std::fmt;
use std::ops::Range;

use thiserror::Error;

/// Tolerance for comparing breadths.
pub const EPSILON: f64 = 1e-6;

/// Errors that can occur in layout.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Line range {range:?} is invalid for {track_count} {axis} tracks")]
    InvalidLineRange {
        axis: Axis,
        range: Range<usize>,
        track_count: usize,
    },
}

/// Grid axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal: tracks are columns, breadths are widths.
    Column,
    /// Vertical: tracks are rows, breadths are heights.
    Row,
}

impl Axis {
    /// The other axis.
    pub fn cross(self) -> Self {
        match self {
            Axis::Column => Axis::Row,
            Axis::Row => Axis::Column,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Column => f.write_str("column"),
            Axis::Row => f.write_str("row"),
        }
    }
}

/// A 2D rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Whether the two rectangles share any area.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}
