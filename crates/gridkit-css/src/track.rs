//! Track definitions.

use std::fmt;

use crate::value::{DimensionValue, SizingFunction};

/// How a track's sizing pair was written.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TrackKind {
    /// A single breadth (`100px`, `1fr`, `auto`, `min-content`).
    #[default]
    Breadth,
    /// `minmax(min, max)`.
    MinMax,
    /// `fit-content(limit)`: behaves as `minmax(min-content, max-content)`
    /// with the growth limit clamped to `limit`.
    FitContent(DimensionValue),
}

/// One column or row of the grid.
///
/// Tracks are immutable definitions. Everything the solver computes lives in
/// per-pass state owned by the layout crate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Track {
    pub kind: TrackKind,
    pub min: SizingFunction,
    pub max: SizingFunction,
}

impl Track {
    /// A track with the same sizing function on both sides.
    pub fn breadth(function: SizingFunction) -> Self {
        Self {
            kind: TrackKind::Breadth,
            min: function,
            max: function,
        }
    }

    /// A fixed pixel track.
    pub fn px(value: f64) -> Self {
        Self::breadth(SizingFunction::Fixed(DimensionValue::Px(value)))
    }

    /// A percentage track.
    pub fn percent(value: f64) -> Self {
        Self::breadth(SizingFunction::Fixed(DimensionValue::Percent(value)))
    }

    /// A flexible track.
    pub fn fr(factor: f64) -> Self {
        Self::breadth(SizingFunction::Fixed(DimensionValue::Fr(factor)))
    }

    /// `auto`: `minmax(min-content, max-content)`.
    pub fn auto() -> Self {
        Self {
            kind: TrackKind::Breadth,
            min: SizingFunction::MinContent,
            max: SizingFunction::MaxContent,
        }
    }

    /// `minmax(min, max)`.
    pub fn minmax(min: SizingFunction, max: SizingFunction) -> Self {
        Self {
            kind: TrackKind::MinMax,
            min,
            max,
        }
    }

    /// `fit-content(limit)`.
    pub fn fit_content(limit: DimensionValue) -> Self {
        Self {
            kind: TrackKind::FitContent(limit),
            min: SizingFunction::MinContent,
            max: SizingFunction::MaxContent,
        }
    }

    /// Whether the maximum sizing function is flexible.
    pub fn is_flex(&self) -> bool {
        self.max.is_flex()
    }

    /// Flex factor, or 0 when not flexible.
    pub fn flex_factor(&self) -> f64 {
        self.max.flex_factor()
    }

    pub fn is_min_max(&self) -> bool {
        self.kind == TrackKind::MinMax
    }

    /// The `fit-content()` limit, if this is a fit-content track.
    pub fn fit_content_limit(&self) -> Option<DimensionValue> {
        match self.kind {
            TrackKind::FitContent(limit) => Some(limit),
            _ => None,
        }
    }

    /// Whether this is the `auto` keyword track (content on both sides, not fit-content).
    pub fn is_auto(&self) -> bool {
        self.kind == TrackKind::Breadth
            && self.min.is_min_content()
            && self.max.is_max_content()
    }

    /// Whether both sizing functions parsed.
    pub fn is_defined(&self) -> bool {
        self.min.is_defined() && self.max.is_defined()
    }
}

impl Default for Track {
    fn default() -> Self {
        Self::auto()
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TrackKind::FitContent(limit) => write!(f, "fit-content({})", limit),
            TrackKind::MinMax => write!(f, "minmax({}, {})", self.min, self.max),
            TrackKind::Breadth if self.is_auto() => f.write_str("auto"),
            TrackKind::Breadth => write!(f, "{}", self.max),
        }
    }
}
