//! Dimension values and track sizing functions.
//!
//! A [`DimensionValue`] is a typed length as written in a definition string
//! (`100px`, `20%`, `1fr`). A [`SizingFunction`] classifies one side of a
//! track's `(min, max)` pair as a fixed value or a content keyword.

use std::fmt;

/// A typed length.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DimensionValue {
    /// Pixels.
    Px(f64),
    /// Percentage of the container's axis size (0.0-100.0).
    Percent(f64),
    /// Flexible share of the leftover space.
    Fr(f64),
    /// Parse-failure sentinel, also produced by the `auto` keyword.
    #[default]
    Undefined,
}

impl DimensionValue {
    /// Resolve to pixels against the container's size along the same axis.
    ///
    /// Returns `None` for flexible and undefined values. A percentage against
    /// an indefinite (non-finite) axis resolves to zero.
    pub fn resolve(&self, axis_size: f64) -> Option<f64> {
        match *self {
            DimensionValue::Px(px) => Some(px),
            DimensionValue::Percent(pct) => {
                if axis_size.is_finite() {
                    Some(pct / 100.0 * axis_size)
                } else {
                    Some(0.0)
                }
            }
            DimensionValue::Fr(_) | DimensionValue::Undefined => None,
        }
    }

    /// The number as written, without its unit.
    pub fn raw(&self) -> f64 {
        match *self {
            DimensionValue::Px(v) | DimensionValue::Percent(v) | DimensionValue::Fr(v) => v,
            DimensionValue::Undefined => 0.0,
        }
    }

    /// Whether this is a concrete length (pixels or percentage).
    pub fn is_length(&self) -> bool {
        matches!(self, DimensionValue::Px(_) | DimensionValue::Percent(_))
    }

    /// Whether this is an `fr` value.
    pub fn is_flex(&self) -> bool {
        matches!(self, DimensionValue::Fr(_))
    }

    /// Whether this value is the parse-failure sentinel.
    pub fn is_undefined(&self) -> bool {
        matches!(self, DimensionValue::Undefined)
    }
}

impl fmt::Display for DimensionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DimensionValue::Px(v) => write!(f, "{}px", v),
            DimensionValue::Percent(v) => write!(f, "{}%", v),
            DimensionValue::Fr(v) => write!(f, "{}fr", v),
            DimensionValue::Undefined => f.write_str("auto"),
        }
    }
}

/// One side (minimum or maximum) of a track's sizing constraint.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SizingFunction {
    /// Parse-failure sentinel. Never reaches the solver.
    #[default]
    Undefined,
    /// A length, percentage or flexible value.
    Fixed(DimensionValue),
    /// Size to the largest minimum content contribution.
    MinContent,
    /// Size to the largest maximum content contribution.
    MaxContent,
}

impl SizingFunction {
    /// Fixed and a concrete length (not `fr`).
    pub fn is_fixed(&self) -> bool {
        matches!(self, SizingFunction::Fixed(value) if value.is_length())
    }

    /// Fixed and an `fr` value.
    pub fn is_flex(&self) -> bool {
        matches!(self, SizingFunction::Fixed(value) if value.is_flex())
    }

    /// Anything that is not a concrete length.
    pub fn is_intrinsic(&self) -> bool {
        !self.is_fixed()
    }

    pub fn is_min_content(&self) -> bool {
        matches!(self, SizingFunction::MinContent)
    }

    pub fn is_max_content(&self) -> bool {
        matches!(self, SizingFunction::MaxContent)
    }

    /// Either content keyword.
    pub fn is_content(&self) -> bool {
        self.is_min_content() || self.is_max_content()
    }

    /// Whether the function was parsed successfully.
    pub fn is_defined(&self) -> bool {
        match self {
            SizingFunction::Undefined => false,
            SizingFunction::Fixed(value) => !value.is_undefined(),
            _ => true,
        }
    }

    /// Flex factor, or 0 when not flexible.
    pub fn flex_factor(&self) -> f64 {
        match self {
            SizingFunction::Fixed(DimensionValue::Fr(factor)) => *factor,
            _ => 0.0,
        }
    }

    /// Resolved pixel length for fixed functions.
    pub fn resolve(&self, axis_size: f64) -> Option<f64> {
        match self {
            SizingFunction::Fixed(value) => value.resolve(axis_size),
            _ => None,
        }
    }
}

impl fmt::Display for SizingFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizingFunction::Undefined => f.write_str("<undefined>"),
            SizingFunction::Fixed(value) => write!(f, "{}", value),
            SizingFunction::MinContent => f.write_str("min-content"),
            SizingFunction::MaxContent => f.write_str("max-content"),
        }
    }
}
