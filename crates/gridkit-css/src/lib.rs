//! # GridKit CSS
//!
//! Definition parsing for the GridKit grid engine.
//!
//! ## Design Goals
//!
//! 1. **Typed values**: Lengths, percentages and `fr` shares as a closed enum
//! 2. **Track lists**: `100px 1fr minmax(50px, 1fr) fit-content(20%) repeat(2, auto)`
//! 3. **Spans**: `2 / 4`, `2 / span 3`, `span 2` with an implicit auto cursor
//! 4. **Recovery**: Malformed input degrades to a default and is logged, never fatal

pub mod parser;
pub mod track;
pub mod value;

pub use parser::{
    parse_gap, parse_sizing_function, parse_span, parse_track, parse_tracks, parse_value,
    try_parse_gap, try_parse_span, try_parse_tracks, Cursor, MAX_TRACKS,
};
pub use track::{Track, TrackKind};
pub use value::{DimensionValue, SizingFunction};

use thiserror::Error;

/// Errors that can occur while parsing grid definitions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CssError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Invalid span: '{0}'")]
    InvalidSpan(String),

    #[error("Track list is empty")]
    EmptyTrackList,
}
