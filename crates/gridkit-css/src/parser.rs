//! Definition string parsing.
//!
//! Track lists (`"100px 1fr minmax(50px, 1fr)"`), item spans (`"2 / 4"`,
//! `"span 2"`) and gaps (`"10px"`). Every public entry point comes in two
//! flavours: a strict `try_*` function returning [`CssError`], and a lenient
//! one that logs a warning and substitutes a default so a broken definition
//! still lays out.

use std::ops::Range;

use smallvec::SmallVec;
use tracing::{trace, warn};

use crate::track::Track;
use crate::value::{DimensionValue, SizingFunction};
use crate::CssError;

/// Upper bound on the tracks a single definition may expand to.
pub const MAX_TRACKS: usize = 10_000;

/// A position in a definition string.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Byte offset into the input.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The unconsumed input.
    pub fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    /// Consume `c` if it is next.
    pub fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    /// Consume `keyword` if it is next and followed by a word boundary.
    pub fn eat_keyword(&mut self, keyword: &str) -> bool {
        let rest = self.rest();
        if !rest.starts_with(keyword) {
            return false;
        }
        let boundary = rest[keyword.len()..]
            .chars()
            .next()
            .map_or(true, |c| !(c.is_ascii_alphanumeric() || c == '-'));
        if boundary {
            self.pos += keyword.len();
        }
        boundary
    }

    /// Consume a decimal number (`12`, `-3`, `.5`, `1.25`).
    ///
    /// Leaves the cursor untouched when no digits follow.
    pub fn parse_number(&mut self) -> Option<f64> {
        let rest = self.rest();
        let bytes = rest.as_bytes();
        let mut end = 0;
        if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
            end += 1;
        }
        let digits_start = end;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        let mut digits = end - digits_start;
        if end < bytes.len() && bytes[end] == b'.' {
            let frac_start = end + 1;
            let mut frac_end = frac_start;
            while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
                frac_end += 1;
            }
            if frac_end > frac_start {
                digits += frac_end - frac_start;
                end = frac_end;
            }
        }
        if digits == 0 {
            return None;
        }
        let value = rest[..end].parse::<f64>().ok()?;
        self.pos += end;
        Some(value)
    }

    /// Consume a positive whole number.
    fn parse_count(&mut self) -> Option<usize> {
        let start = self.pos;
        match self.parse_number() {
            Some(n) if n >= 1.0 && n.fract() == 0.0 => Some(n as usize),
            _ => {
                self.pos = start;
                None
            }
        }
    }

    fn at_value_boundary(&self) -> bool {
        self.peek()
            .map_or(true, |c| c.is_whitespace() || c == ',' || c == ')')
    }

    fn error(&self, message: impl Into<String>) -> CssError {
        CssError::ParseError(format!(
            "{} at offset {} in '{}'",
            message.into(),
            self.pos,
            self.input
        ))
    }

    fn expect(&mut self, c: char) -> Result<(), CssError> {
        self.skip_whitespace();
        if self.eat(c) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{}'", c)))
        }
    }
}

/// Parse a number with an optional `px`, `%` or `fr` suffix, or `auto`.
///
/// Unrecognized input yields [`DimensionValue::Undefined`] and leaves the
/// cursor in front of the offending token. A bare number is taken as pixels.
pub fn parse_value(cursor: &mut Cursor<'_>) -> DimensionValue {
    cursor.skip_whitespace();
    if cursor.eat_keyword("auto") {
        return DimensionValue::Undefined;
    }

    let start = cursor.pos;
    let Some(number) = cursor.parse_number() else {
        return DimensionValue::Undefined;
    };
    if number < 0.0 {
        warn!(value = number, "Negative dimension rejected");
        cursor.pos = start;
        return DimensionValue::Undefined;
    }

    if cursor.eat('%') {
        DimensionValue::Percent(number)
    } else if cursor.eat_keyword("px") {
        DimensionValue::Px(number)
    } else if cursor.eat_keyword("fr") {
        DimensionValue::Fr(number)
    } else if cursor.at_value_boundary() {
        warn!(value = number, "No unit given, pixels assumed");
        DimensionValue::Px(number)
    } else {
        cursor.pos = start;
        DimensionValue::Undefined
    }
}

/// Parse one side of a sizing pair. `auto` maps to `auto_as`.
pub fn parse_sizing_function(cursor: &mut Cursor<'_>, auto_as: SizingFunction) -> SizingFunction {
    cursor.skip_whitespace();
    if cursor.eat_keyword("min-content") {
        SizingFunction::MinContent
    } else if cursor.eat_keyword("max-content") {
        SizingFunction::MaxContent
    } else if cursor.eat_keyword("auto") {
        auto_as
    } else {
        match parse_value(cursor) {
            DimensionValue::Undefined => SizingFunction::Undefined,
            value => SizingFunction::Fixed(value),
        }
    }
}

/// Parse a single track: a breadth, `auto`, `minmax(a, b)` or `fit-content(a)`.
pub fn parse_track(cursor: &mut Cursor<'_>) -> Result<Track, CssError> {
    cursor.skip_whitespace();

    if cursor.eat_keyword("auto") {
        return Ok(Track::auto());
    }

    if cursor.eat_keyword("minmax") {
        cursor.expect('(')?;
        let min = parse_sizing_function(cursor, SizingFunction::MinContent);
        if !min.is_defined() {
            return Err(cursor.error("invalid minmax() minimum"));
        }
        if min.is_flex() {
            return Err(cursor.error("minmax() minimum cannot be flexible"));
        }
        cursor.expect(',')?;
        let max = parse_sizing_function(cursor, SizingFunction::MaxContent);
        if !max.is_defined() {
            return Err(cursor.error("invalid minmax() maximum"));
        }
        cursor.expect(')')?;
        return Ok(Track::minmax(min, max));
    }

    if cursor.eat_keyword("fit-content") {
        cursor.expect('(')?;
        let limit = parse_value(cursor);
        if !limit.is_length() {
            return Err(cursor.error("fit-content() requires a length or percentage"));
        }
        cursor.expect(')')?;
        return Ok(Track::fit_content(limit));
    }

    let function = parse_sizing_function(cursor, SizingFunction::MaxContent);
    if function.is_defined() {
        Ok(Track::breadth(function))
    } else {
        Err(cursor.error("unrecognized track size"))
    }
}

/// Split on whitespace outside of `(...)` and `[...]` groups.
fn split_tokens(definition: &str) -> SmallVec<[&str; 8]> {
    let mut tokens = SmallVec::new();
    let mut depth = 0usize;
    let mut start: Option<usize> = None;

    for (i, c) in definition.char_indices() {
        match c {
            '(' | '[' => {
                depth += 1;
                start.get_or_insert(i);
            }
            ')' | ']' => {
                depth = depth.saturating_sub(1);
                start.get_or_insert(i);
            }
            c if c.is_whitespace() && depth == 0 => {
                if let Some(s) = start.take() {
                    tokens.push(&definition[s..i]);
                }
            }
            _ => {
                start.get_or_insert(i);
            }
        }
    }
    if let Some(s) = start {
        tokens.push(&definition[s..]);
    }

    tokens
}

/// Split `repeat(N, tracks...)` into its count and inner track list.
fn split_repeat(token: &str) -> Result<(usize, &str), CssError> {
    let mut cursor = Cursor::new(token);
    cursor.eat_keyword("repeat");
    cursor.expect('(')?;
    cursor.skip_whitespace();
    let count = cursor
        .parse_count()
        .ok_or_else(|| cursor.error("repeat() expects a count > 0"))?;
    cursor.expect(',')?;
    let inner = cursor
        .rest()
        .trim_end()
        .strip_suffix(')')
        .ok_or_else(|| cursor.error("unterminated repeat()"))?;
    Ok((count, inner))
}

/// Parse one top-level token, appending the resulting track(s).
fn parse_token(token: &str, tracks: &mut Vec<Track>, lenient: bool) -> Result<(), CssError> {
    if token.starts_with('[') {
        warn!(names = token, "Grid line names are not supported, ignored");
        return Ok(());
    }

    if token.starts_with("repeat") {
        let (count, inner) = split_repeat(token)?;
        let mut pattern = Vec::new();
        for inner_token in split_tokens(inner) {
            parse_token(inner_token, &mut pattern, lenient)?;
        }
        if pattern.is_empty() {
            return Err(CssError::EmptyTrackList);
        }
        let room = MAX_TRACKS.saturating_sub(tracks.len()) / pattern.len();
        if count > room {
            warn!(token, count, clamped = room, "repeat() count exceeds the track limit");
        }
        for _ in 0..count.min(room) {
            tracks.extend_from_slice(&pattern);
        }
        return Ok(());
    }

    let mut cursor = Cursor::new(token);
    let parsed = parse_track(&mut cursor).and_then(|track| {
        cursor.skip_whitespace();
        if cursor.is_at_end() {
            Ok(track)
        } else {
            Err(cursor.error("unexpected trailing input"))
        }
    });

    match parsed {
        Ok(track) => tracks.push(track),
        Err(err) if lenient => {
            warn!(token, error = %err, "Invalid track, substituting auto");
            tracks.push(Track::auto());
        }
        Err(err) => return Err(err),
    }
    Ok(())
}

/// Strictly parse a track list.
pub fn try_parse_tracks(definition: &str) -> Result<Vec<Track>, CssError> {
    let mut tracks = Vec::new();
    for token in split_tokens(definition) {
        parse_token(token, &mut tracks, false)?;
    }
    if tracks.is_empty() {
        return Err(CssError::EmptyTrackList);
    }
    Ok(tracks)
}

/// Parse a track list, recovering from malformed tokens.
///
/// Bad tokens become `auto` tracks. A definition that yields nothing becomes a
/// single `auto` track.
pub fn parse_tracks(definition: &str) -> Vec<Track> {
    let mut tracks = Vec::new();
    for token in split_tokens(definition) {
        if let Err(err) = parse_token(token, &mut tracks, true) {
            warn!(token, error = %err, "Invalid track group, substituting auto");
            tracks.push(Track::auto());
        }
    }
    if tracks.is_empty() {
        warn!(definition, "Empty track list, using a single auto track");
        tracks.push(Track::auto());
    }
    trace!(definition, count = tracks.len(), "Parsed track list");
    tracks
}

/// Strictly parse a span.
///
/// Accepts `"start / end"`, `"start / span N"`, `"start"`, `"span N"` and
/// `"auto"`. Line numbers are 1-based; the result is a 0-based half-open
/// track range. `next_line` is the implicit auto cursor: `span N` and `auto`
/// start there, and it is advanced to the end of every parsed range.
pub fn try_parse_span(input: &str, next_line: &mut usize) -> Result<Range<usize>, CssError> {
    let mut cursor = Cursor::new(input);
    cursor.skip_whitespace();

    let invalid = || CssError::InvalidSpan(input.to_string());
    let spanning = |start: usize, count: usize| {
        start
            .checked_add(count)
            .map(|end| start..end)
            .ok_or_else(invalid)
    };

    let range = if cursor.eat_keyword("auto") {
        spanning(*next_line, 1)?
    } else if cursor.eat_keyword("span") {
        cursor.skip_whitespace();
        let count = cursor.parse_count().ok_or_else(invalid)?;
        spanning(*next_line, count)?
    } else {
        let start = cursor
            .parse_count()
            .ok_or_else(|| CssError::InvalidSpan(input.to_string()))?
            - 1;
        cursor.skip_whitespace();
        if cursor.eat('/') {
            cursor.skip_whitespace();
            if cursor.eat_keyword("span") {
                cursor.skip_whitespace();
                let count = cursor.parse_count().ok_or_else(invalid)?;
                spanning(start, count)?
            } else {
                let end = cursor
                    .parse_count()
                    .ok_or_else(|| CssError::InvalidSpan(input.to_string()))?
                    - 1;
                match end.cmp(&start) {
                    std::cmp::Ordering::Greater => start..end,
                    std::cmp::Ordering::Less => end..start,
                    std::cmp::Ordering::Equal => {
                        return Err(CssError::InvalidSpan(input.to_string()))
                    }
                }
            }
        } else {
            start..start + 1
        }
    };

    cursor.skip_whitespace();
    if !cursor.is_at_end() {
        return Err(CssError::InvalidSpan(input.to_string()));
    }

    *next_line = range.end;
    Ok(range)
}

/// Parse a span, collapsing malformed input to one track at the cursor.
pub fn parse_span(input: &str, next_line: &mut usize) -> Range<usize> {
    match try_parse_span(input, next_line) {
        Ok(range) => range,
        Err(err) => {
            warn!(input, error = %err, "Invalid span, using a single track");
            let start = (*next_line).min(usize::MAX - 1);
            let range = start..start + 1;
            *next_line = range.end;
            range
        }
    }
}

/// Strictly parse a gap: one non-negative length or percentage.
pub fn try_parse_gap(input: &str) -> Result<DimensionValue, CssError> {
    let mut cursor = Cursor::new(input);
    let value = parse_value(&mut cursor);
    cursor.skip_whitespace();
    if !value.is_length() || !cursor.is_at_end() {
        return Err(CssError::InvalidValue(format!("gap '{}'", input)));
    }
    Ok(value)
}

/// Parse a gap, falling back to `0px`.
pub fn parse_gap(input: &str) -> DimensionValue {
    try_parse_gap(input).unwrap_or_else(|err| {
        warn!(input, error = %err, "Invalid gap, using 0px");
        DimensionValue::Px(0.0)
    })
}
