//! Track sizing algorithm.
//!
//! Computes the used breadth of every track along one axis:
//!
//! 1. **Initialize**: base size from a fixed minimum, growth limit from a fixed maximum
//! 2. **Resolve content**: grow intrinsic tracks to fit item contributions, grouped by span count
//! 3. **Maximize**: grow non-flexible tracks toward their growth limits
//! 4. **Expand flexible tracks**: share the leftover space by `fr` factor
//!
//! All per-track variables live in a [`SolverState`] scoped to one call, and
//! the answer is returned as a [`SolvedAxis`] only after every phase has run.

use std::ops::Range;

use gridkit_css::Track;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::distribution::{distribute_space_to_tracks, Accumulator};
use crate::flexible::{calculate_remaining_space, find_fr_size};
use crate::geometry::SolvedAxis;
use crate::measure_cache::ContentSizingMode;
use crate::state::{SolverState, SpanGroup, TrackState};
use crate::EPSILON;

/// Source of the items placed along one axis.
///
/// Item indices run from `0` to `item_count() - 1`. Content queries take
/// `&mut self` so implementations can measure lazily and memoize.
pub trait ItemContributions {
    fn item_count(&self) -> usize;

    /// Tracks the item covers, as a half-open index range.
    fn span(&self, item: usize) -> Range<usize>;

    /// The item's minimum content contribution along this axis.
    fn min_content(&mut self, item: usize) -> f64;

    /// The item's maximum content contribution along this axis.
    fn max_content(&mut self, item: usize) -> f64;
}

/// An item with precomputed contributions.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisItem {
    pub span: Range<usize>,
    pub min_content: f64,
    pub max_content: f64,
}

impl AxisItem {
    pub fn new(span: Range<usize>, min_content: f64, max_content: f64) -> Self {
        Self {
            span,
            min_content,
            max_content,
        }
    }
}

impl ItemContributions for Vec<AxisItem> {
    fn item_count(&self) -> usize {
        self.len()
    }

    fn span(&self, item: usize) -> Range<usize> {
        self[item].span.clone()
    }

    fn min_content(&mut self, item: usize) -> f64 {
        self[item].min_content
    }

    fn max_content(&mut self, item: usize) -> f64 {
        self[item].max_content
    }
}

/// Inputs for sizing one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizingParams {
    /// Container size along the axis. Non-finite means indefinite.
    pub available_size: f64,
    /// Gap between adjacent tracks.
    pub gap: f64,
    /// Share space left after flexible tracks among `auto` tracks.
    pub stretch_auto_tracks: bool,
}

impl Default for SizingParams {
    fn default() -> Self {
        Self {
            available_size: f64::INFINITY,
            gap: 0.0,
            stretch_auto_tracks: false,
        }
    }
}

impl SizingParams {
    pub fn new(available_size: f64) -> Self {
        Self {
            available_size,
            ..Default::default()
        }
    }

    pub fn with_gap(mut self, gap: f64) -> Self {
        self.gap = gap;
        self
    }

    pub fn with_stretch_auto_tracks(mut self, stretch: bool) -> Self {
        self.stretch_auto_tracks = stretch;
        self
    }

    pub fn is_definite(&self) -> bool {
        self.available_size.is_finite()
    }

    fn gaps_within(&self, track_count: usize) -> f64 {
        self.gap * track_count.saturating_sub(1) as f64
    }
}

/// Size the tracks of one axis.
pub fn compute_used_breadth(
    tracks: &[Track],
    items: &mut dyn ItemContributions,
    params: &SizingParams,
) -> SolvedAxis {
    let mut state = SolverState::new(tracks.len());
    compute_used_breadth_with_state(tracks, &mut state, items, params)
}

/// Size the tracks of one axis, leaving the final solver variables in `state`.
pub fn compute_used_breadth_with_state(
    tracks: &[Track],
    state: &mut SolverState,
    items: &mut dyn ItemContributions,
    params: &SizingParams,
) -> SolvedAxis {
    state.reset(tracks.len());
    if tracks.is_empty() {
        return SolvedAxis::new(Vec::new(), Vec::new(), params.gap);
    }

    debug!(
        tracks = tracks.len(),
        items = items.item_count(),
        available = params.available_size,
        gap = params.gap,
        "Sizing tracks"
    );

    initialize_track_sizes(tracks, state, params.available_size);
    resolve_content_based_track_sizes(tracks, state, items, params);
    maximize_tracks(tracks, state, params);
    expand_flexible_tracks(tracks, state, items, params);
    if params.stretch_auto_tracks {
        stretch_auto_tracks(tracks, state, params);
    }

    let breadths = state.used_breadths();
    for (index, breadth) in breadths.iter().enumerate() {
        trace!(track = index, breadth, "Track sized");
    }
    debug!(total = breadths.iter().sum::<f64>(), "Tracks sized");

    SolvedAxis::new(
        breadths,
        tracks.iter().map(Track::is_flex).collect(),
        params.gap,
    )
}

/// Phase 1: base sizes and growth limits from the sizing functions.
fn initialize_track_sizes(tracks: &[Track], state: &mut SolverState, available: f64) {
    for (track, s) in tracks.iter().zip(state.tracks.iter_mut()) {
        s.used_breadth = track.min.resolve(available).unwrap_or(0.0).max(0.0);
        s.max_breadth = match track.max.resolve(available) {
            Some(max) => max.max(s.used_breadth),
            None if track.is_flex() => s.used_breadth,
            None => f64::INFINITY,
        };
    }
}

fn min_is_content(track: &Track) -> bool {
    track.min.is_content()
}

fn min_is_max_content(track: &Track) -> bool {
    track.min.is_max_content()
}

fn max_is_content(track: &Track) -> bool {
    track.max.is_content()
}

fn max_is_max_content(track: &Track) -> bool {
    track.max.is_max_content()
}

/// Tracks that receive space left over once every candidate has reached its constraint.
#[derive(Clone, Copy)]
enum Overflow {
    /// Candidates matching the predicate, or every candidate if none match.
    Matching(fn(&Track) -> bool),
    /// Every candidate.
    Candidates,
}

/// One of the four content sub-passes run per span group.
struct SubPass {
    accumulator: Accumulator,
    mode: ContentSizingMode,
    selects: fn(&Track) -> bool,
    overflow: Overflow,
    /// Treat the constraint as unbounded when the growth limit was made
    /// finite by the group being resolved.
    unbounded_for_own_group: bool,
}

const SUB_PASSES: [SubPass; 4] = [
    SubPass {
        accumulator: Accumulator::UsedBreadth,
        mode: ContentSizingMode::MinContent,
        selects: min_is_content,
        overflow: Overflow::Matching(max_is_content),
        unbounded_for_own_group: false,
    },
    SubPass {
        accumulator: Accumulator::UsedBreadth,
        mode: ContentSizingMode::MaxContent,
        selects: min_is_max_content,
        overflow: Overflow::Matching(max_is_max_content),
        unbounded_for_own_group: false,
    },
    SubPass {
        accumulator: Accumulator::MaxBreadth,
        mode: ContentSizingMode::MinContent,
        selects: max_is_content,
        overflow: Overflow::Candidates,
        unbounded_for_own_group: false,
    },
    SubPass {
        accumulator: Accumulator::MaxBreadth,
        mode: ContentSizingMode::MaxContent,
        selects: max_is_max_content,
        overflow: Overflow::Candidates,
        unbounded_for_own_group: true,
    },
];

/// Phase 2: grow intrinsic tracks so item content fits.
///
/// Items spanning more than one track are skipped when any spanned track is
/// flexible. The rest are grouped by span count and resolved smallest first.
fn resolve_content_based_track_sizes(
    tracks: &[Track],
    state: &mut SolverState,
    items: &mut dyn ItemContributions,
    params: &SizingParams,
) {
    let track_count = tracks.len();
    let mut eligible: Vec<(usize, Range<usize>)> = (0..items.item_count())
        .filter_map(|item| {
            let span = clamp_span(items.span(item), track_count)?;
            if span.len() > 1 && span.clone().any(|t| tracks[t].is_flex()) {
                trace!(item, ?span, "Spans a flexible track, skipped");
                return None;
            }
            Some((item, span))
        })
        .collect();
    eligible.sort_by_key(|(_, span)| span.len());

    let mut start = 0;
    while start < eligible.len() {
        let span_count = eligible[start].1.len();
        let end = eligible[start..]
            .iter()
            .position(|(_, span)| span.len() != span_count)
            .map_or(eligible.len(), |offset| start + offset);
        let group = &eligible[start..end];
        let ids: SpanGroup = group.iter().map(|(item, _)| *item).collect();

        for sub in &SUB_PASSES {
            resolve_sub_pass(tracks, state, items, group, &ids, sub, params.gap);
        }
        clamp_fit_content_limits(tracks, state, params.available_size);

        trace!(span_count, items = group.len(), "Resolved span group");
        start = end;
    }

    for s in state.tracks.iter_mut() {
        if !s.max_breadth.is_finite() {
            s.max_breadth = s.used_breadth;
        }
    }
}

fn resolve_sub_pass(
    tracks: &[Track],
    state: &mut SolverState,
    items: &mut dyn ItemContributions,
    group: &[(usize, Range<usize>)],
    ids: &SpanGroup,
    sub: &SubPass,
    gap: f64,
) {
    let accumulator = sub.accumulator;
    for s in state.tracks.iter_mut() {
        accumulator.stage(s);
    }

    for (item, span) in group {
        let mut candidates: SmallVec<[usize; 8]> =
            span.clone().filter(|&t| (sub.selects)(&tracks[t])).collect();
        if candidates.is_empty() {
            continue;
        }

        let contribution = match sub.mode {
            ContentSizingMode::MinContent => items.min_content(*item),
            ContentSizingMode::MaxContent => items.max_content(*item),
        };
        let occupied: f64 = span
            .clone()
            .map(|t| accumulator.current(&state.tracks[t]))
            .sum();
        let internal_gaps = gap * (span.len() - 1) as f64;
        let space = (contribution - occupied - internal_gaps).max(0.0);

        let overflow: SmallVec<[usize; 8]> = match sub.overflow {
            Overflow::Matching(predicate) => {
                let matching: SmallVec<[usize; 8]> = candidates
                    .iter()
                    .copied()
                    .filter(|&t| predicate(&tracks[t]))
                    .collect();
                if matching.is_empty() {
                    candidates.clone()
                } else {
                    matching
                }
            }
            Overflow::Candidates => candidates.clone(),
        };

        let constraint = |_: usize, track: &TrackState| {
            if sub.unbounded_for_own_group
                && track.made_finite_by.as_deref() == Some(ids.as_slice())
            {
                f64::INFINITY
            } else {
                track.max_breadth
            }
        };
        distribute_space_to_tracks(
            state,
            space,
            &mut candidates,
            &overflow,
            accumulator,
            constraint,
        );
    }

    for s in state.tracks.iter_mut() {
        let previous = accumulator.value(s);
        let updated = accumulator.scratch(s);
        match accumulator {
            Accumulator::UsedBreadth => s.used_breadth = updated,
            Accumulator::MaxBreadth => {
                if !previous.is_finite() && updated.is_finite() {
                    s.made_finite_by = Some(ids.clone());
                }
                s.max_breadth = updated;
            }
        }
        if s.max_breadth.is_finite() && s.max_breadth < s.used_breadth {
            s.max_breadth = s.used_breadth;
        }
    }
}

fn clamp_fit_content_limits(tracks: &[Track], state: &mut SolverState, available: f64) {
    for (track, s) in tracks.iter().zip(state.tracks.iter_mut()) {
        let Some(limit) = track
            .fit_content_limit()
            .and_then(|limit| limit.resolve(available))
        else {
            continue;
        };
        s.max_breadth = s.used_breadth.max(s.max_breadth.min(limit));
    }
}

/// Phase 3: grow non-flexible tracks toward their growth limits.
///
/// Flexible tracks' base sizes count as occupied space. Skipped when the
/// available size is indefinite.
fn maximize_tracks(tracks: &[Track], state: &mut SolverState, params: &SizingParams) {
    if !params.is_definite() {
        return;
    }

    let occupied: f64 = state.tracks.iter().map(|s| s.used_breadth).sum();
    let free = params.available_size - occupied - params.gaps_within(tracks.len());
    if free <= EPSILON {
        trace!(free, "No free space to maximize");
        return;
    }

    let mut candidates: SmallVec<[usize; 8]> = (0..tracks.len())
        .filter(|&t| !tracks[t].is_flex() && state.tracks[t].has_room())
        .collect();
    if candidates.is_empty() {
        return;
    }

    for &t in &candidates {
        Accumulator::UsedBreadth.stage(&mut state.tracks[t]);
    }
    let unplaced = distribute_space_to_tracks(
        state,
        free,
        &mut candidates,
        &[],
        Accumulator::UsedBreadth,
        |_, track| track.max_breadth,
    );
    for &t in &candidates {
        let s = &mut state.tracks[t];
        s.used_breadth = s.updated_track_breadth;
    }

    debug!(free, unplaced, grown = candidates.len(), "Maximized tracks");
}

/// Phase 4: resolve `fr` tracks.
fn expand_flexible_tracks(
    tracks: &[Track],
    state: &mut SolverState,
    items: &mut dyn ItemContributions,
    params: &SizingParams,
) {
    let flex: SmallVec<[usize; 8]> = (0..tracks.len())
        .filter(|&t| tracks[t].is_flex())
        .collect();
    if flex.is_empty() {
        return;
    }

    let unit = if params.is_definite() {
        let remaining =
            calculate_remaining_space(tracks, state, params.available_size, params.gap);
        if remaining < 0.0 {
            debug!(remaining, "Fixed tracks overflow the container");
        }
        find_fr_size(tracks, state, &flex, remaining)
    } else {
        indefinite_fr_size(tracks, state, items, &flex, params.gap)
    };

    for &t in &flex {
        let factor = tracks[t].flex_factor();
        let s = &mut state.tracks[t];
        s.used_breadth = s.used_breadth.max(factor * unit);
        s.max_breadth = s.used_breadth;
        s.normalized_flex_value = if factor > 0.0 {
            s.used_breadth / factor
        } else {
            0.0
        };
    }

    debug!(unit, flex_tracks = flex.len(), "Expanded flexible tracks");
}

/// The `fr` size with no container size to share: large enough that every
/// flexible track keeps its base size and every item crossing a flexible
/// track fits its max-content contribution.
fn indefinite_fr_size(
    tracks: &[Track],
    state: &SolverState,
    items: &mut dyn ItemContributions,
    flex: &[usize],
    gap: f64,
) -> f64 {
    let mut unit = flex
        .iter()
        .filter(|&&t| tracks[t].flex_factor() > 0.0)
        .map(|&t| state.tracks[t].used_breadth / tracks[t].flex_factor())
        .fold(0.0, f64::max);

    for item in 0..items.item_count() {
        let Some(span) = clamp_span(items.span(item), tracks.len()) else {
            continue;
        };
        let span_flex: SmallVec<[usize; 8]> =
            span.clone().filter(|&t| tracks[t].is_flex()).collect();
        if span_flex.is_empty() {
            continue;
        }

        let fixed: f64 = span
            .clone()
            .filter(|&t| !tracks[t].is_flex())
            .map(|t| state.tracks[t].used_breadth)
            .sum();
        let space = items.max_content(item) - fixed - gap * (span.len() - 1) as f64;
        unit = unit.max(find_fr_size(tracks, state, &span_flex, space));
    }

    unit
}

/// Share space left after flexible tracks equally among `auto` tracks.
fn stretch_auto_tracks(tracks: &[Track], state: &mut SolverState, params: &SizingParams) {
    if !params.is_definite() {
        return;
    }

    let auto: SmallVec<[usize; 8]> = (0..tracks.len())
        .filter(|&t| tracks[t].is_auto())
        .collect();
    if auto.is_empty() {
        return;
    }

    let occupied: f64 = state.tracks.iter().map(|s| s.used_breadth).sum();
    let leftover = params.available_size - occupied - params.gaps_within(tracks.len());
    if leftover <= EPSILON {
        return;
    }

    let share = leftover / auto.len() as f64;
    for &t in &auto {
        let s = &mut state.tracks[t];
        s.used_breadth += share;
        s.max_breadth = s.max_breadth.max(s.used_breadth);
    }
    debug!(leftover, tracks = auto.len(), "Stretched auto tracks");
}

/// Clip a span to the track list, or `None` if nothing is left.
fn clamp_span(span: Range<usize>, track_count: usize) -> Option<Range<usize>> {
    let end = span.end.min(track_count);
    (span.start < end).then_some(span.start..end)
}
