//! Space distribution across a set of tracks.
//!
//! Shared by content resolution (phase 2) and maximization (phase 3).

use tracing::trace;

use crate::state::{SolverState, TrackState};
use crate::EPSILON;

/// Which track variable a distribution pass grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accumulator {
    /// Base sizes, staged in `updated_track_breadth`.
    UsedBreadth,
    /// Growth limits, staged in `updated_limit`.
    MaxBreadth,
}

impl Accumulator {
    /// Committed value of this accumulator.
    pub fn value(self, track: &TrackState) -> f64 {
        match self {
            Accumulator::UsedBreadth => track.used_breadth,
            Accumulator::MaxBreadth => track.max_breadth,
        }
    }

    /// Staging slot for this accumulator.
    pub fn scratch(self, track: &TrackState) -> f64 {
        match self {
            Accumulator::UsedBreadth => track.updated_track_breadth,
            Accumulator::MaxBreadth => track.updated_limit,
        }
    }

    pub fn scratch_mut(self, track: &mut TrackState) -> &mut f64 {
        match self {
            Accumulator::UsedBreadth => &mut track.updated_track_breadth,
            Accumulator::MaxBreadth => &mut track.updated_limit,
        }
    }

    /// Copy the committed value into the staging slot.
    pub fn stage(self, track: &mut TrackState) {
        let value = self.value(track);
        *self.scratch_mut(track) = value;
    }

    /// The breadth a track grows from: the committed value when finite,
    /// otherwise its base size.
    pub fn current(self, track: &TrackState) -> f64 {
        let value = self.value(track);
        if value.is_finite() {
            value
        } else {
            track.used_breadth
        }
    }
}

/// Distribute `space` across `candidates`, staging results in `accumulator`'s slot.
///
/// Candidates are visited in ascending order of headroom (`constraint - current`)
/// and each takes an equal share of what remains, capped at its headroom. Any
/// space left after every candidate has hit its constraint is shared equally
/// among `beyond`, which must be a subset of `candidates`. The staged value of
/// each candidate becomes the larger of its previous staged value and the
/// distributed breadth.
///
/// Returns the space that could not be placed.
pub fn distribute_space_to_tracks<C>(
    state: &mut SolverState,
    space: f64,
    candidates: &mut [usize],
    beyond: &[usize],
    accumulator: Accumulator,
    constraint: C,
) -> f64
where
    C: Fn(usize, &TrackState) -> f64,
{
    if candidates.is_empty() {
        return space.max(0.0);
    }

    let headroom = |index: usize, state: &SolverState| {
        let track = &state.tracks[index];
        constraint(index, track) - accumulator.current(track)
    };
    candidates.sort_by(|&a, &b| headroom(a, state).total_cmp(&headroom(b, state)));

    let mut remaining = space.max(0.0);
    let count = candidates.len();
    for (position, &index) in candidates.iter().enumerate() {
        let cap = headroom(index, state).max(0.0);
        let track = &mut state.tracks[index];
        let share = (remaining / (count - position) as f64).min(cap);
        track.temp_breadth = accumulator.current(track) + share;
        remaining -= share;
    }

    if remaining > EPSILON && !beyond.is_empty() {
        let count = beyond.len();
        for (position, &index) in beyond.iter().enumerate() {
            let share = remaining / (count - position) as f64;
            state.tracks[index].temp_breadth += share;
            remaining -= share;
        }
    }

    for &index in candidates.iter() {
        let track = &mut state.tracks[index];
        let temp = track.temp_breadth;
        let slot = accumulator.scratch_mut(track);
        *slot = if slot.is_finite() {
            slot.max(temp)
        } else {
            temp
        };
        trace!(track = index, breadth = *slot, ?accumulator, "Distributed");
    }

    remaining.max(0.0)
}
