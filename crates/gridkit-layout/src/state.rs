//! Per-pass solver scratch space.
//!
//! Nothing in here outlives a single call to the sizing algorithm: a fresh
//! [`SolverState`] is built from the track list at the start of every pass.

use smallvec::SmallVec;

/// Identities (item indices) of the span group that made a growth limit finite.
pub type SpanGroup = SmallVec<[usize; 4]>;

/// Solver variables for one track.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackState {
    /// Base size, and the final answer once the pass completes.
    pub used_breadth: f64,
    /// Growth limit.
    pub max_breadth: f64,
    /// Scratch for growing `used_breadth` during content resolution and maximization.
    pub updated_track_breadth: f64,
    /// Scratch for growing `max_breadth` during content resolution.
    pub updated_limit: f64,
    /// Scratch during space distribution.
    pub temp_breadth: f64,
    /// This track's breadth per `fr`.
    pub normalized_flex_value: f64,
    /// The span group whose contributions made `max_breadth` finite.
    pub made_finite_by: Option<SpanGroup>,
}

impl Default for TrackState {
    fn default() -> Self {
        Self {
            used_breadth: 0.0,
            max_breadth: f64::INFINITY,
            updated_track_breadth: 0.0,
            updated_limit: 0.0,
            temp_breadth: 0.0,
            normalized_flex_value: 0.0,
            made_finite_by: None,
        }
    }
}

impl TrackState {
    /// Whether `used_breadth` may still grow toward `max_breadth`.
    pub fn has_room(&self) -> bool {
        self.max_breadth - self.used_breadth > crate::EPSILON
    }
}

/// Solver variables for every track of one axis.
#[derive(Debug, Clone, Default)]
pub struct SolverState {
    pub tracks: Vec<TrackState>,
}

impl SolverState {
    /// Fresh state for `count` tracks.
    pub fn new(count: usize) -> Self {
        Self {
            tracks: vec![TrackState::default(); count],
        }
    }

    /// Reset every variable for a new pass over `count` tracks.
    pub fn reset(&mut self, count: usize) {
        self.tracks.clear();
        self.tracks.resize(count, TrackState::default());
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Used breadths in track order.
    pub fn used_breadths(&self) -> Vec<f64> {
        self.tracks.iter().map(|t| t.used_breadth).collect()
    }
}
