//! Flexible (`fr`) track resolution.

use gridkit_css::Track;
use smallvec::SmallVec;
use tracing::trace;

use crate::state::SolverState;
use crate::EPSILON;

/// Space left for flexible tracks: `available` minus every non-flexible
/// track's base size and all gaps between tracks.
pub fn calculate_remaining_space(
    tracks: &[Track],
    state: &SolverState,
    available: f64,
    gap: f64,
) -> f64 {
    let fixed: f64 = tracks
        .iter()
        .zip(&state.tracks)
        .filter(|(track, _)| !track.is_flex())
        .map(|(_, s)| s.used_breadth)
        .sum();
    available - fixed - gap * tracks.len().saturating_sub(1) as f64
}

/// Find the size of one `fr` when `space` is shared among `flex_tracks`.
///
/// A track whose share would fall below its base size keeps its base size:
/// it leaves the pool, its base size is taken out of `space`, and the unit is
/// recomputed. Iterates until every remaining track fits. Tracks with a zero
/// flex factor never join the pool.
pub fn find_fr_size(tracks: &[Track], state: &SolverState, flex_tracks: &[usize], space: f64) -> f64 {
    let mut pool: SmallVec<[usize; 8]> = flex_tracks
        .iter()
        .copied()
        .filter(|&i| tracks[i].flex_factor() > 0.0)
        .collect();
    let mut space_left = space;

    loop {
        let factor_sum: f64 = pool.iter().map(|&i| tracks[i].flex_factor()).sum();
        if factor_sum <= 0.0 {
            return 0.0;
        }

        let unit = space_left.max(0.0) / factor_sum;
        let before = pool.len();
        pool.retain(|index| {
            let base = state.tracks[*index].used_breadth;
            if tracks[*index].flex_factor() * unit < base - EPSILON {
                space_left -= base;
                false
            } else {
                true
            }
        });

        if pool.len() == before {
            trace!(unit, pool = pool.len(), "Resolved fr size");
            return unit;
        }
    }
}
