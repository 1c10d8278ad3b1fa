//! Content measurement cache for a single layout pass.
//!
//! Content resolution asks every item for its min-content and max-content
//! contribution several times per span group. Measuring may be expensive
//! (text shaping, nested layout), so the engine routes each query through
//! this cache.
//!
//! # Design
//!
//! The cache is owned by one layout pass and dropped with it, so stale
//! entries never survive a definition or content change. Keys are composed of:
//! - Item index within the pass
//! - Axis being measured
//! - Sizing mode (MinContent or MaxContent)
//! - Cross-axis size the measurement was taken at (bit pattern, `None` = unconstrained)
//!
//! # Usage
//!
//! ```ignore
//! let mut cache = MeasureCache::new();
//! let width = cache.get_or_measure(item, Axis::Column, ContentSizingMode::MaxContent, None, || {
//!     expensive_measurement()
//! });
//! ```

use std::collections::HashMap;

use tracing::trace;

use crate::Axis;

/// Content sizing mode for cache lookups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContentSizingMode {
    /// The smallest size the content can take without overflowing.
    /// For text, typically the width of the longest word.
    MinContent,
    /// The size the content takes with no wrapping.
    MaxContent,
}

type CacheKey = (usize, Axis, ContentSizingMode, Option<u64>);

/// Per-pass memo of item content measurements.
#[derive(Debug, Default)]
pub struct MeasureCache {
    entries: HashMap<CacheKey, f64>,
    lookups: usize,
    hits: usize,
    stores: usize,
}

/// Cache statistics for debugging and profiling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub lookups: usize,
    pub hits: usize,
    pub stores: usize,
}

impl CacheStats {
    /// Hit rate as a percentage (0-100).
    pub fn hit_rate(&self) -> f64 {
        if self.lookups == 0 {
            0.0
        } else {
            (self.hits as f64 / self.lookups as f64) * 100.0
        }
    }
}

impl MeasureCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(item: usize, axis: Axis, mode: ContentSizingMode, cross: Option<f64>) -> CacheKey {
        (item, axis, mode, cross.map(f64::to_bits))
    }

    /// Look up a cached measurement.
    pub fn lookup(
        &mut self,
        item: usize,
        axis: Axis,
        mode: ContentSizingMode,
        cross: Option<f64>,
    ) -> Option<f64> {
        self.lookups += 1;
        let value = self
            .entries
            .get(&Self::key(item, axis, mode, cross))
            .copied();
        if value.is_some() {
            self.hits += 1;
        }
        value
    }

    /// Store a measurement. Non-finite values are not cached.
    pub fn store(
        &mut self,
        item: usize,
        axis: Axis,
        mode: ContentSizingMode,
        cross: Option<f64>,
        value: f64,
    ) {
        if !value.is_finite() {
            return;
        }
        self.entries
            .insert(Self::key(item, axis, mode, cross), value);
        self.stores += 1;
    }

    /// Return the cached measurement, or run `measure` and cache its result.
    pub fn get_or_measure<F>(
        &mut self,
        item: usize,
        axis: Axis,
        mode: ContentSizingMode,
        cross: Option<f64>,
        measure: F,
    ) -> f64
    where
        F: FnOnce() -> f64,
    {
        if let Some(value) = self.lookup(item, axis, mode, cross) {
            return value;
        }
        let value = measure();
        trace!(item, %axis, ?mode, value, "Measured content");
        self.store(item, axis, mode, cross, value);
        value
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            lookups: self.lookups,
            hits: self.hits,
            stores: self.stores,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
