//! Content measurement seam between the engine and the host scene.

use std::collections::HashMap;
use std::ops::Range;

use gridkit_layout::{Axis, ContentSizingMode, ItemContributions, MeasureCache};
use tracing::warn;

use crate::placement::{ItemId, Placement};

/// Something that can report the size of its own content.
///
/// `cross_size` is the item's size along the other axis when it is already
/// known. Rows are measured after columns are solved, so row queries receive
/// the item's column width and wrapping content can reflow to it.
pub trait ContentMeasurable {
    fn min_content(&self, axis: Axis, cross_size: Option<f64>) -> f64;
    fn max_content(&self, axis: Axis, cross_size: Option<f64>) -> f64;
}

/// Looks up the measurable content behind an item.
pub trait ContentHost {
    fn content(&self, id: ItemId) -> Option<&dyn ContentMeasurable>;
}

impl<C: ContentMeasurable> ContentHost for HashMap<ItemId, C> {
    fn content(&self, id: ItemId) -> Option<&dyn ContentMeasurable> {
        self.get(&id).map(|content| content as &dyn ContentMeasurable)
    }
}

/// Content with a fixed intrinsic size that does not reflow.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FixedContent {
    pub min_width: f64,
    pub max_width: f64,
    pub min_height: f64,
    pub max_height: f64,
}

impl FixedContent {
    /// Content whose min- and max-content sizes are equal.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            min_width: width,
            max_width: width,
            min_height: height,
            max_height: height,
        }
    }

    /// Content that can shrink to `min_width` x `min_height`.
    pub fn with_min(mut self, min_width: f64, min_height: f64) -> Self {
        self.min_width = min_width;
        self.min_height = min_height;
        self
    }
}

impl ContentMeasurable for FixedContent {
    fn min_content(&self, axis: Axis, _cross_size: Option<f64>) -> f64 {
        match axis {
            Axis::Column => self.min_width,
            Axis::Row => self.min_height,
        }
    }

    fn max_content(&self, axis: Axis, _cross_size: Option<f64>) -> f64 {
        match axis {
            Axis::Column => self.max_width,
            Axis::Row => self.max_height,
        }
    }
}

/// Presents placed items to the track solver for one axis, measuring through
/// the host and memoizing in the pass's cache.
pub(crate) struct HostItems<'a> {
    host: &'a dyn ContentHost,
    placements: &'a [Placement],
    axis: Axis,
    cross_sizes: Vec<Option<f64>>,
    cache: &'a mut MeasureCache,
}

impl<'a> HostItems<'a> {
    pub fn new(
        host: &'a dyn ContentHost,
        placements: &'a [Placement],
        axis: Axis,
        cross_sizes: Vec<Option<f64>>,
        cache: &'a mut MeasureCache,
    ) -> Self {
        debug_assert_eq!(placements.len(), cross_sizes.len());
        Self {
            host,
            placements,
            axis,
            cross_sizes,
            cache,
        }
    }

    fn measure(&mut self, item: usize, mode: ContentSizingMode) -> f64 {
        let host = self.host;
        let axis = self.axis;
        let id = self.placements[item].id;
        let cross = self.cross_sizes[item];

        self.cache.get_or_measure(item, axis, mode, cross, || {
            let Some(content) = host.content(id) else {
                warn!(?id, %axis, "Item has no content in host, measuring as empty");
                return 0.0;
            };
            let size = match mode {
                ContentSizingMode::MinContent => content.min_content(axis, cross),
                ContentSizingMode::MaxContent => content.max_content(axis, cross),
            };
            if size.is_finite() && size >= 0.0 {
                size
            } else {
                warn!(?id, %axis, ?mode, size, "Invalid content size, using 0");
                0.0
            }
        })
    }
}

impl ItemContributions for HostItems<'_> {
    fn item_count(&self) -> usize {
        self.placements.len()
    }

    fn span(&self, item: usize) -> Range<usize> {
        let placement = &self.placements[item];
        match self.axis {
            Axis::Column => placement.columns.clone(),
            Axis::Row => placement.rows.clone(),
        }
    }

    fn min_content(&mut self, item: usize) -> f64 {
        self.measure(item, ContentSizingMode::MinContent)
    }

    fn max_content(&mut self, item: usize) -> f64 {
        self.measure(item, ContentSizingMode::MaxContent)
    }
}
