//! # GridKit Engine
//!
//! Grid layout orchestration layer for GridKit.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                    GridEngine                    │
//! │  ┌──────────────┐ ┌─────────────┐ ┌───────────┐  │
//! │  │ Definitions  │ │    Items    │ │  Results  │  │
//! │  │ (gridkit-css)│ │ (registry)  │ │  (rects)  │  │
//! │  └──────────────┘ └─────────────┘ └───────────┘  │
//! │          │               │              ▲        │
//! │          ▼               ▼              │        │
//! │   ┌────────────────────────────────────────┐     │
//! │   │     Track sizing (gridkit-layout)      │     │
//! │   │  columns first, then width-aware rows  │     │
//! │   └────────────────────────────────────────┘     │
//! └──────────────────────────────────────────────────┘
//!                      │
//!                      ▼
//!           ContentHost (host scene)
//! ```
//!
//! The engine is either clean (results valid) or dirty (some input changed).
//! [`GridEngine::run_layout`] does nothing on a clean engine; on a dirty one
//! it places items, solves both axes and publishes every item's rectangle in
//! one step.

pub mod content;
pub mod placement;

pub use content::{ContentHost, ContentMeasurable, FixedContent};
pub use placement::ItemId;

pub use gridkit_css::{CssError, DimensionValue, Track};
pub use gridkit_layout::{Axis, LayoutError, Rect};

use std::ops::Range;
use std::time::Instant;

use gridkit_css::{parse_gap, parse_span, parse_tracks, try_parse_gap, try_parse_tracks};
use gridkit_layout::{
    calc_area, compute_used_breadth, try_calc_area, MeasureCache, SizingParams, SolvedAxis,
};
use thiserror::Error;
use tracing::{debug, info, trace};

use content::HostItems;
use placement::{place_items, GridItem, Placement};

/// Errors that can occur in the engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Definition error: {0}")]
    Definition(#[from] CssError),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Item already in grid: {0:?}")]
    DuplicateItem(ItemId),

    #[error("Item not found: {0:?}")]
    ItemNotFound(ItemId),

    #[error("Invalid available size: {width} x {height}")]
    InvalidSize { width: f64, height: f64 },
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    /// Share space left after flexible tracks among `auto` tracks.
    pub stretch_auto_tracks: bool,
    /// Pull item spans that reach past the explicit grid back inside it.
    pub clamp_spans_to_grid: bool,
    /// Gap used on both axes until one is set.
    pub default_gap: DimensionValue,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            stretch_auto_tracks: false,
            clamp_spans_to_grid: true,
            default_gap: DimensionValue::Px(0.0),
        }
    }
}

/// Results of one completed layout pass.
#[derive(Debug, Clone, Default)]
struct GridLayout {
    columns: SolvedAxis,
    rows: SolvedAxis,
    rects: Vec<(ItemId, Rect)>,
    placements: Vec<Placement>,
}

/// Grid layout engine.
///
/// Owns the track definitions of both axes, the item registry and the results
/// of the last layout pass.
pub struct GridEngine {
    config: GridConfig,
    columns: Vec<Track>,
    rows: Vec<Track>,
    column_gap: DimensionValue,
    row_gap: DimensionValue,
    available_width: f64,
    available_height: f64,
    items: Vec<GridItem>,
    column_cursor: usize,
    row_cursor: usize,
    layout: GridLayout,
    dirty: bool,
    layout_updated: Option<Box<dyn FnMut()>>,
}

impl GridEngine {
    /// Create an engine with one `auto` column, one `auto` row and an
    /// indefinite available size.
    pub fn new(config: GridConfig) -> Self {
        info!(?config, "Initializing GridKit engine");
        Self {
            column_gap: config.default_gap,
            row_gap: config.default_gap,
            config,
            columns: vec![Track::auto()],
            rows: vec![Track::auto()],
            available_width: f64::INFINITY,
            available_height: f64::INFINITY,
            items: Vec::new(),
            column_cursor: 0,
            row_cursor: 0,
            layout: GridLayout::default(),
            dirty: true,
            layout_updated: None,
        }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Whether the next [`run_layout`](Self::run_layout) will do any work.
    pub fn needs_layout(&self) -> bool {
        self.dirty
    }

    fn invalidate(&mut self, reason: &'static str) {
        if !self.dirty {
            trace!(reason, "Layout invalidated");
        }
        self.dirty = true;
    }

    // ==================== Definitions ====================

    /// Replace the column tracks. Malformed tokens degrade to `auto`.
    pub fn set_columns(&mut self, definition: &str) {
        let tracks = parse_tracks(definition);
        if tracks != self.columns {
            debug!(definition, count = tracks.len(), "Columns changed");
            self.columns = tracks;
            self.invalidate("columns");
        }
    }

    /// Replace the row tracks. Malformed tokens degrade to `auto`.
    pub fn set_rows(&mut self, definition: &str) {
        let tracks = parse_tracks(definition);
        if tracks != self.rows {
            debug!(definition, count = tracks.len(), "Rows changed");
            self.rows = tracks;
            self.invalidate("rows");
        }
    }

    pub fn set_column_gap(&mut self, gap: &str) {
        let gap = parse_gap(gap);
        if gap != self.column_gap {
            self.column_gap = gap;
            self.invalidate("column gap");
        }
    }

    pub fn set_row_gap(&mut self, gap: &str) {
        let gap = parse_gap(gap);
        if gap != self.row_gap {
            self.row_gap = gap;
            self.invalidate("row gap");
        }
    }

    /// Set both gaps at once.
    pub fn set_gap(&mut self, gap: &str) {
        self.set_column_gap(gap);
        self.set_row_gap(gap);
    }

    /// Set the container size. Non-finite means indefinite along that axis.
    ///
    /// Returns whether either dimension changed.
    pub fn set_available_size(&mut self, width: f64, height: f64) -> bool {
        let width = sanitize_size(width);
        let height = sanitize_size(height);
        let changed = !same_size(width, self.available_width)
            || !same_size(height, self.available_height);
        if changed {
            debug!(width, height, "Available size changed");
            self.available_width = width;
            self.available_height = height;
            self.invalidate("available size");
        }
        changed
    }

    pub fn columns(&self) -> &[Track] {
        &self.columns
    }

    pub fn rows(&self) -> &[Track] {
        &self.rows
    }

    pub fn column_gap(&self) -> DimensionValue {
        self.column_gap
    }

    pub fn row_gap(&self) -> DimensionValue {
        self.row_gap
    }

    pub fn available_size(&self) -> (f64, f64) {
        (self.available_width, self.available_height)
    }

    // ==================== Items ====================

    /// Add an auto-placed item.
    pub fn add_item(&mut self, id: ItemId) -> Result<(), EngineError> {
        self.insert_item(GridItem { id, spans: None })
    }

    /// Add an item placed by span strings such as `"1 / 3"` or `"span 2"`.
    ///
    /// Each axis keeps its own auto cursor, advanced past every parsed span.
    /// Malformed spans degrade to one track at the cursor.
    pub fn add_item_with_spans(
        &mut self,
        id: ItemId,
        column_span: &str,
        row_span: &str,
    ) -> Result<(), EngineError> {
        if self.contains_item(id) {
            return Err(EngineError::DuplicateItem(id));
        }
        let columns = parse_span(column_span, &mut self.column_cursor);
        let rows = parse_span(row_span, &mut self.row_cursor);
        self.insert_item(GridItem {
            id,
            spans: Some((columns, rows)),
        })
    }

    fn insert_item(&mut self, item: GridItem) -> Result<(), EngineError> {
        if self.contains_item(item.id) {
            return Err(EngineError::DuplicateItem(item.id));
        }
        debug!(id = ?item.id, spans = ?item.spans, "Item added");
        self.items.push(item);
        self.invalidate("item added");
        Ok(())
    }

    /// Move an item to explicit 0-based half-open track ranges.
    pub fn set_item_spans(
        &mut self,
        id: ItemId,
        column_span: Range<usize>,
        row_span: Range<usize>,
    ) -> Result<(), EngineError> {
        if column_span.is_empty() || row_span.is_empty() {
            return Err(CssError::InvalidSpan(format!("{:?} x {:?}", column_span, row_span)).into());
        }
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(EngineError::ItemNotFound(id))?;
        let spans = Some((column_span, row_span));
        if item.spans != spans {
            item.spans = spans;
            self.invalidate("item spans");
        }
        Ok(())
    }

    pub fn remove_item(&mut self, id: ItemId) -> Result<(), EngineError> {
        let index = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or(EngineError::ItemNotFound(id))?;
        self.items.remove(index);
        debug!(?id, "Item removed");
        self.invalidate("item removed");
        Ok(())
    }

    pub fn contains_item(&self, id: ItemId) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    // ==================== Layout ====================

    /// Register a callback fired once after every completed layout pass.
    pub fn set_layout_updated(&mut self, callback: Box<dyn FnMut()>) {
        self.layout_updated = Some(callback);
    }

    /// Lay out the grid if anything changed since the last pass.
    ///
    /// Columns are solved before rows so that row measurement can see each
    /// item's column width. Returns `false` when the engine was already clean.
    pub fn run_layout(&mut self, host: &dyn ContentHost) -> bool {
        if !self.dirty {
            trace!("Layout clean, skipping");
            return false;
        }

        let start = Instant::now();
        let placements = place_items(
            &self.items,
            self.columns.len(),
            self.rows.len(),
            self.config.clamp_spans_to_grid,
        );
        let mut cache = MeasureCache::new();

        let column_params = SizingParams::new(self.available_width)
            .with_gap(resolve_gap(self.column_gap, self.available_width))
            .with_stretch_auto_tracks(self.config.stretch_auto_tracks);
        let columns = {
            let mut items = HostItems::new(
                host,
                &placements,
                Axis::Column,
                vec![None; placements.len()],
                &mut cache,
            );
            compute_used_breadth(&self.columns, &mut items, &column_params)
        };

        let row_params = SizingParams::new(self.available_height)
            .with_gap(resolve_gap(self.row_gap, self.available_height))
            .with_stretch_auto_tracks(self.config.stretch_auto_tracks);
        let column_widths = placements
            .iter()
            .map(|p| Some(columns.span_extent(&p.columns).1))
            .collect();
        let rows = {
            let mut items =
                HostItems::new(host, &placements, Axis::Row, column_widths, &mut cache);
            compute_used_breadth(&self.rows, &mut items, &row_params)
        };

        let rects = placements
            .iter()
            .map(|p| (p.id, calc_area(&columns, &rows, &p.columns, &p.rows)))
            .collect();

        self.layout = GridLayout {
            columns,
            rows,
            rects,
            placements,
        };
        self.dirty = false;

        let stats = cache.stats();
        debug!(
            items = self.items.len(),
            width = self.layout.columns.calc_size(false),
            height = self.layout.rows.calc_size(false),
            measurements = stats.stores,
            cache_hits = stats.hits,
            elapsed_us = start.elapsed().as_micros() as u64,
            "Layout complete"
        );

        if let Some(callback) = self.layout_updated.as_mut() {
            callback();
        }
        true
    }

    // ==================== Results ====================

    /// Rectangle of an item from the last completed pass.
    pub fn item_rect(&self, id: ItemId) -> Option<Rect> {
        self.layout
            .rects
            .iter()
            .find(|(item, _)| *item == id)
            .map(|(_, rect)| *rect)
    }

    /// Every item's rectangle from the last completed pass, in insertion order.
    pub fn rects(&self) -> &[(ItemId, Rect)] {
        &self.layout.rects
    }

    /// Column and row spans an item was laid out at.
    pub fn item_placement(&self, id: ItemId) -> Option<(Range<usize>, Range<usize>)> {
        self.layout
            .placements
            .iter()
            .find(|p| p.id == id)
            .map(|p| (p.columns.clone(), p.rows.clone()))
    }

    /// Rectangle covering the given track ranges. Out-of-range lines clamp.
    pub fn calc_area(&self, column_span: Range<usize>, row_span: Range<usize>) -> Rect {
        calc_area(
            &self.layout.columns,
            &self.layout.rows,
            &column_span,
            &row_span,
        )
    }

    /// Rectangle covering the given track ranges, rejecting ranges outside the grid.
    pub fn try_calc_area(
        &self,
        column_span: Range<usize>,
        row_span: Range<usize>,
    ) -> Result<Rect, EngineError> {
        Ok(try_calc_area(
            &self.layout.columns,
            &self.layout.rows,
            &column_span,
            &row_span,
        )?)
    }

    /// Total grid width, gaps included.
    pub fn calc_width(&self, exclude_flex: bool) -> f64 {
        self.layout.columns.calc_size(exclude_flex)
    }

    /// Total grid height, gaps included.
    pub fn calc_height(&self, exclude_flex: bool) -> f64 {
        self.layout.rows.calc_size(exclude_flex)
    }

    pub fn calc_column_pos(&self, line: usize, exclude_flex: bool) -> f64 {
        self.layout.columns.calc_pos(line, exclude_flex)
    }

    pub fn calc_row_pos(&self, line: usize, exclude_flex: bool) -> f64 {
        self.layout.rows.calc_pos(line, exclude_flex)
    }

    pub fn column_breadths(&self) -> &[f64] {
        self.layout.columns.breadths()
    }

    pub fn row_breadths(&self) -> &[f64] {
        self.layout.rows.breadths()
    }

    /// Every cell's rectangle, row-major.
    pub fn cell_areas(&self) -> Vec<Rect> {
        self.layout.columns.cell_areas(&self.layout.rows)
    }
}

impl Default for GridEngine {
    fn default() -> Self {
        Self::new(GridConfig::default())
    }
}

fn sanitize_size(size: f64) -> f64 {
    if size.is_nan() {
        f64::INFINITY
    } else {
        size.max(0.0)
    }
}

fn same_size(a: f64, b: f64) -> bool {
    if a.is_finite() && b.is_finite() {
        (a - b).abs() < gridkit_layout::EPSILON
    } else {
        a == b
    }
}

fn resolve_gap(gap: DimensionValue, available: f64) -> f64 {
    gap.resolve(available).unwrap_or(0.0).max(0.0)
}

/// Builder for creating a grid engine.
pub struct GridEngineBuilder {
    config: GridConfig,
    columns: Option<String>,
    rows: Option<String>,
    column_gap: Option<String>,
    row_gap: Option<String>,
    available_size: Option<(f64, f64)>,
    layout_updated: Option<Box<dyn FnMut()>>,
}

impl GridEngineBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            config: GridConfig::default(),
            columns: None,
            rows: None,
            column_gap: None,
            row_gap: None,
            available_size: None,
            layout_updated: None,
        }
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: GridConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the column track list.
    pub fn columns(mut self, definition: impl Into<String>) -> Self {
        self.columns = Some(definition.into());
        self
    }

    /// Set the row track list.
    pub fn rows(mut self, definition: impl Into<String>) -> Self {
        self.rows = Some(definition.into());
        self
    }

    /// Set both gaps.
    pub fn gap(mut self, gap: impl Into<String>) -> Self {
        let gap = gap.into();
        self.column_gap = Some(gap.clone());
        self.row_gap = Some(gap);
        self
    }

    pub fn column_gap(mut self, gap: impl Into<String>) -> Self {
        self.column_gap = Some(gap.into());
        self
    }

    pub fn row_gap(mut self, gap: impl Into<String>) -> Self {
        self.row_gap = Some(gap.into());
        self
    }

    /// Set the container size.
    pub fn available_size(mut self, width: f64, height: f64) -> Self {
        self.available_size = Some((width, height));
        self
    }

    /// Enable or disable stretching of `auto` tracks.
    pub fn stretch_auto_tracks(mut self, enabled: bool) -> Self {
        self.config.stretch_auto_tracks = enabled;
        self
    }

    /// Enable or disable clamping spans to the explicit grid.
    pub fn clamp_spans_to_grid(mut self, enabled: bool) -> Self {
        self.config.clamp_spans_to_grid = enabled;
        self
    }

    /// Set the layout-updated callback.
    pub fn on_layout_updated(mut self, callback: impl FnMut() + 'static) -> Self {
        self.layout_updated = Some(Box::new(callback));
        self
    }

    /// Build the engine. Definitions are parsed strictly.
    pub fn build(self) -> Result<GridEngine, EngineError> {
        let mut engine = GridEngine::new(self.config);

        if let Some(definition) = &self.columns {
            engine.columns = try_parse_tracks(definition)?;
        }
        if let Some(definition) = &self.rows {
            engine.rows = try_parse_tracks(definition)?;
        }
        if let Some(gap) = &self.column_gap {
            engine.column_gap = try_parse_gap(gap)?;
        }
        if let Some(gap) = &self.row_gap {
            engine.row_gap = try_parse_gap(gap)?;
        }
        if let Some((width, height)) = self.available_size {
            if width.is_nan() || height.is_nan() || width < 0.0 || height < 0.0 {
                return Err(EngineError::InvalidSize { width, height });
            }
            engine.set_available_size(width, height);
        }
        engine.layout_updated = self.layout_updated;

        Ok(engine)
    }
}

impl Default for GridEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
