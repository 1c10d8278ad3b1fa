//! Engine lifecycle integration tests
//!
//! These tests verify that the GridKit engine:
//! - Only lays out when an input changed
//! - Publishes results and fires its callback once per completed pass
//! - Manages its item registry without stale rectangles

use std::cell::Cell;
use std::rc::Rc;

use gridkit_engine::{EngineError, FixedContent, GridEngineBuilder, ItemId, Rect};

use crate::support::*;

#[test]
fn test_second_layout_is_noop_with_identical_rects() {
    let mut grid = TestGrid::with_size("auto 1fr", "auto auto", 600.0, 400.0);
    grid.add(FixedContent::new(120.0, 30.0).with_min(40.0, 30.0));
    grid.add(WrappingText::new(12, 25.0, 18.0));
    grid.add_at("1 / 3", "2", FixedContent::new(500.0, 60.0));

    assert!(grid.layout());
    let first = grid.engine.rects().to_vec();

    assert!(!grid.layout());
    assert_eq!(grid.engine.rects(), first.as_slice());
}

#[test]
fn test_relayout_after_same_inputs_is_stable() {
    let mut grid = TestGrid::with_size("auto minmax(50px, 1fr) fit-content(80px)", "auto", 500.0, 300.0);
    for _ in 0..3 {
        grid.add(FixedContent::new(90.0, 20.0).with_min(30.0, 20.0));
    }
    grid.layout();
    let first = grid.engine.rects().to_vec();

    grid.engine.set_available_size(501.0, 300.0);
    grid.layout();
    grid.engine.set_available_size(500.0, 300.0);
    grid.layout();

    assert_eq!(grid.engine.rects(), first.as_slice());
}

#[test]
fn test_resize_relayouts_flexible_tracks() {
    let mut grid = TestGrid::with_size("100px 1fr", "50px", 300.0, 100.0);
    let id = grid.add_at("2", "1", FixedContent::default());
    grid.layout();
    assert_rect_near(grid.rect(id), Rect::new(100.0, 0.0, 200.0, 50.0));

    assert!(grid.engine.set_available_size(500.0, 100.0));
    assert!(grid.layout());
    assert_rect_near(grid.rect(id), Rect::new(100.0, 0.0, 400.0, 50.0));
}

#[test]
fn test_unchanged_size_keeps_engine_clean() {
    let mut grid = TestGrid::with_size("1fr", "1fr", 300.0, 100.0);
    grid.layout();

    assert!(!grid.engine.set_available_size(300.0, 100.0));
    assert!(!grid.engine.needs_layout());
}

#[test]
fn test_layout_updated_fires_once_per_pass() {
    let fired = Rc::new(Cell::new(0));
    let counter = Rc::clone(&fired);
    let engine = GridEngineBuilder::new()
        .columns("1fr 1fr")
        .available_size(200.0, 100.0)
        .on_layout_updated(move || counter.set(counter.get() + 1))
        .build()
        .unwrap();
    let mut grid = TestGrid::from_engine(engine);
    grid.add(FixedContent::new(10.0, 10.0));

    grid.layout();
    grid.layout();
    assert_eq!(fired.get(), 1);

    grid.engine.set_column_gap("4px");
    grid.layout();
    assert_eq!(fired.get(), 2);
}

#[test]
fn test_removed_item_has_no_rect() {
    let mut grid = TestGrid::with_size("100px", "100px", 200.0, 200.0);
    let id = grid.add(FixedContent::default());
    grid.layout();
    assert!(grid.engine.item_rect(id).is_some());

    grid.engine.remove_item(id).unwrap();
    grid.layout();
    assert_eq!(grid.engine.item_rect(id), None);
    assert!(grid.engine.rects().is_empty());
}

#[test]
fn test_registry_errors() {
    let mut grid = TestGrid::with_size("100px", "100px", 200.0, 200.0);
    let id = grid.add(FixedContent::default());

    assert_eq!(
        grid.engine.add_item(id),
        Err(EngineError::DuplicateItem(id))
    );
    assert_eq!(
        grid.engine.set_item_spans(ItemId::new(999), 0..1, 0..1),
        Err(EngineError::ItemNotFound(ItemId::new(999)))
    );
}

#[test]
fn test_set_item_spans_moves_item() {
    let mut grid = TestGrid::with_size("100px 100px", "40px 40px", 400.0, 400.0);
    let id = grid.add(FixedContent::default());
    grid.layout();
    assert_rect_near(grid.rect(id), Rect::new(0.0, 0.0, 100.0, 40.0));

    grid.engine.set_item_spans(id, 1..2, 1..2).unwrap();
    assert!(grid.layout());
    assert_rect_near(grid.rect(id), Rect::new(100.0, 40.0, 100.0, 40.0));
}

#[test]
fn test_item_without_content_still_placed() {
    let mut grid = TestGrid::with_size("auto 100px", "auto", 400.0, 400.0);
    let id = grid.add_without_content();
    grid.layout();

    assert_rect_near(grid.rect(id), Rect::new(0.0, 0.0, 0.0, 0.0));
    assert_breadths_near(grid.engine.column_breadths(), &[0.0, 100.0]);
}

#[test]
fn test_lenient_setters_recover() {
    let mut grid = TestGrid::with_size("100px", "auto", 400.0, 400.0);
    grid.engine.set_columns("100px nonsense 50px");
    grid.engine.set_column_gap("wide");
    grid.layout();

    assert_eq!(grid.engine.columns().len(), 3);
    assert_near(grid.engine.calc_column_pos(2, false), 100.0);
}

#[test]
fn test_builder_rejects_bad_definitions() {
    let result = GridEngineBuilder::new().rows("minmax(10px)").build();
    assert!(matches!(result, Err(EngineError::Definition(_))));
}
