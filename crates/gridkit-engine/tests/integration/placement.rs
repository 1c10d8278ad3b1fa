//! Placement integration tests
//!
//! These tests verify that item rectangles:
//! - Cover exactly the spanned tracks and the gaps between them
//! - Follow row-major auto-placement for items without spans
//! - Use the solved column width when measuring wrapping content

use gridkit_engine::{FixedContent, Rect};

use crate::support::*;

#[test]
fn test_span_covers_tracks() {
    let mut grid = TestGrid::with_size("100px 100px 100px", "50px", 500.0, 100.0);
    let id = grid.add_at("2 / 4", "1", FixedContent::default());
    grid.layout();

    assert_rect_near(grid.rect(id), Rect::new(100.0, 0.0, 200.0, 50.0));
}

#[test]
fn test_span_includes_internal_gaps_only() {
    let mut grid = TestGrid::with_size("100px 100px 100px", "40px 40px", 500.0, 200.0);
    grid.engine.set_gap("10px");
    let wide = grid.add_at("1 / span 2", "2", FixedContent::default());
    let last = grid.add_at("3", "1 / 3", FixedContent::default());
    grid.layout();

    assert_rect_near(grid.rect(wide), Rect::new(0.0, 50.0, 210.0, 40.0));
    assert_rect_near(grid.rect(last), Rect::new(220.0, 0.0, 100.0, 90.0));
}

#[test]
fn test_auto_placement_wraps_row_major() {
    let mut grid = TestGrid::with_size("100px 100px", "50px 50px", 500.0, 500.0);
    let ids: Vec<_> = (0..3).map(|_| grid.add(FixedContent::default())).collect();
    grid.layout();

    assert_rect_near(grid.rect(ids[0]), Rect::new(0.0, 0.0, 100.0, 50.0));
    assert_rect_near(grid.rect(ids[1]), Rect::new(100.0, 0.0, 100.0, 50.0));
    assert_rect_near(grid.rect(ids[2]), Rect::new(0.0, 50.0, 100.0, 50.0));
}

#[test]
fn test_auto_placement_stays_on_last_row() {
    let mut grid = TestGrid::with_size("100px", "50px 50px", 500.0, 500.0);
    let ids: Vec<_> = (0..4).map(|_| grid.add(FixedContent::default())).collect();
    grid.layout();

    assert_rect_near(grid.rect(ids[2]), Rect::new(0.0, 50.0, 100.0, 50.0));
    assert_rect_near(grid.rect(ids[3]), Rect::new(0.0, 50.0, 100.0, 50.0));
}

#[test]
fn test_span_cursor_places_consecutive_items() {
    let mut grid = TestGrid::with_size("50px 50px 50px 50px", "20px", 500.0, 100.0);
    let first = grid.add_at("span 2", "1", FixedContent::default());
    let second = grid.add_at("span 1", "1", FixedContent::default());
    grid.layout();

    assert_rect_near(grid.rect(first), Rect::new(0.0, 0.0, 100.0, 20.0));
    assert_rect_near(grid.rect(second), Rect::new(100.0, 0.0, 50.0, 20.0));
}

#[test]
fn test_span_past_grid_is_clamped() {
    let mut grid = TestGrid::with_size("100px 100px", "50px", 500.0, 100.0);
    let id = grid.add_at("2 / 6", "3", FixedContent::default());
    grid.layout();

    assert_eq!(grid.engine.item_placement(id), Some((1..2, 0..1)));
    assert_rect_near(grid.rect(id), Rect::new(100.0, 0.0, 100.0, 50.0));
}

#[test]
fn test_malformed_span_falls_back_to_one_track() {
    let mut grid = TestGrid::with_size("100px 100px", "50px", 500.0, 100.0);
    let id = grid.add_at("two / four", "1", FixedContent::default());
    grid.layout();

    assert_rect_near(grid.rect(id), Rect::new(0.0, 0.0, 100.0, 50.0));
}

#[test]
fn test_rows_measure_at_solved_column_width() {
    let mut grid = TestGrid::with_size("100px 1fr", "auto", 300.0, 600.0);
    // Ten 20px words: 5 per line in the 100px column, 10 per line in 200px.
    let narrow = grid.add_at("1", "1", WrappingText::new(10, 20.0, 16.0));
    let wide = grid.add_at("2", "1", WrappingText::new(10, 20.0, 16.0));
    grid.layout();

    assert_breadths_near(grid.engine.row_breadths(), &[32.0]);
    assert_rect_near(grid.rect(narrow), Rect::new(0.0, 0.0, 100.0, 32.0));
    assert_rect_near(grid.rect(wide), Rect::new(100.0, 0.0, 200.0, 32.0));
}

#[test]
fn test_narrowing_container_grows_wrapping_rows() {
    let mut grid = TestGrid::with_size("1fr", "auto", 200.0, 600.0);
    let id = grid.add(WrappingText::new(10, 20.0, 16.0));
    grid.layout();
    assert_near(grid.rect(id).height, 16.0);

    assert!(grid.engine.set_available_size(50.0, 600.0));
    grid.layout();
    // Two words per line.
    assert_near(grid.rect(id).height, 80.0);
}

#[test]
fn test_spanning_item_sizes_auto_tracks() {
    let mut grid = TestGrid::with_size("auto auto", "auto", f64::INFINITY, 100.0);
    let id = grid.add_at("1 / 3", "1", FixedContent::new(300.0, 20.0));
    grid.layout();

    assert_near(grid.engine.calc_width(false), 300.0);
    assert_rect_near(grid.rect(id), Rect::new(0.0, 0.0, 300.0, 20.0));
}

#[test]
fn test_cell_areas_cover_grid() {
    let mut grid = TestGrid::with_size("10px 20px", "5px 5px", 100.0, 100.0);
    grid.engine.set_gap("1px");
    grid.layout();

    let cells = grid.engine.cell_areas();
    assert_eq!(cells.len(), 4);
    assert_rect_near(cells[3], Rect::new(11.0, 6.0, 20.0, 5.0));
}

#[test]
fn test_calc_area_matches_item_rect() {
    let mut grid = TestGrid::with_size("50px 1fr 50px", "30px 1fr", 400.0, 200.0);
    let id = grid.add_at("2 / 4", "1 / 3", FixedContent::default());
    grid.layout();

    assert_eq!(grid.engine.calc_area(1..3, 0..2), grid.rect(id));
    assert!(grid.engine.try_calc_area(1..4, 0..2).is_err());
}
