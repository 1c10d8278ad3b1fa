//! Track sizing integration tests
//!
//! These tests verify that solved track breadths:
//! - Honor fixed, percentage, intrinsic and flexible sizing functions
//! - Add up with gaps to the grid's total size
//! - Never exceed growth limits when space is maximized

use gridkit_engine::{DimensionValue, FixedContent, GridConfig, GridEngine, Track};

use crate::support::*;

#[test]
fn test_definition_parses_to_typed_tracks() {
    let grid = TestGrid::new("100px 1fr 20%", "auto");

    assert_eq!(
        grid.engine.columns(),
        &[Track::px(100.0), Track::fr(1.0), Track::percent(20.0)]
    );
}

#[test]
fn test_fixed_tracks_ignore_available_size() {
    for width in [50.0, 110.0, 1000.0] {
        let mut grid = TestGrid::with_size("50px 50px", "auto", width, 100.0);
        grid.engine.set_column_gap("10px");
        grid.layout();

        assert_near(grid.engine.calc_width(false), 110.0);
    }
}

#[test]
fn test_equal_flex_split() {
    let mut grid = TestGrid::with_size("100px 1fr 1fr", "auto", 500.0, 100.0);
    grid.layout();

    assert_breadths_near(grid.engine.column_breadths(), &[100.0, 200.0, 200.0]);
}

#[test]
fn test_width_is_sum_of_breadths_and_gaps() {
    let mut grid = TestGrid::with_size("80px auto 1fr fit-content(120px)", "auto", 900.0, 100.0);
    grid.engine.set_column_gap("12px");
    grid.add(FixedContent::new(200.0, 20.0).with_min(40.0, 20.0));
    grid.add(FixedContent::new(60.0, 20.0));
    grid.add(FixedContent::new(300.0, 20.0).with_min(90.0, 20.0));
    grid.layout();

    let sum: f64 = grid.engine.column_breadths().iter().sum();
    assert_near(grid.engine.calc_width(false), sum + 3.0 * 12.0);
    assert_near(grid.engine.calc_width(false), 900.0);
}

#[test]
fn test_repeat_expands_tracks() {
    let mut grid = TestGrid::with_size("repeat(3, 50px)", "auto", 500.0, 100.0);
    grid.layout();

    assert_eq!(grid.engine.columns().len(), 3);
    assert_breadths_near(grid.engine.column_breadths(), &[50.0, 50.0, 50.0]);
}

#[test]
fn test_percentage_tracks_and_gap() {
    let mut grid = TestGrid::with_size("25% 75%", "auto", 400.0, 100.0);
    grid.engine.set_column_gap("10%");
    grid.layout();

    assert_breadths_near(grid.engine.column_breadths(), &[100.0, 300.0]);
    assert_near(grid.engine.calc_column_pos(1, false), 140.0);
}

#[test]
fn test_fixed_base_never_shrinks_for_small_content() {
    let mut grid = TestGrid::with_size("minmax(50px, max-content)", "auto", 500.0, 100.0);
    grid.add(FixedContent::new(30.0, 10.0).with_min(20.0, 10.0));
    grid.layout();

    assert_breadths_near(grid.engine.column_breadths(), &[50.0]);
}

#[test]
fn test_content_growth_is_monotonic() {
    let mut grid = TestGrid::with_size("auto auto", "auto", f64::INFINITY, 100.0);
    let small = grid.add(FixedContent::new(40.0, 10.0));
    grid.layout();
    let before = grid.engine.column_breadths().to_vec();

    grid.engine.remove_item(small).unwrap();
    grid.add_at("1", "1", FixedContent::new(40.0, 10.0));
    grid.add_at("1 / 3", "1", FixedContent::new(150.0, 10.0));
    grid.layout();
    let after = grid.engine.column_breadths();

    for (b, a) in before.iter().zip(after) {
        assert!(a + TOLERANCE >= *b, "{:?} shrank to {:?}", before, after);
    }
    assert_near(after.iter().sum(), 150.0);
}

#[test]
fn test_growth_limit_respected_before_flex() {
    let mut grid = TestGrid::with_size("minmax(10px, 80px) 1fr", "auto", 500.0, 100.0);
    grid.layout();

    assert_breadths_near(grid.engine.column_breadths(), &[80.0, 420.0]);
}

#[test]
fn test_auto_tracks_share_free_space_up_to_max_content() {
    let mut grid = TestGrid::with_size("auto auto", "auto", 300.0, 100.0);
    grid.add(FixedContent::new(100.0, 10.0).with_min(20.0, 10.0));
    grid.add(FixedContent::new(400.0, 10.0).with_min(20.0, 10.0));
    grid.layout();

    // 260px free: the first track fills up to 100, the second takes the rest.
    assert_breadths_near(grid.engine.column_breadths(), &[100.0, 200.0]);
}

#[test]
fn test_fit_content_clamps_growth() {
    let mut grid = TestGrid::with_size("fit-content(150px) 1fr", "auto", 600.0, 100.0);
    grid.add(FixedContent::new(400.0, 10.0).with_min(50.0, 10.0));
    grid.layout();

    assert_breadths_near(grid.engine.column_breadths(), &[150.0, 450.0]);
}

#[test]
fn test_flex_keeps_base_size() {
    let mut grid = TestGrid::with_size("minmax(300px, 1fr) 1fr", "auto", 400.0, 100.0);
    grid.layout();

    assert_breadths_near(grid.engine.column_breadths(), &[300.0, 100.0]);
}

#[test]
fn test_indefinite_width_sizes_flex_to_content() {
    let mut grid = TestGrid::with_size("1fr 2fr", "auto", f64::INFINITY, 100.0);
    grid.add(FixedContent::new(60.0, 10.0));
    grid.add(FixedContent::new(60.0, 10.0));
    grid.layout();

    // The first item needs 60px per fr; the second only 30.
    assert_breadths_near(grid.engine.column_breadths(), &[60.0, 120.0]);
}

#[test]
fn test_overflowing_fixed_tracks_do_not_fail() {
    let mut grid = TestGrid::with_size("300px 300px 1fr", "auto", 400.0, 100.0);
    let id = grid.add_at("3", "1", FixedContent::new(10.0, 10.0));
    grid.layout();

    assert_breadths_near(grid.engine.column_breadths(), &[300.0, 300.0, 0.0]);
    assert_rect_near(grid.rect(id), gridkit_engine::Rect::new(600.0, 0.0, 0.0, 10.0));
}

#[test]
fn test_exclude_flex_measures_fixed_part() {
    let mut grid = TestGrid::with_size("100px 1fr 50px", "auto", 500.0, 100.0);
    grid.layout();

    assert_near(grid.engine.calc_width(true), 150.0);
    assert_near(grid.engine.calc_width(false), 500.0);
}

#[test]
fn test_stretch_auto_tracks() {
    let config = GridConfig {
        stretch_auto_tracks: true,
        ..Default::default()
    };
    let mut grid = TestGrid::from_engine(GridEngine::new(config));
    grid.engine.set_columns("auto 100px");
    grid.engine.set_available_size(400.0, 100.0);
    grid.add(FixedContent::new(50.0, 10.0));
    grid.layout();

    assert_breadths_near(grid.engine.column_breadths(), &[300.0, 100.0]);
}

#[test]
fn test_default_gap_from_config() {
    let config = GridConfig {
        default_gap: DimensionValue::Px(5.0),
        ..Default::default()
    };
    let mut grid = TestGrid::from_engine(GridEngine::new(config));
    grid.engine.set_columns("10px 10px");
    grid.layout();

    assert_near(grid.engine.calc_width(false), 25.0);
}
