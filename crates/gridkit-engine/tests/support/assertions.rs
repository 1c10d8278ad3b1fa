//! Custom assertions for integration tests.

use gridkit_engine::Rect;

/// Default tolerance for geometry comparisons.
pub const TOLERANCE: f64 = 0.01;

/// Assert that a length matches expected within tolerance.
#[track_caller]
pub fn assert_near(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() <= TOLERANCE,
        "Length mismatch: expected {}, got {} (tolerance: {})",
        expected,
        actual,
        TOLERANCE
    );
}

/// Assert that a rectangle matches expected within tolerance.
#[track_caller]
pub fn assert_rect_near(actual: Rect, expected: Rect) {
    let close = (actual.x - expected.x).abs() <= TOLERANCE
        && (actual.y - expected.y).abs() <= TOLERANCE
        && (actual.width - expected.width).abs() <= TOLERANCE
        && (actual.height - expected.height).abs() <= TOLERANCE;
    assert!(
        close,
        "Rect mismatch: expected ({}, {}, {}x{}), got ({}, {}, {}x{})",
        expected.x,
        expected.y,
        expected.width,
        expected.height,
        actual.x,
        actual.y,
        actual.width,
        actual.height
    );
}

/// Assert that solved track breadths match expected within tolerance.
#[track_caller]
pub fn assert_breadths_near(actual: &[f64], expected: &[f64]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "Track count mismatch: expected {:?}, got {:?}",
        expected,
        actual
    );
    for (index, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!(
            (a - e).abs() <= TOLERANCE,
            "Track {} mismatch: expected {:?}, got {:?}",
            index,
            expected,
            actual
        );
    }
}
