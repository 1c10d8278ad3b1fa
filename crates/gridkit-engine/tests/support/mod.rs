//! Test support utilities for GridKit integration tests
//!
//! - TestGrid: Engine plus in-memory content host
//! - Content fixtures: Fixed boxes and wrapping text
//! - Assertions: Tolerance-based geometry assertions

mod assertions;
mod content;
mod test_grid;

pub use assertions::*;
pub use content::WrappingText;
pub use test_grid::TestGrid;

/// Route `tracing` output through the test harness, filtered by `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
