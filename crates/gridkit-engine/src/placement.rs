//! Item registry entries and placement onto the explicit grid.

use std::ops::Range;

use tracing::{trace, warn};

/// Host-chosen stable identifier for a grid item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(u64);

impl ItemId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl From<u64> for ItemId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// A registered item and the spans it asked for.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GridItem {
    pub id: ItemId,
    /// `None` means auto-placed.
    pub spans: Option<(Range<usize>, Range<usize>)>,
}

/// Where an item ended up for one layout pass.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Placement {
    pub id: ItemId,
    pub columns: Range<usize>,
    pub rows: Range<usize>,
}

/// Resolve every item to a column and row span.
///
/// Items without spans take the explicit grid's cells in row-major order,
/// one cell each, wrapping to the next row after the last column. Once the
/// last row is full they stay on it. With `clamp`, explicit spans are pulled
/// inside the explicit grid.
pub(crate) fn place_items(
    items: &[GridItem],
    column_count: usize,
    row_count: usize,
    clamp: bool,
) -> Vec<Placement> {
    let mut next_cell = 0usize;
    items
        .iter()
        .map(|item| {
            let (columns, rows) = match &item.spans {
                Some((columns, rows)) if clamp => (
                    clamp_span(item.id, "column", columns, column_count),
                    clamp_span(item.id, "row", rows, row_count),
                ),
                Some((columns, rows)) => (columns.clone(), rows.clone()),
                None => {
                    let cell = next_cell;
                    next_cell += 1;
                    auto_cell(cell, column_count, row_count)
                }
            };
            trace!(id = ?item.id, ?columns, ?rows, "Placed item");
            Placement {
                id: item.id,
                columns,
                rows,
            }
        })
        .collect()
}

/// The `cell`-th cell in row-major order.
fn auto_cell(cell: usize, column_count: usize, row_count: usize) -> (Range<usize>, Range<usize>) {
    let column_count = column_count.max(1);
    let column = cell % column_count;
    let row = (cell / column_count).min(row_count.saturating_sub(1));
    (column..column + 1, row..row + 1)
}

fn clamp_span(id: ItemId, axis: &str, span: &Range<usize>, track_count: usize) -> Range<usize> {
    let last = track_count.saturating_sub(1);
    let start = span.start.min(last);
    let end = span.end.clamp(start + 1, track_count.max(start + 1));
    if start != span.start || end != span.end {
        warn!(?id, axis, requested = ?span, clamped = ?(start..end), "Span outside the explicit grid");
    }
    start..end
}
