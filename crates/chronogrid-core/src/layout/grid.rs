//! Column placement of day intervals inside a visible range.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::item::DayRange;

/// Zero-based start column and inclusive day span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPosition {
    pub column_start: i64,
    pub span: i64,
}

/// Clamp `[start, end]` to `range` and convert it to columns.
///
/// Callers drop items that lie entirely outside `range` first; for those
/// the span comes out zero or negative.
pub fn grid_position(start: NaiveDate, end: NaiveDate, range: &DayRange) -> GridPosition {
    let clamped_start = start.max(range.start);
    let clamped_end = end.min(range.end);

    GridPosition {
        column_start: (clamped_start - range.start).num_days(),
        span: (clamped_end - clamped_start).num_days() + 1,
    }
}
