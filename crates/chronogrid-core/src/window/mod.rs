//! Concrete scrolling windows over calendar dates.
//!
//! [`days`] drives the horizontally scrolling week view, one entry per day
//! column. [`weeks`] drives the vertically scrolling month view, one entry
//! per week row. Both are thin [`WindowSource`](crate::ring::WindowSource)
//! implementations over `NaiveDate` cursors plus a small stateful holder
//! that keeps its previous result when nothing observable changed.

pub mod days;
pub mod weeks;

use std::sync::Arc;

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::error::WindowError;
use crate::item::DayRange;
use crate::ring::{RingMeta, RingSnapshot};

pub use days::{
    derive_day_snapshot, DayBuffer, DayBufferInput, DayCollection, DayColumns, DayItems,
    DaySideItems, DerivedDay, DEFAULT_DAY_BUFFER_COUNT,
};
pub use weeks::{
    derive_week_snapshot, start_of_week, DerivedWeek, WeekBuffer, WeekBufferInput, WeekRows,
    DEFAULT_WEEK_BUFFER_COUNT,
};

pub type DateSnapshot<I> = RingSnapshot<I, NaiveDate>;

/// Absolute index range of the buffered entries, in the host's scroll
/// coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexWindow {
    pub start: i64,
    pub end: i64,
}

/// Where the buffer sits relative to the host's base index.
pub(crate) fn base_index_offset(base_index: i64, center: i64, buffer_count: usize) -> Option<i64> {
    let centered = center.checked_sub(i64::try_from(buffer_count).ok()?)?;
    base_index.checked_sub(centered)
}

/// Ring capacity as the engine's signed count.
pub(crate) fn capacity_i64(capacity: usize) -> i64 {
    i64::try_from(capacity).unwrap_or(i64::MAX)
}

/// `date` moved by `days`, or `None` past chrono's date range.
pub(crate) fn offset_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    let span = Days::new(days.unsigned_abs());
    if days >= 0 {
        date.checked_add_days(span)
    } else {
        date.checked_sub_days(span)
    }
}

/// Ring anchor and covered dates of a window whose cursors are `unit`
/// days apart. Every date of the last entry must be representable.
pub(crate) fn window_span(
    anchor: NaiveDate,
    offset: i64,
    buffer_count: usize,
    capacity: usize,
    unit: i64,
) -> Option<(NaiveDate, DayRange)> {
    let buffer = i64::try_from(buffer_count).ok()?;
    let width = i64::try_from(capacity.saturating_sub(1)).ok()?;

    let derived = offset_days(anchor, offset.checked_mul(unit)?)?;
    let start = offset_days(derived, buffer.checked_mul(unit)?.checked_neg()?)?;
    let last = offset_days(start, width.checked_mul(unit)?)?;
    let end = offset_days(last, unit - 1)?;
    Some((derived, DayRange::new(start, end)))
}

#[derive(Debug)]
pub struct BufferResult<I> {
    pub snapshot: Arc<DateSnapshot<I>>,
    /// First and last cursor of the window
    pub range: DayRange,
    pub window: IndexWindow,
}

impl<I> BufferResult<I> {
    fn new(snapshot: Arc<DateSnapshot<I>>, window_start: i64) -> Self {
        let meta = &snapshot.meta;
        let range = DayRange::new(meta.start, meta.end);
        let width = i64::try_from(meta.capacity).unwrap_or(i64::MAX);
        let window = IndexWindow {
            start: window_start,
            end: window_start.saturating_add(width).saturating_sub(1),
        };
        Self {
            snapshot,
            range,
            window,
        }
    }

    pub fn items(&self) -> &[I] {
        &self.snapshot.items
    }

    pub fn meta(&self) -> &RingMeta<NaiveDate> {
        &self.snapshot.meta
    }

    fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.snapshot, &other.snapshot) && self.window == other.window
    }
}

/// Last snapshot and result of one buffer.
#[derive(Debug)]
pub(crate) struct BufferState<I> {
    snapshot: Option<Arc<DateSnapshot<I>>>,
    result: Option<BufferResult<I>>,
}

impl<I> Default for BufferState<I> {
    fn default() -> Self {
        Self {
            snapshot: None,
            result: None,
        }
    }
}

impl<I> BufferState<I> {
    pub(crate) fn snapshot(&self) -> Option<&Arc<DateSnapshot<I>>> {
        self.snapshot.as_ref()
    }

    /// Store a freshly derived snapshot. Returns false when neither the
    /// snapshot nor the index window moved, in which case the old result
    /// is kept as is.
    pub(crate) fn apply(&mut self, snapshot: Arc<DateSnapshot<I>>, window_start: i64) -> bool {
        let next = BufferResult::new(snapshot, window_start);

        if let Some(current) = &self.result {
            if current.same_as(&next) {
                return false;
            }
        }

        self.snapshot = Some(Arc::clone(&next.snapshot));
        self.result = Some(next);
        true
    }

    pub(crate) fn result(&self, what: &'static str) -> Result<&BufferResult<I>, WindowError> {
        self.result
            .as_ref()
            .ok_or(WindowError::NotInitialized { what })
    }
}
