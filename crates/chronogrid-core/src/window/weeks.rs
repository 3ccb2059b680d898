//! Week-row window for the scrolling month view.

use std::cmp::Ordering;
use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;

use super::{
    base_index_offset, capacity_i64, offset_days, window_span, BufferResult, BufferState,
    DateSnapshot,
};
use crate::item::DayRange;
use crate::error::WindowError;
use crate::ring::{derive_snapshot, RangeRequest, Window, WindowRequest, WindowSource};

pub const DEFAULT_WEEK_BUFFER_COUNT: usize = 12;

/// Visible rows and the index of the centre row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekRows {
    pub count: usize,
    pub center: i64,
}

fn days_since_week_start(date: NaiveDate, week_starts_on: Weekday) -> i64 {
    let back = (date.weekday().num_days_from_monday() + 7 - week_starts_on.num_days_from_monday()) % 7;
    i64::from(back)
}

/// First day of the week containing `date`.
pub fn start_of_week(date: NaiveDate, week_starts_on: Weekday) -> NaiveDate {
    date - Duration::days(days_since_week_start(date, week_starts_on))
}

/// One week row in the window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedWeek {
    pub index: i64,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: Vec<NaiveDate>,
}

impl DerivedWeek {
    fn starting(start: NaiveDate, index: i64) -> Self {
        let days: Vec<NaiveDate> = start.iter_days().take(7).collect();
        Self {
            index,
            start,
            end: start + Duration::days(6),
            days,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct WeekBufferInput {
    pub anchor: NaiveDate,
    pub rows: WeekRows,
    pub base_index: i64,
    pub week_starts_on: Weekday,
    pub buffer_count: usize,
    pub force_replace: bool,
}

impl WeekBufferInput {
    pub fn new(anchor: NaiveDate, rows: WeekRows, week_starts_on: Weekday) -> Self {
        Self {
            anchor,
            rows,
            base_index: rows.center - DEFAULT_WEEK_BUFFER_COUNT as i64,
            week_starts_on,
            buffer_count: DEFAULT_WEEK_BUFFER_COUNT,
            force_replace: false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.rows.count.saturating_add(self.buffer_count.saturating_mul(2))
    }

    fn out_of_range(&self) -> WindowError {
        WindowError::OutOfRange {
            base_index: self.base_index,
        }
    }

    fn offset(&self) -> Result<i64, WindowError> {
        base_index_offset(self.base_index, self.rows.center, self.buffer_count)
            .ok_or_else(|| self.out_of_range())
    }

    /// The anchor snapped back to its week start.
    fn aligned_anchor(&self) -> Result<NaiveDate, WindowError> {
        let back = days_since_week_start(self.anchor, self.week_starts_on);
        offset_days(self.anchor, -back).ok_or_else(|| self.out_of_range())
    }

    /// Aligned anchor, ring anchor and the days covered by all rows.
    fn span(&self) -> Result<(NaiveDate, NaiveDate, DayRange), WindowError> {
        let aligned = self.aligned_anchor()?;
        let (derived, range) =
            window_span(aligned, self.offset()?, self.buffer_count, self.capacity(), 7)
                .ok_or_else(|| self.out_of_range())?;
        Ok((aligned, derived, range))
    }

    /// Days from the first of the first row to the last of the last row.
    pub fn window_range(&self) -> Result<DayRange, WindowError> {
        self.span().map(|(_, _, range)| range)
    }

    fn config_version(&self) -> String {
        format!(
            "week-buffer:rows={};center={};buffer={};week_starts_on={}",
            self.rows.count, self.rows.center, self.buffer_count, self.week_starts_on
        )
    }

    fn source_version(&self) -> String {
        format!("week-source:week_starts_on={}", self.week_starts_on)
    }
}

struct WeekSource<'a> {
    input: &'a WeekBufferInput,
    anchor: NaiveDate,
    capacity: usize,
}

impl WindowSource for WeekSource<'_> {
    type Cursor = NaiveDate;
    type Item = DerivedWeek;

    fn window(&self, anchor: &NaiveDate) -> Window<NaiveDate> {
        let start = *anchor - Duration::weeks(self.input.buffer_count as i64);
        let width = self.capacity.saturating_sub(1) as i64;
        Window {
            start,
            end: start + Duration::weeks(width),
        }
    }

    fn compare(&self, a: &NaiveDate, b: &NaiveDate) -> Ordering {
        a.cmp(b)
    }

    fn add(&self, cursor: &NaiveDate, amount: i64) -> NaiveDate {
        *cursor + Duration::weeks(amount)
    }

    fn delta(&self, from: &NaiveDate, to: &NaiveDate) -> i64 {
        (*to - *from).num_weeks()
    }

    fn create_range(&self, request: RangeRequest<NaiveDate>) -> Vec<DerivedWeek> {
        let anchor_offset = (request.start - self.anchor).num_weeks();

        (0..request.count as i64)
            .map(|i| {
                let start = request.start + Duration::weeks(i);
                DerivedWeek::starting(start, self.input.rows.center + anchor_offset + i)
            })
            .collect()
    }
}

pub type WeekSnapshot = DateSnapshot<DerivedWeek>;

/// Derive the week-row snapshot for `input`. Cursors are week starts.
pub fn derive_week_snapshot(
    previous: Option<&Arc<WeekSnapshot>>,
    input: &WeekBufferInput,
) -> Result<Arc<WeekSnapshot>, WindowError> {
    let capacity = input.capacity();
    let (anchor, derived_anchor, _) = input.span()?;
    let source = WeekSource {
        input,
        anchor,
        capacity,
    };

    let request = WindowRequest::new(&source, derived_anchor, capacity_i64(capacity))
        .config_version(input.config_version())
        .source_version(input.source_version())
        .force_replace(input.force_replace);

    derive_snapshot(previous, &request)
}

/// Stateful week window: keeps the last snapshot and result.
#[derive(Debug, Default)]
pub struct WeekBuffer {
    state: BufferState<DerivedWeek>,
}

impl WeekBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn derive(&mut self, input: &WeekBufferInput) -> Result<bool, WindowError> {
        let snapshot = derive_week_snapshot(self.state.snapshot(), input)?;
        Ok(self.state.apply(snapshot, input.offset()?))
    }

    pub fn result(&self) -> Result<&BufferResult<DerivedWeek>, WindowError> {
        self.state.result("week buffer")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ring::RingOp;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn input(base_index: i64) -> WeekBufferInput {
        let mut input = WeekBufferInput::new(date(1, 15), WeekRows { count: 6, center: 0 }, Weekday::Mon);
        input.buffer_count = 1;
        input.base_index = base_index;
        input
    }

    #[test]
    fn week_start_honours_configured_first_day() {
        assert_eq!(start_of_week(date(1, 15), Weekday::Mon), date(1, 13));
        assert_eq!(start_of_week(date(1, 15), Weekday::Sun), date(1, 12));
        assert_eq!(start_of_week(date(1, 13), Weekday::Mon), date(1, 13));
    }

    #[test]
    fn seed_lays_out_rows_around_the_anchor_week() {
        let snapshot = derive_week_snapshot(None, &input(-1)).unwrap();

        assert_eq!(snapshot.items.len(), 8);
        let first = &snapshot.items[0];
        assert_eq!(first.start, date(1, 6));
        assert_eq!(first.end, date(1, 12));
        assert_eq!(first.days.len(), 7);
        assert_eq!(first.index, -1);
        assert_eq!(snapshot.meta.end, date(2, 24));
    }

    #[test]
    fn one_row_scroll_shifts_by_one_week() {
        let first = derive_week_snapshot(None, &input(-1)).unwrap();
        let next = derive_week_snapshot(Some(&first), &input(0)).unwrap();

        assert_eq!(next.meta.op, RingOp::ShiftRight);
        assert_eq!(next.meta.delta, 1);
        assert_eq!(next.items[0].start, date(1, 13));
        assert_eq!(next.items.last().map(|w| w.start), Some(date(3, 3)));
    }

    #[test]
    fn changing_week_start_replaces_the_window() {
        let first = derive_week_snapshot(None, &input(-1)).unwrap();
        let mut sunday = input(-1);
        sunday.week_starts_on = Weekday::Sun;
        let next = derive_week_snapshot(Some(&first), &sunday).unwrap();

        assert_eq!(next.meta.op, RingOp::Replace);
        assert_eq!(next.items[0].start.weekday(), Weekday::Sun);
    }

    #[test]
    fn window_range_runs_to_the_last_day_of_the_last_row() {
        let range = input(-1).window_range().unwrap();
        assert_eq!(range, DayRange::new(date(1, 6), date(3, 2)));
    }

    #[test]
    fn rows_past_the_last_date_are_an_error() {
        let far = input(50_000_000);
        assert_eq!(
            derive_week_snapshot(None, &far).unwrap_err(),
            WindowError::OutOfRange { base_index: 50_000_000 }
        );
        assert!(input(i64::MIN).window_range().is_err());
    }

    #[test]
    fn buffer_reports_unchanged_results() {
        let mut buffer = WeekBuffer::new();
        assert!(buffer.derive(&input(-1)).unwrap());
        assert!(!buffer.derive(&input(-1)).unwrap());
        assert!(buffer.derive(&input(0)).unwrap());
        assert_eq!(buffer.result().unwrap().window.start, 1);
    }
}
