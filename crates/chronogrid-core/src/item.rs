//! Calendar items and inclusive day ranges.
//!
//! Every range in this crate is inclusive: an item's `end` is the last
//! instant it occupies, so a one-day item has `start_day() == end_day()`.
//! Hosts that store exclusive ends convert before handing items over.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Anything that occupies an inclusive run of calendar days.
///
/// This is the input seam of the lane packer.
pub trait DayInterval {
    /// Stable identifier, used as the last sort tie-breaker.
    fn interval_id(&self) -> &str;
    /// First occupied day.
    fn start_day(&self) -> NaiveDate;
    /// Last occupied day (inclusive).
    fn end_day(&self) -> NaiveDate;

    /// Number of occupied days; a one-day interval has duration 1.
    fn duration_days(&self) -> i64 {
        (self.end_day() - self.start_day()).num_days() + 1
    }
}

impl<T: DayInterval + ?Sized> DayInterval for &T {
    fn interval_id(&self) -> &str {
        (**self).interval_id()
    }

    fn start_day(&self) -> NaiveDate {
        (**self).start_day()
    }

    fn end_day(&self) -> NaiveDate {
        (**self).end_day()
    }
}

/// A calendar item as supplied by the data layer.
///
/// `payload` is opaque to the layout engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "P: Deserialize<'de> + Default"))]
pub struct DisplayItem<P = ()> {
    pub id: String,
    pub start: NaiveDateTime,
    /// Inclusive end instant.
    pub end: NaiveDateTime,
    #[serde(default)]
    pub all_day: bool,
    #[serde(default)]
    pub payload: P,
}

impl<P> DisplayItem<P> {
    /// Create a new item
    pub fn new(id: impl Into<String>, start: NaiveDateTime, end: NaiveDateTime, payload: P) -> Self {
        Self {
            id: id.into(),
            start,
            end,
            all_day: false,
            payload,
        }
    }

    /// Mark the item as all-day
    pub fn all_day(mut self) -> Self {
        self.all_day = true;
        self
    }

    pub fn start_day(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn end_day(&self) -> NaiveDate {
        self.end.date()
    }

    /// True when the item crosses at least one midnight.
    pub fn is_multi_day(&self) -> bool {
        self.start_day() != self.end_day()
    }

    /// All-day and multi-day items are laid out in lanes, not in the
    /// timed grid.
    pub fn is_all_day_or_multi_day(&self) -> bool {
        self.all_day || self.is_multi_day()
    }

    pub fn overlaps_day(&self, day: NaiveDate) -> bool {
        self.start_day() <= day && day <= self.end_day()
    }

    pub fn overlaps_range(&self, range: &DayRange) -> bool {
        range.overlaps(self.start_day(), self.end_day())
    }

    /// Timed duration, used to put longer items first on equal starts.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Check that the item does not end before it starts.
    ///
    /// The layout engine assumes validated input; hosts call this upstream.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.end < self.start {
            return Err(ValidationError::InvalidRange {
                id: self.id.clone(),
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }
}

impl<P> DayInterval for DisplayItem<P> {
    fn interval_id(&self) -> &str {
        &self.id
    }

    fn start_day(&self) -> NaiveDate {
        self.start.date()
    }

    fn end_day(&self) -> NaiveDate {
        self.end.date()
    }
}

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DayRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DayRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Range of `count` days beginning at `start`. `count` of 0 yields a
    /// single-day range.
    pub fn from_count(start: NaiveDate, count: usize) -> Self {
        let width = count.saturating_sub(1) as i64;
        Self {
            start,
            end: start + Duration::days(width),
        }
    }

    /// Number of days covered (inclusive).
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Inclusive overlap test against another `[start, end]` pair.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        !(end < self.start || self.end < start)
    }

    /// Iterate every day in the range, oldest first.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn one_day_item_has_duration_one() {
        let item = DisplayItem::new("a", at(2025, 3, 3, 9, 0), at(2025, 3, 3, 10, 0), ());
        assert_eq!(item.duration_days(), 1);
        assert!(!item.is_multi_day());
        assert!(!item.is_all_day_or_multi_day());
    }

    #[test]
    fn multi_day_item_counts_inclusive_days() {
        let item = DisplayItem::new("b", at(2025, 3, 3, 0, 0), at(2025, 3, 5, 23, 59), ());
        assert_eq!(item.duration_days(), 3);
        assert!(item.is_multi_day());
        assert!(item.overlaps_day(NaiveDate::from_ymd_opt(2025, 3, 4).unwrap()));
        assert!(!item.overlaps_day(NaiveDate::from_ymd_opt(2025, 3, 6).unwrap()));
    }

    #[test]
    fn validate_rejects_reversed_items() {
        let item = DisplayItem::new("bad", at(2025, 3, 3, 10, 0), at(2025, 3, 3, 9, 0), ());
        assert!(matches!(
            item.validate(),
            Err(ValidationError::InvalidRange { .. })
        ));
    }

    #[test]
    fn day_range_iterates_inclusively() {
        let start = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        let range = DayRange::from_count(start, 7);
        assert_eq!(range.len_days(), 7);
        assert_eq!(range.days().count(), 7);
        assert_eq!(range.days().last(), Some(range.end));
    }

    #[test]
    fn day_range_overlap_is_inclusive_at_both_edges() {
        let start = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        let range = DayRange::from_count(start, 3);
        assert!(range.overlaps(range.end, range.end + Duration::days(4)));
        assert!(range.overlaps(start - Duration::days(2), start));
        assert!(!range.overlaps(range.end + Duration::days(1), range.end + Duration::days(2)));
    }
}
