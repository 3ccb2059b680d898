//! Day-column window for the scrolling week view.

use std::cmp::Ordering;
use std::sync::Arc;

use chrono::{Duration, NaiveDate};

use super::{
    base_index_offset, capacity_i64, window_span, BufferResult, BufferState, DateSnapshot,
};
use crate::error::WindowError;
use crate::item::{DayRange, DisplayItem};
use crate::layout::day_position::{
    position_items_for_day, position_side_items_for_day, PositionedItem, PositionedSideItem,
    TimedSettings,
};
use crate::ring::{derive_snapshot, RangeRequest, Window, WindowRequest, WindowSource};

pub const DEFAULT_DAY_BUFFER_COUNT: usize = 14;

/// Visible columns and the index of the centre column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayColumns {
    pub count: usize,
    pub center: i64,
}

impl DayColumns {
    pub fn capacity(&self, buffer_count: usize) -> usize {
        self.count.saturating_add(buffer_count.saturating_mul(2))
    }

    /// Days a window at `base_index` covers, so a host can build a
    /// [`DayCollection`] for exactly that stretch.
    pub fn window_range(
        &self,
        anchor: NaiveDate,
        base_index: i64,
        buffer_count: usize,
    ) -> Result<DayRange, WindowError> {
        self.span(anchor, base_index, buffer_count).map(|(_, range)| range)
    }

    fn span(
        &self,
        anchor: NaiveDate,
        base_index: i64,
        buffer_count: usize,
    ) -> Result<(NaiveDate, DayRange), WindowError> {
        base_index_offset(base_index, self.center, buffer_count)
            .and_then(|offset| {
                window_span(anchor, offset, buffer_count, self.capacity(buffer_count), 1)
            })
            .ok_or(WindowError::OutOfRange { base_index })
    }
}

pub type DayItems<P> = Arc<[PositionedItem<DisplayItem<P>>]>;
pub type DaySideItems<P> = Arc<[PositionedSideItem<DisplayItem<P>>]>;

/// Positioned timed items and side-rail items for a contiguous run of
/// days, computed once per item-set change. `version` identifies the item
/// set and becomes the window's source version.
#[derive(Debug, Clone)]
pub struct DayCollection<P> {
    start: NaiveDate,
    version: String,
    days: Vec<DayItems<P>>,
    side: Vec<DaySideItems<P>>,
}

impl<P: Clone> DayCollection<P> {
    pub fn build(
        items: &[DisplayItem<P>],
        range: DayRange,
        settings: &TimedSettings,
        version: impl Into<String>,
    ) -> Self {
        let days: Vec<DayItems<P>> = range
            .days()
            .map(|day| {
                position_items_for_day(items, day, settings)
                    .into_iter()
                    .map(|placed| placed.map_item(Clone::clone))
                    .collect::<Vec<_>>()
                    .into()
            })
            .collect();
        let side: Vec<DaySideItems<P>> = days.iter().map(|_| Arc::from(Vec::new())).collect();

        Self {
            start: range.start,
            version: version.into(),
            days,
            side,
        }
    }

    /// Attach side-rail items (travel, journeys), positioned per day at
    /// `cell_height`.
    pub fn with_side_items(mut self, side_items: &[DisplayItem<P>], cell_height: f64) -> Self {
        let start = self.start;
        self.side = (0..self.days.len())
            .map(|offset| {
                let day = start + Duration::days(offset as i64);
                position_side_items_for_day(side_items, day, cell_height)
                    .into_iter()
                    .map(|placed| PositionedSideItem {
                        item: placed.item.clone(),
                        top: placed.top,
                        height: placed.height,
                    })
                    .collect::<Vec<_>>()
                    .into()
            })
            .collect();
        self
    }
}

impl<P> DayCollection<P> {
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    fn index_of(&self, day: NaiveDate) -> Option<usize> {
        usize::try_from((day - self.start).num_days()).ok()
    }

    /// Positioned items for `day`, or `None` outside the collection.
    pub fn items_for(&self, day: NaiveDate) -> Option<&DayItems<P>> {
        self.index_of(day).and_then(|index| self.days.get(index))
    }

    pub fn side_items_for(&self, day: NaiveDate) -> Option<&DaySideItems<P>> {
        self.index_of(day).and_then(|index| self.side.get(index))
    }
}

/// One day column in the window.
#[derive(Debug)]
pub struct DerivedDay<P> {
    pub date: NaiveDate,
    /// Absolute column index in scroll coordinates
    pub index: i64,
    pub items: DayItems<P>,
    pub side_items: DaySideItems<P>,
}

impl<P> Clone for DerivedDay<P> {
    fn clone(&self) -> Self {
        Self {
            date: self.date,
            index: self.index,
            items: Arc::clone(&self.items),
            side_items: Arc::clone(&self.side_items),
        }
    }
}

impl<P> PartialEq for DerivedDay<P> {
    fn eq(&self, other: &Self) -> bool {
        self.date == other.date
            && self.index == other.index
            && Arc::ptr_eq(&self.items, &other.items)
            && Arc::ptr_eq(&self.side_items, &other.side_items)
    }
}

pub struct DayBufferInput<'a, P> {
    pub anchor: NaiveDate,
    pub columns: DayColumns,
    pub collection: &'a DayCollection<P>,
    pub base_index: i64,
    pub buffer_count: usize,
    pub force_replace: bool,
}

impl<'a, P> DayBufferInput<'a, P> {
    pub fn new(anchor: NaiveDate, columns: DayColumns, collection: &'a DayCollection<P>) -> Self {
        Self {
            anchor,
            columns,
            collection,
            base_index: columns.center - DEFAULT_DAY_BUFFER_COUNT as i64,
            buffer_count: DEFAULT_DAY_BUFFER_COUNT,
            force_replace: false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.columns.capacity(self.buffer_count)
    }

    pub fn window_range(&self) -> Result<DayRange, WindowError> {
        self.columns
            .window_range(self.anchor, self.base_index, self.buffer_count)
    }

    fn offset(&self) -> Result<i64, WindowError> {
        base_index_offset(self.base_index, self.columns.center, self.buffer_count).ok_or(
            WindowError::OutOfRange {
                base_index: self.base_index,
            },
        )
    }

    fn config_version(&self) -> String {
        format!(
            "day-buffer:columns={};center={};buffer={}",
            self.columns.count, self.columns.center, self.buffer_count
        )
    }
}

struct DaySource<'a, P> {
    input: &'a DayBufferInput<'a, P>,
    capacity: usize,
}

impl<'a, P> WindowSource for DaySource<'a, P> {
    type Cursor = NaiveDate;
    type Item = DerivedDay<P>;

    fn window(&self, anchor: &NaiveDate) -> Window<NaiveDate> {
        let start = *anchor - Duration::days(self.input.buffer_count as i64);
        let width = self.capacity.saturating_sub(1) as i64;
        Window {
            start,
            end: start + Duration::days(width),
        }
    }

    fn compare(&self, a: &NaiveDate, b: &NaiveDate) -> Ordering {
        a.cmp(b)
    }

    fn add(&self, cursor: &NaiveDate, amount: i64) -> NaiveDate {
        *cursor + Duration::days(amount)
    }

    fn delta(&self, from: &NaiveDate, to: &NaiveDate) -> i64 {
        (*to - *from).num_days()
    }

    fn create_range(&self, request: RangeRequest<NaiveDate>) -> Vec<DerivedDay<P>> {
        let anchor_offset = (request.start - self.input.anchor).num_days();
        let empty: DayItems<P> = Arc::from(Vec::new());
        let no_side: DaySideItems<P> = Arc::from(Vec::new());
        let collection = self.input.collection;

        (0..request.count as i64)
            .map(|i| {
                let date = request.start + Duration::days(i);
                DerivedDay {
                    date,
                    index: self.input.columns.center + anchor_offset + i,
                    items: collection
                        .items_for(date)
                        .map_or_else(|| Arc::clone(&empty), Arc::clone),
                    side_items: collection
                        .side_items_for(date)
                        .map_or_else(|| Arc::clone(&no_side), Arc::clone),
                }
            })
            .collect()
    }
}

pub type DaySnapshot<P> = DateSnapshot<DerivedDay<P>>;

/// Derive the day-column snapshot for `input`.
///
/// The ring anchor is the host anchor shifted by how far the base index sits
/// from its centred position, so scrolling the base index moves the window
/// without changing the host anchor.
pub fn derive_day_snapshot<P>(
    previous: Option<&Arc<DaySnapshot<P>>>,
    input: &DayBufferInput<'_, P>,
) -> Result<Arc<DaySnapshot<P>>, WindowError> {
    let capacity = input.capacity();
    let (derived_anchor, _) = input
        .columns
        .span(input.anchor, input.base_index, input.buffer_count)?;
    let source = DaySource { input, capacity };

    let request = WindowRequest::new(&source, derived_anchor, capacity_i64(capacity))
        .config_version(input.config_version())
        .source_version(input.collection.version())
        .force_replace(input.force_replace);

    derive_snapshot(previous, &request)
}

/// Stateful day window: keeps the last snapshot and result.
#[derive(Debug)]
pub struct DayBuffer<P> {
    state: BufferState<DerivedDay<P>>,
}

impl<P> Default for DayBuffer<P> {
    fn default() -> Self {
        Self {
            state: BufferState::default(),
        }
    }
}

impl<P> DayBuffer<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive against the stored snapshot. Returns whether the result
    /// changed.
    pub fn derive(&mut self, input: &DayBufferInput<'_, P>) -> Result<bool, WindowError> {
        let snapshot = derive_day_snapshot(self.state.snapshot(), input)?;
        Ok(self.state.apply(snapshot, input.offset()?))
    }

    pub fn result(&self) -> Result<&BufferResult<DerivedDay<P>>, WindowError> {
        self.state.result("day buffer")
    }
}
