//! Lane layout for all-day and multi-day items.
//!
//! Items are packed into lanes by the [`LanePacker`](super::LanePacker),
//! then each lane entry is mapped to grid columns for a visible range. A
//! separate pass sizes the header: how many lanes actually carry something
//! inside the currently visible sub-range, and how many lanes fit before the
//! rest collapse into an overflow bucket.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::grid::grid_position;
use super::lane_packer::{pack_lanes, ReusePolicy};
use crate::item::{DayRange, DisplayItem};

/// Sizing knobs for lane layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaneSettings {
    /// Height of one lane item in pixels
    pub item_height: f64,
    /// Vertical gap between lanes in pixels
    pub item_gap: f64,
    /// Lower bound for the lane capacity
    pub min_visible_lanes: usize,
    pub policy: ReusePolicy,
}

impl Default for LaneSettings {
    fn default() -> Self {
        Self {
            item_height: 24.0,
            item_gap: 4.0,
            min_visible_lanes: 2,
            policy: ReusePolicy::SoonestReuse,
        }
    }
}

/// A lane entry with its grid placement.
#[derive(Debug)]
pub struct PositionedLaneItem<'a, P> {
    pub item: &'a DisplayItem<P>,
    pub start_index: i64,
    pub span: i64,
}

/// Pack `items` into lanes and place each entry on the grid of `range`.
///
/// `base_index` is added to every start column so rows of a larger
/// virtual grid can share one index space. Without a range, entries carry
/// a zero placement.
///
/// O(n log n) for the sort plus O(n log k) for placement.
pub fn place_into_lanes<'a, P>(
    items: &'a [DisplayItem<P>],
    range: Option<&DayRange>,
    base_index: i64,
    policy: ReusePolicy,
) -> Vec<Vec<PositionedLaneItem<'a, P>>> {
    if items.is_empty() {
        return Vec::new();
    }

    let lanes = pack_lanes(items.iter().collect(), policy);

    lanes
        .into_iter()
        .map(|lane| {
            lane.into_iter()
                .map(|item| match range {
                    Some(range) => {
                        let pos = grid_position(item.start_day(), item.end_day(), range);
                        PositionedLaneItem {
                            item,
                            start_index: base_index + pos.column_start,
                            span: pos.span,
                        }
                    }
                    None => PositionedLaneItem {
                        item,
                        start_index: 0,
                        span: 0,
                    },
                })
                .collect()
        })
        .collect()
}

/// How many lanes fit in `available_height`.
///
/// Never below `min_visible_lanes`; a non-positive height is not an error
/// and yields the minimum.
pub fn lane_capacity(available_height: f64, settings: &LaneSettings) -> usize {
    let per_lane = settings.item_height + settings.item_gap;
    if available_height <= 0.0 || per_lane <= 0.0 {
        return settings.min_visible_lanes;
    }

    let fitted = (available_height / per_lane).floor() as usize;
    fitted.max(settings.min_visible_lanes)
}

/// Lanes split into what is drawn and what hides behind "+N more".
#[derive(Debug)]
pub struct LaneOverflow<'a, P> {
    pub total_lanes: usize,
    pub visible_lanes: Vec<Vec<&'a DisplayItem<P>>>,
    pub overflow_lanes: Vec<Vec<&'a DisplayItem<P>>>,
}

impl<'a, P> LaneOverflow<'a, P> {
    pub fn has_overflow(&self) -> bool {
        !self.overflow_lanes.is_empty()
    }

    /// Every collapsed item, lane by lane.
    pub fn overflow_items(&self) -> Vec<&'a DisplayItem<P>> {
        self.overflow_lanes.iter().flatten().copied().collect()
    }
}

/// Pack items and split the lanes by the capacity of `available_height`.
///
/// When everything fits all lanes are visible. Otherwise one lane is given
/// up for the overflow affordance: `capacity - 1` lanes stay visible and
/// the remainder is collapsed.
pub fn organize_with_overflow<'a, P>(
    items: &'a [DisplayItem<P>],
    available_height: f64,
    settings: &LaneSettings,
) -> LaneOverflow<'a, P> {
    if items.is_empty() {
        return LaneOverflow {
            total_lanes: 0,
            visible_lanes: Vec::new(),
            overflow_lanes: Vec::new(),
        };
    }

    let mut lanes = pack_lanes(items.iter().collect(), settings.policy);
    let total_lanes = lanes.len();
    let capacity = lane_capacity(available_height, settings);

    if total_lanes <= capacity {
        return LaneOverflow {
            total_lanes,
            visible_lanes: lanes,
            overflow_lanes: Vec::new(),
        };
    }

    let overflow_lanes = lanes.split_off(capacity.saturating_sub(1));
    tracing::debug!(
        total_lanes,
        capacity,
        hidden = overflow_lanes.len(),
        "lanes overflow"
    );

    LaneOverflow {
        total_lanes,
        visible_lanes: lanes,
        overflow_lanes,
    }
}

/// Visible columns with the virtual index of the first one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub start_index: i64,
}

impl ColumnRange {
    pub fn days(&self) -> DayRange {
        DayRange::new(self.start, self.end)
    }
}

/// Lane, start column and span of one all-day item.
#[derive(Debug)]
pub struct PositionedAllDayItem<'a, P> {
    pub item: &'a DisplayItem<P>,
    pub lane: usize,
    pub start_index: i64,
    pub span: i64,
}

/// Map packed lanes onto indexed columns. Items that do not touch the
/// columns are skipped.
pub fn position_all_day_items<'a, P>(
    lanes: &[Vec<&'a DisplayItem<P>>],
    columns: &ColumnRange,
) -> Vec<PositionedAllDayItem<'a, P>> {
    let mut positioned = Vec::new();

    for (lane, entries) in lanes.iter().enumerate() {
        for &item in entries {
            let start = item.start_day().max(columns.start);
            let end = item.end_day().min(columns.end);

            let start_index = columns.start_index + (start - columns.start).num_days();
            let end_index = columns.start_index + (end - columns.start).num_days();
            if end_index < start_index {
                continue;
            }

            positioned.push(PositionedAllDayItem {
                item,
                lane,
                start_index,
                span: end_index - start_index + 1,
            });
        }
    }

    positioned
}

/// Highest lane (+1) holding an item that intersects `sub_range`.
pub fn active_lane_count<P>(items: &[PositionedAllDayItem<'_, P>], sub_range: &DayRange) -> usize {
    items
        .iter()
        .filter(|positioned| positioned.item.overlaps_range(sub_range))
        .map(|positioned| positioned.lane + 1)
        .max()
        .unwrap_or(0)
}

/// All-day and multi-day items touching at least one of `days`.
pub fn all_day_items_for_days<'a, P>(
    items: &'a [DisplayItem<P>],
    days: &[NaiveDate],
) -> Vec<&'a DisplayItem<P>> {
    if days.is_empty() {
        return Vec::new();
    }

    items
        .iter()
        .filter(|item| item.is_all_day_or_multi_day())
        .filter(|item| days.iter().any(|day| item.overlaps_day(*day)))
        .collect()
}

/// Header layout for a buffered column strip.
#[derive(Debug)]
pub struct AllDayLayout<'a, P> {
    pub items: Vec<PositionedAllDayItem<'a, P>>,
    /// Lanes needed by the visible sub-range
    pub active_lanes: usize,
}

/// Pack the all-day items of `columns`, place them, and count the lanes
/// that the `visible` sub-range needs.
pub fn layout_all_day<'a, P>(
    items: &'a [DisplayItem<P>],
    columns: &ColumnRange,
    visible: &DayRange,
    policy: ReusePolicy,
) -> AllDayLayout<'a, P> {
    let days: Vec<NaiveDate> = columns.days().days().collect();
    let candidates = all_day_items_for_days(items, &days);
    let lanes = pack_lanes(candidates, policy);

    let items = position_all_day_items(&lanes, columns);
    let active_lanes = active_lane_count(&items, visible);

    AllDayLayout {
        items,
        active_lanes,
    }
}
