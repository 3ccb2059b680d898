//! Cascaded placement of timed items inside one day column.
//!
//! Items whose starts are close together (closer than a fixed pixel
//! distance at the current hour height) and that start before the group
//! ends are laid out side by side as one cluster. Clusters that begin while
//! earlier clusters are still running are inset and raised one step per
//! open cluster, which gives the familiar cascade of overlapping meetings.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::item::DisplayItem;

/// Pixel distance under which two starts count as "close".
pub const PROXIMITY_THRESHOLD_PX: f64 = 40.0;

const LAST_MINUTE_OF_DAY: u32 = 23 * 60 + 59;

/// Inset per open cluster, as a fraction of the column width.
const DEPTH_INSET: f64 = 0.1;
const MAX_INSET: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedSettings {
    /// Height of one hour in pixels
    pub cell_height: f64,
    pub proximity_threshold_px: f64,
}

impl Default for TimedSettings {
    fn default() -> Self {
        Self {
            cell_height: 64.0,
            proximity_threshold_px: PROXIMITY_THRESHOLD_PX,
        }
    }
}

impl TimedSettings {
    pub fn new(cell_height: f64) -> Self {
        Self {
            cell_height,
            ..Self::default()
        }
    }

    /// The pixel threshold expressed in minutes at this cell height.
    pub fn threshold_minutes(&self) -> f64 {
        (self.proximity_threshold_px / self.cell_height) * 60.0
    }
}

/// Geometry of one timed item. `left` and `width` are fractions of the
/// day column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemPosition {
    pub top: f64,
    pub height: f64,
    pub left: f64,
    pub width: f64,
    pub z_index: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionedItem<T> {
    pub item: T,
    pub position: ItemPosition,
}

impl<T> PositionedItem<T> {
    pub fn map_item<U>(self, f: impl FnOnce(T) -> U) -> PositionedItem<U> {
        PositionedItem {
            item: f(self.item),
            position: self.position,
        }
    }
}

/// Minutes since midnight of the part of `item` that falls on `day`.
fn clamped_minutes<P>(item: &DisplayItem<P>, day: NaiveDate) -> (u32, u32) {
    let start = if item.start.date() == day {
        minutes_of(item.start)
    } else {
        0
    };
    let end = if item.end.date() == day {
        minutes_of(item.end)
    } else {
        LAST_MINUTE_OF_DAY
    };
    (start, end)
}

fn minutes_of(at: NaiveDateTime) -> u32 {
    at.hour() * 60 + at.minute()
}

fn vertical_extent(start_minutes: u32, end_minutes: u32, cell_height: f64) -> (f64, f64) {
    let start_hours = f64::from(start_minutes) / 60.0;
    let end_hours = f64::from(end_minutes) / 60.0;
    (start_hours * cell_height, (end_hours - start_hours) * cell_height)
}

struct Member<'a, P> {
    item: &'a DisplayItem<P>,
    start_minutes: u32,
    end_minutes: u32,
}

struct Cluster<'a, P> {
    members: Vec<Member<'a, P>>,
    start_minutes: u32,
    end_minutes: u32,
}

impl<'a, P> Cluster<'a, P> {
    fn accepts(&self, start_minutes: u32, threshold_minutes: f64) -> bool {
        let latest_start = self
            .members
            .last()
            .map(|member| member.start_minutes)
            .unwrap_or(self.start_minutes);

        let close = f64::from(start_minutes) - f64::from(latest_start) <= threshold_minutes;
        close && start_minutes < self.end_minutes
    }
}

fn form_clusters<'a, P>(
    sorted: &[&'a DisplayItem<P>],
    day: NaiveDate,
    threshold_minutes: f64,
) -> Vec<Cluster<'a, P>> {
    let mut clusters: Vec<Cluster<'a, P>> = Vec::new();

    for &item in sorted {
        let (start_minutes, end_minutes) = clamped_minutes(item, day);
        let member = Member {
            item,
            start_minutes,
            end_minutes,
        };

        match clusters.last_mut() {
            Some(cluster) if cluster.accepts(start_minutes, threshold_minutes) => {
                cluster.end_minutes = cluster.end_minutes.max(end_minutes);
                cluster.members.push(member);
            }
            _ => clusters.push(Cluster {
                members: vec![member],
                start_minutes,
                end_minutes,
            }),
        }
    }

    clusters
}

fn timed_items_for_day<'a, P>(items: &'a [DisplayItem<P>], day: NaiveDate) -> Vec<&'a DisplayItem<P>> {
    let mut timed: Vec<&DisplayItem<P>> = items
        .iter()
        .filter(|item| !item.is_all_day_or_multi_day() && item.overlaps_day(day))
        .collect();

    timed.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then_with(|| b.duration().cmp(&a.duration()))
    });
    timed
}

/// Place the timed items of `day`.
///
/// All-day and multi-day items are ignored here; they belong to the lane
/// layout. Output follows the cluster order, members in start order.
pub fn position_items_for_day<'a, P>(
    items: &'a [DisplayItem<P>],
    day: NaiveDate,
    settings: &TimedSettings,
) -> Vec<PositionedItem<&'a DisplayItem<P>>> {
    let sorted = timed_items_for_day(items, day);
    if sorted.is_empty() {
        return Vec::new();
    }

    let clusters = form_clusters(&sorted, day, settings.threshold_minutes());
    let mut positioned = Vec::with_capacity(sorted.len());
    // ascending end minutes of clusters still running
    let mut open_ends: Vec<u32> = Vec::new();

    for cluster in &clusters {
        let still_open = open_ends.partition_point(|end| *end <= cluster.start_minutes);
        open_ends.drain(..still_open);

        let depth = open_ends.len();
        let columns = cluster.members.len();

        for (index, member) in cluster.members.iter().enumerate() {
            let position = cascade_position(member, index, depth, columns, settings.cell_height);
            positioned.push(PositionedItem {
                item: member.item,
                position,
            });
        }

        let insert_at = open_ends.partition_point(|end| *end <= cluster.end_minutes);
        open_ends.insert(insert_at, cluster.end_minutes);
    }

    tracing::trace!(%day, items = positioned.len(), clusters = clusters.len(), "positioned day");
    positioned
}

fn cascade_position<P>(
    member: &Member<'_, P>,
    index: usize,
    depth: usize,
    columns: usize,
    cell_height: f64,
) -> ItemPosition {
    let (top, height) = vertical_extent(member.start_minutes, member.end_minutes, cell_height);

    let inset = (depth as f64 * DEPTH_INSET).min(MAX_INSET);
    let width = (1.0 - inset) / columns as f64;
    let left = inset + index as f64 * width;

    ItemPosition {
        top,
        height,
        left,
        width,
        z_index: 10 + depth as i64 * 10 + index as i64,
    }
}

/// Run [`position_items_for_day`] for every day, one list per day.
pub fn calculate_week_positions<'a, P>(
    items: &'a [DisplayItem<P>],
    days: &[NaiveDate],
    settings: &TimedSettings,
) -> Vec<Vec<PositionedItem<&'a DisplayItem<P>>>> {
    days.iter()
        .map(|day| position_items_for_day(items, *day, settings))
        .collect()
}

/// Vertical placement of a side-rail item on one day.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedSideItem<T> {
    pub item: T,
    pub top: f64,
    pub height: f64,
}

/// Side-rail items (travel, journeys) only need their vertical extent.
/// Items that cross midnight are cut at the day boundary.
pub fn position_side_items_for_day<'a, P>(
    items: &'a [DisplayItem<P>],
    day: NaiveDate,
    cell_height: f64,
) -> Vec<PositionedSideItem<&'a DisplayItem<P>>> {
    items
        .iter()
        .filter(|item| item.overlaps_day(day))
        .map(|item| {
            let (start, end) = clamped_minutes(item, day);
            let (top, height) = vertical_extent(start, end, cell_height);
            PositionedSideItem { item, top, height }
        })
        .collect()
}

/// Items touching one day, split by where they start.
#[derive(Debug)]
pub struct DayCollections<'a, P> {
    /// Items starting on the day
    pub day_items: Vec<&'a DisplayItem<P>>,
    /// All-day or multi-day items that started earlier
    pub spanning_items: Vec<&'a DisplayItem<P>>,
    pub all_items: Vec<&'a DisplayItem<P>>,
}

impl<'a, P> DayCollections<'a, P> {
    /// Spanning items first, then the day's own items.
    pub fn all_day_items(&self) -> Vec<&'a DisplayItem<P>> {
        self.spanning_items
            .iter()
            .chain(self.day_items.iter())
            .copied()
            .collect()
    }
}

pub fn collections_for_day<P>(items: &[DisplayItem<P>], day: NaiveDate) -> DayCollections<'_, P> {
    let mut collections = DayCollections {
        day_items: Vec::new(),
        spanning_items: Vec::new(),
        all_items: Vec::new(),
    };

    for item in items.iter().filter(|item| item.overlaps_day(day)) {
        collections.all_items.push(item);
        if item.start.date() == day {
            collections.day_items.push(item);
        } else if item.is_all_day_or_multi_day() {
            collections.spanning_items.push(item);
        }
    }

    collections
}
