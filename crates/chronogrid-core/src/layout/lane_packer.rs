//! Greedy interval partitioning of day intervals into lanes.
//!
//! Items must arrive sorted by start day, longer duration first on ties,
//! then by id (see [`sort_for_packing`]). Intervals are inclusive, and lane
//! reuse is strict: an item starting the day after a lane's last item ends
//! shares that lane, an item starting on that same day does not.
//!
//! Each insertion is O(log k), k = concurrent lanes.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::heap::{MinHeap, MinMaxHeap};
use crate::item::DayInterval;

/// Which free lane an item goes into when several are free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReusePolicy {
    /// Lane whose last item ended earliest (lowest index on ties).
    #[default]
    SoonestReuse,
    /// Free lane whose last item ended latest (newest lane on ties), which
    /// keeps back-to-back items on one row.
    MostRecentReuse,
}

impl std::str::FromStr for ReusePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "soonest-reuse" | "soonest" => Ok(Self::SoonestReuse),
            "most-recent-reuse" | "most-recent" | "recent" => Ok(Self::MostRecentReuse),
            other => Err(format!("unknown reuse policy: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LaneEntry {
    lane_index: usize,
    end_day: NaiveDate,
}

type EntryOrder = fn(&LaneEntry, &LaneEntry) -> Ordering;

fn by_end_then_lane(a: &LaneEntry, b: &LaneEntry) -> Ordering {
    a.end_day
        .cmp(&b.end_day)
        .then(a.lane_index.cmp(&b.lane_index))
}

/// Stateful lane packer.
///
/// A fresh packer per layout pass is the common case; a long-lived packer
/// can be fed later-starting batches with [`LanePacker::insert_items`] and
/// trimmed with the eviction methods as a window scrolls.
pub struct LanePacker<T> {
    policy: ReusePolicy,
    lanes: Vec<Vec<T>>,
    /// Lanes keyed by last end day. Under `MostRecentReuse` only lanes
    /// still busy at the latest insertion point live here.
    active: MinHeap<LaneEntry, EntryOrder>,
    /// `MostRecentReuse` only: lanes free for the current start day.
    available: MinMaxHeap<LaneEntry, EntryOrder>,
}

impl<T: DayInterval> LanePacker<T> {
    pub fn new(policy: ReusePolicy) -> Self {
        Self {
            policy,
            lanes: Vec::new(),
            active: MinHeap::new(by_end_then_lane),
            available: MinMaxHeap::new(by_end_then_lane),
        }
    }

    pub fn policy(&self) -> ReusePolicy {
        self.policy
    }

    /// Insert a batch of sorted items. Every item must start no earlier
    /// than anything inserted before it.
    pub fn insert_items<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        for item in items {
            let reused = match self.policy {
                ReusePolicy::SoonestReuse => self.take_soonest(item.start_day()),
                ReusePolicy::MostRecentReuse => self.take_most_recent(item.start_day()),
            };

            let lane_index = match reused {
                Some(index) => index,
                None => {
                    let index = self.lanes.len();
                    tracing::trace!(lane = index, id = item.interval_id(), "opening lane");
                    self.lanes.push(Vec::new());
                    index
                }
            };

            self.active.push(LaneEntry {
                lane_index,
                end_day: item.end_day(),
            });
            self.lanes[lane_index].push(item);
        }
    }

    fn take_soonest(&mut self, start_day: NaiveDate) -> Option<usize> {
        let top = self.active.peek()?;
        if start_day > top.end_day {
            self.active.pop().map(|entry| entry.lane_index)
        } else {
            None
        }
    }

    fn take_most_recent(&mut self, start_day: NaiveDate) -> Option<usize> {
        while let Some(top) = self.active.peek() {
            if top.end_day >= start_day {
                break;
            }
            if let Some(entry) = self.active.pop() {
                self.available.push(entry);
            }
        }
        self.available.pop_max().map(|entry| entry.lane_index)
    }

    /// Drop items that end before `day`. Lane indices are kept; a lane
    /// emptied this way is reusable by any later item.
    pub fn evict_before(&mut self, day: NaiveDate) {
        for lane in &mut self.lanes {
            lane.retain(|item| item.end_day() >= day);
        }
        self.rebuild_heaps();
    }

    /// Drop items that start after `day`.
    pub fn evict_after(&mut self, day: NaiveDate) {
        for lane in &mut self.lanes {
            lane.retain(|item| item.start_day() <= day);
        }
        self.rebuild_heaps();
    }

    fn rebuild_heaps(&mut self) {
        self.active.clear();
        self.available.clear();
        for (lane_index, lane) in self.lanes.iter().enumerate() {
            let end_day = lane
                .last()
                .map(|item| item.end_day())
                .unwrap_or(NaiveDate::MIN);
            self.active.push(LaneEntry { lane_index, end_day });
        }
    }

    /// Current lane layout, each lane in insertion (start) order
    pub fn lanes(&self) -> &[Vec<T>] {
        &self.lanes
    }

    pub fn into_lanes(self) -> Vec<Vec<T>> {
        self.lanes
    }

    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    /// Reset for a fresh computation
    pub fn reset(&mut self) {
        self.lanes.clear();
        self.active.clear();
        self.available.clear();
    }
}

/// Sort items into the order the packer expects: start ascending, longer
/// duration first, then id.
pub fn sort_for_packing<T: DayInterval>(items: &mut [T]) {
    items.sort_by(|a, b| {
        a.start_day()
            .cmp(&b.start_day())
            .then_with(|| b.duration_days().cmp(&a.duration_days()))
            .then_with(|| a.interval_id().cmp(b.interval_id()))
    });
}

/// Sort and pack in one call.
pub fn pack_lanes<T: DayInterval>(mut items: Vec<T>, policy: ReusePolicy) -> Vec<Vec<T>> {
    sort_for_packing(&mut items);
    let mut packer = LanePacker::new(policy);
    packer.insert_items(items);
    tracing::debug!(lanes = packer.lane_count(), ?policy, "packed lanes");
    packer.into_lanes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Span {
        id: &'static str,
        start: NaiveDate,
        end: NaiveDate,
    }

    impl DayInterval for Span {
        fn interval_id(&self) -> &str {
            self.id
        }

        fn start_day(&self) -> NaiveDate {
            self.start
        }

        fn end_day(&self) -> NaiveDate {
            self.end
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    fn span(id: &'static str, start: u32, end: u32) -> Span {
        Span {
            id,
            start: day(start),
            end: day(end),
        }
    }

    fn ids(lanes: &[Vec<Span>]) -> Vec<Vec<&'static str>> {
        lanes
            .iter()
            .map(|lane| lane.iter().map(|s| s.id).collect())
            .collect()
    }

    #[test]
    fn multi_day_item_takes_first_lane_and_short_items_share_second() {
        for policy in [ReusePolicy::SoonestReuse, ReusePolicy::MostRecentReuse] {
            let lanes = pack_lanes(
                vec![span("A", 1, 1), span("B", 1, 3), span("C", 2, 2)],
                policy,
            );
            assert_eq!(ids(&lanes), vec![vec!["B"], vec!["A", "C"]], "{policy:?}");
        }
    }

    #[test]
    fn adjacent_items_share_a_lane_but_same_day_items_do_not() {
        let lanes = pack_lanes(
            vec![span("a", 1, 2), span("b", 3, 4), span("c", 4, 4)],
            ReusePolicy::SoonestReuse,
        );
        assert_eq!(ids(&lanes), vec![vec!["a", "b"], vec!["c"]]);
    }

    #[test]
    fn policies_disagree_on_which_free_lane_to_take() {
        let items = vec![
            span("P", 1, 5),
            span("R", 1, 3),
            span("Q", 1, 1),
            span("S", 4, 4),
        ];

        let soonest = pack_lanes(items.clone(), ReusePolicy::SoonestReuse);
        assert_eq!(ids(&soonest), vec![vec!["P"], vec!["R"], vec!["Q", "S"]]);

        let recent = pack_lanes(items, ReusePolicy::MostRecentReuse);
        assert_eq!(ids(&recent), vec![vec!["P"], vec!["R", "S"], vec!["Q"]]);
    }

    #[test]
    fn most_recent_reuse_prefers_newest_lane_on_equal_end() {
        let lanes = pack_lanes(
            vec![span("x", 1, 2), span("y", 1, 2), span("z", 3, 3)],
            ReusePolicy::MostRecentReuse,
        );
        assert_eq!(ids(&lanes), vec![vec!["x"], vec!["y", "z"]]);
    }

    #[test]
    fn incremental_batches_match_single_pass() {
        let first = vec![span("a", 1, 3), span("b", 1, 1), span("c", 2, 2)];
        let second = vec![span("d", 4, 6), span("e", 4, 4), span("f", 5, 5)];

        let mut packer = LanePacker::new(ReusePolicy::SoonestReuse);
        packer.insert_items(first.clone());
        packer.insert_items(second.clone());

        let mut all = first;
        all.extend(second);
        let single = pack_lanes(all, ReusePolicy::SoonestReuse);

        assert_eq!(ids(packer.lanes()), ids(&single));
    }

    #[test]
    fn evict_before_frees_lanes_for_reuse() {
        let mut packer = LanePacker::new(ReusePolicy::SoonestReuse);
        packer.insert_items(vec![span("a", 1, 2), span("b", 1, 9)]);
        packer.evict_before(day(5));

        assert_eq!(ids(packer.lanes()), vec![Vec::<&str>::new(), vec!["b"]]);

        packer.insert_items(vec![span("c", 6, 6)]);
        assert_eq!(ids(packer.lanes()), vec![vec!["c"], vec!["b"]]);
        assert_eq!(packer.lane_count(), 2);
    }

    #[test]
    fn evict_after_restores_lane_end_days() {
        let mut packer = LanePacker::new(ReusePolicy::MostRecentReuse);
        packer.insert_items(vec![span("a", 1, 1), span("b", 1, 1), span("c", 2, 8)]);
        assert_eq!(ids(packer.lanes()), vec![vec!["a"], vec!["b", "c"]]);

        packer.evict_after(day(1));
        assert_eq!(ids(packer.lanes()), vec![vec!["a"], vec!["b"]]);

        // both lanes end on day 1 again, so day 3 reuses the newest one
        packer.insert_items(vec![span("d", 3, 3)]);
        assert_eq!(ids(packer.lanes()), vec![vec!["a"], vec!["b", "d"]]);
    }

    #[test]
    fn reset_clears_state() {
        let mut packer = LanePacker::new(ReusePolicy::SoonestReuse);
        packer.insert_items(vec![span("a", 1, 1)]);
        packer.reset();
        assert_eq!(packer.lane_count(), 0);
    }

    #[test]
    fn policy_parses_from_cli_spellings() {
        assert_eq!("soonest".parse::<ReusePolicy>(), Ok(ReusePolicy::SoonestReuse));
        assert_eq!(
            "most-recent-reuse".parse::<ReusePolicy>(),
            Ok(ReusePolicy::MostRecentReuse)
        );
        assert!("random".parse::<ReusePolicy>().is_err());
    }
}
