//! End-to-end layout tests: config values flowing into lane overflow, the
//! timed cascade, and the buffered day columns.

use chrono::{NaiveDate, NaiveDateTime};
use chronogrid_core::layout::{layout_all_day, ColumnRange};
use chronogrid_core::window::{DayBufferInput, DayColumns};
use chronogrid_core::{
    organize_with_overflow, position_items_for_day, DayBuffer, DayCollection, DayRange,
    DisplayItem, LayoutConfig, ReusePolicy,
};

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
}

fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
    date(d).and_hms_opt(h, m, 0).unwrap()
}

fn timed(id: &str, d: u32, from: (u32, u32), to: (u32, u32)) -> DisplayItem {
    DisplayItem::new(id, at(d, from.0, from.1), at(d, to.0, to.1), ())
}

fn all_day(id: &str, from: u32, to: u32) -> DisplayItem {
    DisplayItem::new(id, at(from, 0, 0), at(to, 23, 59), ()).all_day()
}

#[test]
fn test_close_meetings_split_the_column() {
    let config = LayoutConfig::default();
    let items = vec![
        timed("planning", 2, (9, 0), (9, 45)),
        timed("sync", 2, (9, 10), (9, 40)),
    ];

    let placed = position_items_for_day(&items, date(2), &config.timed_settings());
    assert_eq!(placed.len(), 2);
    for p in &placed {
        assert!((p.position.width - 0.5).abs() < 1e-9);
    }
    assert!((placed[0].position.left - 0.0).abs() < 1e-9);
    assert!((placed[1].position.left - 0.5).abs() < 1e-9);
    assert!((placed[0].position.top - 9.0 * 64.0).abs() < 1e-9);
}

#[test]
fn test_header_overflow_uses_configured_lane_geometry() {
    let mut config = LayoutConfig::default();
    config.set("lanes.item_height", "20").unwrap();
    config.set("lanes.item_gap", "0").unwrap();

    let items: Vec<DisplayItem> = (0..4).map(|n| all_day(&format!("trip-{n}"), 2, 4)).collect();
    // 60px fits three 20px lanes; one of them becomes "+N more"
    let layout = organize_with_overflow(&items, 60.0, &config.lane_settings());

    assert_eq!(layout.total_lanes, 4);
    assert_eq!(layout.visible_lanes.len(), 2);
    assert_eq!(layout.overflow_items().len(), 2);
}

#[test]
fn test_all_day_strip_counts_lanes_of_visible_week_only() {
    let items = vec![
        all_day("conference", 2, 4),
        all_day("offsite", 3, 3),
        all_day("holiday", 10, 10),
    ];
    let columns = ColumnRange {
        start: date(1),
        end: date(14),
        start_index: -7,
    };

    // the holiday goes back into the conference lane, the free lane that ended last
    let layout = layout_all_day(
        &items,
        &columns,
        &DayRange::new(date(8), date(14)),
        ReusePolicy::MostRecentReuse,
    );

    assert_eq!(layout.items.len(), 3);
    assert_eq!(layout.active_lanes, 1);
    let conference = layout.items.iter().find(|p| p.item.id == "conference").unwrap();
    assert_eq!((conference.start_index, conference.span), (-6, 3));
}

#[test]
fn test_day_buffer_serves_positioned_items_per_column() {
    let config = LayoutConfig::default();
    let items = vec![
        timed("standup", 9, (9, 0), (9, 15)),
        timed("review", 12, (14, 0), (15, 0)),
    ];
    let collection = DayCollection::build(
        &items,
        DayRange::new(date(1), date(30)),
        &config.timed_settings(),
        "items-v1",
    );

    let columns = DayColumns {
        count: config.window.day_columns,
        center: 0,
    };
    let mut input = DayBufferInput::new(date(10), columns, &collection);
    input.buffer_count = 3;
    input.base_index = -3;

    let mut buffer = DayBuffer::new();
    assert!(buffer.derive(&input).unwrap());

    let result = buffer.result().unwrap();
    assert_eq!(result.items().len(), 7 + 2 * 3);
    assert_eq!(result.range, DayRange::new(date(7), date(19)));

    let standup_column = result.items().iter().find(|d| d.date == date(9)).unwrap();
    assert_eq!(standup_column.items.len(), 1);
    assert_eq!(standup_column.items[0].item.id, "standup");

    // scrolling one column forward shifts the buffer instead of rebuilding it
    input.base_index = -2;
    assert!(buffer.derive(&input).unwrap());
    let result = buffer.result().unwrap();
    assert_eq!(result.meta().delta, 1);
    assert_eq!(result.range.start, date(8));
}
