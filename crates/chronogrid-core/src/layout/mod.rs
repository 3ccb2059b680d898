//! Layout of calendar items: lanes for all-day and multi-day items, a
//! cascade for timed items, and column spans for the grid.

pub mod day_position;
pub mod grid;
pub mod lane_packer;
pub mod multi_day;

pub use day_position::{
    calculate_week_positions, collections_for_day, position_items_for_day,
    position_side_items_for_day, DayCollections, ItemPosition, PositionedItem, PositionedSideItem,
    TimedSettings,
};
pub use grid::{grid_position, GridPosition};
pub use lane_packer::{pack_lanes, sort_for_packing, LanePacker, ReusePolicy};
pub use multi_day::{
    active_lane_count, all_day_items_for_days, lane_capacity, layout_all_day,
    organize_with_overflow, place_into_lanes, position_all_day_items, AllDayLayout, ColumnRange,
    LaneOverflow, LaneSettings, PositionedAllDayItem, PositionedLaneItem,
};
