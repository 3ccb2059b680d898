//! # Chronogrid Core Library
//!
//! This library provides the layout and windowing engine behind an
//! infinitely scrolling calendar. It is pure computation: callers hand in
//! items and viewport numbers and get back placements and window snapshots
//! to render. The `chronogrid-cli` binary exposes the same operations for
//! scripting and inspection.
//!
//! ## Architecture
//!
//! - **Heaps**: comparator-driven min-heap and min-max heap
//! - **Layout**: lane packing for all-day and multi-day items, column spans,
//!   lane overflow, and the cascade for overlapping timed items
//! - **Ring**: a fixed-capacity ring buffer and the incremental window
//!   engine that shifts it as the anchor date moves
//! - **Window**: day-column and week-row windows built on the ring engine
//! - **Storage**: TOML-based layout configuration
//!
//! ## Key Components
//!
//! - [`LanePacker`]: greedy interval partitioning into lanes
//! - [`position_items_for_day`]: cascade placement of timed items
//! - [`derive_snapshot`]: seed / replace / shift decision for a window
//! - [`LayoutConfig`]: application configuration management

pub mod error;
pub mod heap;
pub mod item;
pub mod layout;
pub mod ring;
pub mod storage;
pub mod window;

pub use error::{ConfigError, CoreError, Result, ValidationError, WindowError};
pub use heap::{MinHeap, MinMaxHeap};
pub use item::{DayInterval, DayRange, DisplayItem};
pub use layout::{
    grid_position, lane_capacity, organize_with_overflow, pack_lanes, place_into_lanes,
    position_items_for_day, GridPosition, ItemPosition, LaneOverflow, LanePacker, LaneSettings,
    PositionedItem, ReusePolicy, TimedSettings,
};
pub use ring::{derive_snapshot, RingBuffer, RingOp, RingSnapshot, SnapshotCache, WindowRequest, WindowSource};
pub use storage::LayoutConfig;
pub use window::{DayBuffer, DayCollection, DerivedDay, DerivedWeek, WeekBuffer};
