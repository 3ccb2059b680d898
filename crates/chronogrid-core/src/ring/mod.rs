//! Ring buffer and the incremental window engine built on it.

pub mod buffer;
pub mod cache;
pub mod snapshot;

pub use buffer::RingBuffer;
pub use cache::SnapshotCache;
pub use snapshot::{
    derive_snapshot, RangeRequest, RingMeta, RingOp, RingSnapshot, SnapshotOf, Window,
    WindowRequest, WindowSource,
};
