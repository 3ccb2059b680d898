//! Comparator-driven priority queues used by the lane packer.

mod min_heap;
mod min_max_heap;

pub use min_heap::MinHeap;
pub use min_max_heap::MinMaxHeap;
