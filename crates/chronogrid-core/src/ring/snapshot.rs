//! Incremental derivation of a scrolling window.
//!
//! A window is `capacity` consecutive entries addressed by a cursor (a day,
//! a week start). When the anchor moves by a few steps only the entries that
//! scroll into view are generated; the rest are carried over from the
//! previous snapshot.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::buffer::RingBuffer;
use crate::error::WindowError;

/// How a snapshot was produced from its predecessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RingOp {
    Seed,
    Replace,
    ShiftLeft,
    ShiftRight,
}

impl fmt::Display for RingOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RingOp::Seed => "seed",
            RingOp::Replace => "replace",
            RingOp::ShiftLeft => "shift-left",
            RingOp::ShiftRight => "shift-right",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RingMeta<C> {
    pub op: RingOp,
    /// Anchor movement since the previous snapshot, in cursor steps
    pub delta: i64,
    pub capacity: usize,
    /// Running index of the first entry. Survives content refreshes so
    /// consumers can tell real scrolling from a data reload.
    pub relative_index: i64,
    pub anchor: C,
    pub start: C,
    pub end: C,
    pub config_version: String,
    pub source_version: String,
}

/// Immutable result of one derivation. `items` runs from `meta.start` to
/// `meta.end` without gaps.
#[derive(Debug, Clone, PartialEq)]
pub struct RingSnapshot<I, C> {
    pub items: Vec<I>,
    pub meta: RingMeta<C>,
}

/// Inclusive cursor range covered by a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Window<C> {
    pub start: C,
    pub end: C,
}

/// Arguments for generating a run of entries.
#[derive(Debug, Clone)]
pub struct RangeRequest<C> {
    pub start: C,
    pub count: usize,
    pub anchor: C,
    /// Relative index of the first generated entry
    pub index_start: i64,
}

/// Cursor arithmetic and entry generation for one kind of window.
pub trait WindowSource {
    type Cursor: Clone + PartialEq + fmt::Debug;
    type Item: Clone;

    /// Window covered when centred on `anchor`.
    fn window(&self, anchor: &Self::Cursor) -> Window<Self::Cursor>;

    fn compare(&self, a: &Self::Cursor, b: &Self::Cursor) -> Ordering;

    fn add(&self, cursor: &Self::Cursor, amount: i64) -> Self::Cursor;

    /// Signed number of steps from `from` to `to`.
    fn delta(&self, from: &Self::Cursor, to: &Self::Cursor) -> i64;

    fn create_range(&self, request: RangeRequest<Self::Cursor>) -> Vec<Self::Item>;
}

pub type SnapshotOf<S> = RingSnapshot<<S as WindowSource>::Item, <S as WindowSource>::Cursor>;

pub struct WindowRequest<'a, S: WindowSource> {
    pub anchor: S::Cursor,
    pub capacity: i64,
    pub config_version: String,
    pub source_version: String,
    pub force_replace: bool,
    pub source: &'a S,
}

impl<'a, S: WindowSource> WindowRequest<'a, S> {
    pub fn new(source: &'a S, anchor: S::Cursor, capacity: i64) -> Self {
        Self {
            anchor,
            capacity,
            config_version: String::new(),
            source_version: String::new(),
            force_replace: false,
            source,
        }
    }

    pub fn config_version(mut self, version: impl Into<String>) -> Self {
        self.config_version = version.into();
        self
    }

    pub fn source_version(mut self, version: impl Into<String>) -> Self {
        self.source_version = version.into();
        self
    }

    pub fn force_replace(mut self, force: bool) -> Self {
        self.force_replace = force;
        self
    }
}

fn windows_overlap<S: WindowSource>(source: &S, a: &Window<S::Cursor>, b: &Window<S::Cursor>) -> bool {
    if source.compare(&a.end, &b.start) == Ordering::Less {
        return false;
    }
    if source.compare(&b.end, &a.start) == Ordering::Less {
        return false;
    }
    true
}

struct Step<C> {
    op: RingOp,
    delta: i64,
    relative_index: i64,
    window: Window<C>,
}

fn build<S: WindowSource>(
    request: &WindowRequest<'_, S>,
    capacity: usize,
    step: Step<S::Cursor>,
    items: Vec<S::Item>,
) -> Arc<SnapshotOf<S>> {
    tracing::debug!(
        op = %step.op,
        delta = step.delta,
        relative_index = step.relative_index,
        capacity,
        "derived window snapshot"
    );

    Arc::new(RingSnapshot {
        items,
        meta: RingMeta {
            op: step.op,
            delta: step.delta,
            capacity,
            relative_index: step.relative_index,
            anchor: request.anchor.clone(),
            start: step.window.start,
            end: step.window.end,
            config_version: request.config_version.clone(),
            source_version: request.source_version.clone(),
        },
    })
}

fn full_range<S: WindowSource>(
    request: &WindowRequest<'_, S>,
    capacity: usize,
    step: Step<S::Cursor>,
) -> Arc<SnapshotOf<S>> {
    let items = request.source.create_range(RangeRequest {
        start: step.window.start.clone(),
        count: capacity,
        anchor: request.anchor.clone(),
        index_start: step.relative_index,
    });
    build(request, capacity, step, items)
}

/// Derive the next window snapshot from `previous`.
///
/// Decisions, first match wins:
/// 1. no previous snapshot: seed
/// 2. forced, config or capacity changed, or the windows are disjoint:
///    replace with the relative index reset to 0
/// 3. source changed: replace, keeping relative-index continuity
/// 4. anchor unchanged: `previous` itself is returned
/// 5. jump of at least `capacity`: replace
/// 6. forward move: shift right by `delta`
/// 7. backward move: shift left by `|delta|`
pub fn derive_snapshot<S: WindowSource>(
    previous: Option<&Arc<SnapshotOf<S>>>,
    request: &WindowRequest<'_, S>,
) -> Result<Arc<SnapshotOf<S>>, WindowError> {
    if request.capacity < 0 {
        return Err(WindowError::NegativeCapacity {
            capacity: request.capacity,
        });
    }
    let capacity = request.capacity as usize;
    let source = request.source;
    let window = source.window(&request.anchor);

    let Some(previous) = previous else {
        let step = Step {
            op: RingOp::Seed,
            delta: 0,
            relative_index: 0,
            window,
        };
        return Ok(full_range(request, capacity, step));
    };

    let meta = &previous.meta;
    let delta = source.delta(&meta.anchor, &request.anchor);
    let config_changed = meta.config_version != request.config_version;
    let capacity_changed = meta.capacity != capacity || previous.items.len() != capacity;
    let source_changed = meta.source_version != request.source_version;
    let previous_window = Window {
        start: meta.start.clone(),
        end: meta.end.clone(),
    };
    let overlapping = windows_overlap(source, &previous_window, &window);

    if request.force_replace || config_changed || capacity_changed || !overlapping {
        let step = Step {
            op: RingOp::Replace,
            delta,
            relative_index: 0,
            window,
        };
        return Ok(full_range(request, capacity, step));
    }

    if source_changed {
        let step = Step {
            op: RingOp::Replace,
            delta,
            relative_index: meta.relative_index + delta,
            window,
        };
        return Ok(full_range(request, capacity, step));
    }

    if delta == 0 {
        return Ok(Arc::clone(previous));
    }

    if delta.unsigned_abs() >= capacity as u64 {
        let step = Step {
            op: RingOp::Replace,
            delta,
            relative_index: meta.relative_index + delta,
            window,
        };
        return Ok(full_range(request, capacity, step));
    }

    let entering_count = delta.unsigned_abs() as usize;
    let kept = capacity - entering_count;
    let relative_index = meta.relative_index + delta;
    let mut ring = RingBuffer::new(capacity);

    let op = if delta > 0 {
        ring.replace(previous.items[entering_count..].iter().cloned());
        let entering = source.create_range(RangeRequest {
            start: source.add(&meta.end, 1),
            count: entering_count,
            anchor: request.anchor.clone(),
            index_start: meta.relative_index + capacity as i64,
        });
        ring.enqueue_right_many(entering);
        RingOp::ShiftRight
    } else {
        ring.replace(previous.items[..kept].iter().cloned());
        let entering = source.create_range(RangeRequest {
            start: window.start.clone(),
            count: entering_count,
            anchor: request.anchor.clone(),
            index_start: relative_index,
        });
        ring.enqueue_left_many(entering);
        RingOp::ShiftLeft
    };

    let step = Step {
        op,
        delta,
        relative_index,
        window,
    };
    Ok(build(request, capacity, step, ring.into_items()))
}
