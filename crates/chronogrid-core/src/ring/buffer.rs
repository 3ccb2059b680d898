//! Fixed-capacity double-ended ring buffer.
//!
//! Orientation: the *left* end (tail) holds the oldest item and the
//! *right* end (head) the newest. Pushing onto a full buffer evicts from the
//! opposite end. Linearisation through [`RingBuffer::items`] is cached per
//! revision, so repeated reads between mutations cost nothing.

use std::fmt;

/// Euclidean modulo, safe for negative offsets.
fn wrap(index: isize, capacity: usize) -> usize {
    index.rem_euclid(capacity as isize) as usize
}

pub struct RingBuffer<T> {
    slots: Vec<Option<T>>,
    capacity: usize,
    /// Slot of the newest item; always in `[0, capacity)` when capacity > 0
    head: usize,
    len: usize,
    revision: u64,
    cached_revision: u64,
    cached: Vec<T>,
}

impl<T> RingBuffer<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| None).collect(),
            capacity,
            head: 0,
            len: 0,
            revision: 0,
            cached_revision: 0,
            cached: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bumped once per mutating call, including batch calls.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn tail(&self) -> usize {
        wrap(self.head as isize + self.len as isize - 1, self.capacity)
    }

    fn evict_tail(&mut self) {
        let tail = self.tail();
        self.slots[tail] = None;
        self.len -= 1;
    }

    fn evict_head(&mut self) {
        self.slots[self.head] = None;
        self.head = wrap(self.head as isize + 1, self.capacity);
        self.len -= 1;
    }

    fn push_right(&mut self, item: T) {
        if self.is_full() {
            self.evict_tail();
        }
        let new_head = wrap(self.head as isize - 1, self.capacity);
        self.slots[new_head] = Some(item);
        self.head = new_head;
        self.len += 1;
    }

    fn push_left(&mut self, item: T) {
        if self.is_full() {
            self.evict_head();
        }
        let new_tail = wrap(self.tail() as isize + 1, self.capacity);
        self.slots[new_tail] = Some(item);
        self.len += 1;
    }

    /// Append at the newest end, evicting the oldest item when full.
    pub fn enqueue_right(&mut self, item: T) {
        if self.capacity == 0 {
            return;
        }
        self.push_right(item);
        self.revision += 1;
    }

    /// Append in order, `items[0]` ending up older than `items[1]`.
    pub fn enqueue_right_many<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        if self.capacity == 0 {
            return;
        }
        let mut pushed = false;
        for item in items {
            self.push_right(item);
            pushed = true;
        }
        if pushed {
            self.revision += 1;
        }
    }

    /// Prepend at the oldest end, evicting the newest item when full.
    pub fn enqueue_left(&mut self, item: T) {
        if self.capacity == 0 {
            return;
        }
        self.push_left(item);
        self.revision += 1;
    }

    /// Prepend so that `items[0]` becomes the new oldest item.
    pub fn enqueue_left_many<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: DoubleEndedIterator,
    {
        if self.capacity == 0 {
            return;
        }
        let mut pushed = false;
        for item in items.into_iter().rev() {
            self.push_left(item);
            pushed = true;
        }
        if pushed {
            self.revision += 1;
        }
    }

    /// Remove the oldest item.
    pub fn dequeue_left(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let tail = self.tail();
        let item = self.slots[tail].take();
        self.len -= 1;
        self.revision += 1;
        item
    }

    /// Remove the newest item.
    pub fn dequeue_right(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let item = self.slots[self.head].take();
        self.head = wrap(self.head as isize + 1, self.capacity);
        self.len -= 1;
        self.revision += 1;
        item
    }

    pub fn peek_left(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        self.slots[self.tail()].as_ref()
    }

    pub fn peek_right(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        self.slots[self.head].as_ref()
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.head = 0;
        self.len = 0;
        self.revision += 1;
    }

    /// Discard the contents and keep the last `capacity` of `items`
    /// (given oldest to newest).
    pub fn replace<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        let items: Vec<T> = items.into_iter().collect();
        let keep = items.len().min(self.capacity);
        let skip = items.len() - keep;

        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.head = 0;
        self.len = keep;

        // newest lands in slot 0, oldest in slot keep - 1
        for (offset, item) in items.into_iter().skip(skip).enumerate() {
            self.slots[keep - 1 - offset] = Some(item);
        }

        self.revision += 1;
    }

    /// Slot indices from oldest to newest.
    fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).rev().map(move |step| (self.head + step) % self.capacity)
    }

    /// Consume the buffer, oldest to newest.
    pub fn into_items(mut self) -> Vec<T> {
        let positions: Vec<usize> = self.positions().collect();
        positions
            .into_iter()
            .filter_map(|slot| self.slots[slot].take())
            .collect()
    }
}

impl<T: Clone> RingBuffer<T> {
    /// Oldest-to-newest view, rebuilt only when the revision moved.
    pub fn items(&mut self) -> &[T] {
        if self.revision != self.cached_revision {
            let linear: Vec<T> = self
                .positions()
                .filter_map(|slot| self.slots[slot].clone())
                .collect();
            self.cached = linear;
            self.cached_revision = self.revision;
        }
        &self.cached
    }
}

/// Newest to oldest, joined with arrows: `[5->4->3]`.
impl<T: fmt::Display> fmt::Display for RingBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for step in 0..self.len {
            let slot = (self.head + step) % self.capacity;
            if step > 0 {
                write!(f, "->")?;
            }
            if let Some(item) = &self.slots[slot] {
                write!(f, "{item}")?;
            }
        }
        write!(f, "]")
    }
}

impl<T: fmt::Debug> fmt::Debug for RingBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items: Vec<&T> = self
            .positions()
            .filter_map(|slot| self.slots[slot].as_ref())
            .collect();
        f.debug_struct("RingBuffer")
            .field("capacity", &self.capacity)
            .field("items", &items)
            .field("revision", &self.revision)
            .finish()
    }
}
