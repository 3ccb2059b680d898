//! Min-max heap: a double-ended priority queue.
//!
//! Even depths ("min levels") hold elements no greater than any of their
//! descendants, odd depths ("max levels") hold elements no smaller than any
//! of their descendants. The root is therefore the minimum and the larger
//! of the root's two children is the maximum.
//!
//! Restoring the invariant after a removal has to look two levels down at
//! once (both children and all four grandchildren); comparing against the
//! children alone leaves max-level nodes out of order.

use std::cmp::Ordering;
use std::fmt;

pub struct MinMaxHeap<T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    items: Vec<T>,
    compare: F,
}

impl<T, F> MinMaxHeap<T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    /// Create an empty heap. `compare` orders elements ascending; the
    /// maximum end uses its inverse.
    pub fn new(compare: F) -> Self {
        Self {
            items: Vec::new(),
            compare,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn peek_min(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn peek_max(&self) -> Option<&T> {
        match self.items.len() {
            0 => None,
            1 => self.items.first(),
            2 => self.items.get(1),
            _ => Some(&self.items[self.max_child_of_root()]),
        }
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
        self.bubble_up(self.items.len() - 1);
    }

    pub fn pop_min(&mut self) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }

        let min = self.items.swap_remove(0);
        if !self.items.is_empty() {
            self.trickle_down(0);
        }
        Some(min)
    }

    pub fn pop_max(&mut self) -> Option<T> {
        match self.items.len() {
            0 => None,
            1 => self.items.pop(),
            _ => {
                let max_index = if self.items.len() > 2 {
                    self.max_child_of_root()
                } else {
                    1
                };

                let max = self.items.swap_remove(max_index);
                if max_index < self.items.len() {
                    self.trickle_down(max_index);
                }
                Some(max)
            }
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Elements in internal layout order
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.items.clone()
    }

    fn less(&self, a: usize, b: usize) -> bool {
        (self.compare)(&self.items[a], &self.items[b]) == Ordering::Less
    }

    fn greater(&self, a: usize, b: usize) -> bool {
        (self.compare)(&self.items[a], &self.items[b]) == Ordering::Greater
    }

    fn max_child_of_root(&self) -> usize {
        if self.greater(1, 2) {
            1
        } else {
            2
        }
    }

    fn bubble_up(&mut self, index: usize) {
        if index == 0 {
            return;
        }

        let parent = parent_index(index);
        if is_min_level(index) {
            if self.greater(index, parent) {
                self.items.swap(index, parent);
                self.bubble_up_by(parent, Ordering::Greater);
            } else {
                self.bubble_up_by(index, Ordering::Less);
            }
        } else if self.less(index, parent) {
            self.items.swap(index, parent);
            self.bubble_up_by(parent, Ordering::Less);
        } else {
            self.bubble_up_by(index, Ordering::Greater);
        }
    }

    /// Walk up grandparent links while the node beats its grandparent in
    /// direction `toward` (`Less` on min levels, `Greater` on max levels).
    fn bubble_up_by(&mut self, mut current: usize, toward: Ordering) {
        while let Some(grandparent) = grandparent_index(current) {
            if (self.compare)(&self.items[current], &self.items[grandparent]) != toward {
                break;
            }
            self.items.swap(current, grandparent);
            current = grandparent;
        }
    }

    fn trickle_down(&mut self, index: usize) {
        if is_min_level(index) {
            self.trickle_down_by(index, Ordering::Less);
        } else {
            self.trickle_down_by(index, Ordering::Greater);
        }
    }

    fn trickle_down_by(&mut self, mut current: usize, toward: Ordering) {
        loop {
            let Some(candidate) = self.best_descendant(current, toward) else {
                break;
            };

            let beats_current =
                (self.compare)(&self.items[candidate], &self.items[current]) == toward;

            if is_grandchild(current, candidate) {
                if !beats_current {
                    break;
                }

                self.items.swap(candidate, current);
                let parent = parent_index(candidate);
                let away = toward.reverse();
                if (self.compare)(&self.items[candidate], &self.items[parent]) == away {
                    self.items.swap(candidate, parent);
                }
                current = candidate;
                continue;
            }

            if beats_current {
                self.items.swap(candidate, current);
            }
            break;
        }
    }

    /// Best of the up-to-two children and up-to-four grandchildren of
    /// `index`, in direction `toward`.
    fn best_descendant(&self, index: usize, toward: Ordering) -> Option<usize> {
        let len = self.items.len();
        let left = 2 * index + 1;
        let first_grandchild = 4 * index + 3;

        let children = left..(left + 2).min(len);
        let grandchildren = first_grandchild..(first_grandchild + 4).min(len);

        children.chain(grandchildren).fold(None, |best, candidate| match best {
            None => Some(candidate),
            Some(best) => {
                if (self.compare)(&self.items[candidate], &self.items[best]) == toward {
                    Some(candidate)
                } else {
                    Some(best)
                }
            }
        })
    }
}

impl<T: fmt::Debug, F> fmt::Debug for MinMaxHeap<T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MinMaxHeap").field("items", &self.items).finish()
    }
}

fn is_min_level(index: usize) -> bool {
    (index + 1).ilog2() % 2 == 0
}

fn parent_index(index: usize) -> usize {
    (index - 1) / 2
}

fn grandparent_index(index: usize) -> Option<usize> {
    if index < 3 {
        return None;
    }
    Some(parent_index(parent_index(index)))
}

fn is_grandchild(ancestor: usize, index: usize) -> bool {
    index >= 4 * ancestor + 3
}
