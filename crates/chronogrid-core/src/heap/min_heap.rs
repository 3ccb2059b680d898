//! Binary min-heap ordered by a caller-supplied comparator.

use std::cmp::Ordering;
use std::fmt;

/// Binary min-heap.
///
/// O(log n) `push`/`pop`, O(1) `peek`. Unlike `std::collections::BinaryHeap`
/// the ordering comes from a comparator, so the same element type can be
/// ordered differently per call site.
pub struct MinHeap<T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    items: Vec<T>,
    compare: F,
}

impl<T, F> MinHeap<T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    /// Create an empty heap
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

    /// The minimum element, or `None` when empty
    pub fn peek(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
        self.sift_up(self.items.len() - 1);
    }

    /// Remove and return the minimum element
    pub fn pop(&mut self) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }

        let top = self.items.swap_remove(0);
        if !self.items.is_empty() {
            self.sift_down(0);
        }
        Some(top)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Consume the heap, returning elements in heap (not sorted) order
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if (self.compare)(&self.items[index], &self.items[parent]) != Ordering::Less {
                break;
            }
            self.items.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.items.len();
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut smallest = index;

            if left < len && (self.compare)(&self.items[left], &self.items[smallest]) == Ordering::Less {
                smallest = left;
            }
            if right < len && (self.compare)(&self.items[right], &self.items[smallest]) == Ordering::Less {
                smallest = right;
            }
            if smallest == index {
                break;
            }

            self.items.swap(index, smallest);
            index = smallest;
        }
    }
}

impl<T: fmt::Debug, F> fmt::Debug for MinHeap<T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MinHeap").field("items", &self.items).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_heap_peeks_and_pops_none() {
        let mut heap = MinHeap::new(|a: &i32, b: &i32| a.cmp(b));
        assert!(heap.peek().is_none());
        assert!(heap.pop().is_none());
        assert!(heap.is_empty());
    }

    #[test]
    fn pops_in_comparator_order() {
        let mut heap = MinHeap::new(|a: &i32, b: &i32| a.cmp(b));
        for value in [5, 1, 4, 1, 3, 9, 2] {
            heap.push(value);
        }
        assert_eq!(heap.peek(), Some(&1));

        let mut drained = Vec::new();
        while let Some(value) = heap.pop() {
            drained.push(value);
        }
        assert_eq!(drained, vec![1, 1, 2, 3, 4, 5, 9]);
    }

    #[test]
    fn reversed_comparator_behaves_as_max_heap() {
        let mut heap = MinHeap::new(|a: &i32, b: &i32| b.cmp(a));
        for value in [3, 7, 1] {
            heap.push(value);
        }
        assert_eq!(heap.pop(), Some(7));
        assert_eq!(heap.pop(), Some(3));
        assert_eq!(heap.pop(), Some(1));
    }

    #[test]
    fn tuple_comparator_breaks_ties_on_second_key() {
        let mut heap = MinHeap::new(|a: &(i32, usize), b: &(i32, usize)| {
            a.0.cmp(&b.0).then(a.1.cmp(&b.1))
        });
        heap.push((4, 2));
        heap.push((4, 0));
        heap.push((4, 1));
        assert_eq!(heap.pop(), Some((4, 0)));
        assert_eq!(heap.pop(), Some((4, 1)));
    }

    proptest! {
        #[test]
        fn drains_sorted(values in prop::collection::vec(-1000i64..1000, 0..200)) {
            let mut heap = MinHeap::new(|a: &i64, b: &i64| a.cmp(b));
            for value in &values {
                heap.push(*value);
            }

            let mut expected = values.clone();
            expected.sort();

            let mut drained = Vec::with_capacity(values.len());
            while let Some(value) = heap.pop() {
                drained.push(value);
            }
            prop_assert_eq!(drained, expected);
        }
    }
}
