//! Min-priority queue keyed by an `f64` priority.
//!
//! There is no decrease-key: callers re-insert an item with its improved
//! priority and skip stale entries on dequeue (checking a "finalized" set).

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

#[derive(Debug, Clone)]
struct Entry<T> {
    priority: f64,
    item: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.priority.total_cmp(&other.priority) == Ordering::Equal
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority.total_cmp(&other.priority)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MinQueue<T> {
    heap: BinaryHeap<Reverse<Entry<T>>>,
}

impl<T> MinQueue<T> {
    pub fn new() -> Self {
        MinQueue {
            heap: BinaryHeap::new(),
        }
    }

    pub fn push(&mut self, item: T, priority: f64) {
        self.heap.push(Reverse(Entry { priority, item }));
    }

    /// Removes and returns the entry with the smallest priority.
    pub fn pop(&mut self) -> Option<(T, f64)> {
        self.heap.pop().map(|Reverse(e)| (e.item, e.priority))
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }
}
