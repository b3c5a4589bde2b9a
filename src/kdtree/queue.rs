//! A fixed-capacity priority queue that keeps the `k` lowest-priority items offered to it.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Keeps at most `capacity` items, always the ones with the smallest priority seen so far.
///
/// Internally a max-heap, so the current worst item can be evicted in `O(log k)`. Items of equal
/// priority keep the order in which they were offered.
#[derive(Debug, Clone)]
pub struct BoundedPriorityQueue<T> {
    heap: BinaryHeap<Entry<T>>,
    capacity: usize,
    offered: u64,
}

impl<T> BoundedPriorityQueue<T> {
    /// Create an empty queue holding at most `capacity` items. A capacity of zero is allowed and
    /// never holds anything.
    pub fn new(capacity: usize) -> Self {
        Self {
            // Unbounded queries pass the item count as capacity; grow on demand past this.
            heap: BinaryHeap::with_capacity(capacity.min(1024)),
            capacity,
            offered: 0,
        }
    }

    /// The maximum number of items this queue holds.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The number of items currently held.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns `true` if the queue holds no items.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Returns `true` once the queue holds `capacity` items.
    pub fn is_full(&self) -> bool {
        self.heap.len() >= self.capacity
    }

    /// The largest priority currently held, or `None` when empty.
    pub fn max_priority(&self) -> Option<f64> {
        self.heap.peek().map(|entry| entry.priority)
    }

    /// Offer `item` with the given priority.
    ///
    /// When the queue is full, `item` replaces the current maximum only if `priority` is strictly
    /// smaller; otherwise it is dropped. Returns whether `item` was kept.
    pub fn push(&mut self, item: T, priority: f64) -> bool {
        debug_assert!(!priority.is_nan());
        if self.capacity == 0 {
            return false;
        }

        if self.is_full() {
            match self.max_priority() {
                Some(max) if priority < max => {
                    self.heap.pop();
                }
                _ => return false,
            }
        }

        self.heap.push(Entry {
            priority,
            seq: self.offered,
            item,
        });
        self.offered += 1;
        true
    }

    /// Consume the queue, returning its items ordered by priority.
    pub fn into_sorted_vec(self, ascending: bool) -> Vec<T> {
        let sorted = self.heap.into_sorted_vec().into_iter().map(|entry| entry.item);
        if ascending {
            sorted.collect()
        } else {
            sorted.rev().collect()
        }
    }
}

/// A queued item with its priority. Ordered by priority, then by arrival.
#[derive(Debug, Clone)]
struct Entry<T> {
    priority: f64,
    seq: u64,
    item: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Entry<T> {}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .total_cmp(&other.priority)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod test {
    use super::BoundedPriorityQueue;

    #[test]
    fn keeps_the_k_smallest() {
        let mut queue = BoundedPriorityQueue::new(3);
        for (item, priority) in [("e", 5.0), ("a", 1.0), ("d", 4.0), ("b", 2.0), ("c", 3.0)] {
            queue.push(item, priority);
        }

        assert!(queue.is_full());
        assert_eq!(queue.max_priority(), Some(3.0));
        assert_eq!(queue.into_sorted_vec(true), vec!["a", "b", "c"]);
    }

    #[test]
    fn rejects_ties_with_the_maximum_when_full() {
        let mut queue = BoundedPriorityQueue::new(2);
        assert!(queue.push("first", 1.0));
        assert!(queue.push("second", 2.0));
        assert!(!queue.push("third", 2.0));
        assert!(queue.push("fourth", 0.5));
        assert_eq!(queue.into_sorted_vec(true), vec!["fourth", "first"]);
    }

    #[test]
    fn equal_priorities_keep_arrival_order() {
        let mut queue = BoundedPriorityQueue::new(4);
        queue.push(1, 1.0);
        queue.push(2, 0.0);
        queue.push(3, 1.0);
        queue.push(4, 1.0);
        assert_eq!(queue.into_sorted_vec(true), vec![2, 1, 3, 4]);
    }

    #[test]
    fn descending_order() {
        let mut queue = BoundedPriorityQueue::new(10);
        queue.push('x', 3.0);
        queue.push('y', 1.0);
        queue.push('z', 2.0);
        assert_eq!(queue.len(), 3);
        assert!(!queue.is_full());
        assert_eq!(queue.into_sorted_vec(false), vec!['x', 'z', 'y']);
    }

    #[test]
    fn zero_capacity_holds_nothing() {
        let mut queue = BoundedPriorityQueue::new(0);
        assert!(queue.is_full());
        assert!(!queue.push((), 0.0));
        assert!(queue.is_empty());
        assert_eq!(queue.max_priority(), None);
        assert!(queue.into_sorted_vec(true).is_empty());
    }
}
