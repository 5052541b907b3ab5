//! Fixed-capacity ring buffer.
//!
//! Variables:
//!   slots : Vec<Option<T>>, length = capacity
//!   front : index of the oldest item
//!   rear  : index of the newest item
//!   size  : live items, 0 <= size <= capacity
//!
//! Equations:
//!   rear = (front + size - 1) mod capacity   when size > 0
//!   enqueue when size == capacity: dequeue first, then write at rear + 1
//!
//! Overflow drops the oldest item. The newest `capacity` items are always
//! the ones retained.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CollectionsConfig;

/// Bounded queue that overwrites its oldest item when full.
#[derive(Debug, Clone)]
pub struct CircularQueue<T> {
    slots: Vec<Option<T>>,
    front: usize,
    rear: usize,
    size: usize,
}

/// Capacity plus items from front to rear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircularQueueSnapshot<T> {
    pub capacity: usize,
    pub items: Vec<T>,
}

impl<T> CircularQueue<T> {
    /// Creates an empty ring. A capacity of 0 is raised to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: std::iter::repeat_with(|| None).take(capacity).collect(),
            front: 0,
            rear: capacity - 1,
            size: 0,
        }
    }

    /// Creates an empty ring sized by `config.circular_capacity`.
    pub fn with_config(config: &CollectionsConfig) -> Self {
        Self::new(config.circular_capacity)
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.size == self.capacity()
    }

    /// Adds an item at the rear.
    ///
    /// When the ring is full the front item is evicted first and returned.
    pub fn enqueue(&mut self, item: T) -> Option<T> {
        let evicted = if self.is_full() {
            let old = self.dequeue();
            debug!(capacity = self.capacity(), "circular queue full, oldest item evicted");
            old
        } else {
            None
        };

        self.rear = (self.rear + 1) % self.capacity();
        self.slots[self.rear] = Some(item);
        self.size += 1;
        evicted
    }

    /// Removes the oldest item.
    pub fn dequeue(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let item = self.slots[self.front].take();
        self.front = (self.front + 1) % self.capacity();
        self.size -= 1;
        item
    }

    /// Oldest item.
    pub fn peek(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        self.slots[self.front].as_ref()
    }

    /// Newest item.
    pub fn peek_rear(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        self.slots[self.rear].as_ref()
    }

    /// Drops every item and resets the indices.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.front = 0;
        self.rear = self.capacity() - 1;
        self.size = 0;
    }

    /// Items from front to rear.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        let capacity = self.capacity();
        (0..self.size).filter_map(move |i| self.slots[(self.front + i) % capacity].as_ref())
    }

    pub fn from_snapshot(snapshot: CircularQueueSnapshot<T>) -> Self {
        let mut queue = Self::new(snapshot.capacity);
        queue.restore(snapshot.items);
        queue
    }

    /// Clears the ring and enqueues `items` in order, keeping this ring's
    /// capacity. Excess items evict the earlier ones as usual.
    pub fn restore(&mut self, items: Vec<T>) {
        self.clear();
        let mut dropped = 0usize;
        for item in items {
            if self.enqueue(item).is_some() {
                dropped += 1;
            }
        }
        if dropped > 0 {
            debug!(dropped, capacity = self.capacity(), "restored circular queue over capacity");
        }
    }
}

impl<T: Clone> CircularQueue<T> {
    /// Linearizes the ring from front to rear.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }

    pub fn to_snapshot(&self) -> CircularQueueSnapshot<T> {
        CircularQueueSnapshot {
            capacity: self.capacity(),
            items: self.to_vec(),
        }
    }
}

impl<T> Default for CircularQueue<T> {
    fn default() -> Self {
        Self::with_config(&CollectionsConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overflow_evicts_oldest() {
        let mut q = CircularQueue::new(3);
        assert_eq!(q.enqueue('a'), None);
        assert_eq!(q.enqueue('b'), None);
        assert_eq!(q.enqueue('c'), None);
        assert!(q.is_full());
        assert_eq!(q.enqueue('d'), Some('a'));

        assert_eq!(q.to_vec(), vec!['b', 'c', 'd']);
        assert_eq!(q.len(), 3);
        assert_eq!(q.peek(), Some(&'b'));
        assert_eq!(q.peek_rear(), Some(&'d'));
    }

    #[test]
    fn test_wraparound() {
        let mut q = CircularQueue::new(3);
        for i in 0..10 {
            q.enqueue(i);
            if i % 2 == 0 {
                q.dequeue();
            }
        }
        // evictions and dequeues interleave; only the newest three survive
        assert_eq!(q.to_vec(), vec![7, 8, 9]);
        assert!(q.len() <= q.capacity());
    }

    #[test]
    fn test_dequeue_until_empty() {
        let mut q = CircularQueue::new(2);
        q.enqueue(1);
        q.enqueue(2);
        assert_eq!(q.dequeue(), Some(1));
        assert_eq!(q.dequeue(), Some(2));
        assert_eq!(q.dequeue(), None);
        assert!(q.is_empty());
        assert!(q.peek().is_none());
    }

    #[test]
    fn test_zero_capacity_is_raised() {
        let mut q = CircularQueue::new(0);
        assert_eq!(q.capacity(), 1);
        q.enqueue("x");
        assert_eq!(q.enqueue("y"), Some("x"));
    }

    #[test]
    fn test_with_config() {
        let q: CircularQueue<u8> =
            CircularQueue::with_config(&CollectionsConfig::default().with_circular_capacity(4));
        assert_eq!(q.capacity(), 4);
        assert_eq!(CircularQueue::<u8>::default().capacity(), 10);
    }

    #[test]
    fn test_clear() {
        let mut q = CircularQueue::new(2);
        q.enqueue(1);
        q.enqueue(2);
        q.enqueue(3);
        q.clear();
        assert!(q.is_empty());
        q.enqueue(4);
        assert_eq!(q.to_vec(), vec![4]);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut q = CircularQueue::new(3);
        for s in ["a", "b", "c", "d"] {
            q.enqueue(s.to_string());
        }
        let json = serde_json::to_string(&q.to_snapshot()).unwrap();
        let restored: CircularQueue<String> =
            CircularQueue::from_snapshot(serde_json::from_str(&json).unwrap());
        assert_eq!(restored.capacity(), 3);
        assert_eq!(restored.to_vec(), vec!["b", "c", "d"]);
    }

    #[test]
    fn test_restore_keeps_most_recent() {
        let mut q = CircularQueue::new(2);
        q.restore(vec![1, 2, 3, 4]);
        assert_eq!(q.to_vec(), vec![3, 4]);
    }
}
