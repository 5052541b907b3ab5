use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Unbounded first-in, first-out queue.
#[derive(Debug, Clone, PartialEq)]
pub struct Queue<T> {
    items: VecDeque<T>,
}

/// Queue contents, front to rear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueSnapshot<T> {
    pub items: Vec<T>,
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }
}

impl<T> Queue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an item at the rear and returns the new length.
    pub fn enqueue(&mut self, item: T) -> usize {
        self.items.push_back(item);
        self.items.len()
    }

    /// Removes the front item.
    pub fn dequeue(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    /// Front item.
    pub fn peek(&self) -> Option<&T> {
        self.items.front()
    }

    /// Rear item.
    pub fn peek_rear(&self) -> Option<&T> {
        self.items.back()
    }

    /// First item matching `predicate`, front to rear.
    pub fn find<P>(&self, mut predicate: P) -> Option<&T>
    where
        P: FnMut(&T) -> bool,
    {
        self.items.iter().find(|item| predicate(*item))
    }

    /// Whether any item matches `predicate`.
    pub fn contains<P>(&self, predicate: P) -> bool
    where
        P: FnMut(&T) -> bool,
    {
        self.items.iter().any(predicate)
    }

    /// Items matching `predicate`, front to rear.
    pub fn filter<P>(&self, mut predicate: P) -> Vec<&T>
    where
        P: FnMut(&T) -> bool,
    {
        self.items.iter().filter(|item| predicate(*item)).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Front-to-rear iterator.
    pub fn iter(&self) -> std::collections::vec_deque::Iter<'_, T> {
        self.items.iter()
    }

    /// Calls `visitor(item, position)` front to rear.
    pub fn for_each<F>(&self, mut visitor: F)
    where
        F: FnMut(&T, usize),
    {
        for (i, item) in self.items.iter().enumerate() {
            visitor(item, i);
        }
    }
}

impl<T: PartialEq> Queue<T> {
    pub fn contains_item(&self, item: &T) -> bool {
        self.items.contains(item)
    }
}

impl<T: Clone> Queue<T> {
    /// Clones the items front to rear. The queue is unchanged.
    pub fn to_vec(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }

    pub fn to_snapshot(&self) -> QueueSnapshot<T> {
        QueueSnapshot {
            items: self.to_vec(),
        }
    }
}

impl<T> Queue<T> {
    pub fn from_snapshot(snapshot: QueueSnapshot<T>) -> Self {
        snapshot.items.into_iter().collect()
    }

    /// Clears the queue and enqueues the snapshot items in order.
    pub fn restore(&mut self, snapshot: QueueSnapshot<T>) {
        self.items = snapshot.items.into();
    }
}

impl<T> FromIterator<T> for Queue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> IntoIterator for &'a Queue<T> {
    type Item = &'a T;
    type IntoIter = std::collections::vec_deque::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
