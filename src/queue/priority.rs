use serde::{Deserialize, Serialize};

/// An item paired with its priority. Larger values dequeue first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityItem<T> {
    pub data: T,
    pub priority: i32,
}

/// Highest-priority-first queue, stable among equal priorities.
///
/// Items are kept sorted by descending priority. A new item is inserted
/// before the first item with a strictly lower priority, so it lands
/// behind every existing item of equal priority.
#[derive(Debug, Clone, PartialEq)]
pub struct PriorityQueue<T> {
    items: Vec<PriorityItem<T>>,
}

/// Queue contents in dequeue order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityQueueSnapshot<T> {
    pub items: Vec<PriorityItem<T>>,
}

impl<T> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> PriorityQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `data` and returns the new length.
    pub fn enqueue(&mut self, data: T, priority: i32) -> usize {
        let at = self
            .items
            .iter()
            .position(|item| item.priority < priority)
            .unwrap_or(self.items.len());
        self.items.insert(at, PriorityItem { data, priority });
        self.items.len()
    }

    /// Removes the highest-priority (oldest among equals) item.
    pub fn dequeue(&mut self) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }
        Some(self.items.remove(0).data)
    }

    pub fn peek(&self) -> Option<&T> {
        self.items.first().map(|item| &item.data)
    }

    /// Priority of the front item.
    pub fn peek_priority(&self) -> Option<i32> {
        self.items.first().map(|item| item.priority)
    }

    /// Items with their priorities, in dequeue order.
    pub fn entries(&self) -> &[PriorityItem<T>] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter().map(|item| &item.data)
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

    pub fn from_snapshot(snapshot: PriorityQueueSnapshot<T>) -> Self {
        let mut queue = Self::new();
        queue.restore(snapshot);
        queue
    }

    /// Clears the queue and enqueues the snapshot items in order.
    ///
    /// A snapshot taken from a queue comes back in the same order; an
    /// unordered one is put into priority order.
    pub fn restore(&mut self, snapshot: PriorityQueueSnapshot<T>) {
        self.items.clear();
        for item in snapshot.items {
            self.enqueue(item.data, item.priority);
        }
    }
}

impl<T: Clone> PriorityQueue<T> {
    /// Clones the data in dequeue order.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }

    pub fn to_snapshot(&self) -> PriorityQueueSnapshot<T> {
        PriorityQueueSnapshot {
            items: self.items.clone(),
        }
    }
}
