//! Binary min-heap ordered by an injected comparator (workload by default).
//!
//! Variables:
//!   data    : Vec<T>          : heap array, 0-indexed, complete binary tree
//!   compare : fn(&T, &T) -> Ordering
//!
//! Equations:
//!   parent(i)      = (i - 1) / 2
//!   left_child(i)  = 2i + 1
//!   right_child(i) = 2i + 2
//!
//!   Heap invariant: compare(data[parent(i)], data[i]) != Greater  for all i > 0
//!
//!   insert(x):         push, sift_up(N)                       O(log N)
//!   extract_min():     swap(0, N-1), pop, sift_down(0)        O(log N)
//!   remove(id):        swap_remove(i), sift_up or sift_down   O(N) lookup
//!   update_workload:   mutate, sift_up if lower, down if higher
//!   build_heap(v):     sift_down from N/2 - 1 down to 0       O(N)
//!
//! Equal entries have no guaranteed relative order.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Employee, Rank};

/// An entry that carries an identity and a workload.
pub trait Workload {
    /// Unique identifier.
    fn id(&self) -> &str;

    /// Current workload (incomplete task count).
    fn workload(&self) -> u32;

    /// Replaces the workload.
    fn set_workload(&mut self, workload: u32);

    /// Rank, when the entry has one.
    fn rank(&self) -> Option<Rank> {
        None
    }
}

impl Workload for Employee {
    fn id(&self) -> &str {
        &self.id
    }

    fn workload(&self) -> u32 {
        self.workload
    }

    fn set_workload(&mut self, workload: u32) {
        self.workload = workload;
    }

    fn rank(&self) -> Option<Rank> {
        self.rank
    }
}

/// Ordering function used by [`MinHeap`].
pub type Comparator<T> = fn(&T, &T) -> Ordering;

/// Default comparator: ascending workload.
pub fn by_workload<T: Workload>(a: &T, b: &T) -> Ordering {
    a.workload().cmp(&b.workload())
}

/// Workload distribution summary.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorkloadStats {
    /// Number of entries.
    pub total: usize,
    /// Smallest workload (0 when empty).
    pub min: u32,
    /// Largest workload (0 when empty).
    pub max: u32,
    /// Mean workload, rounded to two decimals (0.0 when empty).
    pub avg: f64,
}

/// Binary min-heap.
#[derive(Debug, Clone)]
pub struct MinHeap<T> {
    data: Vec<T>,
    compare: Comparator<T>,
}

impl<T: Workload> Default for MinHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Workload> MinHeap<T> {
    /// Creates an empty heap ordered by ascending workload.
    pub fn new() -> Self {
        Self::with_comparator(by_workload::<T>)
    }

    /// Creates a workload heap from `entries` in O(n).
    pub fn from_entries(entries: Vec<T>) -> Self {
        let mut heap = Self::new();
        heap.build_heap(entries);
        heap
    }

    /// Rebuilds a workload heap from a snapshot taken with `to_snapshot`.
    pub fn from_snapshot(entries: Vec<T>) -> Self {
        Self::from_entries(entries)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.data.iter().position(|e| e.id() == id)
    }

    /// Whether an entry with `id` is present.
    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Looks up an entry by ID.
    pub fn get(&self, id: &str) -> Option<&T> {
        self.data.iter().find(|e| e.id() == id)
    }

    /// Removes the entry with `id` and returns it.
    pub fn take(&mut self, id: &str) -> Option<T> {
        let index = self.position(id)?;
        let removed = self.data.swap_remove(index);

        if index < self.data.len() {
            if index > 0 && self.less(index, parent(index)) {
                self.sift_up(index);
            } else {
                self.sift_down(index);
            }
        }
        Some(removed)
    }

    /// Removes the entry with `id`. Returns whether it was found.
    pub fn remove(&mut self, id: &str) -> bool {
        self.take(id).is_some()
    }

    /// Sets the workload of the entry with `id` and restores heap order.
    ///
    /// Returns `false` if no entry has that ID.
    pub fn update_workload(&mut self, id: &str, workload: u32) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        self.data[index].set_workload(workload);

        // a lowered key can only move up, a raised one only down
        if index > 0 && self.less(index, parent(index)) {
            self.sift_up(index);
        } else {
            self.sift_down(index);
        }
        true
    }

    /// Least-loaded entry of `rank`. Independent of heap order.
    pub fn find_least_busy_by_rank(&self, rank: Rank) -> Option<&T> {
        self.data
            .iter()
            .filter(|e| e.rank() == Some(rank))
            .min_by(|a, b| (self.compare)(a, b))
    }

    /// All entries of `rank`, least loaded first.
    pub fn by_rank(&self, rank: Rank) -> Vec<&T> {
        let mut entries: Vec<&T> = self.data.iter().filter(|e| e.rank() == Some(rank)).collect();
        entries.sort_by(|a, b| (self.compare)(a, b));
        entries
    }

    /// Workload distribution over all entries.
    pub fn stats(&self) -> WorkloadStats {
        if self.data.is_empty() {
            return WorkloadStats::default();
        }

        let total = self.data.len();
        let mut min = u32::MAX;
        let mut max = 0;
        let mut sum: u64 = 0;
        for e in &self.data {
            let w = e.workload();
            min = min.min(w);
            max = max.max(w);
            sum += w as u64;
        }
        let avg = sum as f64 / total as f64;

        WorkloadStats {
            total,
            min,
            max,
            avg: (avg * 100.0).round() / 100.0,
        }
    }
}

impl<T> MinHeap<T> {
    /// Creates an empty heap with a custom ordering.
    pub fn with_comparator(compare: Comparator<T>) -> Self {
        Self {
            data: Vec::new(),
            compare,
        }
    }

    #[inline]
    fn less(&self, a: usize, b: usize) -> bool {
        (self.compare)(&self.data[a], &self.data[b]) == Ordering::Less
    }

    /// Adds an entry.
    pub fn insert(&mut self, entry: T) {
        self.data.push(entry);
        self.sift_up(self.data.len() - 1);
    }

    /// Removes and returns the minimum entry.
    pub fn extract_min(&mut self) -> Option<T> {
        if self.data.is_empty() {
            return None;
        }
        let last = self.data.len() - 1;
        self.data.swap(0, last);
        let min = self.data.pop();
        if !self.data.is_empty() {
            self.sift_down(0);
        }
        min
    }

    /// The minimum entry, without removing it.
    pub fn peek(&self) -> Option<&T> {
        self.data.first()
    }

    /// Replaces the contents with `entries` and heapifies bottom-up.
    pub fn build_heap(&mut self, entries: Vec<T>) {
        self.data = entries;
        let n = self.data.len();
        for i in (0..n / 2).rev() {
            self.sift_down(i);
        }
        debug!(entries = n, "heap built");
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Entries in heap-array order.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Iterates entries in heap-array order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Checks the heap invariant over every parent/child pair.
    pub fn is_valid_heap(&self) -> bool {
        (1..self.data.len()).all(|i| !self.less(i, parent(i)))
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let p = parent(i);
            if !self.less(i, p) {
                break;
            }
            self.data.swap(p, i);
            i = p;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.data.len();
        loop {
            let mut smallest = i;
            let l = 2 * i + 1;
            let r = 2 * i + 2;
            if l < n && self.less(l, smallest) {
                smallest = l;
            }
            if r < n && self.less(r, smallest) {
                smallest = r;
            }
            if smallest == i {
                break;
            }
            self.data.swap(i, smallest);
            i = smallest;
        }
    }
}

impl<T: Clone> MinHeap<T> {
    /// All entries in ascending order. The heap is not modified.
    pub fn to_sorted_vec(&self) -> Vec<T> {
        let mut scratch = self.clone();
        let mut sorted = Vec::with_capacity(self.len());
        while let Some(entry) = scratch.extract_min() {
            sorted.push(entry);
        }
        sorted
    }

    /// Plain snapshot: the heap array.
    pub fn to_snapshot(&self) -> Vec<T> {
        self.data.clone()
    }

    /// Clears the heap and reloads it from a snapshot, keeping the comparator.
    pub fn restore(&mut self, entries: Vec<T>) {
        self.build_heap(entries);
    }
}

#[inline]
fn parent(i: usize) -> usize {
    (i - 1) / 2
}
