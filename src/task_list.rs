//! Doubly linked task list.
//!
//! Nodes live in an index arena; `prev`/`next` are slot indices rather
//! than pointers, and freed slots are recycled through a free list.
//!
//! Invariants:
//!   head.prev == None, tail.next == None
//!   len == number of nodes reachable from head
//!   walking `prev` from tail visits the same nodes in reverse
//!
//! Positional operations walk from whichever end is closer.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::models::{now_ms, Priority, Task, TaskPatch, TaskStatus};

#[derive(Debug, Clone)]
struct Node {
    data: Task,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Ordered collection of tasks with bidirectional navigation.
#[derive(Debug, Clone, Default)]
pub struct TaskList {
    nodes: Vec<Option<Node>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

/// Plain snapshot of a [`TaskList`]: tasks in traversal order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TaskListSnapshot {
    pub tasks: Vec<Task>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    fn node(&self, idx: usize) -> Option<&Node> {
        self.nodes.get(idx).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, idx: usize) -> Option<&mut Node> {
        self.nodes.get_mut(idx).and_then(Option::as_mut)
    }

    fn set_prev(&mut self, idx: usize, prev: Option<usize>) {
        if let Some(node) = self.node_mut(idx) {
            node.prev = prev;
        }
    }

    fn set_next(&mut self, idx: usize, next: Option<usize>) {
        if let Some(node) = self.node_mut(idx) {
            node.next = next;
        }
    }

    fn alloc(&mut self, data: Task) -> usize {
        let node = Node {
            data,
            prev: None,
            next: None,
        };
        match self.free.pop() {
            Some(idx) => {
                self.nodes[idx] = Some(node);
                idx
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        }
    }

    /// Adds a task at the tail.
    pub fn append(&mut self, task: Task) {
        let idx = self.alloc(task);
        match self.tail {
            Some(tail) => {
                self.set_prev(idx, Some(tail));
                self.set_next(tail, Some(idx));
            }
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
        self.len += 1;
    }

    /// Adds a task at the head.
    pub fn prepend(&mut self, task: Task) {
        let idx = self.alloc(task);
        match self.head {
            Some(head) => {
                self.set_next(idx, Some(head));
                self.set_prev(head, Some(idx));
            }
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
        self.len += 1;
    }

    /// Inserts a task so that it ends up at `index`.
    ///
    /// Valid positions are `0..=len()`. Returns `false` (and drops nothing
    /// into the list) when `index` is out of bounds.
    pub fn insert_at(&mut self, index: usize, task: Task) -> bool {
        if index > self.len {
            return false;
        }
        if index == 0 {
            self.prepend(task);
            return true;
        }
        if index == self.len {
            self.append(task);
            return true;
        }

        let Some(at) = self.index_at(index) else {
            return false;
        };
        let before = self.node(at).and_then(|n| n.prev);
        let idx = self.alloc(task);
        self.set_prev(idx, before);
        self.set_next(idx, Some(at));
        if let Some(before) = before {
            self.set_next(before, Some(idx));
        }
        self.set_prev(at, Some(idx));
        self.len += 1;
        true
    }

    /// Arena slot of the node at `index`, walking from the closer end.
    fn index_at(&self, index: usize) -> Option<usize> {
        if index >= self.len {
            return None;
        }
        if index <= self.len / 2 {
            let mut cur = self.head;
            for _ in 0..index {
                cur = cur.and_then(|c| self.node(c)?.next);
            }
            cur
        } else {
            let mut cur = self.tail;
            for _ in 0..(self.len - 1 - index) {
                cur = cur.and_then(|c| self.node(c)?.prev);
            }
            cur
        }
    }

    fn slot_of(&self, id: &str) -> Option<usize> {
        let mut cur = self.head;
        while let Some(node) = cur.and_then(|idx| self.node(idx)) {
            if node.data.id == id {
                return cur;
            }
            cur = node.next;
        }
        None
    }

    /// Detaches a node, frees its slot, and returns its task.
    fn unlink(&mut self, idx: usize) -> Option<Task> {
        let Node { data, prev, next } = self.nodes.get_mut(idx)?.take()?;

        match prev {
            Some(p) => self.set_next(p, next),
            None => self.head = next,
        }
        match next {
            Some(n) => self.set_prev(n, prev),
            None => self.tail = prev,
        }

        self.free.push(idx);
        self.len -= 1;
        Some(data)
    }

    /// Removes the first task with `id`. Returns whether one was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        self.slot_of(id)
            .and_then(|idx| self.unlink(idx))
            .is_some()
    }

    /// Removes and returns the task at `index`.
    pub fn remove_at(&mut self, index: usize) -> Option<Task> {
        let idx = self.index_at(index)?;
        self.unlink(idx)
    }

    /// Task with `id`.
    pub fn find(&self, id: &str) -> Option<&Task> {
        self.slot_of(id)
            .and_then(|idx| self.node(idx))
            .map(|n| &n.data)
    }

    /// First task matching `predicate`, front to back.
    pub fn find_by<P>(&self, mut predicate: P) -> Option<&Task>
    where
        P: FnMut(&Task) -> bool,
    {
        self.iter().find(|t| predicate(*t))
    }

    /// Task at `index`.
    pub fn get_at(&self, index: usize) -> Option<&Task> {
        self.index_at(index)
            .and_then(|idx| self.node(idx))
            .map(|n| &n.data)
    }

    /// Merges `patch` into the task with `id`. Returns `false` if absent.
    pub fn update(&mut self, id: &str, patch: &TaskPatch) -> bool {
        let Some(idx) = self.slot_of(id) else {
            return false;
        };
        match self.node_mut(idx) {
            Some(node) => {
                patch.apply(&mut node.data);
                true
            }
            None => false,
        }
    }

    pub fn first(&self) -> Option<&Task> {
        self.head.and_then(|idx| self.node(idx)).map(|n| &n.data)
    }

    pub fn last(&self) -> Option<&Task> {
        self.tail.and_then(|idx| self.node(idx)).map(|n| &n.data)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every task.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Front-to-back iterator. Reverse it for back-to-front navigation.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            front: self.head,
            back: self.tail,
            remaining: self.len,
        }
    }

    /// Back-to-front iterator.
    pub fn iter_rev(&self) -> std::iter::Rev<Iter<'_>> {
        self.iter().rev()
    }

    /// Calls `visitor(task, index)` front to back.
    pub fn for_each<F>(&self, mut visitor: F)
    where
        F: FnMut(&Task, usize),
    {
        for (i, task) in self.iter().enumerate() {
            visitor(task, i);
        }
    }

    /// Clones the tasks in traversal order. The list is unchanged.
    pub fn to_vec(&self) -> Vec<Task> {
        self.iter().cloned().collect()
    }

    /// Tasks matching `predicate`, in traversal order.
    pub fn filter<P>(&self, mut predicate: P) -> Vec<&Task>
    where
        P: FnMut(&Task) -> bool,
    {
        self.iter().filter(|t| predicate(*t)).collect()
    }

    pub fn by_status(&self, status: TaskStatus) -> Vec<&Task> {
        self.filter(|t| t.status == status)
    }

    pub fn by_priority(&self, priority: Priority) -> Vec<&Task> {
        self.filter(|t| t.priority == Some(priority))
    }

    /// Tasks due before now that are not completed.
    pub fn overdue(&self) -> Vec<&Task> {
        self.overdue_at(now_ms())
    }

    /// Tasks due before `now_ms` that are not completed.
    pub fn overdue_at(&self, now_ms: i64) -> Vec<&Task> {
        self.filter(|t| t.is_overdue_at(now_ms))
    }

    pub fn completed(&self) -> Vec<&Task> {
        self.filter(|t| t.is_completed())
    }

    pub fn pending(&self) -> Vec<&Task> {
        self.filter(|t| !t.is_completed())
    }

    /// Moves every task out in traversal order, leaving the list empty.
    fn drain_ordered(&mut self) -> Vec<Task> {
        let mut tasks = Vec::with_capacity(self.len);
        let mut cur = self.head;
        while let Some(node) = cur.and_then(|idx| self.nodes.get_mut(idx)?.take()) {
            cur = node.next;
            tasks.push(node.data);
        }
        self.clear();
        tasks
    }

    fn rebuild_sorted<F>(&mut self, compare: F)
    where
        F: FnMut(&Task, &Task) -> Ordering,
    {
        if self.len <= 1 {
            return;
        }
        let mut tasks = self.drain_ordered();
        tasks.sort_by(compare);
        for task in tasks {
            self.append(task);
        }
    }

    /// Stable sort by due date. Tasks without a due date go last.
    pub fn sort_by_due_date(&mut self, ascending: bool) {
        self.rebuild_sorted(|a, b| match (a.due_ms, b.due_ms) {
            (Some(x), Some(y)) if ascending => x.cmp(&y),
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
    }

    /// Stable sort by priority rank (high < medium < low < none).
    ///
    /// Descending reverses the rank, so tasks without a priority lead.
    pub fn sort_by_priority(&mut self, ascending: bool) {
        self.rebuild_sorted(|a, b| {
            let (x, y) = (Priority::sort_key(a.priority), Priority::sort_key(b.priority));
            if ascending {
                x.cmp(&y)
            } else {
                y.cmp(&x)
            }
        });
    }

    /// Reverses traversal order by swapping every node's links.
    pub fn reverse(&mut self) {
        let mut cur = self.head;
        while let Some(node) = cur.and_then(|idx| self.node_mut(idx)) {
            std::mem::swap(&mut node.prev, &mut node.next);
            // the old `next` is now `prev`
            cur = node.prev;
        }
        std::mem::swap(&mut self.head, &mut self.tail);
    }

    pub fn to_snapshot(&self) -> TaskListSnapshot {
        TaskListSnapshot {
            tasks: self.to_vec(),
        }
    }

    pub fn from_snapshot(snapshot: TaskListSnapshot) -> Self {
        let mut list = Self::new();
        list.restore(snapshot);
        list
    }

    /// Clears the list and appends every snapshot task in order.
    pub fn restore(&mut self, snapshot: TaskListSnapshot) {
        self.clear();
        for task in snapshot.tasks {
            self.append(task);
        }
    }
}

impl FromIterator<Task> for TaskList {
    fn from_iter<I: IntoIterator<Item = Task>>(iter: I) -> Self {
        let mut list = Self::new();
        for task in iter {
            list.append(task);
        }
        list
    }
}

/// Borrowing iterator over a [`TaskList`], navigable from both ends.
pub struct Iter<'a> {
    list: &'a TaskList,
    front: Option<usize>,
    back: Option<usize>,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Task;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.list.node(self.front?)?;
        self.front = node.next;
        self.remaining -= 1;
        Some(&node.data)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.list.node(self.back?)?;
        self.back = node.prev;
        self.remaining -= 1;
        Some(&node.data)
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a TaskList {
    type Item = &'a Task;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
