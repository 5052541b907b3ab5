//! Least-busy task assignment over a workload heap.
//!
//! The balancer keeps employees in a [`MinHeap`] ordered by workload,
//! breaking ties by ID so that repeated runs pick the same person.
//! Assigning a task increments the chosen employee's workload in place;
//! completing one decrements it.

use std::cmp::Ordering;

use tracing::debug;

use crate::heap::{MinHeap, Workload, WorkloadStats};
use crate::models::{Employee, Rank};

/// Ascending workload, then ascending ID.
pub fn by_workload_then_id<T: Workload>(a: &T, b: &T) -> Ordering {
    a.workload()
        .cmp(&b.workload())
        .then_with(|| a.id().cmp(b.id()))
}

/// Picks assignees by minimum workload.
#[derive(Debug, Clone)]
pub struct WorkloadBalancer {
    heap: MinHeap<Employee>,
}

impl Default for WorkloadBalancer {
    fn default() -> Self {
        Self {
            heap: MinHeap::with_comparator(by_workload_then_id::<Employee>),
        }
    }
}

impl WorkloadBalancer {
    /// Creates an empty balancer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a balancer over `employees` in O(n).
    pub fn from_employees(employees: Vec<Employee>) -> Self {
        let mut balancer = Self::new();
        balancer.heap.build_heap(employees);
        balancer
    }

    /// Adds an employee.
    pub fn add(&mut self, employee: Employee) {
        self.heap.insert(employee);
    }

    /// Removes an employee. Returns whether it was present.
    pub fn remove(&mut self, employee_id: &str) -> bool {
        self.heap.remove(employee_id)
    }

    /// Employee with the lowest workload overall.
    pub fn least_busy(&self) -> Option<&Employee> {
        self.heap.peek()
    }

    /// Employee of `rank` with the lowest workload.
    pub fn least_busy_of_rank(&self, rank: Rank) -> Option<&Employee> {
        self.heap.find_least_busy_by_rank(rank)
    }

    /// Assigns one task to the least-busy employee, optionally restricted
    /// to `rank`. Returns the chosen employee's ID.
    pub fn assign(&mut self, rank: Option<Rank>) -> Option<String> {
        let chosen = match rank {
            Some(rank) => self.heap.find_least_busy_by_rank(rank),
            None => self.heap.peek(),
        }?;
        let id = chosen.id.clone();
        let workload = chosen.workload.saturating_add(1);

        self.heap.update_workload(&id, workload);
        debug!(employee = %id, workload, "task assigned");
        Some(id)
    }

    /// Records a completed task for `employee_id`. Returns `false` if absent.
    pub fn complete(&mut self, employee_id: &str) -> bool {
        let Some(current) = self.heap.get(employee_id).map(|e| e.workload) else {
            return false;
        };
        self.heap
            .update_workload(employee_id, current.saturating_sub(1))
    }

    /// Current workload of an employee.
    pub fn workload_of(&self, employee_id: &str) -> Option<u32> {
        self.heap.get(employee_id).map(|e| e.workload)
    }

    /// Workload distribution.
    pub fn stats(&self) -> WorkloadStats {
        self.heap.stats()
    }

    /// Underlying heap.
    pub fn heap(&self) -> &MinHeap<Employee> {
        &self.heap
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

/// Least-busy employee of `rank` among `employees`, or `None` if nobody
/// has that rank.
pub fn assign_to_least_busy(employees: &[Employee], rank: Rank) -> Option<Employee> {
    let candidates: Vec<Employee> = employees
        .iter()
        .filter(|e| e.has_rank(rank))
        .cloned()
        .collect();
    if candidates.is_empty() {
        return None;
    }

    let mut heap = MinHeap::with_comparator(by_workload_then_id::<Employee>);
    heap.build_heap(candidates);
    heap.extract_min()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_employees() -> Vec<Employee> {
        vec![
            Employee::new("E1").with_rank(Rank::A).with_workload(2),
            Employee::new("E2").with_rank(Rank::A).with_workload(2),
            Employee::new("E3").with_rank(Rank::B).with_workload(0),
            Employee::new("E4").with_rank(Rank::A).with_workload(5),
        ]
    }

    #[test]
    fn test_least_busy_overall() {
        let b = WorkloadBalancer::from_employees(sample_employees());
        assert_eq!(b.least_busy().map(|e| e.id.as_str()), Some("E3"));
        assert_eq!(b.len(), 4);
    }

    #[test]
    fn test_ties_break_by_id() {
        let b = WorkloadBalancer::from_employees(sample_employees());
        assert_eq!(
            b.least_busy_of_rank(Rank::A).map(|e| e.id.as_str()),
            Some("E1")
        );
    }

    #[test]
    fn test_assign_spreads_load() {
        let mut b = WorkloadBalancer::from_employees(sample_employees());

        assert_eq!(b.assign(Some(Rank::A)).as_deref(), Some("E1"));
        assert_eq!(b.assign(Some(Rank::A)).as_deref(), Some("E2"));
        assert_eq!(b.assign(Some(Rank::A)).as_deref(), Some("E1"));
        assert_eq!(b.workload_of("E1"), Some(4));
        assert_eq!(b.workload_of("E2"), Some(3));
        assert!(b.heap().is_valid_heap());

        assert_eq!(b.assign(None).as_deref(), Some("E3"));
        assert_eq!(b.assign(Some(Rank::S)), None);
    }

    #[test]
    fn test_complete_decrements() {
        let mut b = WorkloadBalancer::from_employees(sample_employees());
        assert!(b.complete("E4"));
        assert_eq!(b.workload_of("E4"), Some(4));
        assert!(b.complete("E3"));
        assert_eq!(b.workload_of("E3"), Some(0));
        assert!(!b.complete("nobody"));
        assert!(b.heap().is_valid_heap());
    }

    #[test]
    fn test_add_remove() {
        let mut b = WorkloadBalancer::new();
        assert!(b.is_empty());
        assert_eq!(b.assign(None), None);

        b.add(Employee::new("X").with_workload(1));
        b.add(Employee::new("Y"));
        assert_eq!(b.least_busy().map(|e| e.id.as_str()), Some("Y"));
        assert!(b.remove("Y"));
        assert_eq!(b.least_busy().map(|e| e.id.as_str()), Some("X"));
        assert_eq!(b.stats().total, 1);
    }

    #[test]
    fn test_assign_to_least_busy_helper() {
        let employees = sample_employees();
        assert_eq!(
            assign_to_least_busy(&employees, Rank::A).map(|e| e.id),
            Some("E1".to_string())
        );
        assert_eq!(
            assign_to_least_busy(&employees, Rank::B).map(|e| e.id),
            Some("E3".to_string())
        );
        assert!(assign_to_least_busy(&employees, Rank::E).is_none());
    }
}
