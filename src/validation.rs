//! Caller-side validation of organization records.
//!
//! The containers only require an `id` on each record. Before loading
//! records from an external source, callers can run [`validate_records`] to
//! catch data that would make later queries misleading. Detects:
//! - Duplicate and empty IDs
//! - Tasks assigned to unknown employees
//! - Groups led by unknown employees
//! - Employees reporting to unknown managers
//! - Circular reporting chains
//! - More than one CEO
//!
//! All problems are collected; nothing stops at the first error.

use std::collections::{HashMap, HashSet};

use crate::models::{Employee, Group, Role, Task};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two records of the same kind share an ID.
    DuplicateId,
    /// A record has an empty ID.
    EmptyId,
    /// A task's `assigned_to` is not a known employee.
    UnknownAssignee,
    /// A group's `leader_id` is not a known employee.
    UnknownLeader,
    /// An employee's `manager_id` is not a known employee.
    UnknownManager,
    /// Following `manager_id` links leads back to the start.
    CyclicReporting,
    /// More than one employee has the CEO role.
    MultipleRoots,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

fn check_ids<'a>(
    label: &str,
    ids: impl Iterator<Item = &'a str>,
    errors: &mut Vec<ValidationError>,
) -> HashSet<&'a str> {
    let mut seen = HashSet::new();
    for id in ids {
        if id.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyId,
                format!("{label} with empty ID"),
            ));
        } else if !seen.insert(id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate {label} ID: {id}"),
            ));
        }
    }
    seen
}

/// Validates employees, tasks, and groups together.
///
/// Checks:
/// 1. No empty or duplicate IDs within each record kind
/// 2. Every task assignee is an employee
/// 3. Every group leader is an employee
/// 4. Every manager reference is an employee
/// 5. No circular reporting chain
/// 6. At most one CEO
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_records(employees: &[Employee], tasks: &[Task], groups: &[Group]) -> ValidationResult {
    let mut errors = Vec::new();

    let employee_ids = check_ids("employee", employees.iter().map(|e| e.id.as_str()), &mut errors);
    check_ids("task", tasks.iter().map(|t| t.id.as_str()), &mut errors);
    check_ids("group", groups.iter().map(|g| g.id.as_str()), &mut errors);

    for task in tasks {
        if let Some(assignee) = task.assigned_to.as_deref() {
            if !employee_ids.contains(assignee) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownAssignee,
                    format!("Task '{}' is assigned to unknown employee '{assignee}'", task.id),
                ));
            }
        }
    }

    for group in groups {
        if let Some(leader) = group.leader_id.as_deref() {
            if !employee_ids.contains(leader) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownLeader,
                    format!("Group '{}' is led by unknown employee '{leader}'", group.id),
                ));
            }
        }
    }

    for employee in employees {
        if let Some(manager) = employee.manager_id.as_deref() {
            if !employee_ids.contains(manager) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownManager,
                    format!(
                        "Employee '{}' reports to unknown manager '{manager}'",
                        employee.id
                    ),
                ));
            }
        }
    }

    if let Some(cycle_err) = detect_reporting_cycle(employees) {
        errors.push(cycle_err);
    }

    let ceos: Vec<&str> = employees
        .iter()
        .filter(|e| e.has_role(Role::Ceo))
        .map(|e| e.id.as_str())
        .collect();
    if ceos.len() > 1 {
        errors.push(ValidationError::new(
            ValidationErrorKind::MultipleRoots,
            format!("Multiple CEOs: {}", ceos.join(", ")),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Detects a cycle in the reporting graph (employee -> manager).
///
/// Each employee has at most one manager, so every walk is a simple chain.
/// A walk that reaches a node already on its own path has found a cycle;
/// one that reaches a node finished by an earlier walk stops there.
fn detect_reporting_cycle(employees: &[Employee]) -> Option<ValidationError> {
    let manager_of: HashMap<&str, &str> = employees
        .iter()
        .filter_map(|e| Some((e.id.as_str(), e.manager_id.as_deref()?)))
        .collect();

    let mut done: HashSet<&str> = HashSet::new();
    let mut starts: Vec<&str> = manager_of.keys().copied().collect();
    starts.sort_unstable();

    for start in starts {
        let mut on_path = HashSet::new();
        let mut current = Some(start);
        while let Some(node) = current {
            if done.contains(node) {
                break;
            }
            if !on_path.insert(node) {
                return Some(ValidationError::new(
                    ValidationErrorKind::CyclicReporting,
                    format!("Circular reporting chain involving employee '{node}'"),
                ));
            }
            current = manager_of.get(node).copied();
        }
        done.extend(on_path);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_employees() -> Vec<Employee> {
        vec![
            Employee::new("C1").with_role(Role::Ceo),
            Employee::new("M1").with_role(Role::Manager).with_manager("C1"),
            Employee::new("E1").with_role(Role::Employee).with_manager("M1"),
            Employee::new("E2").with_role(Role::Employee).with_manager("M1"),
        ]
    }

    fn sample_tasks() -> Vec<Task> {
        vec![
            Task::new("T1").with_assignee("E1").with_assigner("M1"),
            Task::new("T2").with_assignee("E2"),
            Task::new("T3"),
        ]
    }

    fn sample_groups() -> Vec<Group> {
        vec![Group::new("G1").with_leader("M1"), Group::new("G2")]
    }

    fn kinds(result: ValidationResult) -> Vec<ValidationErrorKind> {
        result.unwrap_err().into_iter().map(|e| e.kind).collect()
    }

    #[test]
    fn test_valid_records() {
        assert!(validate_records(&sample_employees(), &sample_tasks(), &sample_groups()).is_ok());
        assert!(validate_records(&[], &[], &[]).is_ok());
    }

    #[test]
    fn test_duplicate_and_empty_ids() {
        let mut employees = sample_employees();
        employees.push(Employee::new("E1"));
        employees.push(Employee::new(""));
        let tasks = vec![Task::new("T1"), Task::new("T1")];

        let errors = validate_records(&employees, &tasks, &[]).unwrap_err();
        assert_eq!(
            errors
                .iter()
                .filter(|e| e.kind == ValidationErrorKind::DuplicateId)
                .count(),
            2
        );
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("task")));
        assert!(errors.iter().any(|e| e.kind == ValidationErrorKind::EmptyId));
    }

    #[test]
    fn test_unknown_references() {
        let mut employees = sample_employees();
        employees.push(Employee::new("E3").with_manager("ghost"));
        let tasks = vec![Task::new("T1").with_assignee("nobody")];
        let groups = vec![Group::new("G1").with_leader("nobody")];

        let k = kinds(validate_records(&employees, &tasks, &groups));
        assert!(k.contains(&ValidationErrorKind::UnknownAssignee));
        assert!(k.contains(&ValidationErrorKind::UnknownLeader));
        assert!(k.contains(&ValidationErrorKind::UnknownManager));
        assert!(!k.contains(&ValidationErrorKind::CyclicReporting));
    }

    #[test]
    fn test_reporting_cycle() {
        // A -> B -> C -> A
        let employees = vec![
            Employee::new("A").with_manager("B"),
            Employee::new("B").with_manager("C"),
            Employee::new("C").with_manager("A"),
            Employee::new("D").with_manager("A"),
        ];
        let k = kinds(validate_records(&employees, &[], &[]));
        assert_eq!(k, vec![ValidationErrorKind::CyclicReporting]);
    }

    #[test]
    fn test_self_report_is_cycle() {
        let employees = vec![Employee::new("A").with_manager("A")];
        let k = kinds(validate_records(&employees, &[], &[]));
        assert_eq!(k, vec![ValidationErrorKind::CyclicReporting]);
    }

    #[test]
    fn test_long_chain_is_not_cycle() {
        let mut employees = vec![Employee::new("E0").with_role(Role::Ceo)];
        for i in 1..500 {
            employees.push(Employee::new(format!("E{i}")).with_manager(format!("E{}", i - 1)));
        }
        assert!(validate_records(&employees, &[], &[]).is_ok());
    }

    #[test]
    fn test_multiple_ceos() {
        let mut employees = sample_employees();
        employees.push(Employee::new("C2").with_role(Role::Ceo));
        let errors = validate_records(&employees, &[], &[]).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::MultipleRoots);
        assert!(errors[0].message.contains("C1") && errors[0].message.contains("C2"));
    }

    #[test]
    fn test_multiple_errors() {
        let employees = vec![Employee::new("A").with_manager("A"), Employee::new("A")];
        let tasks = vec![Task::new("T1").with_assignee("Z")];
        let errors = validate_records(&employees, &tasks, &[]).unwrap_err();
        assert!(errors.len() >= 3);
    }
}
