//! Domain views over [`HashTable`]: employees, tasks, and groups by ID.
//!
//! Each view owns a `HashTable<String, Record>` keyed by the record's `id`
//! and dereferences to it for read access. Writes go through the view so a
//! record can never sit under a key other than its own `id`. The added
//! queries are linear scans over the values and carry no extra invariants.

use std::ops::Deref;

use super::HashTable;
use crate::config::CollectionsConfig;
use crate::models::{
    now_ms, Employee, EmployeePatch, Group, GroupPatch, Rank, Role, Task, TaskPatch, TaskStatus,
};

macro_rules! id_view {
    ($view:ident, $record:ty) => {
        #[derive(Debug, Clone, Default)]
        pub struct $view {
            table: HashTable<String, $record>,
        }

        impl $view {
            pub fn new() -> Self {
                Self::default()
            }

            pub fn with_config(config: &CollectionsConfig) -> Self {
                Self {
                    table: HashTable::with_config(config),
                }
            }

            /// Inserts or replaces a record under its own `id`.
            pub fn add(&mut self, record: $record) -> Option<$record> {
                self.table.set(record.id.clone(), record)
            }

            /// Looks up a record by ID.
            pub fn find(&self, id: &str) -> Option<&$record> {
                self.table.get(id)
            }

            /// Removes a record by ID and returns it.
            pub fn remove(&mut self, id: &str) -> Option<$record> {
                self.table.take(id)
            }

            /// Removes a record by ID. Returns whether one was present.
            pub fn delete(&mut self, id: &str) -> bool {
                self.table.delete(id)
            }

            pub fn clear(&mut self) {
                self.table.clear();
            }

            /// Records matching `predicate`, in table order.
            pub fn filter<P>(&self, mut predicate: P) -> Vec<&$record>
            where
                P: FnMut(&$record) -> bool,
            {
                self.table.values().filter(|r| predicate(*r)).collect()
            }
        }

        impl Deref for $view {
            type Target = HashTable<String, $record>;

            fn deref(&self) -> &Self::Target {
                &self.table
            }
        }

        impl FromIterator<$record> for $view {
            fn from_iter<I: IntoIterator<Item = $record>>(iter: I) -> Self {
                let mut view = Self::new();
                for record in iter {
                    view.add(record);
                }
                view
            }
        }
    };
}

id_view!(EmployeeMap, Employee);
id_view!(TaskMap, Task);
id_view!(GroupMap, Group);

impl EmployeeMap {
    /// Merges `patch` into the employee. Returns `false` if absent.
    pub fn update(&mut self, id: &str, patch: &EmployeePatch) -> bool {
        match self.table.get_mut(id) {
            Some(employee) => {
                patch.apply(employee);
                true
            }
            None => false,
        }
    }

    pub fn by_role(&self, role: Role) -> Vec<&Employee> {
        self.filter(|e| e.has_role(role))
    }

    pub fn by_rank(&self, rank: Rank) -> Vec<&Employee> {
        self.filter(|e| e.has_rank(rank))
    }

    pub fn by_org(&self, org_id: &str) -> Vec<&Employee> {
        self.filter(|e| e.org_id.as_deref() == Some(org_id))
    }
}

impl TaskMap {
    /// Merges `patch` into the task. Returns `false` if absent.
    pub fn update(&mut self, id: &str, patch: &TaskPatch) -> bool {
        match self.table.get_mut(id) {
            Some(task) => {
                patch.apply(task);
                true
            }
            None => false,
        }
    }

    pub fn by_status(&self, status: TaskStatus) -> Vec<&Task> {
        self.filter(|t| t.status == status)
    }

    pub fn by_assignee(&self, employee_id: &str) -> Vec<&Task> {
        self.filter(|t| t.assigned_to.as_deref() == Some(employee_id))
    }

    pub fn by_assigner(&self, employee_id: &str) -> Vec<&Task> {
        self.filter(|t| t.assigned_by.as_deref() == Some(employee_id))
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
        self.by_status(TaskStatus::Completed)
    }

    /// Open (not completed) task count per assignee.
    pub fn workload_of(&self, employee_id: &str) -> u32 {
        self.table
            .values()
            .filter(|t| t.status.is_open() && t.assigned_to.as_deref() == Some(employee_id))
            .count() as u32
    }
}

impl GroupMap {
    /// Merges `patch` into the group. Returns `false` if absent.
    pub fn update(&mut self, id: &str, patch: &GroupPatch) -> bool {
        match self.table.get_mut(id) {
            Some(group) => {
                patch.apply(group);
                true
            }
            None => false,
        }
    }

    pub fn by_rank(&self, rank: Rank) -> Vec<&Group> {
        self.filter(|g| g.rank == Some(rank))
    }

    pub fn by_creator(&self, employee_id: &str) -> Vec<&Group> {
        self.filter(|g| g.created_by.as_deref() == Some(employee_id))
    }

    pub fn by_org(&self, org_id: &str) -> Vec<&Group> {
        self.filter(|g| g.org_id.as_deref() == Some(org_id))
    }
}
