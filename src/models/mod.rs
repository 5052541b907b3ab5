//! Organization domain records.
//!
//! Plain records supplied by the data layer and stored in the containers.
//! Only the fields the containers inspect are typed; anything else a
//! caller needs travels in the open `attributes` map.
//!
//! # Record Roles
//!
//! | Record | Stored in | Inspected fields |
//! |--------|-----------|------------------|
//! | Employee | EmployeeMap, MinHeap, HierarchyTree, MembershipGraph | id, role, rank, workload |
//! | Task | TaskMap, TaskList | id, status, priority, due_ms |
//! | Group | GroupMap, MembershipGraph | id, rank, created_by |

mod employee;
mod group;
mod rank;
mod task;

use std::collections::BTreeMap;

pub use employee::{Employee, EmployeePatch};
pub use group::{Group, GroupPatch};
pub use rank::{Priority, Rank, Role, TaskStatus};
pub use task::{now_ms, parse_timestamp_ms, Task, TaskPatch};

/// Open caller-only fields. Ordered so that snapshots are deterministic.
pub type Attributes = BTreeMap<String, String>;
