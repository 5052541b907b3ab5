//! In-memory containers for organizational modeling.
//!
//! Provides the data structures an organization-management backend keeps
//! its working state in: employees, tasks, groups, and the relations
//! between them. Every container is synchronous and single-owner; callers
//! that share one across threads wrap it in their own lock.
//!
//! # Modules
//!
//! - **`models`**: Domain records: `Employee`, `Task`, `Group`, `Rank`, `Role`,
//!   `TaskStatus`, `Priority`, and their patch types
//! - **`hash_table`**: Chained hash table with load-factor growth, plus
//!   `EmployeeMap`, `TaskMap`, `GroupMap` query views
//! - **`heap`**: Binary min-heap keyed by workload
//! - **`assignment`**: Least-busy task assignment over the heap
//! - **`task_list`**: Doubly linked task list with sorting and reversal
//! - **`queue`**: FIFO, priority, and fixed-capacity circular queues
//! - **`graph`**: Bipartite group/user membership graph
//! - **`tree`**: CEO-rooted reporting hierarchy
//! - **`validation`**: Record integrity checks (duplicate IDs, dangling
//!   references, reporting cycles)
//! - **`config`**, **`error`**: Tunables and error types
//!
//! # Errors
//!
//! Absent keys are ordinary results (`Option`, `bool`). Only operations that
//! would break a structural invariant return [`StructureError`], and they
//! leave the container untouched when they do.
//!
//! # Snapshots
//!
//! Each container converts to and from a plain serde-serializable snapshot
//! (`to_snapshot` / `from_snapshot` / `restore`). Restoring a snapshot taken
//! from a container reproduces the same structure and data.

pub mod assignment;
pub mod config;
pub mod error;
pub mod graph;
pub mod hash_table;
pub mod heap;
pub mod models;
pub mod queue;
pub mod task_list;
pub mod tree;
pub mod validation;

pub use assignment::WorkloadBalancer;
pub use config::CollectionsConfig;
pub use error::{ConfigError, StructureError};
pub use graph::MembershipGraph;
pub use hash_table::{EmployeeMap, GroupMap, HashTable, HashTableSnapshot, TaskMap};
pub use heap::MinHeap;
pub use queue::{CircularQueue, PriorityQueue, Queue};
pub use task_list::TaskList;
pub use tree::HierarchyTree;
