//! Organization hierarchy as an id-indexed arena.
//!
//! Nodes are stored in one map keyed by id. A node names its children by id
//! (in insertion order) and its parent by id; nothing holds a reference to
//! another node, so there is no ownership cycle to manage.
//!
//! Invariants:
//!   - at most one root, and it has no parent
//!   - every other node has exactly one parent, present in the map
//!   - the map holds exactly the nodes reachable from the root
//!
//! Structural violations are returned as [`StructureError`] before any
//! mutation happens. Missing ids are `None` / `false` / empty results.
//!
//! Traversals, cascade deletes, and snapshot conversion all run on explicit
//! stacks or queues, so deep hierarchies do not grow the call stack.

use std::collections::{HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{StructureError, StructureResult};
use crate::models::{Employee, EmployeePatch, Rank, Role};

/// A node in the hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub id: String,
    pub data: Employee,
    /// Child ids in insertion order.
    pub children: Vec<String>,
    pub parent: Option<String>,
}

impl TreeNode {
    fn new(id: String, data: Employee, parent: Option<String>) -> Self {
        Self {
            id,
            data,
            children: Vec::new(),
            parent,
        }
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Nested form of a subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeSnapshot {
    pub id: String,
    pub data: Employee,
    #[serde(default)]
    pub children: Vec<TreeSnapshot>,
}

/// Reporting hierarchy rooted at a single CEO.
#[derive(Debug, Clone, Default)]
pub struct HierarchyTree {
    root: Option<String>,
    nodes: HashMap<String, TreeNode>,
}

/// Number of nodes in a snapshot, or the first id that repeats.
fn unique_node_count(snapshot: &TreeSnapshot) -> StructureResult<usize> {
    let mut seen = HashSet::new();
    let mut stack = vec![snapshot];
    while let Some(node) = stack.pop() {
        if !seen.insert(node.id.as_str()) {
            warn!(node = %node.id, "rejected hierarchy snapshot with duplicate id");
            return Err(StructureError::DuplicateId(node.id.clone()));
        }
        stack.extend(node.children.iter());
    }
    Ok(seen.len())
}

fn sorted_by_id(mut nodes: Vec<&TreeNode>) -> Vec<&TreeNode> {
    nodes.sort_by(|a, b| a.id.cmp(&b.id));
    nodes
}

impl HierarchyTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root node. Its role is forced to [`Role::Ceo`].
    ///
    /// # Errors
    /// [`StructureError::RootAlreadySet`] if the tree already has a root.
    pub fn set_root(&mut self, id: impl Into<String>, data: Employee) -> StructureResult<&TreeNode> {
        if let Some(existing) = &self.root {
            return Err(StructureError::RootAlreadySet(existing.clone()));
        }
        let id = id.into();
        let data = Employee {
            id: id.clone(),
            role: Some(Role::Ceo),
            ..data
        };

        self.root = Some(id.clone());
        Ok(&*self
            .nodes
            .entry(id.clone())
            .or_insert_with(|| TreeNode::new(id, data, None)))
    }

    /// Attaches a new node as the last child of `parent_id`.
    ///
    /// # Errors
    /// - [`StructureError::RootNotSet`] if no root exists yet
    /// - [`StructureError::DuplicateId`] if `id` is already in the tree
    /// - [`StructureError::ParentNotFound`] if `parent_id` is not in the tree
    pub fn add_node(
        &mut self,
        id: impl Into<String>,
        data: Employee,
        parent_id: &str,
    ) -> StructureResult<&TreeNode> {
        if self.root.is_none() {
            return Err(StructureError::RootNotSet);
        }
        let id = id.into();
        if self.nodes.contains_key(&id) {
            return Err(StructureError::DuplicateId(id));
        }
        let Some(parent) = self.nodes.get_mut(parent_id) else {
            return Err(StructureError::ParentNotFound(parent_id.to_string()));
        };

        parent.children.push(id.clone());
        let data = Employee {
            id: id.clone(),
            ..data
        };
        Ok(&*self
            .nodes
            .entry(id.clone())
            .or_insert_with(|| TreeNode::new(id, data, Some(parent_id.to_string()))))
    }

    /// Removes a node together with its whole subtree.
    ///
    /// Returns `Ok(false)` if `id` is not in the tree.
    ///
    /// # Errors
    /// [`StructureError::RootRemoval`] if `id` is the root.
    pub fn remove_node(&mut self, id: &str) -> StructureResult<bool> {
        if self.root.as_deref() == Some(id) {
            return Err(StructureError::RootRemoval(id.to_string()));
        }
        let Some(parent) = self.nodes.get(id).map(|n| n.parent.clone()) else {
            return Ok(false);
        };

        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            parent.children.retain(|c| c != id);
        }

        let mut stack = vec![id.to_string()];
        let mut removed = 0usize;
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                stack.extend(node.children);
                removed += 1;
            }
        }

        debug!(node = id, removed, "subtree removed");
        Ok(true)
    }

    /// Merges `patch` into a node's record. Returns `false` if absent.
    pub fn update_node(&mut self, id: &str, patch: &EmployeePatch) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                patch.apply(&mut node.data);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.root = None;
        self.nodes.clear();
    }

    // ---- lookups ----

    pub fn root_id(&self) -> Option<&str> {
        self.root.as_deref()
    }

    pub fn root(&self) -> Option<&TreeNode> {
        self.root.as_deref().and_then(|id| self.nodes.get(id))
    }

    pub fn get_node(&self, id: &str) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get_node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Direct children of `id`, in insertion order.
    pub fn children_of(&self, id: &str) -> Vec<&TreeNode> {
        self.nodes
            .get(id)
            .map(|n| n.children.iter().filter_map(|c| self.nodes.get(c)).collect())
            .unwrap_or_default()
    }

    pub fn parent_of(&self, id: &str) -> Option<&TreeNode> {
        let parent = self.nodes.get(id)?.parent.as_deref()?;
        self.nodes.get(parent)
    }

    /// Nodes whose role is `role`, sorted by id.
    pub fn get_nodes_by_role(&self, role: Role) -> Vec<&TreeNode> {
        sorted_by_id(self.nodes.values().filter(|n| n.data.has_role(role)).collect())
    }

    /// Nodes whose rank is `rank`, sorted by id. Unranked nodes never match.
    pub fn get_nodes_by_rank(&self, rank: Rank) -> Vec<&TreeNode> {
        sorted_by_id(self.nodes.values().filter(|n| n.data.has_rank(rank)).collect())
    }

    /// Direct reports of `manager_id` with the `Employee` role.
    ///
    /// Only one level down; managers under the manager are skipped.
    pub fn get_employees_under_manager(&self, manager_id: &str) -> Vec<&TreeNode> {
        self.children_of(manager_id)
            .into_iter()
            .filter(|n| n.data.has_role(Role::Employee))
            .collect()
    }

    // ---- traversal ----

    /// Pre-order depth-first walk from `start` (the root when `None`).
    ///
    /// An unknown start visits nothing.
    pub fn dfs<'a, F>(&'a self, mut visitor: F, start: Option<&str>)
    where
        F: FnMut(&'a TreeNode),
    {
        let Some(start) = start.or(self.root.as_deref()) else {
            return;
        };
        let mut stack = vec![start];
        let mut visited = HashSet::new();

        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            if !visited.insert(id) {
                continue;
            }
            visitor(node);
            // reversed so the first child is popped first
            stack.extend(node.children.iter().rev().map(String::as_str));
        }
    }

    /// Level-order walk from `start` (the root when `None`).
    ///
    /// An unknown start visits nothing.
    pub fn bfs<'a, F>(&'a self, mut visitor: F, start: Option<&str>)
    where
        F: FnMut(&'a TreeNode),
    {
        let Some(start) = start.or(self.root.as_deref()) else {
            return;
        };
        let mut queue = VecDeque::from([start]);
        let mut visited = HashSet::new();

        while let Some(id) = queue.pop_front() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            if !visited.insert(id) {
                continue;
            }
            visitor(node);
            queue.extend(node.children.iter().map(String::as_str));
        }
    }

    /// Nodes from the root down to `id`. Empty if `id` is unknown.
    pub fn get_path_to_node(&self, id: &str) -> Vec<&TreeNode> {
        let mut path = Vec::new();
        let mut current = self.nodes.get(id);
        while let Some(node) = current {
            path.push(node);
            current = node.parent.as_deref().and_then(|p| self.nodes.get(p));
        }
        path.reverse();
        path
    }

    /// Distance from the root (root = 0).
    pub fn get_node_depth(&self, id: &str) -> Option<usize> {
        let path = self.get_path_to_node(id);
        path.len().checked_sub(1)
    }

    /// Nodes exactly `depth` levels below the root, in level order.
    pub fn get_nodes_at_depth(&self, depth: usize) -> Vec<&TreeNode> {
        let mut out = Vec::new();
        let Some(root) = self.root() else {
            return out;
        };
        let mut queue = VecDeque::from([(root, 0usize)]);
        while let Some((node, d)) = queue.pop_front() {
            if d == depth {
                out.push(node);
                continue;
            }
            queue.extend(
                node.children
                    .iter()
                    .filter_map(|c| self.nodes.get(c))
                    .map(|c| (c, d + 1)),
            );
        }
        out
    }

    /// Depth of the deepest node (0 for a lone root or an empty tree).
    pub fn get_height(&self) -> usize {
        let Some(root) = self.root() else {
            return 0;
        };
        let mut height = 0;
        let mut stack = vec![(root, 0usize)];
        while let Some((node, d)) = stack.pop() {
            height = height.max(d);
            stack.extend(
                node.children
                    .iter()
                    .filter_map(|c| self.nodes.get(c))
                    .map(|c| (c, d + 1)),
            );
        }
        height
    }

    /// Draws the tree with box connectors, one node per line.
    ///
    /// ```text
    /// └── Ana (CEO)
    ///     ├── Ben (Manager - Rank A)
    ///     │   └── Cy (Employee - Rank B)
    ///     └── Di (Manager)
    /// ```
    pub fn render(&self) -> String {
        let mut out = String::new();
        let Some(root) = self.root() else {
            return out;
        };

        let mut stack = vec![(root, String::new(), true)];
        while let Some((node, prefix, is_last)) = stack.pop() {
            let connector = if is_last { "└── " } else { "├── " };
            let role = node.data.role.map_or("Unassigned", |r| r.as_str());
            let rank = node
                .data
                .rank
                .map(|r| format!(" - Rank {r}"))
                .unwrap_or_default();
            out.push_str(&format!(
                "{prefix}{connector}{} ({role}{rank})\n",
                node.data.name
            ));

            let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
            let children: Vec<&TreeNode> = node
                .children
                .iter()
                .filter_map(|c| self.nodes.get(c))
                .collect();
            let last = children.len().saturating_sub(1);
            for (i, child) in children.into_iter().enumerate().rev() {
                stack.push((child, child_prefix.clone(), i == last));
            }
        }
        out
    }

    // ---- snapshots ----

    /// Nested snapshot from the root, or `None` for an empty tree.
    pub fn to_snapshot(&self) -> Option<TreeSnapshot> {
        let root = self.root.as_deref()?;

        let mut order = Vec::with_capacity(self.nodes.len());
        self.dfs(|n| order.push(n), Some(root));

        // reverse pre-order: every node comes after all of its descendants
        let mut built: HashMap<&str, TreeSnapshot> = HashMap::with_capacity(order.len());
        for node in order.into_iter().rev() {
            let children = node
                .children
                .iter()
                .filter_map(|c| built.remove(c.as_str()))
                .collect();
            built.insert(
                node.id.as_str(),
                TreeSnapshot {
                    id: node.id.clone(),
                    data: node.data.clone(),
                    children,
                },
            );
        }
        built.remove(root)
    }

    /// Builds a tree from a snapshot.
    ///
    /// # Errors
    /// [`StructureError::DuplicateId`] if an id appears twice.
    pub fn from_snapshot(snapshot: TreeSnapshot) -> StructureResult<Self> {
        let mut tree = Self::new();
        tree.restore(snapshot)?;
        Ok(tree)
    }

    /// Replaces the whole tree with a snapshot.
    ///
    /// The snapshot is checked first; on error this tree is left untouched.
    ///
    /// # Errors
    /// [`StructureError::DuplicateId`] if an id appears twice.
    pub fn restore(&mut self, snapshot: TreeSnapshot) -> StructureResult<()> {
        let count = unique_node_count(&snapshot)?;

        let root_id = snapshot.id.clone();
        let mut nodes = HashMap::with_capacity(count);
        let mut stack: Vec<(TreeSnapshot, Option<String>)> = vec![(snapshot, None)];
        while let Some((snap, parent)) = stack.pop() {
            let TreeSnapshot { id, data, children } = snap;
            let mut node = TreeNode::new(id.clone(), Employee { id: id.clone(), ..data }, parent);
            node.children = children.iter().map(|c| c.id.clone()).collect();
            for child in children.into_iter().rev() {
                stack.push((child, Some(id.clone())));
            }
            nodes.insert(id, node);
        }

        self.root = Some(root_id);
        self.nodes = nodes;
        debug!(nodes = count, "hierarchy restored");
        Ok(())
    }
}
