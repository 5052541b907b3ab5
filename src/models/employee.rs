//! Employee (person) model.
//!
//! An employee is anyone in the organization: the CEO, managers, and
//! individual contributors. The same record is used as heap entry,
//! hierarchy node payload, and group-member metadata.

use serde::{Deserialize, Serialize};

use super::{Attributes, Rank, Role};

/// A person in the organization.
///
/// Only `id` is structurally required. `role` and `rank` drive the
/// filtered queries; `workload` is the comparator field of the workload heap.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Employee {
    /// Unique employee identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Position in the hierarchy.
    pub role: Option<Role>,
    /// Performance tier.
    pub rank: Option<Rank>,
    /// Owning organization.
    pub org_id: Option<String>,
    /// Direct manager (reporting line).
    pub manager_id: Option<String>,
    /// Human-readable identifier assigned on approval.
    pub custom_id: Option<String>,
    /// Number of incomplete tasks currently assigned.
    pub workload: u32,
    /// Caller-only fields.
    pub attributes: Attributes,
}

impl Employee {
    /// Creates an employee with the given ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the email.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Sets the role.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Sets the rank.
    pub fn with_rank(mut self, rank: Rank) -> Self {
        self.rank = Some(rank);
        self
    }

    /// Sets the organization.
    pub fn with_org(mut self, org_id: impl Into<String>) -> Self {
        self.org_id = Some(org_id.into());
        self
    }

    /// Sets the direct manager.
    pub fn with_manager(mut self, manager_id: impl Into<String>) -> Self {
        self.manager_id = Some(manager_id.into());
        self
    }

    /// Sets the approval-time custom ID.
    pub fn with_custom_id(mut self, custom_id: impl Into<String>) -> Self {
        self.custom_id = Some(custom_id.into());
        self
    }

    /// Sets the incomplete-task count.
    pub fn with_workload(mut self, workload: u32) -> Self {
        self.workload = workload;
        self
    }

    /// Adds a caller-only attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Whether this employee has the given role.
    #[inline]
    pub fn has_role(&self, role: Role) -> bool {
        self.role == Some(role)
    }

    /// Whether this employee has the given rank.
    #[inline]
    pub fn has_rank(&self, rank: Rank) -> bool {
        self.rank == Some(rank)
    }
}

/// Partial update for an [`Employee`]. Unset fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EmployeePatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub rank: Option<Rank>,
    pub org_id: Option<String>,
    pub manager_id: Option<String>,
    pub custom_id: Option<String>,
    pub workload: Option<u32>,
    /// Merged key by key into the existing attributes.
    pub attributes: Attributes,
}

impl EmployeePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn rank(mut self, rank: Rank) -> Self {
        self.rank = Some(rank);
        self
    }

    pub fn manager(mut self, manager_id: impl Into<String>) -> Self {
        self.manager_id = Some(manager_id.into());
        self
    }

    pub fn custom_id(mut self, custom_id: impl Into<String>) -> Self {
        self.custom_id = Some(custom_id.into());
        self
    }

    pub fn workload(mut self, workload: u32) -> Self {
        self.workload = Some(workload);
        self
    }

    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Merges the set fields into `employee`. The `id` is never changed.
    pub fn apply(&self, employee: &mut Employee) {
        if let Some(name) = &self.name {
            employee.name = name.clone();
        }
        if let Some(email) = &self.email {
            employee.email = email.clone();
        }
        if self.role.is_some() {
            employee.role = self.role;
        }
        if self.rank.is_some() {
            employee.rank = self.rank;
        }
        if self.org_id.is_some() {
            employee.org_id = self.org_id.clone();
        }
        if self.manager_id.is_some() {
            employee.manager_id = self.manager_id.clone();
        }
        if self.custom_id.is_some() {
            employee.custom_id = self.custom_id.clone();
        }
        if let Some(workload) = self.workload {
            employee.workload = workload;
        }
        for (k, v) in &self.attributes {
            employee.attributes.insert(k.clone(), v.clone());
        }
    }
}
