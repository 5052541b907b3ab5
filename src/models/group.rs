//! Group model.

use serde::{Deserialize, Serialize};

use super::{Attributes, Rank};

/// A working group of employees.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Group {
    /// Unique group identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Performance tier of the group.
    pub rank: Option<Rank>,
    /// Group leader (employee ID).
    #[serde(alias = "leaderId")]
    pub leader_id: Option<String>,
    /// Manager who created the group (employee ID).
    #[serde(alias = "createdBy")]
    pub created_by: Option<String>,
    /// Owning organization.
    pub org_id: Option<String>,
    /// Caller-only fields.
    pub attributes: Attributes,
}

impl Group {
    /// Creates a group with the given ID.
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

    /// Sets the rank.
    pub fn with_rank(mut self, rank: Rank) -> Self {
        self.rank = Some(rank);
        self
    }

    /// Sets the leader.
    pub fn with_leader(mut self, employee_id: impl Into<String>) -> Self {
        self.leader_id = Some(employee_id.into());
        self
    }

    /// Sets the creating manager.
    pub fn with_creator(mut self, employee_id: impl Into<String>) -> Self {
        self.created_by = Some(employee_id.into());
        self
    }

    /// Sets the organization.
    pub fn with_org(mut self, org_id: impl Into<String>) -> Self {
        self.org_id = Some(org_id.into());
        self
    }

    /// Adds a caller-only attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// Partial update for a [`Group`]. Unset fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupPatch {
    pub name: Option<String>,
    pub rank: Option<Rank>,
    pub leader_id: Option<String>,
    pub created_by: Option<String>,
    pub attributes: Attributes,
}

impl GroupPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn rank(mut self, rank: Rank) -> Self {
        self.rank = Some(rank);
        self
    }

    pub fn leader(mut self, employee_id: impl Into<String>) -> Self {
        self.leader_id = Some(employee_id.into());
        self
    }

    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Merges the set fields into `group`. The `id` is never changed.
    pub fn apply(&self, group: &mut Group) {
        if let Some(name) = &self.name {
            group.name = name.clone();
        }
        if self.rank.is_some() {
            group.rank = self.rank;
        }
        if self.leader_id.is_some() {
            group.leader_id = self.leader_id.clone();
        }
        if self.created_by.is_some() {
            group.created_by = self.created_by.clone();
        }
        for (k, v) in &self.attributes {
            group.attributes.insert(k.clone(), v.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_from_stored_row() {
        let g: Group = serde_json::from_str(
            r#"{"id":"G1","name":"Ops","rank":"B","leaderId":"E1","createdBy":"M1"}"#,
        )
        .unwrap();
        assert_eq!(g.leader_id.as_deref(), Some("E1"));
        assert_eq!(g.created_by.as_deref(), Some("M1"));
        assert_eq!(g.rank, Some(Rank::B));

        let g: Group = serde_json::from_str(r#"{"id":"G2","leader_id":"E2"}"#).unwrap();
        assert_eq!(g.leader_id.as_deref(), Some("E2"));
    }

    #[test]
    fn test_group_builder() {
        let g = Group::new("G1")
            .with_name("Platform")
            .with_rank(Rank::A)
            .with_leader("E1")
            .with_creator("M1");

        assert_eq!(g.id, "G1");
        assert_eq!(g.rank, Some(Rank::A));
        assert_eq!(g.leader_id.as_deref(), Some("E1"));
        assert_eq!(g.created_by.as_deref(), Some("M1"));
    }

    #[test]
    fn test_group_patch() {
        let mut g = Group::new("G1").with_name("Old");
        GroupPatch::new().name("New").rank(Rank::S).apply(&mut g);
        assert_eq!(g.name, "New");
        assert_eq!(g.rank, Some(Rank::S));
        assert_eq!(g.id, "G1");
    }
}
