//! Bipartite membership graph between groups and users.
//!
//! Two adjacency maps are kept in lockstep:
//!
//! ```text
//! group_members : group_id -> {user_id}
//! user_groups   : user_id  -> {group_id}
//!
//! u ∈ group_members[g]  <=>  g ∈ user_groups[u]
//! ```
//!
//! Every mutation touches both sides before returning. Groups and users
//! carry a [`Group`] / [`Employee`] record; a side registered lazily by
//! [`MembershipGraph::add_member`] gets a bare record with only its id.
//!
//! Query results that list ids are sorted so output is deterministic.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Employee, EmployeePatch, Group, GroupPatch, Rank};

/// Groups, users, and the membership edges between them.
#[derive(Debug, Clone, Default)]
pub struct MembershipGraph {
    group_members: HashMap<String, HashSet<String>>,
    user_groups: HashMap<String, HashSet<String>>,
    groups: HashMap<String, Group>,
    users: HashMap<String, Employee>,
}

/// A group with its member count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary<'a> {
    #[serde(flatten)]
    pub group: &'a Group,
    pub member_count: usize,
}

/// A user with the number of groups they belong to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserSummary<'a> {
    #[serde(flatten)]
    pub user: &'a Employee,
    pub group_count: usize,
}

/// A group with its members resolved to records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupDetails<'a> {
    pub group: &'a Group,
    pub members: Vec<&'a Employee>,
    pub member_count: usize,
}

/// A user with their groups resolved to records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserDetails<'a> {
    pub user: &'a Employee,
    pub groups: Vec<&'a Group>,
    pub group_count: usize,
}

/// Member count and rank histogram of one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStats {
    pub group_id: String,
    pub total_members: usize,
    pub rank_distribution: BTreeMap<Rank, usize>,
    /// Members without a rank.
    pub unranked: usize,
}

/// Whole-graph size figures.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphStats {
    pub group_count: usize,
    pub user_count: usize,
    pub total_memberships: usize,
    /// 0 when there are no groups.
    pub avg_members_per_group: f64,
    /// 0 when there are no users.
    pub avg_groups_per_user: f64,
}

/// One group in a [`GraphSnapshot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupEntry {
    pub id: String,
    pub data: Group,
    pub members: Vec<String>,
}

/// One user in a [`GraphSnapshot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserEntry {
    pub id: String,
    pub data: Employee,
    pub groups: Vec<String>,
}

/// Plain form of a [`MembershipGraph`], entries and id lists sorted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub groups: Vec<GroupEntry>,
    pub users: Vec<UserEntry>,
}

fn sorted_ids(set: Option<&HashSet<String>>) -> Vec<&str> {
    let mut ids: Vec<&str> = set
        .map(|s| s.iter().map(String::as_str).collect())
        .unwrap_or_default();
    ids.sort_unstable();
    ids
}

impl MembershipGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- registration ----

    /// Registers a group. An already registered id keeps its record.
    ///
    /// Returns `true` if the group is new.
    pub fn add_group(&mut self, group: Group) -> bool {
        if self.group_members.contains_key(&group.id) {
            return false;
        }
        self.group_members.insert(group.id.clone(), HashSet::new());
        self.groups.insert(group.id.clone(), group);
        true
    }

    /// Registers a user. An already registered id keeps its record.
    ///
    /// Returns `true` if the user is new.
    pub fn add_user(&mut self, user: Employee) -> bool {
        if self.user_groups.contains_key(&user.id) {
            return false;
        }
        self.user_groups.insert(user.id.clone(), HashSet::new());
        self.users.insert(user.id.clone(), user);
        true
    }

    /// Adds `user_id` to `group_id`, registering either side if needed.
    ///
    /// Returns `true` if the edge is new.
    pub fn add_member(&mut self, group_id: &str, user_id: &str) -> bool {
        if !self.has_group(group_id) {
            self.add_group(Group::new(group_id));
        }
        if !self.has_user(user_id) {
            self.add_user(Employee::new(user_id));
        }

        let added = self
            .group_members
            .get_mut(group_id)
            .is_some_and(|members| members.insert(user_id.to_string()));
        if let Some(groups) = self.user_groups.get_mut(user_id) {
            groups.insert(group_id.to_string());
        }
        added
    }

    /// Removes the edge between `group_id` and `user_id`.
    ///
    /// Returns `false` only when either side is unregistered.
    pub fn remove_member(&mut self, group_id: &str, user_id: &str) -> bool {
        if !self.group_members.contains_key(group_id) || !self.user_groups.contains_key(user_id) {
            return false;
        }
        if let Some(members) = self.group_members.get_mut(group_id) {
            members.remove(user_id);
        }
        if let Some(groups) = self.user_groups.get_mut(user_id) {
            groups.remove(group_id);
        }
        true
    }

    /// Removes a group and strips it from every member.
    pub fn remove_group(&mut self, group_id: &str) -> bool {
        let Some(members) = self.group_members.remove(group_id) else {
            return false;
        };
        for user_id in &members {
            if let Some(groups) = self.user_groups.get_mut(user_id) {
                groups.remove(group_id);
            }
        }
        self.groups.remove(group_id);
        debug!(group = group_id, edges = members.len(), "group removed");
        true
    }

    /// Removes a user and strips them from every group.
    pub fn remove_user(&mut self, user_id: &str) -> bool {
        let Some(groups) = self.user_groups.remove(user_id) else {
            return false;
        };
        for group_id in &groups {
            if let Some(members) = self.group_members.get_mut(group_id) {
                members.remove(user_id);
            }
        }
        self.users.remove(user_id);
        debug!(user = user_id, edges = groups.len(), "user removed");
        true
    }

    /// Merges `patch` into a group's record. Returns `false` if absent.
    pub fn update_group(&mut self, group_id: &str, patch: &GroupPatch) -> bool {
        match self.groups.get_mut(group_id) {
            Some(group) => {
                patch.apply(group);
                true
            }
            None => false,
        }
    }

    /// Merges `patch` into a user's record. Returns `false` if absent.
    pub fn update_user(&mut self, user_id: &str, patch: &EmployeePatch) -> bool {
        match self.users.get_mut(user_id) {
            Some(user) => {
                patch.apply(user);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.group_members.clear();
        self.user_groups.clear();
        self.groups.clear();
        self.users.clear();
    }

    // ---- lookups ----

    pub fn has_group(&self, group_id: &str) -> bool {
        self.group_members.contains_key(group_id)
    }

    pub fn has_user(&self, user_id: &str) -> bool {
        self.user_groups.contains_key(user_id)
    }

    pub fn group(&self, group_id: &str) -> Option<&Group> {
        self.groups.get(group_id)
    }

    pub fn user(&self, user_id: &str) -> Option<&Employee> {
        self.users.get(user_id)
    }

    pub fn group_count(&self) -> usize {
        self.group_members.len()
    }

    pub fn user_count(&self) -> usize {
        self.user_groups.len()
    }

    pub fn is_member(&self, group_id: &str, user_id: &str) -> bool {
        self.group_members
            .get(group_id)
            .is_some_and(|members| members.contains(user_id))
    }

    /// Member ids of a group (empty if the group is unknown).
    pub fn group_members(&self, group_id: &str) -> Vec<&str> {
        sorted_ids(self.group_members.get(group_id))
    }

    /// Group ids of a user (empty if the user is unknown).
    pub fn user_groups(&self, user_id: &str) -> Vec<&str> {
        sorted_ids(self.user_groups.get(user_id))
    }

    /// Groups both users belong to.
    pub fn common_groups(&self, user_a: &str, user_b: &str) -> Vec<&str> {
        let (Some(a), Some(b)) = (self.user_groups.get(user_a), self.user_groups.get(user_b))
        else {
            return Vec::new();
        };
        let mut shared: Vec<&str> = a.intersection(b).map(String::as_str).collect();
        shared.sort_unstable();
        shared
    }

    /// For every co-member of `user_id`, the number of groups they share.
    pub fn user_connections(&self, user_id: &str) -> BTreeMap<&str, usize> {
        let mut connections = BTreeMap::new();
        let Some(groups) = self.user_groups.get(user_id) else {
            return connections;
        };
        for members in groups.iter().filter_map(|g| self.group_members.get(g)) {
            for member in members.iter().filter(|m| m.as_str() != user_id) {
                *connections.entry(member.as_str()).or_insert(0) += 1;
            }
        }
        connections
    }

    fn summary<'a>(&'a self, group: &'a Group) -> GroupSummary<'a> {
        GroupSummary {
            group,
            member_count: self.group_members.get(&group.id).map_or(0, HashSet::len),
        }
    }

    fn summaries_where<P>(&self, mut predicate: P) -> Vec<GroupSummary<'_>>
    where
        P: FnMut(&Group) -> bool,
    {
        let mut out: Vec<GroupSummary<'_>> = self
            .groups
            .values()
            .filter(|g| predicate(*g))
            .map(|g| self.summary(g))
            .collect();
        out.sort_by(|a, b| a.group.id.cmp(&b.group.id));
        out
    }

    /// Every group with its member count.
    pub fn all_groups(&self) -> Vec<GroupSummary<'_>> {
        self.summaries_where(|_| true)
    }

    /// Every user with their group count.
    pub fn all_users(&self) -> Vec<UserSummary<'_>> {
        let mut out: Vec<UserSummary<'_>> = self
            .users
            .values()
            .map(|user| UserSummary {
                user,
                group_count: self.user_groups.get(&user.id).map_or(0, HashSet::len),
            })
            .collect();
        out.sort_by(|a, b| a.user.id.cmp(&b.user.id));
        out
    }

    pub fn groups_by_rank(&self, rank: Rank) -> Vec<GroupSummary<'_>> {
        self.summaries_where(|g| g.rank == Some(rank))
    }

    /// Groups created by `manager_id`.
    pub fn groups_by_manager(&self, manager_id: &str) -> Vec<GroupSummary<'_>> {
        self.summaries_where(|g| g.created_by.as_deref() == Some(manager_id))
    }

    /// Users that belong to no group.
    pub fn isolated_users(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .user_groups
            .iter()
            .filter(|(_, groups)| groups.is_empty())
            .map(|(id, _)| id.as_str())
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Groups without members.
    pub fn empty_groups(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .group_members
            .iter()
            .filter(|(_, members)| members.is_empty())
            .map(|(id, _)| id.as_str())
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn group_details(&self, group_id: &str) -> Option<GroupDetails<'_>> {
        let group = self.groups.get(group_id)?;
        let members: Vec<&Employee> = self
            .group_members(group_id)
            .into_iter()
            .filter_map(|id| self.users.get(id))
            .collect();
        Some(GroupDetails {
            group,
            member_count: members.len(),
            members,
        })
    }

    pub fn user_details(&self, user_id: &str) -> Option<UserDetails<'_>> {
        let user = self.users.get(user_id)?;
        let groups: Vec<&Group> = self
            .user_groups(user_id)
            .into_iter()
            .filter_map(|id| self.groups.get(id))
            .collect();
        Some(UserDetails {
            user,
            group_count: groups.len(),
            groups,
        })
    }

    /// Member count and rank histogram of a group.
    pub fn group_stats(&self, group_id: &str) -> Option<GroupStats> {
        let members = self.group_members.get(group_id)?;
        let mut rank_distribution = BTreeMap::new();
        let mut unranked = 0;

        for user in members.iter().filter_map(|id| self.users.get(id)) {
            match user.rank {
                Some(rank) => *rank_distribution.entry(rank).or_insert(0) += 1,
                None => unranked += 1,
            }
        }

        Some(GroupStats {
            group_id: group_id.to_string(),
            total_members: members.len(),
            rank_distribution,
            unranked,
        })
    }

    /// Size figures for the whole graph.
    pub fn stats(&self) -> GraphStats {
        let group_count = self.group_count();
        let user_count = self.user_count();
        let total_memberships: usize = self.group_members.values().map(HashSet::len).sum();

        let ratio = |n: usize, d: usize| if d == 0 { 0.0 } else { n as f64 / d as f64 };

        GraphStats {
            group_count,
            user_count,
            total_memberships,
            avg_members_per_group: ratio(total_memberships, group_count),
            avg_groups_per_user: ratio(total_memberships, user_count),
        }
    }

    // ---- snapshots ----

    pub fn to_snapshot(&self) -> GraphSnapshot {
        let mut groups: Vec<GroupEntry> = self
            .group_members
            .keys()
            .map(|id| GroupEntry {
                id: id.clone(),
                data: self.groups.get(id).cloned().unwrap_or_else(|| Group::new(id.as_str())),
                members: self.group_members(id).into_iter().map(String::from).collect(),
            })
            .collect();
        groups.sort_by(|a, b| a.id.cmp(&b.id));

        let mut users: Vec<UserEntry> = self
            .user_groups
            .keys()
            .map(|id| UserEntry {
                id: id.clone(),
                data: self.users.get(id).cloned().unwrap_or_else(|| Employee::new(id.as_str())),
                groups: self.user_groups(id).into_iter().map(String::from).collect(),
            })
            .collect();
        users.sort_by(|a, b| a.id.cmp(&b.id));

        GraphSnapshot { groups, users }
    }

    pub fn from_snapshot(snapshot: GraphSnapshot) -> Self {
        let mut graph = Self::new();
        graph.restore(snapshot);
        graph
    }

    /// Clears the graph, registers every group and user, then replays the
    /// membership edges listed on both sides.
    pub fn restore(&mut self, snapshot: GraphSnapshot) {
        self.clear();

        let mut edges = Vec::new();
        for entry in snapshot.groups {
            let mut data = entry.data;
            data.id = entry.id;
            edges.extend(entry.members.into_iter().map(|u| (data.id.clone(), u)));
            self.add_group(data);
        }
        for entry in snapshot.users {
            let mut data = entry.data;
            data.id = entry.id;
            edges.extend(entry.groups.into_iter().map(|g| (g, data.id.clone())));
            self.add_user(data);
        }
        for (group_id, user_id) in &edges {
            self.add_member(group_id, user_id);
        }

        debug!(
            groups = self.group_count(),
            users = self.user_count(),
            "membership graph restored"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_graph() -> MembershipGraph {
        let mut g = MembershipGraph::new();
        g.add_group(Group::new("G1").with_name("Platform").with_rank(Rank::A).with_creator("M1"));
        g.add_group(Group::new("G2").with_name("Mobile").with_rank(Rank::B).with_creator("M1"));
        g.add_group(Group::new("G3").with_rank(Rank::A).with_creator("M2"));
        g.add_user(Employee::new("U1").with_name("Ana").with_rank(Rank::A));
        g.add_user(Employee::new("U2").with_rank(Rank::B));
        g.add_user(Employee::new("U3").with_rank(Rank::A));
        g.add_user(Employee::new("U4"));

        g.add_member("G1", "U1");
        g.add_member("G1", "U2");
        g.add_member("G1", "U3");
        g.add_member("G2", "U1");
        g.add_member("G2", "U2");
        g
    }

    /// Both adjacency maps agree edge for edge.
    fn assert_symmetric(g: &MembershipGraph) {
        for (group, members) in &g.group_members {
            for user in members {
                assert!(g.user_groups[user].contains(group), "{user} missing {group}");
            }
        }
        for (user, groups) in &g.user_groups {
            for group in groups {
                assert!(g.group_members[group].contains(user), "{group} missing {user}");
            }
        }
    }

    #[test]
    fn test_add_member_and_lazy_registration() {
        let mut g = MembershipGraph::new();
        assert!(g.add_member("G9", "U9"));
        assert!(!g.add_member("G9", "U9"));
        assert!(g.is_member("G9", "U9"));
        assert!(g.has_group("G9") && g.has_user("U9"));
        assert_eq!(g.group("G9").map(|x| x.id.as_str()), Some("G9"));
        assert_symmetric(&g);
    }

    #[test]
    fn test_registration_is_idempotent() {
        let mut g = sample_graph();
        assert!(!g.add_group(Group::new("G1").with_name("Other")));
        assert_eq!(g.group("G1").map(|x| x.name.as_str()), Some("Platform"));
        assert!(!g.add_user(Employee::new("U1")));
        assert_eq!(g.user_groups("U1"), vec!["G1", "G2"]);
    }

    #[test]
    fn test_remove_member() {
        let mut g = sample_graph();
        assert!(g.remove_member("G1", "U3"));
        assert!(!g.is_member("G1", "U3"));
        assert!(g.user_groups("U3").is_empty());
        // both sides exist, no edge
        assert!(g.remove_member("G3", "U1"));
        assert!(!g.remove_member("G1", "nobody"));
        assert!(!g.remove_member("nope", "U1"));
        assert_symmetric(&g);
    }

    #[test]
    fn test_remove_group_cascades() {
        let mut g = sample_graph();
        let former = g.group_members("G1").into_iter().map(String::from).collect::<Vec<_>>();
        assert!(g.remove_group("G1"));
        for user in &former {
            assert!(!g.user_groups(user).contains(&"G1"));
        }
        assert!(g.group("G1").is_none());
        assert!(!g.remove_group("G1"));
        assert_symmetric(&g);
    }

    #[test]
    fn test_remove_user_cascades() {
        let mut g = sample_graph();
        assert!(g.remove_user("U1"));
        assert_eq!(g.group_members("G1"), vec!["U2", "U3"]);
        assert_eq!(g.group_members("G2"), vec!["U2"]);
        assert!(g.user("U1").is_none());
        assert!(!g.remove_user("U1"));
        assert_symmetric(&g);
    }

    #[test]
    fn test_common_groups_symmetric() {
        let g = sample_graph();
        let ids = ["U1", "U2", "U3", "U4", "missing"];
        for a in ids {
            for b in ids {
                assert_eq!(g.common_groups(a, b), g.common_groups(b, a));
            }
        }
        assert_eq!(g.common_groups("U1", "U2"), vec!["G1", "G2"]);
        assert_eq!(g.common_groups("U1", "U3"), vec!["G1"]);
        assert!(g.common_groups("U1", "U4").is_empty());
    }

    #[test]
    fn test_user_connections() {
        let g = sample_graph();
        let c = g.user_connections("U1");
        assert_eq!(c.get("U2"), Some(&2));
        assert_eq!(c.get("U3"), Some(&1));
        assert!(!c.contains_key("U1"));
        assert!(g.user_connections("U4").is_empty());
    }

    #[test]
    fn test_rank_and_manager_queries() {
        let g = sample_graph();
        let by_rank: Vec<(&str, usize)> = g
            .groups_by_rank(Rank::A)
            .iter()
            .map(|s| (s.group.id.as_str(), s.member_count))
            .collect();
        assert_eq!(by_rank, vec![("G1", 3), ("G3", 0)]);

        let by_manager: Vec<&str> = g
            .groups_by_manager("M1")
            .iter()
            .map(|s| s.group.id.as_str())
            .collect();
        assert_eq!(by_manager, vec!["G1", "G2"]);
    }

    #[test]
    fn test_isolated_and_empty() {
        let g = sample_graph();
        assert_eq!(g.isolated_users(), vec!["U4"]);
        assert_eq!(g.empty_groups(), vec!["G3"]);
    }

    #[test]
    fn test_group_stats_histogram() {
        let mut g = sample_graph();
        g.add_member("G1", "U4");
        let stats = g.group_stats("G1").unwrap();
        assert_eq!(stats.total_members, 4);
        assert_eq!(stats.rank_distribution.get(&Rank::A), Some(&2));
        assert_eq!(stats.rank_distribution.get(&Rank::B), Some(&1));
        assert_eq!(stats.unranked, 1);
        assert!(g.group_stats("nope").is_none());
    }

    #[test]
    fn test_details_and_summaries() {
        let g = sample_graph();
        let details = g.group_details("G2").unwrap();
        assert_eq!(details.member_count, 2);
        assert_eq!(details.members[0].name, "Ana");

        let user = g.user_details("U1").unwrap();
        assert_eq!(user.group_count, 2);
        assert_eq!(user.groups[1].name, "Mobile");
        assert!(g.user_details("nobody").is_none());

        let counts: Vec<usize> = g.all_users().iter().map(|u| u.group_count).collect();
        assert_eq!(counts, vec![2, 2, 1, 0]);
        assert_eq!(g.all_groups().len(), 3);
    }

    #[test]
    fn test_updates() {
        let mut g = sample_graph();
        assert!(g.update_group("G3", &GroupPatch::new().name("Infra")));
        assert_eq!(g.group("G3").map(|x| x.name.as_str()), Some("Infra"));
        assert!(g.update_user("U4", &EmployeePatch::new().rank(Rank::S)));
        assert_eq!(g.user("U4").and_then(|u| u.rank), Some(Rank::S));
        assert!(!g.update_group("G9", &GroupPatch::new()));
        assert!(!g.update_user("U9", &EmployeePatch::new()));
    }

    #[test]
    fn test_stats() {
        let g = sample_graph();
        let s = g.stats();
        assert_eq!(s.group_count, 3);
        assert_eq!(s.user_count, 4);
        assert_eq!(s.total_memberships, 5);
        assert!((s.avg_members_per_group - 5.0 / 3.0).abs() < 1e-10);
        assert!((s.avg_groups_per_user - 1.25).abs() < 1e-10);

        let empty = MembershipGraph::new().stats();
        assert_eq!(empty.avg_members_per_group, 0.0);
        assert_eq!(empty.avg_groups_per_user, 0.0);
    }

    #[test]
    fn test_clear() {
        let mut g = sample_graph();
        g.clear();
        assert_eq!(g.group_count(), 0);
        assert_eq!(g.user_count(), 0);
        assert!(g.all_groups().is_empty());
    }

    #[test]
    fn test_snapshot_round_trip() {
        let g = sample_graph();
        let snapshot = g.to_snapshot();
        assert_eq!(snapshot.groups[0].members, vec!["U1", "U2", "U3"]);

        let json = serde_json::to_string(&snapshot).unwrap();
        let restored = MembershipGraph::from_snapshot(serde_json::from_str(&json).unwrap());

        assert_eq!(restored.to_snapshot(), snapshot);
        assert_eq!(restored.group_members, g.group_members);
        assert_eq!(restored.user_groups, g.user_groups);
        assert_eq!(restored.group("G1"), g.group("G1"));
        assert_symmetric(&restored);
    }
}
