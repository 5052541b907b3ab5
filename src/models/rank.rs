//! Enumerated record attributes: rank tiers, roles, task status, task priority.
//!
//! These are the only attribute values the containers inspect. Records
//! may omit any of them; an absent value simply excludes the record from
//! the corresponding filtered view.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Performance tier of an employee or group.
///
/// `S` is the highest tier, `E` the lowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    S,
    A,
    B,
    C,
    D,
    E,
}

impl Rank {
    /// All ranks, highest first.
    pub const ALL: [Rank; 6] = [Rank::S, Rank::A, Rank::B, Rank::C, Rank::D, Rank::E];

    /// Parses a single-letter rank (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "S" => Some(Rank::S),
            "A" => Some(Rank::A),
            "B" => Some(Rank::B),
            "C" => Some(Rank::C),
            "D" => Some(Rank::D),
            "E" => Some(Rank::E),
            _ => None,
        }
    }

    /// Single-letter label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Rank::S => "S",
            Rank::A => "A",
            Rank::B => "B",
            Rank::C => "C",
            Rank::D => "D",
            Rank::E => "E",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position of a person in the organization hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "CEO")]
    Ceo,
    Manager,
    Employee,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Ceo => "CEO",
            Role::Manager => "Manager",
            Role::Employee => "Employee",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Assigned,
    InProgress,
    Completed,
}

impl TaskStatus {
    /// Whether the task still counts toward someone's workload.
    #[inline]
    pub fn is_open(&self) -> bool {
        !matches!(self, TaskStatus::Completed)
    }
}

/// Task urgency.
///
/// Sort order is `High` < `Medium` < `Low`; tasks without a priority sort
/// after all of them (see [`Priority::sort_key`]).
///
/// Deserializes from either the lowercase name or the numeric order
/// (`1`, `2`, `3`) used by stored task rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Numeric order: high = 1, medium = 2, low = 3.
    pub fn order(&self) -> u8 {
        match self {
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }

    /// Inverse of [`Priority::order`].
    pub fn from_order(order: u8) -> Option<Self> {
        match order {
            1 => Some(Priority::High),
            2 => Some(Priority::Medium),
            3 => Some(Priority::Low),
            _ => None,
        }
    }

    /// Parses a priority name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }

    /// Sort key for an optional priority. Missing priorities map to 4.
    pub fn sort_key(priority: Option<Priority>) -> u8 {
        priority.map(|p| p.order()).unwrap_or(4)
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Order(u64),
            Name(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Order(n) => u8::try_from(n)
                .ok()
                .and_then(Priority::from_order)
                .ok_or_else(|| D::Error::custom(format!("priority out of range: {n}"))),
            Repr::Name(name) => Priority::parse(&name)
                .ok_or_else(|| D::Error::custom(format!("unknown priority: {name}"))),
        }
    }
}
