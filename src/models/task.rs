//! Task model.
//!
//! A task is a unit of work assigned to one employee. Tasks flow through
//! `assigned → in_progress → completed`; every task not yet completed
//! counts toward its assignee's workload.
//!
//! # Time Representation
//! Due dates are milliseconds since the Unix epoch (UTC). On input a due
//! date may also be an RFC 3339 timestamp or a plain `YYYY-MM-DD` date,
//! under any of the keys `due_ms`, `dueDate`, or `due_date`.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use super::{Attributes, Priority, TaskStatus};

/// Current wall-clock time in epoch milliseconds.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Parses a stored timestamp into epoch milliseconds.
///
/// Accepts RFC 3339 (`2024-05-01T09:30:00Z`, `2024-05-01T09:30:00+02:00`),
/// a zone-less date-time read as UTC, or a bare date at UTC midnight.
pub fn parse_timestamp_ms(s: &str) -> Option<i64> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis())
}

fn deserialize_due<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Millis(i64),
        Text(String),
    }

    match Option::<Repr>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Repr::Millis(ms)) => Ok(Some(ms)),
        Some(Repr::Text(text)) => parse_timestamp_ms(&text)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid due date: {text}"))),
    }
}

/// A unit of work.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Task {
    /// Unique task identifier.
    pub id: String,
    /// Short title.
    pub title: String,
    /// Longer description.
    pub description: String,
    /// Lifecycle state.
    pub status: TaskStatus,
    /// Urgency. `None` sorts after every recognized priority.
    pub priority: Option<Priority>,
    /// Due date (epoch ms). `None` = no deadline.
    #[serde(alias = "dueDate", alias = "due_date", deserialize_with = "deserialize_due")]
    pub due_ms: Option<i64>,
    /// Assignee employee ID.
    #[serde(alias = "assignedTo")]
    pub assigned_to: Option<String>,
    /// Assigner employee ID.
    #[serde(alias = "assignedBy")]
    pub assigned_by: Option<String>,
    /// Group the task belongs to, if any.
    pub group_id: Option<String>,
    /// Owning organization.
    pub org_id: Option<String>,
    /// Caller-only fields.
    pub attributes: Attributes,
}

impl Task {
    /// Creates a new task with the given ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the status.
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the due date (epoch ms).
    pub fn with_due(mut self, due_ms: i64) -> Self {
        self.due_ms = Some(due_ms);
        self
    }

    /// Sets the assignee.
    pub fn with_assignee(mut self, employee_id: impl Into<String>) -> Self {
        self.assigned_to = Some(employee_id.into());
        self
    }

    /// Sets the assigner.
    pub fn with_assigner(mut self, employee_id: impl Into<String>) -> Self {
        self.assigned_by = Some(employee_id.into());
        self
    }

    /// Sets the group.
    pub fn with_group(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
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

    /// Whether the task is completed.
    #[inline]
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Whether the task is past due at `now_ms` and not completed.
    ///
    /// Tasks without a due date are never overdue.
    pub fn is_overdue_at(&self, now_ms: i64) -> bool {
        match self.due_ms {
            Some(due) => due < now_ms && !self.is_completed(),
            None => false,
        }
    }
}

/// Partial update for a [`Task`]. Unset fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub due_ms: Option<i64>,
    pub assigned_to: Option<String>,
    pub assigned_by: Option<String>,
    pub group_id: Option<String>,
    pub attributes: Attributes,
}

impl TaskPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn due(mut self, due_ms: i64) -> Self {
        self.due_ms = Some(due_ms);
        self
    }

    pub fn assignee(mut self, employee_id: impl Into<String>) -> Self {
        self.assigned_to = Some(employee_id.into());
        self
    }

    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Merges the set fields into `task`. The `id` is never changed.
    pub fn apply(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if self.priority.is_some() {
            task.priority = self.priority;
        }
        if self.due_ms.is_some() {
            task.due_ms = self.due_ms;
        }
        if self.assigned_to.is_some() {
            task.assigned_to = self.assigned_to.clone();
        }
        if self.assigned_by.is_some() {
            task.assigned_by = self.assigned_by.clone();
        }
        if self.group_id.is_some() {
            task.group_id = self.group_id.clone();
        }
        for (k, v) in &self.attributes {
            task.attributes.insert(k.clone(), v.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_builder() {
        let task = Task::new("T1")
            .with_title("Quarterly report")
            .with_status(TaskStatus::InProgress)
            .with_priority(Priority::High)
            .with_due(100_000)
            .with_assignee("E1")
            .with_assigner("M1")
            .with_attribute("customer", "ACME");

        assert_eq!(task.id, "T1");
        assert_eq!(task.title, "Quarterly report");
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.priority, Some(Priority::High));
        assert_eq!(task.due_ms, Some(100_000));
        assert_eq!(task.assigned_to.as_deref(), Some("E1"));
        assert_eq!(task.attributes.get("customer"), Some(&"ACME".to_string()));
    }

    #[test]
    fn test_task_from_stored_row() {
        let task: Task = serde_json::from_str(
            r#"{"id":"T1","status":"assigned","priority":2,"dueDate":1000,"assignedTo":"E1"}"#,
        )
        .unwrap();
        assert_eq!(task.priority, Some(Priority::Medium));
        assert_eq!(task.due_ms, Some(1_000));
        assert_eq!(task.assigned_to.as_deref(), Some("E1"));
        assert!(task.is_overdue_at(2_000));

        let task: Task = serde_json::from_str(
            r#"{"id":"T2","status":"in_progress","priority":null,"due_date":"1970-01-01T00:00:01Z"}"#,
        )
        .unwrap();
        assert_eq!(task.priority, None);
        assert_eq!(task.due_ms, Some(1_000));

        let task: Task = serde_json::from_str(r#"{"id":"T3","due_date":null}"#).unwrap();
        assert_eq!(task.due_ms, None);

        assert!(serde_json::from_str::<Task>(r#"{"id":"T4","dueDate":"soon"}"#).is_err());
    }

    #[test]
    fn test_parse_timestamp_ms() {
        assert_eq!(parse_timestamp_ms("1970-01-01T00:00:01.5Z"), Some(1_500));
        assert_eq!(parse_timestamp_ms("1970-01-01T01:00:00+01:00"), Some(0));
        assert_eq!(parse_timestamp_ms("1970-01-01 00:01:00"), Some(60_000));
        assert_eq!(parse_timestamp_ms("1970-01-02"), Some(86_400_000));
        assert_eq!(parse_timestamp_ms("tomorrow"), None);
    }

    #[test]
    fn test_task_overdue() {
        let open = Task::new("T1").with_due(1_000);
        assert!(open.is_overdue_at(2_000));
        assert!(!open.is_overdue_at(1_000));
        assert!(!open.is_overdue_at(500));

        let done = Task::new("T2")
            .with_due(1_000)
            .with_status(TaskStatus::Completed);
        assert!(!done.is_overdue_at(2_000));

        let undated = Task::new("T3");
        assert!(!undated.is_overdue_at(i64::MAX));
    }

    #[test]
    fn test_task_patch() {
        let mut task = Task::new("T1").with_title("Draft");
        TaskPatch::new()
            .status(TaskStatus::Completed)
            .attribute("note", "shipped")
            .apply(&mut task);

        assert_eq!(task.title, "Draft");
        assert!(task.is_completed());
        assert_eq!(task.attributes.get("note"), Some(&"shipped".to_string()));
    }

    #[test]
    fn test_now_is_after_2020() {
        assert!(now_ms() > 1_577_836_800_000);
    }
}
