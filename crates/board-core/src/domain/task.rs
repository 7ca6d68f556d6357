//! Task Entity
//!
//! A card on the board. Its column is its status, its position inside
//! the column is its order.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

use super::entity::{DomainError, DomainResult, Entity};

/// Identifier assigned by the remote store on first write
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Drafts carry an empty id until the store has answered the POST.
    pub fn is_unassigned(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl AsRef<str> for TaskId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Board column a task lives in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskStatus {
    #[default]
    ToDo,
    InProgress,
    AwaitFeedback,
    Done,
}

impl TaskStatus {
    /// Columns in board order
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::ToDo,
        TaskStatus::InProgress,
        TaskStatus::AwaitFeedback,
        TaskStatus::Done,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::ToDo => "toDo",
            TaskStatus::InProgress => "inProgress",
            TaskStatus::AwaitFeedback => "awaitFeedback",
            TaskStatus::Done => "done",
        }
    }

    /// Column heading
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::ToDo => "To do",
            TaskStatus::InProgress => "In progress",
            TaskStatus::AwaitFeedback => "Await feedback",
            TaskStatus::Done => "Done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::InvalidInput(format!("unknown status '{}'", s)))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Urgent,
    Low,
    /// Also takes any unrecognised wire value
    #[default]
    #[serde(other)]
    Medium,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Urgent => "urgent",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

impl Subtask {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            completed: false,
        }
    }
}

/// `completed/total` summary shown on a card
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubtaskProgress {
    pub completed: usize,
    pub total: usize,
}

impl SubtaskProgress {
    /// Width of the progress bar, 0..=100
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed * 100) / self.total) as u8
    }

    pub fn label(&self) -> String {
        format!("{}/{} Subtasks", self.completed, self.total)
    }
}

/// A board task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default, skip_serializing_if = "TaskId::is_unassigned")]
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "deserialize_due_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub status: TaskStatus,
    /// Assignee emails, display order
    #[serde(default)]
    pub assigned_to: Vec<String>,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    /// Position within the status column
    #[serde(default)]
    pub order: u32,
}

/// The store keeps "" for tasks without a due date. A date-time keeps its
/// date part; anything else unreadable is treated as no due date.
fn deserialize_due_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_due_date))
}

fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(stamp.date_naive());
    }
    tracing::warn!(due_date = raw, "unreadable due date, ignoring it");
    None
}

impl Task {
    /// Create an unsaved task in a column
    pub fn new(title: impl Into<String>, status: TaskStatus) -> Self {
        Self {
            id: TaskId::default(),
            title: title.into(),
            description: String::new(),
            due_date: None,
            priority: Priority::default(),
            category: String::new(),
            status,
            assigned_to: Vec::new(),
            subtasks: Vec::new(),
            order: 0,
        }
    }

    pub fn with_id(mut self, id: impl Into<TaskId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = order;
        self
    }

    /// Add an assignee, keeping first-seen order and dropping duplicates
    pub fn assign(&mut self, email: impl Into<String>) {
        let email = email.into();
        if !self.assigned_to.iter().any(|e| e.eq_ignore_ascii_case(&email)) {
            self.assigned_to.push(email);
        }
    }

    pub fn progress(&self) -> SubtaskProgress {
        SubtaskProgress {
            completed: self.subtasks.iter().filter(|s| s.completed).count(),
            total: self.subtasks.len(),
        }
    }

    /// Flip one subtask, returns its new state
    pub fn toggle_subtask(&mut self, index: usize) -> DomainResult<bool> {
        let subtask = self.subtasks.get_mut(index).ok_or_else(|| {
            DomainError::NotFound(format!("subtask {} of task {}", index, self.id))
        })?;
        subtask.completed = !subtask.completed;
        Ok(subtask.completed)
    }
}

impl Entity for Task {
    type Id = TaskId;

    fn id(&self) -> &TaskId {
        &self.id
    }

    fn assign_id(&mut self, id: TaskId) {
        // Immutable once assigned
        if self.id.is_unassigned() {
            self.id = id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        let json = serde_json::to_string(&TaskStatus::AwaitFeedback).unwrap();
        assert_eq!(json, "\"awaitFeedback\"");
        assert_eq!("inProgress".parse::<TaskStatus>().unwrap(), TaskStatus::InProgress);
        assert!("doing".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_task_from_sparse_record() {
        // Empty arrays are dropped by the store, missing dates come back as ""
        let json = r#"{"title":"Write docs","dueDate":"","priority":"urgent","status":"done"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.title, "Write docs");
        assert_eq!(task.due_date, None);
        assert_eq!(task.priority, Priority::Urgent);
        assert_eq!(task.status, TaskStatus::Done);
        assert!(task.subtasks.is_empty());
        assert_eq!(task.order, 0);
    }

    #[test]
    fn test_task_camel_case_fields() {
        let mut task = Task::new("Plan", TaskStatus::ToDo).with_id("-Nabc");
        task.due_date = NaiveDate::from_ymd_opt(2024, 5, 1);
        task.assign("ada@example.com");
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["dueDate"], "2024-05-01");
        assert_eq!(value["assignedTo"][0], "ada@example.com");
        assert_eq!(value["status"], "toDo");
    }

    #[test]
    fn test_unknown_priority_falls_back_to_medium() {
        let task: Task = serde_json::from_str(r#"{"title":"x","priority":"whenever"}"#).unwrap();
        assert_eq!(task.priority, Priority::Medium);
    }

    #[test]
    fn test_odd_due_dates_keep_the_task() {
        let task: Task =
            serde_json::from_str(r#"{"title":"x","dueDate":"2024-05-01T10:00:00Z"}"#).unwrap();
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2024, 5, 1));

        let task: Task = serde_json::from_str(r#"{"title":"y","dueDate":"01/05/2024"}"#).unwrap();
        assert_eq!(task.title, "y");
        assert_eq!(task.due_date, None);
    }

    #[test]
    fn test_assign_dedups() {
        let mut task = Task::new("x", TaskStatus::ToDo);
        task.assign("b@example.com");
        task.assign("a@example.com");
        task.assign("B@example.com");
        assert_eq!(task.assigned_to, vec!["b@example.com", "a@example.com"]);
    }

    #[test]
    fn test_progress_and_toggle() {
        let mut task = Task::new("x", TaskStatus::ToDo);
        task.subtasks = vec![Subtask::new("one"), Subtask::new("two"), Subtask::new("three")];
        assert!(task.toggle_subtask(1).unwrap());
        let progress = task.progress();
        assert_eq!(progress.completed, 1);
        assert_eq!(progress.total, 3);
        assert_eq!(progress.percent(), 33);
        assert_eq!(progress.label(), "1/3 Subtasks");
        assert!(task.toggle_subtask(7).is_err());
    }

    #[test]
    fn test_assign_id_is_write_once() {
        let mut task = Task::new("x", TaskStatus::ToDo);
        task.assign_id(TaskId::new("first"));
        task.assign_id(TaskId::new("second"));
        assert_eq!(task.id.as_str(), "first");
    }
}
