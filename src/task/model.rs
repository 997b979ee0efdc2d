//! Task data model

use chrono::{DateTime, FixedOffset, Local, SecondsFormat};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Description characters carried into a task id before slugification.
const ID_SLUG_LEN: usize = 50;

/// Task status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Being worked on
    InProgress,
    /// Set aside for a newer task
    Interrupted,
    /// Every todo checked off
    Completed,
}

impl TaskStatus {
    /// Get the emoji for this status
    pub fn emoji(&self) -> &'static str {
        match self {
            Self::InProgress => "🔵",
            Self::Interrupted => "🟡",
            Self::Completed => "✅",
        }
    }

    /// Get the text label, matching the persisted form
    pub fn label(&self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Interrupted => "interrupted",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.emoji(), self.label())
    }
}

/// One checklist entry within a task. Addressed by position only; deleting an
/// entry shifts every later index down by one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub text: String,
    pub done: bool,
}

/// A unit of work with a description and an ordered todo list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Creation timestamp plus a description slug; unique by timing, not by
    /// construction
    pub id: String,

    /// What the task is about
    pub description: String,

    /// Ordered checklist
    #[serde(default)]
    pub todos: Vec<TodoItem>,

    /// Current status
    pub status: TaskStatus,

    /// When the task was created
    pub created: String,

    /// When the task was last touched
    pub updated: String,
}

impl Task {
    /// Create a new in-progress task with an empty todo list
    pub fn new(description: impl Into<String>) -> Self {
        let description = description.into();
        let now = Local::now();
        let stamp = now.to_rfc3339_opts(SecondsFormat::Secs, false);
        Self {
            id: make_task_id(&description, now),
            description,
            todos: Vec::new(),
            status: TaskStatus::InProgress,
            created: stamp.clone(),
            updated: stamp,
        }
    }

    /// Bump the `updated` timestamp
    pub fn touch(&mut self) {
        self.updated = timestamp_now();
    }

    /// A task counts as finished only when there is at least one todo and
    /// none of them is open.
    pub fn all_todos_done(&self) -> bool {
        !self.todos.is_empty() && self.todos.iter().all(|t| t.done)
    }

    pub fn done_count(&self) -> usize {
        self.todos.iter().filter(|t| t.done).count()
    }

    /// Format as a TASKS.md line
    pub fn to_markdown_line(&self) -> String {
        format!(
            "- {} **{}**: {} ({}/{} todos)",
            self.status.emoji(),
            self.id,
            self.description,
            self.done_count(),
            self.todos.len()
        )
    }
}

/// Build a task id from its creation time (second precision, local offset)
/// and a slug of the description: `20250101T120000_Fix_bug_X`. Two tasks
/// created within the same second with the same description collide; the
/// store accepts that rather than policing uniqueness.
pub fn make_task_id(description: &str, at: DateTime<Local>) -> String {
    format!("{}_{}", at.format("%Y%m%dT%H%M%S"), slugify(description))
}

fn slugify(description: &str) -> String {
    description
        .chars()
        .take(ID_SLUG_LEN)
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

/// The one timestamp format every document uses: local-offset RFC 3339 with
/// second precision, e.g. `2025-01-01T12:00:00+08:00`.
pub fn timestamp_now() -> String {
    Local::now().to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Parse a stored timestamp. Callers degrade (skip sorting, keep the task)
/// instead of erroring when this returns `None`.
pub fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s).ok()
}
