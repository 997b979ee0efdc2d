//! Task repository - JSON document persistence
//!
//! Sole owner of the task collection and its on-disk document. Every
//! operation is a full read-modify-write: load the document, mutate, rewrite
//! it whole. There is no partial-write state a reader could observe, and no
//! in-memory collection to drift from disk. A single writing process is
//! assumed; concurrent writers race at whole-document granularity.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Duration, Local};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::observer::{notify_all, CommitEvent, CommitObserver};

use super::error::{Result, TaskError};
use super::model::{parse_timestamp, Task, TaskStatus, TodoItem};

/// Completed tasks older than this many days are dropped on load.
pub const DEFAULT_RETENTION_DAYS: i64 = 7;

#[derive(Debug, Default, Deserialize)]
struct TaskDocument {
    #[serde(default)]
    tasks: Vec<Task>,
}

#[derive(Serialize)]
struct TaskDocumentRef<'a> {
    tasks: &'a [Task],
}

pub struct TaskRepository {
    path: PathBuf,
    retention_days: i64,
    observers: Vec<Box<dyn CommitObserver>>,
}

impl TaskRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            retention_days: DEFAULT_RETENTION_DAYS,
            observers: Vec::new(),
        }
    }

    pub fn with_retention_days(mut self, days: i64) -> Self {
        self.retention_days = days;
        self
    }

    pub fn add_observer(&mut self, observer: Box<dyn CommitObserver>) {
        self.observers.push(observer);
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create a task and return its id. Emptiness of the description is the
    /// caller's concern, not the repository's.
    pub fn create(&self, description: &str) -> Result<String> {
        let mut tasks = self.load()?;
        let task = Task::new(description);
        let id = task.id.clone();
        tasks.push(task);
        self.save(&tasks)?;
        Ok(id)
    }

    /// Append an open todo to a task
    pub fn add_todo(&self, task_id: &str, text: &str) -> Result<()> {
        let mut tasks = self.load()?;
        let task = find_mut(&mut tasks, task_id)?;
        task.todos.push(TodoItem {
            text: text.to_string(),
            done: false,
        });
        task.touch();
        self.save(&tasks)
    }

    /// Mark the todo at `index` done. Completing the last open todo flips the
    /// task to `completed`. Re-marking an already-done todo is a no-op that
    /// still bumps `updated`.
    pub fn mark_done(&self, task_id: &str, index: usize) -> Result<()> {
        let mut tasks = self.load()?;
        let task = find_mut(&mut tasks, task_id)?;
        let len = task.todos.len();
        let todo = task
            .todos
            .get_mut(index)
            .ok_or_else(|| TaskError::TodoIndexOutOfRange {
                id: task_id.to_string(),
                index,
                len,
            })?;
        todo.done = true;
        if task.all_todos_done() {
            task.status = TaskStatus::Completed;
        }
        task.touch();
        self.save(&tasks)
    }

    /// Remove the todo at `index` and return it. Later indices shift down by
    /// one.
    pub fn delete_todo(&self, task_id: &str, index: usize) -> Result<TodoItem> {
        let mut tasks = self.load()?;
        let task = find_mut(&mut tasks, task_id)?;
        if index >= task.todos.len() {
            return Err(TaskError::TodoIndexOutOfRange {
                id: task_id.to_string(),
                index,
                len: task.todos.len(),
            });
        }
        let removed = task.todos.remove(index);
        task.touch();
        self.save(&tasks)?;
        Ok(removed)
    }

    /// Overwrite a task's status unconditionally. No legality check on the
    /// transition: resume logic outside the repository decides what moves
    /// where.
    pub fn set_status(&self, task_id: &str, status: TaskStatus) -> Result<()> {
        let mut tasks = self.load()?;
        let task = find_mut(&mut tasks, task_id)?;
        task.status = status;
        task.touch();
        self.save(&tasks)
    }

    /// Remove a task outright, whatever its status. A missing id is only
    /// worth a warning.
    pub fn hard_delete(&self, task_id: &str) -> Result<()> {
        let mut tasks = self.load()?;
        let before = tasks.len();
        tasks.retain(|t| t.id != task_id);
        if tasks.len() == before {
            warn!("hard_delete: no task with id {}", task_id);
            return Ok(());
        }
        self.save(&tasks)
    }

    /// Every task in the document, in document order
    pub fn list(&self) -> Result<Vec<Task>> {
        self.load()
    }

    /// Fetch one task by exact id
    pub fn get(&self, task_id: &str) -> Result<Task> {
        self.load()?
            .into_iter()
            .find(|t| t.id == task_id)
            .ok_or_else(|| TaskError::NotFound(task_id.to_string()))
    }

    /// Open (non-completed) tasks, newest first. Sorting needs every
    /// `created` stamp to parse; otherwise document order is kept.
    pub fn list_open(&self) -> Result<Vec<Task>> {
        let open = self
            .load()?
            .into_iter()
            .filter(|t| t.status != TaskStatus::Completed);
        let mut keyed: Vec<_> = open.map(|t| (parse_timestamp(&t.created), t)).collect();
        if keyed.iter().all(|(stamp, _)| stamp.is_some()) {
            keyed.sort_by(|a, b| b.0.cmp(&a.0));
        }
        Ok(keyed.into_iter().map(|(_, task)| task).collect())
    }

    /// Load the document and run the retention sweep: completed tasks whose
    /// `updated` stamp is at least `retention_days` old are dropped, and the
    /// pruned set is persisted before this returns. Tasks with an unreadable
    /// `updated` stamp are kept.
    fn load(&self) -> Result<Vec<Task>> {
        let mut tasks = self.read_document();
        let before = tasks.len();
        let now = Local::now();
        let horizon = Duration::days(self.retention_days);
        tasks.retain(|t| {
            if t.status != TaskStatus::Completed {
                return true;
            }
            match parse_timestamp(&t.updated) {
                Some(updated) => now.signed_duration_since(updated) < horizon,
                None => true,
            }
        });
        if tasks.len() != before {
            self.save(&tasks)?;
        }
        Ok(tasks)
    }

    /// Raw document read. Missing, empty, or unparsable files are an empty
    /// repository, logged but never an error.
    fn read_document(&self) -> Vec<Task> {
        if !self.path.exists() {
            return Vec::new();
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read {}: {}", self.path.display(), e);
                return Vec::new();
            }
        };
        if content.trim().is_empty() {
            return Vec::new();
        }

        match serde_json::from_str::<TaskDocument>(&content) {
            Ok(doc) => doc.tasks,
            Err(e) => {
                warn!(
                    "Malformed task document {}, treating as empty: {}",
                    self.path.display(),
                    e
                );
                Vec::new()
            }
        }
    }

    fn save(&self, tasks: &[Task]) -> Result<()> {
        // Keep the previous document around as a backup
        if self.path.exists() {
            let backup_path = self.path.with_extension("json.bak");
            if let Err(e) = fs::copy(&self.path, &backup_path) {
                warn!("Failed to create backup: {}", e);
            }
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&TaskDocumentRef { tasks })?;
        fs::write(&self.path, content)?;

        notify_all(&self.observers, CommitEvent::TasksChanged);
        Ok(())
    }
}

fn find_mut<'a>(tasks: &'a mut [Task], task_id: &str) -> Result<&'a mut Task> {
    tasks
        .iter_mut()
        .find(|t| t.id == task_id)
        .ok_or_else(|| TaskError::NotFound(task_id.to_string()))
}
