//! Current-task tracking and the interrupt/resume protocol
//!
//! The coordinator enforces the one rule the repository does not: at most one
//! task is active at a time. Starting a task while another is active pushes
//! an interruption record and flips the old task to `interrupted`; a bulk
//! resume flips every interrupted task back.
//!
//! Focus state lives in its own JSON document, written independently from the
//! task document. There is no cross-document transaction: a crash between the
//! two writes leaves a window where they disagree, which the design accepts.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::observer::{notify_all, CommitEvent, CommitObserver};
use crate::task::{timestamp_now, TaskError, TaskRepository, TaskStatus};

use super::classifier::{classify, CommandKind};

/// Whether a record describes the task being worked on or one set aside
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Active,
    Interrupted,
}

/// Point-in-time copy of a task's descriptor, captured when it became or
/// stopped being current. Not a live reference: the task can move on in the
/// repository without this record noticing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterruptionRecord {
    pub task_id: String,
    pub description: String,
    pub started_at: String,
    pub status: RecordStatus,
}

/// The focus document: one current task at most, plus the interruption stack
#[derive(Debug, Default, Serialize)]
pub struct InterruptionState {
    pub current_task: Option<InterruptionRecord>,
    pub interrupted_tasks: Vec<InterruptionRecord>,
    pub last_updated: String,
}

#[derive(Deserialize)]
struct StateDocument {
    #[serde(default)]
    current_task: Option<CurrentTaskField>,
    #[serde(default)]
    interrupted_tasks: Vec<InterruptionRecord>,
    #[serde(default)]
    last_updated: String,
}

/// Older writers stored a bare task id here; newer ones store the full
/// record. Loading upgrades the bare shape once instead of special-casing it
/// at every use site. Writes always emit the full record.
#[derive(Deserialize)]
#[serde(untagged)]
enum CurrentTaskField {
    Record(InterruptionRecord),
    LegacyId(String),
}

impl CurrentTaskField {
    fn upgrade(self) -> InterruptionRecord {
        match self {
            Self::Record(record) => record,
            Self::LegacyId(task_id) => InterruptionRecord {
                task_id,
                description: String::new(),
                started_at: timestamp_now(),
                status: RecordStatus::Active,
            },
        }
    }
}

pub struct InterruptionCoordinator {
    repo: TaskRepository,
    state_path: PathBuf,
    state: InterruptionState,
    observers: Vec<Box<dyn CommitObserver>>,
}

impl InterruptionCoordinator {
    /// Build a coordinator over `repo`, loading focus state from
    /// `state_path` up front. Every mutation persists before returning, so
    /// there is nothing to flush on drop.
    pub fn new(repo: TaskRepository, state_path: impl Into<PathBuf>) -> Self {
        let state_path = state_path.into();
        let state = load_state(&state_path);
        Self {
            repo,
            state_path,
            state,
            observers: Vec::new(),
        }
    }

    pub fn add_observer(&mut self, observer: Box<dyn CommitObserver>) {
        self.observers.push(observer);
    }

    pub fn repository(&self) -> &TaskRepository {
        &self.repo
    }

    pub fn current_task(&self) -> Option<&InterruptionRecord> {
        self.state.current_task.as_ref()
    }

    pub fn interrupted_tasks(&self) -> &[InterruptionRecord] {
        &self.state.interrupted_tasks
    }

    /// Start a new task as the current one, interrupting whatever was current
    /// before. Returns the new task's id.
    pub fn start_task(&mut self, description: &str) -> Result<String, TaskError> {
        if description.trim().is_empty() {
            return Err(TaskError::EmptyDescription);
        }

        if self.state.current_task.is_some() {
            self.interrupt()?;
        }

        let task_id = self.repo.create(description)?;
        self.state.current_task = Some(InterruptionRecord {
            task_id: task_id.clone(),
            description: description.to_string(),
            started_at: timestamp_now(),
            status: RecordStatus::Active,
        });
        self.persist()?;
        Ok(task_id)
    }

    /// Set the current task aside. No-op when nothing is active; usable
    /// standalone, not only from `start_task`.
    pub fn interrupt(&mut self) -> Result<(), TaskError> {
        let Some(mut record) = self.state.current_task.take() else {
            return Ok(());
        };
        record.status = RecordStatus::Interrupted;
        let task_id = record.task_id.clone();
        // The snapshot is kept even when the task itself has vanished from
        // the repository; resume_all tolerates the dangling id.
        self.state.interrupted_tasks.push(record);

        match self.repo.set_status(&task_id, TaskStatus::Interrupted) {
            Ok(()) => {}
            Err(TaskError::NotFound(_)) => {
                warn!("interrupt: task {} no longer in repository", task_id);
            }
            Err(e) => return Err(e),
        }
        self.persist()
    }

    /// Bulk resume: every interrupted task goes back to `in_progress`, the
    /// stack empties, and no task is current. Ids that no longer resolve are
    /// skipped, not fatal. Returns how many records were resumed.
    pub fn resume_all(&mut self) -> Result<usize, TaskError> {
        for record in &self.state.interrupted_tasks {
            match self.repo.set_status(&record.task_id, TaskStatus::InProgress) {
                Ok(()) => {}
                Err(TaskError::NotFound(_)) => {
                    warn!("resume_all: task {} no longer in repository", record.task_id);
                }
                Err(e) => return Err(e),
            }
        }

        let count = self.state.interrupted_tasks.len();
        self.state.interrupted_tasks.clear();
        self.state.current_task = None;
        self.persist()?;
        Ok(count)
    }

    /// Classify free text into a command kind
    pub fn classify(&self, text: &str) -> CommandKind {
        classify(text)
    }

    /// Run one free-text command end to end and describe what happened
    pub fn process_command(&mut self, text: &str) -> Result<String, TaskError> {
        match self.classify(text) {
            CommandKind::NewTask => {
                let interrupted = self.current_task().map(|r| r.description.clone());
                let task_id = self.start_task(text.trim())?;
                Ok(match interrupted {
                    Some(previous) => {
                        format!("Interrupted \"{}\"; started task {}", previous, task_id)
                    }
                    None => format!("Started task {}", task_id),
                })
            }
            CommandKind::Resume => {
                let count = self.resume_all()?;
                Ok(if count == 0 {
                    "Nothing to resume".to_string()
                } else {
                    format!("Resumed {} interrupted task(s)", count)
                })
            }
            CommandKind::Status => Ok(self.status_report()),
            CommandKind::Continue => Ok(match self.current_task() {
                Some(record) => format!("Continuing: {}", record.description),
                None => "No active task".to_string(),
            }),
        }
    }

    /// Read-only snapshot of the focus state
    pub fn status_report(&self) -> String {
        let mut out = String::new();
        match &self.state.current_task {
            Some(record) => out.push_str(&format!(
                "Current: {} ({}, since {})\n",
                record.description, record.task_id, record.started_at
            )),
            None => out.push_str("Current: none\n"),
        }

        if self.state.interrupted_tasks.is_empty() {
            out.push_str("Interrupted: none");
        } else {
            out.push_str(&format!(
                "Interrupted ({}):",
                self.state.interrupted_tasks.len()
            ));
            for record in &self.state.interrupted_tasks {
                out.push_str(&format!("\n  - {} ({})", record.description, record.task_id));
            }
        }
        out
    }

    fn persist(&mut self) -> Result<(), TaskError> {
        self.state.last_updated = timestamp_now();

        // Keep the previous document around as a backup
        if self.state_path.exists() {
            let backup_path = self.state_path.with_extension("json.bak");
            if let Err(e) = fs::copy(&self.state_path, &backup_path) {
                warn!("Failed to create backup: {}", e);
            }
        }

        if let Some(parent) = self.state_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.state)?;
        fs::write(&self.state_path, content)?;

        notify_all(&self.observers, CommitEvent::FocusChanged);
        Ok(())
    }
}

/// Load the focus document. Missing, empty, or unparsable files are a clean
/// slate, logged but never an error.
fn load_state(path: &Path) -> InterruptionState {
    if !path.exists() {
        return InterruptionState::default();
    }

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!("Failed to read {}: {}", path.display(), e);
            return InterruptionState::default();
        }
    };
    if content.trim().is_empty() {
        return InterruptionState::default();
    }

    match serde_json::from_str::<StateDocument>(&content) {
        Ok(doc) => InterruptionState {
            current_task: doc.current_task.map(CurrentTaskField::upgrade),
            interrupted_tasks: doc.interrupted_tasks,
            last_updated: doc.last_updated,
        },
        Err(e) => {
            warn!(
                "Malformed interruption state {}, starting clean: {}",
                path.display(),
                e
            );
            InterruptionState::default()
        }
    }
}
