//! Task tracking module
//!
//! This module owns the task collection and its JSON document:
//! - Task / TodoItem data model and id generation
//! - whole-document repository with a retention sweep on load
//! - task state machine (in_progress -> interrupted -> in_progress -> completed)

pub mod error;
pub mod model;
pub mod repository;

pub use error::TaskError;
pub use model::{make_task_id, parse_timestamp, timestamp_now, Task, TaskStatus, TodoItem};
pub use repository::{TaskRepository, DEFAULT_RETENTION_DAYS};
