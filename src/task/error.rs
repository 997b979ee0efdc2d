use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Task not found: {0}")]
    NotFound(String),

    #[error("Todo index {index} out of range for task {id} ({len} todos)")]
    TodoIndexOutOfRange {
        id: String,
        index: usize,
        len: usize,
    },

    #[error("Task description must not be empty")]
    EmptyDescription,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TaskError>;
