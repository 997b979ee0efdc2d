//! Interruption handling
//!
//! Tracks the single current task, the stack of interrupted ones, and the
//! free-text command protocol that drives both.

pub mod classifier;
pub mod coordinator;

pub use classifier::{classify, CommandKind};
pub use coordinator::{
    InterruptionCoordinator, InterruptionRecord, InterruptionState, RecordStatus,
};
