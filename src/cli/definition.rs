//! Top-level CLI definition

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use super::focus::DoArgs;
use super::task::{AddArgs, DeleteArgs, DoneArgs, HardDeleteArgs, ListArgs, NewArgs, ShowArgs};

#[derive(Parser)]
#[command(
    name = "sdt",
    about = "Single-focus task tracker with automatic interruption handling",
    version
)]
pub struct Cli {
    /// Data directory (defaults to ~/.sidetrack)
    #[arg(long, global = true, env = "SIDETRACK_DIR")]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a task with an empty todo list
    New(NewArgs),

    /// Append a todo to a task
    Add(AddArgs),

    /// Mark a todo done
    Done(DoneArgs),

    /// Delete a todo, shifting later indices down
    Delete(DeleteArgs),

    /// List tasks
    List(ListArgs),

    /// Show one task with its checklist
    Show(ShowArgs),

    /// Remove a task outright, whatever its status
    HardDelete(HardDeleteArgs),

    /// Feed free text through the command classifier
    Do(DoArgs),

    /// Resume every interrupted task
    Resume,

    /// Set the current task aside without starting a new one
    Interrupt,

    /// Show the current/interrupted snapshot
    Status,

    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}
