//! Task and todo subcommands

use anyhow::{bail, Result};
use clap::Args;
use std::path::Path;

use crate::config::Config;
use crate::task::{Task, TaskStatus};

const TABLE_COL_ID: usize = 32;
const TABLE_COL_STATUS: usize = 12;
const TABLE_COL_TODOS: usize = 7;

#[derive(Args)]
pub struct NewArgs {
    /// Task description
    pub description: String,
}

#[derive(Args)]
pub struct AddArgs {
    /// Task id, unique id prefix, or exact description
    pub task: String,

    /// Todo text
    pub text: String,
}

#[derive(Args)]
pub struct DoneArgs {
    /// Task id, unique id prefix, or exact description
    pub task: String,

    /// Zero-based todo index
    pub index: usize,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Task id, unique id prefix, or exact description
    pub task: String,

    /// Zero-based todo index
    pub index: usize,
}

#[derive(Args)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Only open (non-completed) tasks, newest first
    #[arg(long)]
    open: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Task id, unique id prefix, or exact description
    pub task: String,
}

#[derive(Args)]
pub struct HardDeleteArgs {
    /// Task id, unique id prefix, or exact description
    pub task: String,
}

pub fn run_new(app_dir: &Path, config: &Config, args: NewArgs) -> Result<()> {
    let description = args.description.trim();
    if description.is_empty() {
        bail!("Task description must not be empty");
    }

    let repo = super::open_repository(app_dir, config);
    let id = repo.create(description)?;
    println!("Created task {}", id);
    Ok(())
}

pub fn run_add(app_dir: &Path, config: &Config, args: AddArgs) -> Result<()> {
    let repo = super::open_repository(app_dir, config);
    let id = resolve_id(&repo.list()?, &args.task)?;
    repo.add_todo(&id, &args.text)?;
    println!("Added todo to {}", id);
    Ok(())
}

pub fn run_done(app_dir: &Path, config: &Config, args: DoneArgs) -> Result<()> {
    let repo = super::open_repository(app_dir, config);
    let id = resolve_id(&repo.list()?, &args.task)?;
    repo.mark_done(&id, args.index)?;

    let task = repo.get(&id)?;
    if task.status == TaskStatus::Completed {
        println!("Completed: {}", task.description);
    } else {
        println!(
            "Done: {} ({}/{} todos)",
            task.todos[args.index].text,
            task.done_count(),
            task.todos.len()
        );
    }
    Ok(())
}

pub fn run_delete(app_dir: &Path, config: &Config, args: DeleteArgs) -> Result<()> {
    let repo = super::open_repository(app_dir, config);
    let id = resolve_id(&repo.list()?, &args.task)?;
    let removed = repo.delete_todo(&id, args.index)?;
    println!("Deleted todo: {}", removed.text);
    Ok(())
}

pub fn run_list(app_dir: &Path, config: &Config, args: ListArgs) -> Result<()> {
    let repo = super::open_repository(app_dir, config);
    let tasks = if args.open {
        repo.list_open()?
    } else {
        repo.list()?
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&tasks)?);
        return Ok(());
    }

    if tasks.is_empty() {
        println!("No tasks found");
        return Ok(());
    }

    print_table_header();
    for task in &tasks {
        print_table_row(task);
    }
    println!("\nTotal: {} tasks", tasks.len());
    Ok(())
}

pub fn run_show(app_dir: &Path, config: &Config, args: ShowArgs) -> Result<()> {
    let repo = super::open_repository(app_dir, config);
    let id = resolve_id(&repo.list()?, &args.task)?;
    let task = repo.get(&id)?;

    println!("{}", task.description);
    println!("  Id: {}", task.id);
    println!("  Status: {}", task.status);
    println!("  Created: {}", task.created);
    println!("  Updated: {}", task.updated);

    if task.todos.is_empty() {
        println!("  Todos: none");
    } else {
        println!("  Todos ({}/{}):", task.done_count(), task.todos.len());
        for (index, todo) in task.todos.iter().enumerate() {
            let mark = if todo.done { 'x' } else { ' ' };
            println!("    [{}] {} {}", mark, index, todo.text);
        }
    }
    Ok(())
}

pub fn run_hard_delete(app_dir: &Path, config: &Config, args: HardDeleteArgs) -> Result<()> {
    let repo = super::open_repository(app_dir, config);
    // A missing task only warns, so fall back to the raw argument when
    // resolution fails
    let id = resolve_id(&repo.list()?, &args.task).unwrap_or_else(|_| args.task.clone());
    repo.hard_delete(&id)?;
    println!("Removed {}", id);
    Ok(())
}

fn resolve_id(tasks: &[Task], identifier: &str) -> Result<String> {
    super::resolve_task(identifier, tasks).map(|task| task.id.clone())
}

fn print_table_header() {
    println!(
        "{:<width_id$} {:<width_status$} {:<width_todos$} DESCRIPTION",
        "ID",
        "STATUS",
        "TODOS",
        width_id = TABLE_COL_ID,
        width_status = TABLE_COL_STATUS,
        width_todos = TABLE_COL_TODOS
    );
    println!(
        "{}",
        "-".repeat(TABLE_COL_ID + TABLE_COL_STATUS + TABLE_COL_TODOS + 14)
    );
}

fn print_table_row(task: &Task) {
    let id = super::truncate(&task.id, TABLE_COL_ID);
    let todos = format!("{}/{}", task.done_count(), task.todos.len());
    println!(
        "{:<width_id$} {:<width_status$} {:<width_todos$} {}",
        id,
        task.status.label(),
        todos,
        task.description,
        width_id = TABLE_COL_ID,
        width_status = TABLE_COL_STATUS,
        width_todos = TABLE_COL_TODOS
    );
}
