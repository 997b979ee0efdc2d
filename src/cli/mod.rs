//! CLI command implementations

pub mod definition;
pub mod focus;
pub mod task;

pub use definition::{Cli, Commands};

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use crate::config::{self, Config};
use crate::export::MarkdownExport;
use crate::interrupt::InterruptionCoordinator;
use crate::task::{Task, TaskRepository};

/// Resolve the data directory: `--dir` / `$SIDETRACK_DIR` beats
/// `~/.sidetrack`
pub fn resolve_app_dir(flag: Option<PathBuf>) -> Result<PathBuf> {
    match flag {
        Some(dir) => {
            fs::create_dir_all(&dir)?;
            Ok(dir)
        }
        None => config::default_app_dir(),
    }
}

/// Dispatch a parsed subcommand. `Completion` is handled in `main` before
/// any data directory exists.
pub fn dispatch(app_dir: &Path, config: &Config, command: Commands) -> Result<()> {
    match command {
        Commands::New(args) => task::run_new(app_dir, config, args),
        Commands::Add(args) => task::run_add(app_dir, config, args),
        Commands::Done(args) => task::run_done(app_dir, config, args),
        Commands::Delete(args) => task::run_delete(app_dir, config, args),
        Commands::List(args) => task::run_list(app_dir, config, args),
        Commands::Show(args) => task::run_show(app_dir, config, args),
        Commands::HardDelete(args) => task::run_hard_delete(app_dir, config, args),
        Commands::Do(args) => focus::run_do(app_dir, config, args),
        Commands::Resume => focus::run_resume(app_dir, config),
        Commands::Interrupt => focus::run_interrupt(app_dir, config),
        Commands::Status => focus::run_status(app_dir, config),
        Commands::Completion { .. } => unreachable!("handled in main"),
    }
}

fn data_repository(app_dir: &Path, config: &Config) -> TaskRepository {
    TaskRepository::new(app_dir.join(config::TASKS_FILE)).with_retention_days(config.retention_days)
}

fn markdown_export(app_dir: &Path, config: &Config) -> Box<MarkdownExport> {
    Box::new(MarkdownExport::new(
        data_repository(app_dir, config),
        app_dir.join(config::EXPORT_FILE),
    ))
}

/// Repository wired with the configured observers
pub fn open_repository(app_dir: &Path, config: &Config) -> TaskRepository {
    let mut repo = data_repository(app_dir, config);
    if config.export.markdown {
        repo.add_observer(markdown_export(app_dir, config));
    }
    repo
}

/// Coordinator over an observer-wired repository, plus its own observers for
/// focus-state writes
pub fn open_coordinator(app_dir: &Path, config: &Config) -> InterruptionCoordinator {
    let repo = open_repository(app_dir, config);
    let mut coordinator = InterruptionCoordinator::new(repo, app_dir.join(config::FOCUS_FILE));
    if config.export.markdown {
        coordinator.add_observer(markdown_export(app_dir, config));
    }
    coordinator
}

/// Resolve a task argument: exact id, then unique id prefix, then exact
/// description.
pub fn resolve_task<'a>(identifier: &str, tasks: &'a [Task]) -> Result<&'a Task> {
    if let Some(task) = tasks.iter().find(|t| t.id == identifier) {
        return Ok(task);
    }

    let prefixed: Vec<&Task> = tasks
        .iter()
        .filter(|t| t.id.starts_with(identifier))
        .collect();
    match prefixed.len() {
        1 => return Ok(prefixed[0]),
        n if n > 1 => bail!("Task id prefix '{}' is ambiguous ({} matches)", identifier, n),
        _ => {}
    }

    if let Some(task) = tasks.iter().find(|t| t.description == identifier) {
        return Ok(task);
    }

    bail!("Task not found: {}", identifier)
}

/// Truncate to at most `max` characters, ellipsizing when something was cut.
/// Ids can carry multi-byte slug characters, so this counts chars, never
/// byte offsets.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    if max <= 3 {
        s.chars().take(max).collect()
    } else {
        let mut out: String = s.chars().take(max - 3).collect();
        out.push_str("...");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Task;

    fn task_with_id(id: &str, description: &str) -> Task {
        let mut task = Task::new(description);
        task.id = id.to_string();
        task
    }

    #[test]
    fn test_resolve_task_by_exact_id() {
        let tasks = vec![
            task_with_id("20250101T000000_A", "A"),
            task_with_id("20250102T000000_B", "B"),
        ];
        let found = resolve_task("20250102T000000_B", &tasks).unwrap();
        assert_eq!(found.description, "B");
    }

    #[test]
    fn test_resolve_task_by_unique_prefix() {
        let tasks = vec![
            task_with_id("20250101T000000_A", "A"),
            task_with_id("20250102T000000_B", "B"),
        ];
        let found = resolve_task("20250102", &tasks).unwrap();
        assert_eq!(found.description, "B");
    }

    #[test]
    fn test_resolve_task_ambiguous_prefix() {
        let tasks = vec![
            task_with_id("20250101T000000_A", "A"),
            task_with_id("20250101T000001_B", "B"),
        ];
        let err = resolve_task("20250101", &tasks).unwrap_err();
        assert!(err.to_string().contains("ambiguous"));
    }

    #[test]
    fn test_resolve_task_by_description() {
        let tasks = vec![task_with_id("20250101T000000_Fix_bug", "Fix bug")];
        let found = resolve_task("Fix bug", &tasks).unwrap();
        assert_eq!(found.id, "20250101T000000_Fix_bug");
    }

    #[test]
    fn test_resolve_task_not_found() {
        let tasks = vec![task_with_id("20250101T000000_A", "A")];
        assert!(resolve_task("nonexistent", &tasks).is_err());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
        assert_eq!(truncate("hello", 3), "hel");
        assert_eq!(truncate("", 5), "");
    }

    #[test]
    fn test_truncate_multibyte_ids() {
        // Slugs keep Unicode alphanumerics, so ids are not ASCII-only
        let id = format!("20250101T120000_{}", "日本語のタスクをたくさん".repeat(5));
        let cut = truncate(&id, 32);
        assert_eq!(cut.chars().count(), 32);
        assert!(cut.ends_with("..."));

        assert_eq!(truncate("日本語のタスク", 5), "日本...");
        assert_eq!(truncate("日本語", 3), "日本語");
        assert_eq!(truncate("日本語のタスク", 2), "日本");
    }
}
