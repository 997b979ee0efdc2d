//! TASKS.md rendering
//!
//! Best-effort mirror of the task document as a human-readable checklist,
//! rewritten after every persist. Output only; nothing ever reads it back.

use std::fs;
use std::path::PathBuf;

use anyhow::Result;

use crate::observer::{CommitEvent, CommitObserver};
use crate::task::{Task, TaskRepository, TaskStatus};

pub struct MarkdownExport {
    repo: TaskRepository,
    output_path: PathBuf,
}

impl MarkdownExport {
    /// `repo` should be a plain, observer-less handle on the task document;
    /// the exporter reads through it so expired tasks never show up.
    pub fn new(repo: TaskRepository, output_path: impl Into<PathBuf>) -> Self {
        Self {
            repo,
            output_path: output_path.into(),
        }
    }

    fn render(tasks: &[Task]) -> String {
        let mut output = String::from("# TASKS\n\n");

        let sections = [
            ("Active", TaskStatus::InProgress),
            ("Interrupted", TaskStatus::Interrupted),
            ("Completed", TaskStatus::Completed),
        ];

        for (title, status) in sections {
            let section: Vec<&Task> = tasks.iter().filter(|t| t.status == status).collect();
            if section.is_empty() {
                continue;
            }

            output.push_str(&format!("## {}\n\n", title));
            for task in section {
                output.push_str(&task.to_markdown_line());
                output.push('\n');
                for todo in &task.todos {
                    let mark = if todo.done { 'x' } else { ' ' };
                    output.push_str(&format!("  - [{}] {}\n", mark, todo.text));
                }
            }
            output.push('\n');
        }

        output
    }
}

impl CommitObserver for MarkdownExport {
    fn name(&self) -> &str {
        "markdown-export"
    }

    fn notify(&self, _event: CommitEvent) -> Result<()> {
        let tasks = self.repo.list()?;
        fs::write(&self.output_path, Self::render(&tasks))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TodoItem;
    use tempfile::tempdir;

    #[test]
    fn test_render_sections_and_checklists() {
        let mut active = Task::new("Ship it");
        active.todos.push(TodoItem {
            text: "tag release".to_string(),
            done: true,
        });
        active.todos.push(TodoItem {
            text: "announce".to_string(),
            done: false,
        });
        let mut paused = Task::new("Side quest");
        paused.status = TaskStatus::Interrupted;

        let output = MarkdownExport::render(&[active, paused]);

        assert!(output.contains("## Active"));
        assert!(output.contains("## Interrupted"));
        assert!(!output.contains("## Completed"));
        assert!(output.contains("  - [x] tag release"));
        assert!(output.contains("  - [ ] announce"));
    }

    #[test]
    fn test_render_empty_store_is_just_the_header() {
        assert_eq!(MarkdownExport::render(&[]), "# TASKS\n\n");
    }

    #[test]
    fn test_notify_writes_the_file() -> Result<()> {
        let temp = tempdir().unwrap();
        let repo = TaskRepository::new(temp.path().join("tasks.json"));
        repo.create("Visible")?;

        let export = MarkdownExport::new(
            TaskRepository::new(temp.path().join("tasks.json")),
            temp.path().join("TASKS.md"),
        );
        export.notify(CommitEvent::TasksChanged)?;

        let content = fs::read_to_string(temp.path().join("TASKS.md")).unwrap();
        assert!(content.contains("Visible"));
        Ok(())
    }
}
