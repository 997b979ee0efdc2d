//! Corrupt, legacy, and aged documents must never take the process down:
//! the stores recover to something usable and keep going.

use std::fs;

use sidetrack::cli::{open_coordinator, open_repository};
use sidetrack::config::Config;
use sidetrack::task::TaskStatus;

use tempfile::tempdir;

#[test]
fn corrupt_task_document_recovers_as_empty() {
    let temp = tempdir().unwrap();
    let config = Config::default();

    fs::write(temp.path().join("tasks.json"), "{{{ definitely not json").unwrap();

    let repo = open_repository(temp.path(), &config);
    assert!(repo.list().unwrap().is_empty());

    // And the store is writable again afterwards
    let id = repo.create("Recovered").unwrap();
    assert_eq!(repo.get(&id).unwrap().description, "Recovered");
}

#[test]
fn corrupt_focus_document_recovers_as_clean_slate() {
    let temp = tempdir().unwrap();
    let config = Config::default();

    fs::write(temp.path().join("focus.json"), "[1, 2, 3]").unwrap();

    let mut coordinator = open_coordinator(temp.path(), &config);
    assert!(coordinator.current_task().is_none());

    coordinator.start_task("Back in business").unwrap();
    assert!(coordinator.current_task().is_some());
}

#[test]
fn legacy_bare_id_focus_document_upgrades_on_load() {
    let temp = tempdir().unwrap();
    let config = Config::default();

    fs::write(
        temp.path().join("focus.json"),
        r#"{
  "current_task": "20240101T090000_Legacy",
  "interrupted_tasks": [],
  "last_updated": "2024-01-01T09:00:00+08:00"
}"#,
    )
    .unwrap();

    let mut coordinator = open_coordinator(temp.path(), &config);
    assert_eq!(
        coordinator.current_task().unwrap().task_id,
        "20240101T090000_Legacy"
    );

    // The next write emits the full record shape
    coordinator.interrupt().unwrap();
    let on_disk = fs::read_to_string(temp.path().join("focus.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&on_disk).unwrap();
    assert!(value["current_task"].is_null());
    assert_eq!(
        value["interrupted_tasks"][0]["task_id"],
        "20240101T090000_Legacy"
    );
    assert_eq!(value["interrupted_tasks"][0]["status"], "interrupted");
}

#[test]
fn retention_prunes_old_completed_tasks_on_read() {
    let temp = tempdir().unwrap();
    let mut config = Config::default();
    config.retention_days = 7;

    let repo = open_repository(temp.path(), &config);
    let keep_id = repo.create("Still open").unwrap();
    let old_id = repo.create("Long done").unwrap();
    repo.add_todo(&old_id, "todo").unwrap();
    repo.mark_done(&old_id, 0).unwrap();

    // Age the completed task past the horizon by editing the document
    let doc_path = temp.path().join("tasks.json");
    let content = fs::read_to_string(&doc_path).unwrap();
    let mut value: serde_json::Value = serde_json::from_str(&content).unwrap();
    for task in value["tasks"].as_array_mut().unwrap() {
        if task["id"] == old_id.as_str() {
            task["updated"] = serde_json::Value::from("2020-01-01T00:00:00+00:00");
        }
    }
    fs::write(&doc_path, serde_json::to_string_pretty(&value).unwrap()).unwrap();

    let tasks = repo.list().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, keep_id);
    assert_eq!(tasks[0].status, TaskStatus::InProgress);

    // The prune was persisted, not just filtered
    let on_disk = fs::read_to_string(&doc_path).unwrap();
    assert!(!on_disk.contains("Long done"));
}

#[test]
fn backup_file_keeps_the_previous_document() {
    let temp = tempdir().unwrap();
    let config = Config::default();

    let repo = open_repository(temp.path(), &config);
    repo.create("First").unwrap();
    repo.create("Second").unwrap();

    let backup = fs::read_to_string(temp.path().join("tasks.json.bak")).unwrap();
    assert!(backup.contains("First"));
    assert!(!backup.contains("Second"));
}
