use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("taskboard-{nanos}-{name}"))
}

fn run(data_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_taskboard"))
        .args(args)
        .env("TASKBOARD_DATA_DIR", data_dir)
        .env("TASKBOARD_CONFIG_PATH", data_dir.join("config.json"))
        .env_remove("TASKBOARD_BACKEND_URL")
        .output()
        .expect("failed to run taskboard")
}

fn stored_tasks(data_dir: &Path) -> serde_json::Value {
    let content = std::fs::read_to_string(data_dir.join("tasks.json")).unwrap();
    serde_json::from_str(&content).unwrap()
}

#[test]
fn add_command_appends_task() {
    let dir = temp_dir("cli-add");
    let output = run(&dir, &["add", "demo task", "2024-06-20", "--category", "Personal"]);
    let stored = stored_tasks(&dir);
    std::fs::remove_dir_all(&dir).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Added task: demo task (#0)"));
    assert_eq!(stored.as_array().unwrap().len(), 1);
    assert_eq!(stored[0]["name"], "demo task");
    assert_eq!(stored[0]["dueDate"], "2024-06-20");
    assert_eq!(stored[0]["category"], "Personal");
    assert_eq!(stored[0]["completed"], false);
    assert_eq!(stored[0]["isCurrent"], false);
    assert!(stored[0]["completedDate"].is_null());
}

#[test]
fn add_command_defaults_category() {
    let dir = temp_dir("cli-add-default");
    let output = run(&dir, &["add", "demo", "2024-06-20"]);
    let stored = stored_tasks(&dir);
    std::fs::remove_dir_all(&dir).ok();

    assert!(output.status.success());
    assert_eq!(stored[0]["category"], "Work");
}

#[test]
fn add_command_uses_category_override() {
    let dir = temp_dir("cli-add-override");
    let output = run(
        &dir,
        &["--config-override", "categories=Home,Errands", "add", "demo", "2024-06-20"],
    );
    let stored = stored_tasks(&dir);
    std::fs::remove_dir_all(&dir).ok();

    assert!(output.status.success());
    assert_eq!(stored[0]["category"], "Home");
}

#[test]
fn add_command_rejects_missing_due_date() {
    let dir = temp_dir("cli-add-missing");
    let output = run(&dir, &["add", "demo"]);
    let exists = dir.join("tasks.json").exists();
    std::fs::remove_dir_all(&dir).ok();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input"));
    assert!(!exists);
}

#[test]
fn add_command_rejects_missing_name() {
    let dir = temp_dir("cli-add-no-name");
    let output = run(&dir, &["add", "", "2024-06-20"]);
    std::fs::remove_dir_all(&dir).ok();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("please fill in both the task name and due date"));
}

#[test]
fn add_command_leaves_unreadable_store_untouched() {
    let dir = temp_dir("cli-add-unreadable");
    std::fs::create_dir_all(&dir).unwrap();
    let seeded = r#"[{"name":"keep","dueDate":"2024-06-20","category":"Work"},{"name":"broken","dueDate":"2024-06-21","category":null}]"#;
    std::fs::write(dir.join("tasks.json"), seeded).unwrap();

    let output = run(&dir, &["add", "new", "2024-06-22"]);
    let stored = std::fs::read_to_string(dir.join("tasks.json")).unwrap();
    std::fs::remove_dir_all(&dir).ok();

    assert!(output.status.success());
    assert_eq!(stored, seeded);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error fetching tasks"));
}
