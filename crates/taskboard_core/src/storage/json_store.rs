use super::{Backend, SaveAck};
use crate::dates::{Clock, SystemClock, format_iso_date};
use crate::error::AppError;
use crate::model::Task;
use std::path::{Path, PathBuf};

const TASKS_FILE_NAME: &str = "tasks.json";
const NOTES_FILE_NAME: &str = "notes.md";

/// Local stand-in for the storage service: a bare JSON array of tasks and
/// a markdown file in one data directory.
pub struct JsonFileBackend {
    dir: PathBuf,
    clock: Box<dyn Clock>,
}

impl JsonFileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_clock(dir, Box::new(SystemClock))
    }

    pub fn with_clock(dir: impl Into<PathBuf>, clock: Box<dyn Clock>) -> Self {
        Self {
            dir: dir.into(),
            clock,
        }
    }

    pub fn tasks_path(&self) -> PathBuf {
        self.dir.join(TASKS_FILE_NAME)
    }

    pub fn notes_path(&self) -> PathBuf {
        self.dir.join(NOTES_FILE_NAME)
    }
}

impl Backend for JsonFileBackend {
    fn fetch_tasks(&self) -> Result<Vec<Task>, AppError> {
        load_tasks(&self.tasks_path())
    }

    fn save_tasks(&self, tasks: &[Task]) -> Result<SaveAck, AppError> {
        let today = format_iso_date(self.clock.today())?;
        let normalized: Vec<Task> = tasks
            .iter()
            .cloned()
            .map(|task| normalize_completion(task, &today))
            .collect();
        save_tasks(&self.tasks_path(), &normalized)?;
        Ok(SaveAck::success())
    }

    fn fetch_notes(&self) -> Result<String, AppError> {
        load_notes(&self.notes_path())
    }

    fn save_notes(&self, notes: &str) -> Result<SaveAck, AppError> {
        if !notes.trim().is_empty() {
            write_private(&self.notes_path(), notes)?;
        }
        Ok(SaveAck::success())
    }
}

/// Completed tasks always carry a completion date and open tasks never do.
fn normalize_completion(mut task: Task, today: &str) -> Task {
    if !task.completed {
        task.completed_date = None;
    } else if task.completed_date.as_deref().is_none_or(str::is_empty) {
        task.completed_date = Some(today.to_string());
    }
    task
}

pub fn load_tasks(path: &Path) -> Result<Vec<Task>, AppError> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(path).map_err(|err| AppError::io(err.to_string()))?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&content).map_err(|err| AppError::invalid_data(err.to_string()))
}

pub fn save_tasks(path: &Path, tasks: &[Task]) -> Result<(), AppError> {
    let content =
        serde_json::to_string_pretty(tasks).map_err(|err| AppError::invalid_data(err.to_string()))?;
    write_private(path, &content)
}

pub fn load_notes(path: &Path) -> Result<String, AppError> {
    if !path.exists() {
        return Ok(String::new());
    }

    let content = std::fs::read_to_string(path).map_err(|err| AppError::io(err.to_string()))?;
    if content.trim().is_empty() {
        Ok(String::new())
    } else {
        Ok(content)
    }
}

fn write_private(path: &Path, content: &str) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|err| AppError::io(err.to_string()))?;
    }

    std::fs::write(path, content).map_err(|err| AppError::io(err.to_string()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, permissions).map_err(|err| AppError::io(err.to_string()))?;
    }

    Ok(())
}
