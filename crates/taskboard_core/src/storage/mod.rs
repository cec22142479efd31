//! Whole-resource persistence for the task collection and the notes text.

use crate::error::AppError;
use crate::model::Task;
use serde::{Deserialize, Serialize};

pub mod http;
pub mod json_store;
pub mod memory;

pub use http::HttpBackend;
pub use json_store::JsonFileBackend;
pub use memory::MemoryBackend;

/// Body of a task save: the entire collection.
#[derive(Debug, Serialize)]
pub struct TasksPayload<'a> {
    pub tasks: &'a [Task],
}

/// Body of a notes fetch or save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotesPayload {
    #[serde(default)]
    pub notes: Option<String>,
}

/// Whatever the backend answered to a save; only ever logged.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveAck(pub serde_json::Value);

impl SaveAck {
    pub fn success() -> Self {
        Self(serde_json::json!({ "status": "success" }))
    }
}

/// Read/replace store for the two resources. There is no per-task
/// addressing: every save carries the full value.
pub trait Backend {
    fn fetch_tasks(&self) -> Result<Vec<Task>, AppError>;
    fn save_tasks(&self, tasks: &[Task]) -> Result<SaveAck, AppError>;
    fn fetch_notes(&self) -> Result<String, AppError>;
    fn save_notes(&self, notes: &str) -> Result<SaveAck, AppError>;
}
