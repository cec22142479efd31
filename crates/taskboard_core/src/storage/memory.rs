use super::{Backend, SaveAck};
use crate::error::AppError;
use crate::model::Task;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Default)]
struct MemoryState {
    tasks: Vec<Task>,
    notes: String,
    task_saves: Vec<Vec<Task>>,
    notes_saves: Vec<String>,
    fail_fetches: bool,
    fail_saves: bool,
}

/// In-process backend. Clones share the same state, so a caller can keep a
/// handle for inspection after giving one to a `Board`.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(tasks: Vec<Task>, notes: &str) -> Self {
        let backend = Self::new();
        {
            let mut state = backend.state.borrow_mut();
            state.tasks = tasks;
            state.notes = notes.to_string();
        }
        backend
    }

    pub fn set_fail_fetches(&self, fail: bool) {
        self.state.borrow_mut().fail_fetches = fail;
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.state.borrow_mut().fail_saves = fail;
    }

    /// Simulates another writer replacing the stored notes.
    pub fn set_notes(&self, notes: &str) {
        self.state.borrow_mut().notes = notes.to_string();
    }

    pub fn stored_tasks(&self) -> Vec<Task> {
        self.state.borrow().tasks.clone()
    }

    pub fn stored_notes(&self) -> String {
        self.state.borrow().notes.clone()
    }

    pub fn task_saves(&self) -> usize {
        self.state.borrow().task_saves.len()
    }

    pub fn notes_saves(&self) -> Vec<String> {
        self.state.borrow().notes_saves.clone()
    }
}

impl Backend for MemoryBackend {
    fn fetch_tasks(&self) -> Result<Vec<Task>, AppError> {
        let state = self.state.borrow();
        if state.fail_fetches {
            return Err(AppError::network("tasks fetch failed"));
        }
        Ok(state.tasks.clone())
    }

    fn save_tasks(&self, tasks: &[Task]) -> Result<SaveAck, AppError> {
        let mut state = self.state.borrow_mut();
        if state.fail_saves {
            return Err(AppError::network("tasks save failed"));
        }
        state.tasks = tasks.to_vec();
        state.task_saves.push(tasks.to_vec());
        Ok(SaveAck::success())
    }

    fn fetch_notes(&self) -> Result<String, AppError> {
        let state = self.state.borrow();
        if state.fail_fetches {
            return Err(AppError::network("notes fetch failed"));
        }
        Ok(state.notes.clone())
    }

    fn save_notes(&self, notes: &str) -> Result<SaveAck, AppError> {
        let mut state = self.state.borrow_mut();
        if state.fail_saves {
            return Err(AppError::network("notes save failed"));
        }
        state.notes = notes.to_string();
        state.notes_saves.push(notes.to_string());
        Ok(SaveAck::success())
    }
}
