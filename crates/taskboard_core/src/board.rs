use crate::dates::Clock;
use crate::drag::{DragController, DropIndicator, DropOutcome};
use crate::error::AppError;
use crate::html::{ListsHtml, render_lists};
use crate::model::Task;
use crate::notes::NotesEditor;
use crate::render::{BoardView, render_board};
use crate::storage::{Backend, SaveAck};
use crate::task_store::{RowHandle, TaskStore};
use time::Date;
use tracing::{debug, error, info};

/// Result of the most recent best-effort save. Failures are recorded and
/// logged, never rolled back.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Saved(SaveAck),
    Failed(AppError),
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved(_))
    }
}

/// One open task board: the task list, the notes page and the backend they
/// are persisted to.
pub struct Board {
    store: TaskStore,
    drag: DragController,
    notes: NotesEditor,
    categories: Vec<String>,
    backend: Box<dyn Backend>,
    clock: Box<dyn Clock>,
    tasks_loaded: bool,
    last_task_save: Option<SaveOutcome>,
    last_notes_save: Option<SaveOutcome>,
}

impl Board {
    fn new(backend: Box<dyn Backend>, clock: Box<dyn Clock>, categories: Vec<String>) -> Self {
        Self {
            store: TaskStore::new(),
            drag: DragController::new(),
            notes: NotesEditor::new(),
            categories,
            backend,
            clock,
            tasks_loaded: false,
            last_task_save: None,
            last_notes_save: None,
        }
    }

    /// Builds a board and performs the two initial fetches. Either may fail
    /// independently; a failure is logged and leaves that part empty. Task
    /// saves stay disabled until the task fetch has succeeded, so a failed
    /// load never overwrites the stored list.
    pub fn open(backend: Box<dyn Backend>, clock: Box<dyn Clock>, categories: Vec<String>) -> Self {
        let mut board = Self::new(backend, clock, categories);

        match board.backend.fetch_tasks() {
            Ok(tasks) => {
                debug!(count = tasks.len(), "tasks fetched");
                board.store.replace_all(tasks);
                board.tasks_loaded = true;
            }
            Err(err) => error!(error = %err, "error fetching tasks"),
        }

        match board.backend.fetch_notes() {
            Ok(text) => board.notes.load(text),
            Err(err) => error!(error = %err, "error fetching notes"),
        }

        board
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn notes(&self) -> &NotesEditor {
        &self.notes
    }

    pub fn today(&self) -> Date {
        self.clock.today()
    }

    pub fn last_task_save(&self) -> Option<&SaveOutcome> {
        self.last_task_save.as_ref()
    }

    pub fn last_notes_save(&self) -> Option<&SaveOutcome> {
        self.last_notes_save.as_ref()
    }

    pub fn render(&self) -> BoardView {
        render_board(&self.store, self.today(), &self.categories)
    }

    pub fn render_html(&self) -> ListsHtml {
        render_lists(&self.render())
    }

    /// Adds a task; a missing or blank category falls back to the first
    /// offered one.
    pub fn add_task(
        &mut self,
        name: &str,
        due_date: &str,
        category: Option<&str>,
    ) -> Result<Task, AppError> {
        info!("add task");
        let category = match category.map(str::trim) {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => self.categories.first().cloned().unwrap_or_default(),
        };
        let task = self.store.add(name, due_date, &category)?.clone();
        self.persist_tasks();
        Ok(task)
    }

    pub fn toggle_complete(&mut self, index: usize) -> Result<Task, AppError> {
        info!(index, "toggle task");
        let today = self.today();
        let task = self.store.toggle_complete(index, today)?.clone();
        self.persist_tasks();
        Ok(task)
    }

    /// Current/other placement is session state: it is not saved here, but
    /// rides along with the next full save.
    pub fn set_current(&mut self, index: usize, current: bool) -> Result<Task, AppError> {
        info!(index, current, "set placement");
        Ok(self.store.set_current(index, current)?.clone())
    }

    pub fn begin_edit(&mut self, index: usize) -> Result<(), AppError> {
        self.store.begin_edit(index)
    }

    pub fn cancel_edit(&mut self) {
        self.store.cancel_edit();
    }

    pub fn save_edit(
        &mut self,
        index: usize,
        name: &str,
        due_date: &str,
        category: &str,
    ) -> Result<Task, AppError> {
        info!(index, "edit task");
        let task = self.store.edit(index, name, due_date, category)?.clone();
        self.persist_tasks();
        Ok(task)
    }

    pub fn remove(&mut self, index: usize) -> Result<Task, AppError> {
        info!(index, "remove task");
        let removed = self.store.remove(index)?;
        self.persist_tasks();
        Ok(removed)
    }

    pub fn start_drag(&mut self, handle: RowHandle) -> Result<(), AppError> {
        self.drag.start(&self.store, handle)
    }

    pub fn drag_over(&self, handle: RowHandle) -> Option<DropIndicator> {
        self.drag.over(&self.store, handle)
    }

    pub fn end_drag(&mut self) {
        self.drag.end();
    }

    pub fn drop_on(&mut self, handle: RowHandle) -> Result<DropOutcome, AppError> {
        let outcome = self.drag.drop_on(&mut self.store, handle)?;
        if let DropOutcome::Moved { .. } = outcome {
            self.persist_tasks();
        }
        Ok(outcome)
    }

    /// A whole drag gesture from row `from` onto row `to`.
    pub fn move_task(&mut self, from: usize, to: usize) -> Result<DropOutcome, AppError> {
        info!(from, to, "move task");
        self.start_drag(self.store.handle(from))?;
        let target = self.store.handle(to);
        if self.drag_over(target) == Some(DropIndicator::Invalid) {
            debug!(from, to, "drop target in another list");
        }
        self.drop_on(target)
    }

    pub fn notes_html(&self) -> Option<String> {
        self.notes.view_html()
    }

    /// Switches notes to editing, starting from the backend's copy when it
    /// can be fetched.
    pub fn begin_notes_edit(&mut self) -> &str {
        let text = match self.backend.fetch_notes() {
            Ok(text) => text,
            Err(err) => {
                error!(error = %err, "error fetching notes");
                self.notes.source().to_string()
            }
        };
        self.notes.begin_edit(text);
        self.notes.buffer()
    }

    pub fn notes_input(&mut self, text: &str) {
        if let Some(text) = self.notes.input(text) {
            self.persist_notes(&text);
        }
    }

    /// Leaves notes editing with one last save and returns the re-rendered
    /// view.
    pub fn finish_notes_edit(&mut self) -> String {
        if let Some(text) = self.notes.finish() {
            self.persist_notes(&text);
        }
        self.notes.view_html().unwrap_or_default()
    }

    fn persist_tasks(&mut self) {
        if !self.tasks_loaded {
            let err = AppError::invalid_data("tasks were never loaded; not overwriting the stored list");
            error!(error = %err, "error saving tasks");
            self.last_task_save = Some(SaveOutcome::Failed(err));
            return;
        }

        let outcome = match self.backend.save_tasks(self.store.tasks()) {
            Ok(ack) => {
                debug!(ack = %ack.0, "tasks saved");
                SaveOutcome::Saved(ack)
            }
            Err(err) => {
                error!(error = %err, "error saving tasks");
                SaveOutcome::Failed(err)
            }
        };
        self.last_task_save = Some(outcome);
    }

    fn persist_notes(&mut self, text: &str) {
        let outcome = match self.backend.save_notes(text) {
            Ok(ack) => {
                debug!(ack = %ack.0, "notes saved");
                SaveOutcome::Saved(ack)
            }
            Err(err) => {
                error!(error = %err, "error saving notes");
                SaveOutcome::Failed(err)
            }
        };
        self.last_notes_save = Some(outcome);
    }
}
