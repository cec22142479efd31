use crate::model::{Bucket, Task};
use crate::task_store::{RowHandle, TaskStore};
use crate::urgency::Urgency;
use serde::Serialize;
use time::Date;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowAction {
    Remove,
    Edit,
    MoveToOther,
    MoveToCurrent,
}

impl RowAction {
    pub fn label(self) -> &'static str {
        match self {
            Self::Remove => "Remove",
            Self::Edit => "Edit",
            Self::MoveToOther => "Other",
            Self::MoveToCurrent => "Select",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub handle: RowHandle,
    pub name: String,
    pub category: String,
    pub completed: bool,
    pub completed_note: Option<String>,
    pub due_date: String,
    pub urgency: Option<Urgency>,
    pub actions: Vec<RowAction>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryOption {
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditForm {
    pub handle: RowHandle,
    pub name: String,
    pub due_date: String,
    pub categories: Vec<CategoryOption>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowView {
    Display(TaskRow),
    Editing(EditForm),
}

impl RowView {
    pub fn handle(&self) -> RowHandle {
        match self {
            Self::Display(row) => row.handle,
            Self::Editing(form) => form.handle,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowCompleted {
    pub enabled: bool,
    pub label: String,
}

/// Everything needed to redraw the three lists from scratch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    pub current: Vec<RowView>,
    pub other: Vec<RowView>,
    pub completed: Vec<RowView>,
    pub show_completed: ShowCompleted,
}

impl BoardView {
    pub fn bucket(&self, bucket: Bucket) -> &[RowView] {
        match bucket {
            Bucket::Current => &self.current,
            Bucket::Other => &self.other,
            Bucket::Completed => &self.completed,
        }
    }
}

pub fn render_board(store: &TaskStore, today: Date, categories: &[String]) -> BoardView {
    let mut current = Vec::new();
    let mut other = Vec::new();
    let mut completed = Vec::new();

    for (index, task) in store.tasks().iter().enumerate() {
        let handle = store.handle(index);
        let row = if store.editing_index() == Some(index) {
            RowView::Editing(edit_form(handle, task, categories))
        } else {
            RowView::Display(task_row(handle, task, today))
        };

        match task.bucket() {
            Bucket::Completed => completed.push(row),
            Bucket::Current => current.push(row),
            Bucket::Other => other.push(row),
        }
    }

    let show_completed = show_completed_control(completed.len());
    BoardView {
        current,
        other,
        completed,
        show_completed,
    }
}

fn task_row(handle: RowHandle, task: &Task, today: Date) -> TaskRow {
    let completed_note = match (task.completed, task.completed_date.as_deref()) {
        (true, Some(date)) => Some(format!("(Completed on {date})")),
        _ => None,
    };
    let placement = if task.is_current {
        RowAction::MoveToOther
    } else {
        RowAction::MoveToCurrent
    };

    TaskRow {
        handle,
        name: task.name.clone(),
        category: task.category.clone(),
        completed: task.completed,
        completed_note,
        due_date: task.due_date.clone(),
        urgency: Urgency::for_due_date(&task.due_date, today),
        actions: vec![RowAction::Remove, RowAction::Edit, placement],
    }
}

fn edit_form(handle: RowHandle, task: &Task, categories: &[String]) -> EditForm {
    let mut options: Vec<CategoryOption> = categories
        .iter()
        .map(|label| CategoryOption {
            label: label.clone(),
            selected: *label == task.category,
        })
        .collect();

    if !options.iter().any(|option| option.selected) {
        options.push(CategoryOption {
            label: task.category.clone(),
            selected: true,
        });
    }

    EditForm {
        handle,
        name: task.name.clone(),
        due_date: task.due_date.clone(),
        categories: options,
    }
}

fn show_completed_control(count: usize) -> ShowCompleted {
    if count == 0 {
        ShowCompleted {
            enabled: false,
            label: "No completed tasks".to_string(),
        }
    } else {
        ShowCompleted {
            enabled: true,
            label: format!("Show completed ({count})"),
        }
    }
}
