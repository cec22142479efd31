use crate::dates::{format_iso_date, parse_iso_date};
use crate::error::AppError;
use crate::model::{Bucket, Task};
use time::Date;

const MISSING_FIELDS: &str = "please fill in both the task name and due date";

/// Row identity captured at render time. Task identity is positional, so a
/// handle only stays valid until the next mutation of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowHandle {
    pub index: usize,
    pub revision: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reorder {
    Moved { from: usize, to: usize },
    Rejected,
}

/// The ordered task collection plus the single in-place editing slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStore {
    tasks: Vec<Task>,
    editing: Option<usize>,
    revision: u64,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            editing: None,
            revision: 0,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn editing_index(&self) -> Option<usize> {
        self.editing
    }

    pub fn get(&self, index: usize) -> Result<&Task, AppError> {
        self.tasks
            .get(index)
            .ok_or_else(|| AppError::invalid_input(format!("no task at index {index}")))
    }

    pub fn bucket_of(&self, index: usize) -> Result<Bucket, AppError> {
        Ok(self.get(index)?.bucket())
    }

    pub fn handle(&self, index: usize) -> RowHandle {
        RowHandle {
            index,
            revision: self.revision,
        }
    }

    pub fn resolve(&self, handle: RowHandle) -> Result<usize, AppError> {
        if handle.revision != self.revision {
            return Err(AppError::invalid_input(
                "task list changed since it was rendered",
            ));
        }
        self.get(handle.index)?;
        Ok(handle.index)
    }

    /// Swaps in a freshly fetched collection, dropping any in-place edit.
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.editing = None;
        self.touch();
    }

    pub fn add(&mut self, name: &str, due_date: &str, category: &str) -> Result<&Task, AppError> {
        let (name, due_date) = validated_fields(name, due_date)?;
        self.tasks
            .push(Task::new(name, due_date, category.trim().to_string()));
        self.touch();
        let index = self.tasks.len() - 1;
        Ok(&self.tasks[index])
    }

    pub fn toggle_complete(&mut self, index: usize, today: Date) -> Result<&Task, AppError> {
        let stamp = format_iso_date(today)?;
        let task = self.task_mut(index)?;
        task.completed = !task.completed;
        task.completed_date = if task.completed { Some(stamp) } else { None };
        self.touch();
        Ok(&self.tasks[index])
    }

    pub fn set_current(&mut self, index: usize, current: bool) -> Result<&Task, AppError> {
        self.task_mut(index)?.is_current = current;
        self.touch();
        Ok(&self.tasks[index])
    }

    pub fn begin_edit(&mut self, index: usize) -> Result<(), AppError> {
        self.get(index)?;
        self.editing = Some(index);
        self.touch();
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        if self.editing.take().is_some() {
            self.touch();
        }
    }

    /// Overwrites name, due date and category in place and leaves editing
    /// mode. Completion and placement flags are untouched.
    pub fn edit(
        &mut self,
        index: usize,
        name: &str,
        due_date: &str,
        category: &str,
    ) -> Result<&Task, AppError> {
        self.get(index)?;
        let (name, due_date) = validated_fields(name, due_date)?;
        let task = self.task_mut(index)?;
        task.name = name;
        task.due_date = due_date;
        task.category = category.trim().to_string();
        self.editing = None;
        self.touch();
        Ok(&self.tasks[index])
    }

    pub fn remove(&mut self, index: usize) -> Result<Task, AppError> {
        self.get(index)?;
        let removed = self.tasks.remove(index);
        self.editing = match self.editing {
            Some(editing) if editing == index => None,
            Some(editing) if editing > index => Some(editing - 1),
            other => other,
        };
        self.touch();
        Ok(removed)
    }

    /// Moves the task at `from` so that it ends up at position `to`.
    /// Moves that would change the task's bucket are rejected untouched.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<Reorder, AppError> {
        let source = self.bucket_of(from)?;
        let target = self.bucket_of(to)?;
        if source != target {
            return Ok(Reorder::Rejected);
        }

        let task = self.tasks.remove(from);
        self.tasks.insert(to, task);
        self.editing = self
            .editing
            .map(|editing| position_after_move(editing, from, to));
        self.touch();
        Ok(Reorder::Moved { from, to })
    }

    fn task_mut(&mut self, index: usize) -> Result<&mut Task, AppError> {
        self.tasks
            .get_mut(index)
            .ok_or_else(|| AppError::invalid_input(format!("no task at index {index}")))
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

fn validated_fields(name: &str, due_date: &str) -> Result<(String, String), AppError> {
    let name = name.trim();
    let due_date = due_date.trim();
    if name.is_empty() || due_date.is_empty() {
        return Err(AppError::invalid_input(MISSING_FIELDS));
    }

    let due = parse_iso_date(due_date)?;
    Ok((name.to_string(), format_iso_date(due)?))
}

fn position_after_move(index: usize, from: usize, to: usize) -> usize {
    if index == from {
        return to;
    }
    let mut position = index;
    if from < position {
        position -= 1;
    }
    if to <= position {
        position += 1;
    }
    position
}

#[cfg(test)]
mod tests {
    use super::{Reorder, TaskStore};
    use crate::model::{Bucket, Task};
    use time::macros::date;

    fn task(name: &str, current: bool) -> Task {
        Task {
            name: name.to_string(),
            due_date: "2024-06-20".to_string(),
            category: "Work".to_string(),
            completed: false,
            is_current: current,
            completed_date: None,
        }
    }

    fn names(store: &TaskStore) -> Vec<&str> {
        store.tasks().iter().map(|task| task.name.as_str()).collect()
    }

    #[test]
    fn add_appends_pending_task() {
        let mut store = TaskStore::from_tasks(vec![task("a", false)]);
        let added = store.add("  write report ", "2024-06-20", "Work").unwrap();

        assert_eq!(added.name, "write report");
        assert!(!added.completed);
        assert!(!added.is_current);
        assert_eq!(added.completed_date, None);
        assert_eq!(store.len(), 2);
        assert_eq!(store.tasks()[1].name, "write report");
    }

    #[test]
    fn add_rejects_missing_fields_without_mutation() {
        let mut store = TaskStore::from_tasks(vec![task("a", false)]);
        let before = store.clone();

        let err = store.add("", "2024-06-20", "Work").unwrap_err();
        assert_eq!(err.code(), "invalid_input");
        let err = store.add("Task", "", "Work").unwrap_err();
        assert_eq!(err.code(), "invalid_input");
        let err = store.add("   ", "2024-06-20", "Work").unwrap_err();
        assert_eq!(err.code(), "invalid_input");

        assert_eq!(store, before);
    }

    #[test]
    fn add_rejects_malformed_due_date() {
        let mut store = TaskStore::new();
        let err = store.add("Task", "next week", "Work").unwrap_err();

        assert_eq!(err.code(), "invalid_input");
        assert!(store.is_empty());
    }

    #[test]
    fn toggle_complete_stamps_and_clears_date() {
        let mut store = TaskStore::from_tasks(vec![task("a", true)]);

        let done = store.toggle_complete(0, date!(2024 - 06 - 15)).unwrap();
        assert!(done.completed);
        assert_eq!(done.completed_date.as_deref(), Some("2024-06-15"));
        assert_eq!(store.bucket_of(0).unwrap(), Bucket::Completed);

        let undone = store.toggle_complete(0, date!(2024 - 06 - 16)).unwrap();
        assert!(!undone.completed);
        assert_eq!(undone.completed_date, None);
        assert_eq!(store.tasks()[0], task("a", true));
    }

    #[test]
    fn set_current_moves_between_buckets() {
        let mut store = TaskStore::from_tasks(vec![task("a", false)]);
        store.set_current(0, true).unwrap();
        assert_eq!(store.bucket_of(0).unwrap(), Bucket::Current);
        store.set_current(0, false).unwrap();
        assert_eq!(store.bucket_of(0).unwrap(), Bucket::Other);
    }

    #[test]
    fn edit_overwrites_fields_and_leaves_editing_mode() {
        let mut store = TaskStore::from_tasks(vec![task("a", true)]);
        store.begin_edit(0).unwrap();
        assert_eq!(store.editing_index(), Some(0));

        let edited = store.edit(0, "renamed", "2024-07-01", "Personal").unwrap();
        assert_eq!(edited.name, "renamed");
        assert_eq!(edited.due_date, "2024-07-01");
        assert_eq!(edited.category, "Personal");
        assert!(edited.is_current);
        assert_eq!(store.editing_index(), None);
    }

    #[test]
    fn edit_rejects_blank_fields_and_keeps_editing() {
        let mut store = TaskStore::from_tasks(vec![task("a", false)]);
        store.begin_edit(0).unwrap();

        let err = store.edit(0, "renamed", " ", "Work").unwrap_err();

        assert_eq!(err.code(), "invalid_input");
        assert_eq!(store.tasks()[0], task("a", false));
        assert_eq!(store.editing_index(), Some(0));
    }

    #[test]
    fn edit_rejects_unknown_index() {
        let mut store = TaskStore::new();
        let err = store.edit(3, "x", "2024-06-20", "Work").unwrap_err();
        assert_eq!(err.code(), "invalid_input");
    }

    #[test]
    fn remove_shifts_following_tasks_down() {
        let mut store =
            TaskStore::from_tasks(vec![task("a", false), task("b", false), task("c", false)]);

        let removed = store.remove(1).unwrap();

        assert_eq!(removed.name, "b");
        assert_eq!(names(&store), vec!["a", "c"]);
    }

    #[test]
    fn remove_adjusts_editing_index() {
        let mut store =
            TaskStore::from_tasks(vec![task("a", false), task("b", false), task("c", false)]);
        store.begin_edit(2).unwrap();
        store.remove(0).unwrap();
        assert_eq!(store.editing_index(), Some(1));

        store.remove(1).unwrap();
        assert_eq!(store.editing_index(), None);
    }

    #[test]
    fn reorder_moves_rather_than_swaps() {
        let mut store = TaskStore::from_tasks(vec![
            task("a", false),
            task("b", false),
            task("c", false),
            task("d", false),
        ]);

        assert_eq!(store.reorder(0, 2).unwrap(), Reorder::Moved { from: 0, to: 2 });
        assert_eq!(names(&store), vec!["b", "c", "a", "d"]);

        assert_eq!(store.reorder(3, 0).unwrap(), Reorder::Moved { from: 3, to: 0 });
        assert_eq!(names(&store), vec!["d", "b", "c", "a"]);
    }

    #[test]
    fn reorder_onto_itself_keeps_order() {
        let mut store =
            TaskStore::from_tasks(vec![task("a", false), task("b", false), task("c", false)]);
        store.reorder(1, 1).unwrap();
        assert_eq!(names(&store), vec!["a", "b", "c"]);
    }

    #[test]
    fn reorder_across_buckets_is_rejected_unchanged() {
        let mut store =
            TaskStore::from_tasks(vec![task("a", true), task("b", false), task("c", true)]);
        let before = serde_json::to_string(store.tasks()).unwrap();

        assert_eq!(store.reorder(0, 1).unwrap(), Reorder::Rejected);
        assert_eq!(serde_json::to_string(store.tasks()).unwrap(), before);
    }

    #[test]
    fn reorder_skips_over_other_buckets_in_collection_order() {
        let mut store =
            TaskStore::from_tasks(vec![task("a", true), task("b", false), task("c", true)]);
        store.reorder(2, 0).unwrap();
        assert_eq!(names(&store), vec!["c", "a", "b"]);
    }

    #[test]
    fn reorder_keeps_edited_task_in_edit_mode() {
        let mut store =
            TaskStore::from_tasks(vec![task("a", false), task("b", false), task("c", false)]);
        store.begin_edit(1).unwrap();
        store.reorder(0, 2).unwrap();
        assert_eq!(store.editing_index(), Some(0));
        assert_eq!(store.tasks()[0].name, "b");
    }

    #[test]
    fn stale_handles_do_not_resolve() {
        let mut store = TaskStore::from_tasks(vec![task("a", false), task("b", false)]);
        let handle = store.handle(1);
        assert_eq!(store.resolve(handle).unwrap(), 1);

        store.remove(0).unwrap();
        let err = store.resolve(handle).unwrap_err();
        assert_eq!(err.code(), "invalid_input");
    }
}
