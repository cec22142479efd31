use tabled::settings::Style;
use tabled::{Table, Tabled};
use taskboard_core::config::Palette;
use taskboard_core::html::ListsHtml;
use taskboard_core::model::{Bucket, Task};
use taskboard_core::render::{BoardView, EditForm, RowView, TaskRow};

#[derive(Tabled)]
struct TaskLine {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Done")]
    done: &'static str,
    #[tabled(rename = "Task")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Due")]
    due: String,
}

const BUCKETS: [(Bucket, &str); 3] = [
    (Bucket::Current, "Current tasks"),
    (Bucket::Other, "Other tasks"),
    (Bucket::Completed, "Completed tasks"),
];

pub fn board_plain(view: &BoardView, palette: &Palette) -> String {
    let mut sections = Vec::new();
    for (bucket, title) in BUCKETS {
        let rows = view.bucket(bucket);
        if rows.is_empty() {
            sections.push(format!("{title}\n{}", palette.mutedize("  (none)")));
            continue;
        }
        let lines: Vec<TaskLine> = rows.iter().map(|row| line(row, palette)).collect();
        let table = Table::new(lines).with(Style::rounded()).to_string();
        sections.push(format!("{title}\n{table}"));
    }
    sections.push(palette.mutedize(&view.show_completed.label));
    sections.join("\n\n")
}

fn line(row: &RowView, palette: &Palette) -> TaskLine {
    match row {
        RowView::Display(row) => display_line(row, palette),
        RowView::Editing(form) => editing_line(form),
    }
}

fn display_line(row: &TaskRow, palette: &Palette) -> TaskLine {
    let category = match row.completed_note.as_deref() {
        Some(note) => format!("{} {}", row.category, note),
        None => row.category.clone(),
    };
    TaskLine {
        index: row.handle.index,
        done: if row.completed { "[x]" } else { "[ ]" },
        name: row.name.clone(),
        category,
        due: palette.urgency(row.urgency, &row.due_date),
    }
}

fn editing_line(form: &EditForm) -> TaskLine {
    let category = form
        .categories
        .iter()
        .find(|option| option.selected)
        .map(|option| option.label.clone())
        .unwrap_or_default();
    TaskLine {
        index: form.handle.index,
        done: "...",
        name: format!("{} (editing)", form.name),
        category,
        due: form.due_date.clone(),
    }
}

pub fn board_json(view: &BoardView) -> serde_json::Value {
    let bucket_json = |bucket: Bucket| -> serde_json::Value {
        view.bucket(bucket)
            .iter()
            .map(|row| match row {
                RowView::Display(row) => serde_json::json!({
                    "index": row.handle.index,
                    "name": row.name,
                    "category": row.category,
                    "completed": row.completed,
                    "completedNote": row.completed_note,
                    "dueDate": row.due_date,
                    "urgency": row.urgency.map(|urgency| urgency.css_class()),
                    "actions": row.actions,
                }),
                RowView::Editing(form) => serde_json::json!({
                    "index": form.handle.index,
                    "editing": true,
                    "name": form.name,
                    "dueDate": form.due_date,
                    "categories": form
                        .categories
                        .iter()
                        .map(|option| option.label.as_str())
                        .collect::<Vec<_>>(),
                }),
            })
            .collect()
    };

    serde_json::json!({
        "current": bucket_json(Bucket::Current),
        "other": bucket_json(Bucket::Other),
        "completed": bucket_json(Bucket::Completed),
        "showCompleted": {
            "enabled": view.show_completed.enabled,
            "label": view.show_completed.label,
        },
    })
}

pub fn page_html(lists: &ListsHtml) -> String {
    format!(
        "<ul id=\"current-tasks-list\">{}</ul>\n<ul id=\"other-tasks-list\">{}</ul>\n<ul id=\"completed-tasks-list\">{}</ul>",
        lists.current, lists.other, lists.completed
    )
}

pub fn task_json(index: Option<usize>, task: &Task) -> serde_json::Value {
    let mut value = serde_json::to_value(task).unwrap_or(serde_json::Value::Null);
    if let (Some(index), Some(object)) = (index, value.as_object_mut()) {
        object.insert("index".to_string(), serde_json::json!(index));
    }
    value
}

#[cfg(test)]
mod tests {
    use super::{board_json, board_plain, page_html};
    use taskboard_core::config::palette_for_theme;
    use taskboard_core::html::render_lists;
    use taskboard_core::model::Task;
    use taskboard_core::render::render_board;
    use taskboard_core::task_store::TaskStore;
    use time::macros::date;

    fn store() -> TaskStore {
        let mut done = Task::new("filed".into(), "2024-06-10".into(), "Work".into());
        done.completed = true;
        done.completed_date = Some("2024-06-12".into());
        let mut current = Task::new("draft".into(), "2024-06-16".into(), "Personal".into());
        current.is_current = true;
        TaskStore::from_tasks(vec![done, current])
    }

    fn categories() -> Vec<String> {
        vec!["Work".into(), "Personal".into()]
    }

    #[test]
    fn plain_board_lists_each_bucket() {
        let view = render_board(&store(), date!(2024 - 06 - 15), &categories());
        let text = board_plain(&view, &palette_for_theme(None));

        assert!(text.contains("Current tasks"));
        assert!(text.contains("draft"));
        assert!(text.contains("Other tasks\n  (none)"));
        assert!(text.contains("(Completed on 2024-06-12)"));
        assert!(text.contains("Show completed (1)"));
    }

    #[test]
    fn json_board_exposes_urgency_classes() {
        let view = render_board(&store(), date!(2024 - 06 - 15), &categories());
        let json = board_json(&view);

        assert_eq!(json["current"][0]["urgency"], "yellow");
        assert_eq!(json["completed"][0]["index"], 0);
        assert_eq!(json["other"].as_array().unwrap().len(), 0);
        assert_eq!(json["showCompleted"]["enabled"], true);
    }

    #[test]
    fn page_wraps_lists_in_containers() {
        let view = render_board(&store(), date!(2024 - 06 - 15), &categories());
        let html = page_html(&render_lists(&view));

        assert!(html.starts_with("<ul id=\"current-tasks-list\"><li"));
        assert!(html.contains("<ul id=\"other-tasks-list\"></ul>"));
    }
}
