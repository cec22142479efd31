use crate::render::{BoardView, EditForm, RowAction, RowView, TaskRow};

/// Inner HTML for the three list containers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListsHtml {
    pub current: String,
    pub other: String,
    pub completed: String,
}

pub fn render_lists(view: &BoardView) -> ListsHtml {
    ListsHtml {
        current: render_rows(&view.current),
        other: render_rows(&view.other),
        completed: render_rows(&view.completed),
    }
}

pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn render_rows(rows: &[RowView]) -> String {
    let mut html = String::new();
    for row in rows {
        let handle = row.handle();
        html.push_str(&format!(
            "<li data-index=\"{}\" data-revision=\"{}\" draggable=\"true\">",
            handle.index, handle.revision
        ));
        match row {
            RowView::Display(row) => display_row(&mut html, row),
            RowView::Editing(form) => edit_row(&mut html, form),
        }
        html.push_str("</li>");
    }
    html
}

fn display_row(html: &mut String, row: &TaskRow) {
    let checked = if row.completed { " checked" } else { "" };
    let note = row
        .completed_note
        .as_deref()
        .map(|note| format!(" <span class=\"completed-date\">{}</span>", escape(note)))
        .unwrap_or_default();
    let badge_class = row
        .urgency
        .map(|urgency| format!("due-date {}", urgency.css_class()))
        .unwrap_or_else(|| "due-date".to_string());

    html.push_str(&format!(
        "<div class=\"task-info\"><input type=\"checkbox\" data-action=\"toggle\"{checked}>\
         <label>{} <span class=\"category\">Category: {}{note}</span></label></div>\
         <span class=\"{badge_class}\">Due: {}</span>",
        escape(&row.name),
        escape(&row.category),
        escape(&row.due_date),
    ));
    for action in &row.actions {
        html.push_str(&format!(
            "<button data-action=\"{}\">{}</button>",
            action_name(*action),
            action.label()
        ));
    }
}

fn edit_row(html: &mut String, form: &EditForm) {
    html.push_str(&format!(
        "<div class=\"task-info\"><input type=\"text\" name=\"name\" value=\"{}\">\
         <input type=\"date\" name=\"dueDate\" value=\"{}\"><select name=\"category\">",
        escape(&form.name),
        escape(&form.due_date),
    ));
    for option in &form.categories {
        let selected = if option.selected { " selected" } else { "" };
        let label = escape(&option.label);
        html.push_str(&format!("<option value=\"{label}\"{selected}>{label}</option>"));
    }
    html.push_str(
        "</select></div><button data-action=\"save\">Save</button>\
         <button data-action=\"cancel\">Cancel</button>",
    );
}

fn action_name(action: RowAction) -> &'static str {
    match action {
        RowAction::Remove => "remove",
        RowAction::Edit => "edit",
        RowAction::MoveToOther => "move-to-other",
        RowAction::MoveToCurrent => "move-to-current",
    }
}

#[cfg(test)]
mod tests {
    use super::{escape, render_lists};
    use crate::model::Task;
    use crate::render::render_board;
    use crate::task_store::TaskStore;
    use time::macros::date;

    fn categories() -> Vec<String> {
        vec!["Work".into(), "Personal".into(), "Other".into()]
    }

    #[test]
    fn escapes_markup_in_task_text() {
        assert_eq!(escape("<b>\"x\" & 'y'</b>"), "&lt;b&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/b&gt;");

        let mut store = TaskStore::new();
        store.add("<script>", "2024-06-20", "Work").unwrap();
        let html = render_lists(&render_board(&store, date!(2024 - 06 - 15), &categories()));

        assert!(html.other.contains("&lt;script&gt;"));
        assert!(!html.other.contains("<script>"));
    }

    #[test]
    fn rows_carry_handle_badge_and_buttons() {
        let store = TaskStore::from_tasks(vec![Task {
            name: "ship".into(),
            due_date: "2024-06-15".into(),
            category: "Work".into(),
            completed: true,
            is_current: true,
            completed_date: Some("2024-06-15".into()),
        }]);

        let html = render_lists(&render_board(&store, date!(2024 - 06 - 15), &categories()));

        assert!(html.current.is_empty());
        assert!(html.other.is_empty());
        assert!(html.completed.contains("data-index=\"0\""));
        assert!(html.completed.contains(" checked"));
        assert!(html.completed.contains("class=\"due-date red\""));
        assert!(html.completed.contains("(Completed on 2024-06-15)"));
        assert!(html.completed.contains("data-action=\"move-to-other\""));
    }

    #[test]
    fn edit_row_selects_task_category() {
        let mut store = TaskStore::new();
        store.add("plan", "2024-06-20", "Personal").unwrap();
        store.begin_edit(0).unwrap();

        let html = render_lists(&render_board(&store, date!(2024 - 06 - 15), &categories()));

        assert!(html.other.contains("<option value=\"Personal\" selected>Personal</option>"));
        assert!(html.other.contains("<option value=\"Work\">Work</option>"));
        assert!(html.other.contains("data-action=\"save\""));
    }
}
