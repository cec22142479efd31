use serde::{Deserialize, Serialize};

/// One to-do record, exactly as it travels to and from the task resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub name: String,
    pub due_date: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub is_current: bool,
    #[serde(default)]
    pub completed_date: Option<String>,
}

impl Task {
    pub fn new(name: String, due_date: String, category: String) -> Self {
        Self {
            name,
            due_date,
            category,
            completed: false,
            is_current: false,
            completed_date: None,
        }
    }

    pub fn bucket(&self) -> Bucket {
        if self.completed {
            Bucket::Completed
        } else if self.is_current {
            Bucket::Current
        } else {
            Bucket::Other
        }
    }
}

/// Display grouping derived from a task's flags; completion wins over
/// current placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Current,
    Other,
    Completed,
}

impl Bucket {
    pub fn label(self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Other => "other",
            Self::Completed => "completed",
        }
    }
}
