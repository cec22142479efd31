use crate::dates::parse_iso_date;
use serde::Serialize;
use time::Date;

/// Due-date severity used purely for styling.
///
/// Overdue and due today are both `Urgent`, due tomorrow is `Soon`,
/// anything later is `Later`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Urgent,
    Soon,
    Later,
}

impl Urgency {
    pub fn classify(due: Date, today: Date) -> Self {
        let days = (due - today).whole_days();
        match days {
            d if d <= 0 => Self::Urgent,
            1 => Self::Soon,
            _ => Self::Later,
        }
    }

    /// Classifies a stored due date; `None` when it is not a valid date.
    pub fn for_due_date(due_date: &str, today: Date) -> Option<Self> {
        parse_iso_date(due_date)
            .ok()
            .map(|due| Self::classify(due, today))
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Self::Urgent => "red",
            Self::Soon => "yellow",
            Self::Later => "green",
        }
    }
}
