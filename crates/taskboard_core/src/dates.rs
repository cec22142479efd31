use crate::error::AppError;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime, UtcOffset};

const ISO_DATE: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

pub fn parse_iso_date(value: &str) -> Result<Date, AppError> {
    Date::parse(value.trim(), ISO_DATE)
        .map_err(|_| AppError::invalid_input(format!("'{}' is not a YYYY-MM-DD date", value.trim())))
}

pub fn format_iso_date(date: Date) -> Result<String, AppError> {
    date.format(ISO_DATE)
        .map_err(|err| AppError::invalid_data(err.to_string()))
}

fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

/// Source of "today" at local-date granularity.
pub trait Clock {
    fn today(&self) -> Date;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> Date {
        OffsetDateTime::now_utc().to_offset(local_offset()).date()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Date);

impl Clock for FixedClock {
    fn today(&self) -> Date {
        self.0
    }
}
