use chrono::NaiveDateTime;
use serde::Serialize;

use crate::{CalendarEvent, CategoryDefinition, EventStore};

const DATE_TIME_FORMAT: &str = "%A, %B %-d, %Y %H:%M";

/// A selected event prepared for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventDetail<'a> {
    #[serde(flatten)]
    pub event: &'a CalendarEvent,
    #[serde(rename = "categoryDefinition")]
    pub definition: CategoryDefinition,
    pub start: String,
    pub end: String,
    pub when: String,
}

impl<'a> EventDetail<'a> {
    pub fn new(event: &'a CalendarEvent) -> Self {
        Self {
            event,
            definition: event.category.definition(),
            start: format_date_time(event.start),
            end: format_date_time(event.end),
            when: format_range(event.start, event.end),
        }
    }
}

impl EventStore {
    /// `None` when nothing with `id` exists, which callers show as "no event selected".
    pub fn detail(&self, id: &str) -> Option<EventDetail<'_>> {
        self.get(id).map(EventDetail::new)
    }
}

pub fn format_date_time(datetime: NaiveDateTime) -> String {
    datetime.format(DATE_TIME_FORMAT).to_string()
}

/// Prints the date once when the event starts and ends on the same day.
pub fn format_range(start: NaiveDateTime, end: NaiveDateTime) -> String {
    if start == end {
        format_date_time(start)
    } else if start.date() == end.date() {
        format!("{} - {}", format_date_time(start), end.format("%H:%M"))
    } else {
        format!("{} - {}", format_date_time(start), format_date_time(end))
    }
}
