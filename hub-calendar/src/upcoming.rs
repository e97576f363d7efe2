use chrono::NaiveDate;
use serde::Serialize;

use crate::{CalendarEvent, CategoryDefinition, Semester};

pub const DEFAULT_UPCOMING_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpcomingEvent<'a> {
    #[serde(flatten)]
    pub event: &'a CalendarEvent,
    #[serde(rename = "categoryDefinition")]
    pub definition: CategoryDefinition,
}

/// Events starting on `today` or later across all semesters, earliest first,
/// at most `limit` of them. The comparison is by calendar date, so an event
/// earlier today is still upcoming.
pub fn select_upcoming(
    semesters: &[Semester],
    today: NaiveDate,
    limit: usize,
) -> Vec<UpcomingEvent<'_>> {
    let mut events = semesters
        .iter()
        .flat_map(|semester| semester.events.iter())
        .filter(|event| event.date() >= today)
        .collect::<Vec<_>>();

    events.sort_by_key(|event| event.start);
    events.truncate(limit);

    events
        .into_iter()
        .map(|event| UpcomingEvent {
            event,
            definition: event.category.definition(),
        })
        .collect()
}
