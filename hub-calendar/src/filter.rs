use crate::{CalendarEvent, CategorySet};

/// Keeps the events whose category is in `active`. An empty set keeps nothing.
pub fn filter_events<'a, I>(events: I, active: CategorySet) -> Vec<&'a CalendarEvent>
where
    I: IntoIterator<Item = &'a CalendarEvent>,
{
    if active.is_empty() {
        return Vec::new();
    }

    events
        .into_iter()
        .filter(|event| active.contains(event.category))
        .collect()
}
