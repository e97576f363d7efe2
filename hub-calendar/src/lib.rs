//! Academic calendar core: events grouped by semester, category filtering,
//! month grids and the upcoming-events list.

mod category;
mod detail;
mod error;
mod filter;
mod grid;
pub mod storage;
mod store;
mod structs;
mod upcoming;

#[cfg(feature = "ics")]
mod ics;

pub use category::{resolve_category, Category, CategoryDefinition, CategorySet, ParseCategoryError};
pub use detail::{format_date_time, format_range, EventDetail};
pub use error::{Error, Result};
pub use filter::filter_events;
pub use grid::{build_month_grid, DayCell, Month, MonthGrid};
pub use store::{parse_timestamp, EventStore, PERSONAL_EVENTS_KEY, PERSONAL_SEMESTER};
pub use structs::{CalendarEvent, EventRecord, Scope, Semester};
pub use upcoming::{select_upcoming, UpcomingEvent, DEFAULT_UPCOMING_LIMIT};

#[cfg(feature = "ics")]
pub use crate::ics::to_ics;
