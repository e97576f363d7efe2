//! Week-aligned month grids.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use serde::{Serialize, Serializer};

use crate::{CalendarEvent, Error};

/// A calendar month, represented by its first day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Month(NaiveDate);

/// Longest stretch a grid reaches outside its month.
const GRID_SLACK: Days = Days::new(6);

impl Month {
    /// Rejects months too close to the ends of the representable date range
    /// for their grid to be padded out to whole weeks.
    pub fn new(year: i32, month: u32) -> Result<Self, Error> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .filter(|first| first.checked_sub_days(GRID_SLACK).is_some())
            .map(Month)
            .filter(|candidate| candidate.last_day().checked_add_days(GRID_SLACK).is_some())
            .ok_or_else(|| Error::InvalidMonth(format!("{year}-{month:02}")))
    }

    pub fn containing(date: NaiveDate) -> Result<Self, Error> {
        Month::new(date.year(), date.month())
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    pub fn last_day(&self) -> NaiveDate {
        self.0
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    pub fn next(&self) -> Option<Self> {
        self.0
            .checked_add_months(Months::new(1))
            .and_then(|first| Month::containing(first).ok())
    }

    pub fn prev(&self) -> Option<Self> {
        self.0
            .checked_sub_months(Months::new(1))
            .and_then(|first| Month::containing(first).ok())
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

/// Parses `YYYY-MM`.
impl FromStr for Month {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidMonth(s.to_string());

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;

        Month::new(year, month).map_err(|_| invalid())
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCell {
    pub date: NaiveDate,
    pub is_current_month: bool,
    pub is_today: bool,
    pub events: Vec<CalendarEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthGrid {
    pub month: Month,
    #[serde(serialize_with = "serialize_weekday")]
    pub week_start: Weekday,
    pub cells: Vec<DayCell>,
}

fn serialize_weekday<S: Serializer>(weekday: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(weekday)
}

impl MonthGrid {
    /// Rows of seven cells.
    pub fn weeks(&self) -> impl Iterator<Item = &[DayCell]> {
        self.cells.chunks(7)
    }

    pub fn cell(&self, date: NaiveDate) -> Option<&DayCell> {
        self.cells.iter().find(|cell| cell.date == date)
    }
}

fn days_between(from: Weekday, to: Weekday) -> u64 {
    u64::from((7 + to.num_days_from_monday() - from.num_days_from_monday()) % 7)
}

/// Lays out `month` from the `week_start` on or before its first day to the
/// end of the week holding its last day, and places each event on the cell
/// of its start date, ordered by start time.
pub fn build_month_grid<'a, I>(
    month: Month,
    events: I,
    today: NaiveDate,
    week_start: Weekday,
) -> MonthGrid
where
    I: IntoIterator<Item = &'a CalendarEvent>,
{
    // `Month::new` guarantees a week of dates either side, so neither fallback is taken.
    let first = month.first_day();
    let last = month.last_day();

    let grid_start = first
        .checked_sub_days(Days::new(days_between(week_start, first.weekday())))
        .unwrap_or(first);
    let grid_end = last
        .checked_add_days(Days::new(days_between(last.weekday(), week_start.pred())))
        .unwrap_or(last);

    let mut buckets: BTreeMap<NaiveDate, Vec<&CalendarEvent>> = BTreeMap::new();
    for event in events {
        let date = event.date();
        if (grid_start..=grid_end).contains(&date) {
            buckets.entry(date).or_default().push(event);
        }
    }

    let cells = grid_start
        .iter_days()
        .take_while(|date| *date <= grid_end)
        .map(|date| {
            let mut events = buckets.remove(&date).unwrap_or_default();
            events.sort_by_key(|event| event.start);

            DayCell {
                date,
                is_current_month: month.contains(date),
                is_today: date == today,
                events: events.into_iter().cloned().collect(),
            }
        })
        .collect();

    MonthGrid {
        month,
        week_start,
        cells,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;

    use super::*;
    use crate::{Category, Scope};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event(id: &str, start: &str) -> CalendarEvent {
        let start = NaiveDateTime::parse_from_str(start, "%Y-%m-%dT%H:%M").unwrap();
        CalendarEvent {
            id: id.to_string(),
            title: id.to_string(),
            category: Category::UniversityEvent,
            start,
            end: start,
            description: String::new(),
            scope: Scope::University,
        }
    }

    #[test]
    fn month_navigation() {
        let december = Month::new(2025, 12).unwrap();
        assert_eq!(december.last_day(), date(2025, 12, 31));
        assert_eq!(december.next(), Some(Month::new(2026, 1).unwrap()));
        assert_eq!(
            Month::new(2024, 3).unwrap().prev().unwrap().last_day(),
            date(2024, 2, 29)
        );
        assert!(Month::new(2025, 13).is_err());
    }

    #[test]
    fn months_at_the_date_limits_are_rejected() {
        let max_year = NaiveDate::MAX.year();
        let min_year = NaiveDate::MIN.year();

        assert!(Month::new(max_year, 12).is_err());
        assert!(format!("{max_year}-12").parse::<Month>().is_err());
        assert!(Month::new(min_year, 1).is_err());
        assert!(Month::containing(NaiveDate::MAX).is_err());

        let last_ok = Month::new(max_year, 11).unwrap();
        assert_eq!(last_ok.next(), None);

        let grid = build_month_grid(last_ok, std::iter::empty(), NaiveDate::MAX, Weekday::Sun);
        assert_eq!(grid.cells.len() % 7, 0);
        assert_eq!(grid.cells[0].date.weekday(), Weekday::Sun);
        assert_eq!(grid.cells.last().unwrap().date.weekday(), Weekday::Sat);
    }

    #[test]
    fn month_from_str() {
        assert_eq!("2025-09".parse::<Month>().unwrap(), Month::new(2025, 9).unwrap());
        assert_eq!(Month::new(2025, 9).unwrap().to_string(), "2025-09");
        assert!("2025".parse::<Month>().is_err());
        assert!("2025-00".parse::<Month>().is_err());
        assert!("sept-2025".parse::<Month>().is_err());
    }

    #[test]
    fn grid_is_week_aligned() {
        let today = date(2025, 9, 20);

        for week_start in [Weekday::Sun, Weekday::Mon] {
            let mut month = Month::new(2024, 1).unwrap();
            for _ in 0..36 {
                let grid = build_month_grid(month, std::iter::empty(), today, week_start);

                assert_eq!(grid.cells.len() % 7, 0, "{month}");
                assert!(grid.cells.len() == 35 || grid.cells.len() == 42 || grid.cells.len() == 28);
                assert_eq!(grid.cells[0].date.weekday(), week_start);
                assert_eq!(grid.cells.last().unwrap().date.weekday(), week_start.pred());
                assert!(grid.cells[0].date <= month.first_day());
                assert!(grid.cells.last().unwrap().date >= month.last_day());

                let in_month = grid.cells.iter().filter(|c| c.is_current_month).count();
                assert_eq!(in_month as u32, month.last_day().day());

                month = month.next().unwrap();
            }
        }
    }

    #[test]
    fn september_2025_layout() {
        let grid = build_month_grid(
            Month::new(2025, 9).unwrap(),
            std::iter::empty(),
            date(2025, 9, 20),
            Weekday::Sun,
        );

        // Sep 1 2025 is a Monday, Sep 30 a Tuesday.
        assert_eq!(grid.cells.len(), 35);
        assert_eq!(grid.cells[0].date, date(2025, 8, 31));
        assert!(!grid.cells[0].is_current_month);
        assert_eq!(grid.cells.last().unwrap().date, date(2025, 10, 4));

        let today: Vec<_> = grid.cells.iter().filter(|c| c.is_today).collect();
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].date, date(2025, 9, 20));
        assert_eq!(grid.weeks().count(), 5);
    }

    #[test]
    fn events_bucketed_by_start_date_in_time_order() {
        let a = event("A", "2025-09-15T10:00");
        let b = event("B", "2025-09-15T08:00");
        let c = event("C", "2025-09-16T00:00");
        let mut multi_day = event("D", "2025-09-16T23:00");
        multi_day.end = multi_day.start + chrono::Duration::days(3);

        let events = [a, b, c, multi_day];
        let grid = build_month_grid(
            Month::new(2025, 9).unwrap(),
            &events,
            date(2025, 9, 1),
            Weekday::Sun,
        );

        let ids = |d| {
            grid.cell(d)
                .unwrap()
                .events
                .iter()
                .map(|e| e.id.as_str())
                .collect::<Vec<_>>()
        };

        assert_eq!(ids(date(2025, 9, 15)), ["B", "A"]);
        assert_eq!(ids(date(2025, 9, 16)), ["C", "D"]);
        assert!(ids(date(2025, 9, 17)).is_empty());

        for cell in &grid.cells {
            assert!(cell.events.iter().all(|e| e.date() == cell.date));
            assert!(cell.events.windows(2).all(|w| w[0].start <= w[1].start));
        }
    }

    #[test]
    fn adjacent_month_days_keep_their_events() {
        let events = [event("spill", "2025-10-02T12:00"), event("far", "2025-11-02T12:00")];
        let grid = build_month_grid(
            Month::new(2025, 9).unwrap(),
            &events,
            date(2025, 9, 1),
            Weekday::Sun,
        );

        let cell = grid.cell(date(2025, 10, 2)).unwrap();
        assert!(!cell.is_current_month);
        assert_eq!(cell.events.len(), 1);
        assert!(grid.cells.iter().all(|c| c.events.iter().all(|e| e.id != "far")));
    }

    #[test]
    fn serializes_for_the_view_layer() {
        let grid = build_month_grid(
            Month::new(2026, 2).unwrap(),
            std::iter::empty(),
            date(2026, 2, 1),
            Weekday::Mon,
        );
        let json = serde_json::to_value(&grid).unwrap();

        assert_eq!(json["month"], "2026-02");
        assert_eq!(json["weekStart"], "Mon");
        assert_eq!(json["cells"][0]["date"], "2026-01-26");
        assert_eq!(json["cells"][0]["isCurrentMonth"], false);
    }
}
