//! Loading and validating calendar events.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};

use crate::storage::KeyValueStorage;
use crate::{CalendarEvent, Category, Error, EventRecord, Result, Scope, Semester};

static SEED: &str = include_str!("../data/seed.json");

/// Storage key holding the user's own events as a JSON array of records.
pub const PERSONAL_EVENTS_KEY: &str = "personal-events";

/// Bucket name personal events are loaded into.
pub const PERSONAL_SEMESTER: &str = "Personal";

const TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Read-only collection of events, grouped by semester.
#[derive(Debug, Clone, Default)]
pub struct EventStore {
    semesters: Vec<Semester>,
    skipped: Vec<String>,
}

impl EventStore {
    /// The built-in academic calendar.
    pub fn seed() -> Result<Self> {
        Self::from_json(SEED)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// Parses a JSON object mapping semester names to arrays of event records.
    /// Semesters keep the order they have in the document.
    pub fn from_json(json: &str) -> Result<Self> {
        let buckets = serde_json::from_str::<Map<String, Value>>(json)?
            .into_iter()
            .map(|(name, records)| -> Result<(String, Vec<EventRecord>)> {
                Ok((name, serde_json::from_value(records)?))
            })
            .collect::<Result<Vec<_>>>()?;

        Self::from_records(buckets)
    }

    /// Builds a store from raw records.
    ///
    /// Unknown categories, unknown scopes and duplicate ids fail the whole load.
    /// Records with unparseable or inverted timestamps are skipped and reported.
    pub fn from_records<I, S>(buckets: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<EventRecord>)>,
        S: Into<String>,
    {
        let mut store = EventStore::default();
        let mut seen = HashSet::new();

        for (name, records) in buckets {
            store.add_semester(name.into(), records, &mut seen)?;
        }

        log::debug!(
            "Loaded {} events in {} semesters",
            store.len(),
            store.semesters.len()
        );

        Ok(store)
    }

    /// Adds the events saved under [`PERSONAL_EVENTS_KEY`] as their own bucket.
    /// Returns how many events were added.
    pub fn load_personal(&mut self, storage: &dyn KeyValueStorage) -> Result<usize> {
        let Some(json) = storage.get(PERSONAL_EVENTS_KEY)? else {
            return Ok(0);
        };

        let records: Vec<EventRecord> = serde_json::from_str(&json)?;
        let mut seen = self
            .events()
            .map(|event| event.id.clone())
            .chain(self.skipped.iter().cloned())
            .collect::<HashSet<_>>();

        let before = self.len();
        self.add_semester(PERSONAL_SEMESTER.to_string(), records, &mut seen)?;

        Ok(self.len() - before)
    }

    fn add_semester(
        &mut self,
        name: String,
        records: Vec<EventRecord>,
        seen: &mut HashSet<String>,
    ) -> Result<()> {
        let mut events = Vec::with_capacity(records.len());

        for record in records {
            if !seen.insert(record.id.clone()) {
                return Err(Error::DuplicateId(record.id));
            }

            let id = record.id.clone();
            match validate(record)? {
                Validated::Event(event) => events.push(event),
                Validated::Skipped(reason) => {
                    log::warn!("Skipping event '{id}' in '{name}': {reason}");
                    self.skipped.push(id);
                }
            }
        }

        match self.semesters.iter_mut().find(|semester| semester.name == name) {
            Some(semester) => semester.events.append(&mut events),
            None => self.semesters.push(Semester { name, events }),
        }

        Ok(())
    }

    pub fn semesters(&self) -> &[Semester] {
        &self.semesters
    }

    /// All events across every semester.
    pub fn events(&self) -> impl Iterator<Item = &CalendarEvent> {
        self.semesters
            .iter()
            .flat_map(|semester| semester.events.iter())
    }

    pub fn get(&self, id: &str) -> Option<&CalendarEvent> {
        self.events().find(|event| event.id == id)
    }

    /// Ids of records dropped for malformed timestamps.
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.semesters
            .iter()
            .map(|semester| semester.events.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

enum Validated {
    Event(CalendarEvent),
    Skipped(&'static str),
}

fn validate(record: EventRecord) -> Result<Validated> {
    let category = record
        .category
        .parse::<Category>()
        .map_err(|err| Error::UnknownCategory {
            id: record.id.clone(),
            key: err.0,
        })?;

    let scope = match record.scope.as_str() {
        "University" => Some(Scope::University),
        "Department" => Some(Scope::Department),
        "Personal" => Some(Scope::Personal),
        _ => None,
    };

    let Some(scope) = scope else {
        return Err(Error::UnknownScope {
            id: record.id,
            key: record.scope,
        });
    };

    let Some(start) = timestamp_value(record.start_date.as_ref()) else {
        return Ok(Validated::Skipped("malformed startDate"));
    };

    let Some(end) = timestamp_value(record.end_date.as_ref()) else {
        return Ok(Validated::Skipped("malformed endDate"));
    };

    if end < start {
        return Ok(Validated::Skipped("endDate precedes startDate"));
    }

    Ok(Validated::Event(CalendarEvent {
        id: record.id,
        title: record.title,
        category,
        start,
        end,
        description: record.description,
        scope,
    }))
}

/// Only JSON strings can hold a timestamp.
fn timestamp_value(value: Option<&Value>) -> Option<NaiveDateTime> {
    value.and_then(Value::as_str).and_then(parse_timestamp)
}

/// Accepts local date-times, RFC 3339 (kept as its wall-clock time) and bare dates.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|datetime| datetime.naive_local())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
