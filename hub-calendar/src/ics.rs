use ics::{
    escape_text,
    properties::{Categories, Description, DtEnd, DtStart, Summary, TzName},
    ICalendar, Standard, TimeZone,
};

use crate::{CalendarEvent, Semester};

/// Builds an iCalendar document named `name` holding `events`.
#[must_use]
pub fn to_ics<'a, I>(name: &'a str, events: I) -> ICalendar<'a>
where
    I: IntoIterator<Item = &'a CalendarEvent>,
{
    let mut ist_standard = Standard::new("19700101T000000", "+0530", "+0530");
    ist_standard.push(TzName::new("IST"));

    let mut icalendar = ICalendar::new("2.0", name);
    icalendar.add_timezone(TimeZone::standard("Asia/Kolkata", ist_standard));

    for event in events {
        icalendar.add_event(event.to_ics());
    }

    icalendar
}

impl Semester {
    #[must_use]
    pub fn to_ics(&self) -> ICalendar<'_> {
        to_ics(&self.name, &self.events)
    }
}

impl CalendarEvent {
    #[must_use]
    pub fn to_ics(&self) -> ics::Event<'_> {
        let start = self.start.format("%Y%m%dT%H%M%S").to_string();
        let end = self.end.format("%Y%m%dT%H%M%S").to_string();

        let mut ics_event = ics::Event::new(format!("{}@hub-calendar", self.id), start.clone());

        ics_event.push(DtStart::new(start));
        ics_event.push(DtEnd::new(end));
        ics_event.push(Summary::new(escape_text(self.title.as_str())));
        ics_event.push(Categories::new(self.category.definition().label));

        if !self.description.is_empty() {
            ics_event.push(Description::new(escape_text(self.description.as_str())));
        }

        ics_event
    }
}
