//! Calendar events, as exported to other calendar applications

use chrono::{DateTime, Duration, Utc};

use crate::config;
use crate::deadline::DeadlineRecord;

/// An event derived from a [`DeadlineRecord`]. These are only built for exports.
#[derive(Clone, Debug, PartialEq)]
pub struct CalendarEvent {
    uid: String,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    summary: String,
    description: String,
}

impl CalendarEvent {
    /// Build the event of the `index`-th record of an export.
    ///
    /// Deadlines have no end time: events last [`config::EVENT_DURATION_MINUTES`].
    /// Returns `None` for records without a date.
    pub fn from_record(index: usize, record: &DeadlineRecord) -> Option<Self> {
        let start = *record.date()?;
        let end = start + Duration::minutes(config::EVENT_DURATION_MINUTES);
        let uid = format!("{}-{}@{}", index, start.timestamp_millis(), config::get(&config::UID_DOMAIN));

        Some(Self {
            uid,
            start,
            end,
            summary: record.display_title().to_string(),
            description: record.display_category().to_string(),
        })
    }

    pub fn uid(&self) -> &str                { &self.uid }
    pub fn start(&self) -> &DateTime<Utc>    { &self.start }
    pub fn end(&self) -> &DateTime<Utc>      { &self.end }
    pub fn summary(&self) -> &str            { &self.summary }
    pub fn description(&self) -> &str        { &self.description }
}

/// Build the events of every dated record. Indices (and thus UIDs) follow the positions in `records`.
pub fn events_from_records(records: &[DeadlineRecord]) -> Vec<CalendarEvent> {
    records.iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let event = CalendarEvent::from_record(index, record);
            if event.is_none() {
                log::warn!("Deadline {:?} has no date, it will not be exported", record.display_title());
            }
            event
        })
        .collect()
}
