//! A module to build ICal files

use chrono::{DateTime, Utc};
use ics::properties::{Description, DtEnd, DtStart, Summary};
use ics::{escape_text, Event, ICalendar};

use crate::deadline::DeadlineRecord;
use crate::event::{events_from_records, CalendarEvent};
use crate::export::IcsExport;


/// Create an iCal document holding one `VEVENT` per event.
///
/// `now` is used as the `DTSTAMP` of every event.
pub fn build_calendar(events: &[CalendarEvent], now: &DateTime<Utc>) -> String {
    let s_now = format_date_time(now);
    let mut calendar = ICalendar::new("2.0", super::default_prod_id());

    for event in events {
        let mut vevent = Event::new(event.uid(), s_now.clone());
        vevent.push(DtStart::new(format_date_time(event.start())));
        vevent.push(DtEnd::new(format_date_time(event.end())));
        vevent.push(Summary::new(escape_text(event.summary())));
        vevent.push(Description::new(escape_text(event.description())));
        calendar.add_event(vevent);
    }

    calendar.to_string()
}

/// Export every dated deadline into a `deadlines.ics` file content
pub fn export_deadlines(records: &[DeadlineRecord], now: &DateTime<Utc>) -> IcsExport {
    let events = events_from_records(records);
    log::info!("Exporting {} deadlines ({} without a date skipped)", events.len(), records.len() - events.len());
    IcsExport::new(build_calendar(&events, now))
}

/// Format a UTC date-time the iCal way (`20250301T000000Z`)
pub fn format_date_time(dt: &DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use crate::deadline::DeadlineOrigin;

    #[test]
    fn test_empty_calendar() {
        let now = Utc::now();
        let ical = build_calendar(&[], &now);

        let expected_ical = format!("BEGIN:VCALENDAR\r\n\
            VERSION:2.0\r\n\
            PRODID:{}\r\n\
            END:VCALENDAR\r\n", super::super::default_prod_id());
        assert_eq!(ical, expected_ical);
        assert!(ical.contains("BEGIN:VEVENT") == false);
    }

    #[test]
    fn test_ical_from_deadline() {
        let now = Utc.with_ymd_and_hms(2024, 12, 24, 8, 0, 0).unwrap();
        let date = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let record = DeadlineRecord::new(DeadlineOrigin::System, Some("Rice University".into()), Some(date), Some("Early Decision II".into()));

        let export = export_deadlines(&[record], &now);
        let event = CalendarEvent::from_record(0, &DeadlineRecord::new(DeadlineOrigin::System, None, Some(date), None)).unwrap();

        let expected_ical = format!("BEGIN:VCALENDAR\r\n\
            VERSION:2.0\r\n\
            PRODID:{}\r\n\
            BEGIN:VEVENT\r\n\
            UID:{}\r\n\
            DTSTAMP:20241224T080000Z\r\n\
            DTSTART:20250301T000000Z\r\n\
            DTEND:20250301T010000Z\r\n\
            SUMMARY:Rice University\r\n\
            DESCRIPTION:Early Decision II\r\n\
            END:VEVENT\r\n\
            END:VCALENDAR\r\n", super::super::default_prod_id(), event.uid());

        assert_eq!(export.content(), expected_ical);
    }

    #[test]
    fn test_text_is_escaped() {
        let date = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let record = DeadlineRecord::new(DeadlineOrigin::Note, Some("Essays; drafts, finals".into()), Some(date), None);

        let ical = export_deadlines(&[record], &Utc::now()).content().to_string();
        assert!(ical.contains("SUMMARY:Essays\\; drafts\\, finals\r\n"));
        assert!(ical.contains("DESCRIPTION:Deadline\r\n"));
    }
}
