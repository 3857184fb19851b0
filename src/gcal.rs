//! "Add to Google Calendar" links

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::Url;

use crate::deadline::DeadlineRecord;
use crate::event::CalendarEvent;
use crate::ical::format_date_time;

const GOOGLE_CALENDAR_RENDER_URL: &str = "https://calendar.google.com/calendar/render";

/// What JavaScript's `encodeURIComponent` escapes: everything but `A-Z a-z 0-9 - _ . ! ~ * ' ( )`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Build a Google Calendar "quick add" link for a deadline, or `None` if it has no date
pub fn google_calendar_link(record: &DeadlineRecord) -> Option<Url> {
    let event = CalendarEvent::from_record(0, record)?;

    let link = format!(
        "{}?action=TEMPLATE&text={}&dates={}/{}&details={}",
        GOOGLE_CALENDAR_RENDER_URL,
        utf8_percent_encode(event.summary(), URI_COMPONENT),
        format_date_time(event.start()),
        format_date_time(event.end()),
        utf8_percent_encode(event.description(), URI_COMPONENT),
    );

    match Url::parse(&link) {
        Ok(url) => Some(url),
        Err(err) => {
            log::warn!("Unable to build a Google Calendar link for {:?}: {}", record.display_title(), err);
            None
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use crate::deadline::DeadlineOrigin;

    fn query_value(url: &Url, key: &str) -> Option<String> {
        url.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    #[test]
    fn link_for_a_deadline() {
        let date = Utc.with_ymd_and_hms(2025, 9, 15, 0, 0, 0).unwrap();
        let record = DeadlineRecord::new(DeadlineOrigin::System, Some("Texas A&M".into()), Some(date), Some("Priority Deadline".into()));

        let url = google_calendar_link(&record).unwrap();
        assert_eq!(query_value(&url, "action").as_deref(), Some("TEMPLATE"));
        assert_eq!(query_value(&url, "dates").as_deref(), Some("20250915T000000Z/20250915T010000Z"));
        assert_eq!(query_value(&url, "text").as_deref(), Some("Texas A&M"));
        assert_eq!(query_value(&url, "details").as_deref(), Some("Priority Deadline"));
        assert!(url.as_str().contains("text=Texas%20A%26M&"));
        assert!(url.as_str().contains("&dates=20250915T000000Z/20250915T010000Z&"));
    }

    #[test]
    fn link_fallbacks() {
        let date = Utc.with_ymd_and_hms(2025, 9, 15, 0, 0, 0).unwrap();
        let record = DeadlineRecord::new(DeadlineOrigin::Note, None, Some(date), None);
        let url = google_calendar_link(&record).unwrap();
        assert_eq!(query_value(&url, "text").as_deref(), Some("Deadline"));
        assert_eq!(query_value(&url, "details").as_deref(), Some("Deadline"));

        let undated = DeadlineRecord::new(DeadlineOrigin::Note, Some("Someday".into()), None, None);
        assert_eq!(google_calendar_link(&undated), None);
    }
}
