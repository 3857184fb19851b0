//! Some utility functions

use std::convert::TryFrom;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::checklist::Checklist;
use crate::checklist::ChecklistState;
use crate::deadline::DeadlineRecord;
use crate::deadline::DeadlineOrigin;


/// Interpret a date as sent by the API.
///
/// Accepted shapes are RFC 3339 strings, bare `YYYY-MM-DD` or `MM/DD/YYYY` dates (midnight UTC), Firestore timestamps
/// (`{"_seconds": .., "_nanoseconds": ..}` or `{"seconds": .., "nanoseconds": ..}`) and epoch milliseconds
/// (integer or float).
/// Anything else is `None`.
pub fn parse_lenient_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Null => None,
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }
            for format in &["%Y-%m-%d", "%m/%d/%Y"] {
                if let Ok(day) = NaiveDate::parse_from_str(s, format) {
                    return day.and_hms_opt(0, 0, 0).map(|midnight| Utc.from_utc_datetime(&midnight));
                }
            }
            log::warn!("Unable to understand date {:?}", s);
            None
        },
        Value::Number(n) => {
            let millis = match n.as_i64() {
                Some(millis) => millis,
                None => {
                    let millis = n.as_f64()?;
                    if millis.is_finite() == false || millis.abs() > i64::MAX as f64 {
                        return None;
                    }
                    millis.round() as i64
                },
            };
            Utc.timestamp_millis_opt(millis).single()
        },
        Value::Object(map) => {
            let seconds = map.get("_seconds").or_else(|| map.get("seconds"))?.as_i64()?;
            let nanos = match map.get("_nanoseconds").or_else(|| map.get("nanoseconds")) {
                None => 0,
                Some(n) => u32::try_from(n.as_u64()?).ok()?,
            };
            Utc.timestamp_opt(seconds, nanos).single()
        },
        other => {
            log::warn!("Unable to understand date {}", other);
            None
        },
    }
}

/// Used to support serde on optional dates with [`parse_lenient_date`]
pub fn deserialize_lenient_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(parse_lenient_date(&value))
}


/// A debug utility that pretty-prints deadlines
pub fn print_deadline_list(records: &[DeadlineRecord]) {
    for record in records {
        print_deadline(record);
    }
}

pub fn print_deadline(record: &DeadlineRecord) {
    let origin = match record.origin() {
        DeadlineOrigin::System => "S",
        DeadlineOrigin::Note => "N",
    };
    let date = match record.date() {
        Some(dt) => dt.format("%Y-%m-%d").to_string(),
        None => "----------".to_string(),
    };
    println!("    {} {}  {}\t{}", origin, date, record.display_title(), record.category().unwrap_or(""));
}

/// A debug utility that pretty-prints a checklist and its current state
pub fn print_checklist(checklist: &Checklist, state: &ChecklistState) {
    for (section, items) in checklist.sections() {
        println!("  {}", section);
        for (index, item) in items.iter().enumerate() {
            let completion = match state.is_completed(section, index) {
                Some(true) => "✓",
                Some(false) => " ",
                None => "?",
            };
            println!("    [{}] {}", completion, item.label());
        }
    }
    println!("  progress: {}%", state.progress());
}
