//! Support for library configuration options

use std::sync::{Arc, Mutex};
use std::time::Duration;
use once_cell::sync::Lazy;

/// Part of the ProdID string that describes the organization (example of a ProdID string: `-//ABC Corporation//My Product//EN`).
/// Feel free to override it when initing this library.
pub static ORG_NAME: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("College Ready".to_string())));

/// Part of the ProdID string that describes the product name (example of a ProdID string: `-//ABC Corporation//My Product//EN`).
/// Feel free to override it when initing this library.
pub static PRODUCT_NAME: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("Deadlines".to_string())));

/// The base URL of the planning API. Every [`Client`](crate::client::Client) built with [`Client::from_config`](crate::client::Client::from_config) uses it.
pub static API_BASE_URL: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("https://dumdum.work".to_string())));

/// The domain suffix of the UIDs of exported calendar events (`<index>-<millis>@<domain>`)
pub static UID_DOMAIN: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("collegeready.me".to_string())));

/// Notes longer than this (in characters) are refused before reaching the server
pub const MAX_NOTE_LENGTH: usize = 2000;

/// Suggestions are only fetched for queries at least this long
pub const MIN_SUGGESTION_QUERY_LEN: usize = 3;

/// Delay between the last keystroke and the suggestion request
pub const SUGGESTION_DEBOUNCE: Duration = Duration::from_millis(1000);

/// Deadlines carry no end time. Exported events last this long.
pub const EVENT_DURATION_MINUTES: i64 = 60;

pub const ICS_FILE_NAME: &str = "deadlines.ics";
pub const ICS_MIME_TYPE: &str = "text/calendar; charset=utf-8";


/// Read one of the overridable settings above
///
/// A poisoned lock still holds a valid string, so it is used anyway.
pub fn get(setting: &Lazy<Arc<Mutex<String>>>) -> String {
    match setting.lock() {
        Ok(value) => value.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

/// Override one of the settings above
pub fn set<S: ToString>(setting: &Lazy<Arc<Mutex<String>>>, value: S) {
    match setting.lock() {
        Ok(mut current) => *current = value.to_string(),
        Err(poisoned) => *poisoned.into_inner() = value.to_string(),
    }
}
