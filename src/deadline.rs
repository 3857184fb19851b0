//! Deadlines, as assigned by the server or derived from the user's notes

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::note::Note;

/// The placeholder used wherever a deadline has no usable title or category
pub const DEADLINE_PLACEHOLDER: &str = "Deadline";

/// A deadline the server assigned for a college the user follows
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemDeadline {
    #[serde(default)]
    pub college_name: Option<String>,
    /// E.g. "Early Decision", "Regular Decision"
    #[serde(default)]
    pub deadline_type: Option<String>,
    #[serde(default, deserialize_with = "crate::utils::deserialize_lenient_date")]
    pub deadline_date: Option<DateTime<Utc>>,
}

impl SystemDeadline {
    pub fn new<S: ToString, T: ToString>(college_name: S, deadline_type: T, deadline_date: Option<DateTime<Utc>>) -> Self {
        Self {
            college_name: Some(college_name.to_string()),
            deadline_type: Some(deadline_type.to_string()),
            deadline_date,
        }
    }
}


/// Where a [`DeadlineRecord`] comes from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeadlineOrigin {
    /// A [`SystemDeadline`]
    System,
    /// A user [`Note`] that carries a deadline
    Note,
}

/// A dated item that can be shown on the deadline calendar
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeadlineRecord {
    origin: DeadlineOrigin,
    /// The college name for system deadlines, the note title for notes
    title_or_college_name: Option<String>,
    /// `None` when the server sent no (or an unreadable) date
    date: Option<DateTime<Utc>>,
    /// The deadline type for system deadlines
    category: Option<String>,
}

impl DeadlineRecord {
    pub fn new(origin: DeadlineOrigin, title_or_college_name: Option<String>, date: Option<DateTime<Utc>>, category: Option<String>) -> Self {
        Self { origin, title_or_college_name, date, category }
    }

    pub fn origin(&self) -> DeadlineOrigin              { self.origin }
    pub fn date(&self) -> Option<&DateTime<Utc>>        { self.date.as_ref() }
    pub fn category(&self) -> Option<&str>              { non_empty(self.category.as_deref()) }
    pub fn title_or_college_name(&self) -> Option<&str> { non_empty(self.title_or_college_name.as_deref()) }

    pub fn is_from_note(&self) -> bool {
        self.origin == DeadlineOrigin::Note
    }

    /// The title, or the `"Deadline"` placeholder
    pub fn display_title(&self) -> &str {
        self.title_or_college_name().unwrap_or(DEADLINE_PLACEHOLDER)
    }

    /// The category, or the `"Deadline"` placeholder
    pub fn display_category(&self) -> &str {
        self.category().unwrap_or(DEADLINE_PLACEHOLDER)
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| s.is_empty() == false)
}

impl From<&SystemDeadline> for DeadlineRecord {
    fn from(deadline: &SystemDeadline) -> Self {
        Self::new(
            DeadlineOrigin::System,
            deadline.college_name.clone(),
            deadline.deadline_date,
            deadline.deadline_type.clone(),
        )
    }
}

impl From<&Note> for DeadlineRecord {
    fn from(note: &Note) -> Self {
        Self::new(
            DeadlineOrigin::Note,
            Some(note.title().to_string()),
            note.deadline().cloned(),
            None,
        )
    }
}
