//! User notes, which may carry a deadline

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::config::MAX_NOTE_LENGTH;
use crate::error::{PlannerError, PlannerResult};

/// A note, as stored on the server
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Titles identify notes: they cannot be edited
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    deadline: NoteDeadline,
    #[serde(default, deserialize_with = "crate::utils::deserialize_lenient_date")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::utils::deserialize_lenient_date")]
    updated_at: Option<DateTime<Utc>>,
}

impl Note {
    pub fn new<S: ToString, T: ToString>(title: S, content: T, deadline: Option<DateTime<Utc>>) -> Self {
        Self {
            title: title.to_string(),
            content: content.to_string(),
            deadline: NoteDeadline { given: deadline.is_some(), date: deadline },
            created_at: None,
            updated_at: None,
        }
    }

    pub fn title(&self) -> &str                         { &self.title }
    pub fn content(&self) -> &str                       { &self.content }
    /// The deadline, if it is a date this crate understands
    pub fn deadline(&self) -> Option<&DateTime<Utc>>    { self.deadline.date.as_ref() }
    pub fn created_at(&self) -> Option<&DateTime<Utc>>  { self.created_at.as_ref() }
    pub fn updated_at(&self) -> Option<&DateTime<Utc>>  { self.updated_at.as_ref() }

    /// Whether the deadline field is filled in, even with a value that is not a readable date
    pub fn has_deadline(&self) -> bool {
        self.deadline.given
    }
}


/// The deadline field of a note: whether it was filled in, and the date it holds
#[derive(Clone, Debug, Default, PartialEq)]
struct NoteDeadline {
    given: bool,
    date: Option<DateTime<Utc>>,
}

impl<'de> Deserialize<'de> for NoteDeadline {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let given = match &value {
            Value::Null => false,
            Value::Bool(flag) => *flag,
            Value::String(s) => s.trim().is_empty() == false,
            _ => true,
        };
        Ok(Self { given, date: crate::utils::parse_lenient_date(&value) })
    }
}

impl Serialize for NoteDeadline {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.date.serialize(serializer)
    }
}


/// A note that the user is about to create. Use [`NewNote::validate`] before sending it.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNote {
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deadline: Option<DateTime<Utc>>,
}

impl NewNote {
    /// Build a note from what the user typed. `deadline` is a `YYYY-MM-DD` date, or an empty string.
    pub fn from_form(title: &str, content: &str, deadline: &str) -> PlannerResult<Self> {
        let deadline = match deadline.trim() {
            "" => None,
            day => Some(parse_local_date(day)?),
        };
        let now = Utc::now();
        let note = Self {
            title: title.trim().to_string(),
            content: content.to_string(),
            created_at: now,
            updated_at: now,
            deadline: deadline.and_then(|day| day.and_hms_opt(0, 0, 0)).map(|dt| Utc.from_utc_datetime(&dt)),
        };
        note.validate()?;
        Ok(note)
    }

    pub fn validate(&self) -> PlannerResult<()> {
        validate_note_fields(&self.title, &self.content)
    }
}

/// Checks that are done before a note is created or updated
pub fn validate_note_fields(title: &str, content: &str) -> PlannerResult<()> {
    if title.trim().is_empty() || content.trim().is_empty() {
        return Err(PlannerError::validation("Title and Content must be filled out"));
    }
    if content.chars().count() > MAX_NOTE_LENGTH {
        return Err(PlannerError::validation(
            format!("Note content cannot exceed {} characters.", MAX_NOTE_LENGTH)
        ));
    }
    Ok(())
}

/// The character counter shown next to the note editor
pub fn character_count_label(content: &str) -> String {
    format!("Character Count {}/{}", content.chars().count(), MAX_NOTE_LENGTH)
}

/// Parse a date picked in a date input (`YYYY-MM-DD`)
pub fn parse_local_date(day: &str) -> PlannerResult<NaiveDate> {
    NaiveDate::parse_from_str(day.trim(), "%Y-%m-%d")
        .map_err(|err| PlannerError::validation(format!("Invalid deadline {:?}: {}", day, err)))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notes_from_json() {
        let notes: Vec<Note> = serde_json::from_str(r#"[
            { "title": "Essay draft", "content": "Finish it", "deadline": { "_seconds": 1740787200, "_nanoseconds": 0 } },
            { "title": "Ideas", "content": "Robotics club", "deadline": null },
            { "title": "Empty deadline", "content": "x", "deadline": "" }
        ]"#).unwrap();

        assert_eq!(notes.len(), 3);
        assert_eq!(notes[0].deadline(), Some(&Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()));
        assert!(notes[1].has_deadline() == false);
        assert!(notes[2].has_deadline() == false);
    }

    #[test]
    fn unreadable_deadlines_are_kept() {
        let notes: Vec<Note> = serde_json::from_str(r#"[
            { "title": "Housing form", "content": "x", "deadline": "sometime in March" },
            { "title": "Portfolio", "content": "x", "deadline": "12/01/2025" }
        ]"#).unwrap();

        assert!(notes[0].has_deadline());
        assert_eq!(notes[0].deadline(), None);
        assert!(notes[1].has_deadline());
        assert_eq!(notes[1].deadline(), Some(&Utc.with_ymd_and_hms(2025, 12, 1, 0, 0, 0).unwrap()));

        assert!(Note::new("t", "c", None).has_deadline() == false);
    }

    #[test]
    fn validation() {
        assert!(validate_note_fields("Title", "Content").is_ok());
        assert!(matches!(validate_note_fields("", "Content"), Err(PlannerError::Validation(_))));
        assert!(matches!(validate_note_fields("Title", "   "), Err(PlannerError::Validation(_))));

        let at_limit = "é".repeat(MAX_NOTE_LENGTH);
        assert!(validate_note_fields("Title", &at_limit).is_ok());
        let too_long = "a".repeat(MAX_NOTE_LENGTH + 1);
        let err = validate_note_fields("Title", &too_long).unwrap_err();
        assert_eq!(err.to_string(), "Note content cannot exceed 2000 characters.");
    }

    #[test]
    fn new_note_from_form() {
        let note = NewNote::from_form(" Visit ", "Campus tour", "2025-04-12").unwrap();
        assert_eq!(note.title, "Visit");
        assert_eq!(note.deadline, Some(Utc.with_ymd_and_hms(2025, 4, 12, 0, 0, 0).unwrap()));

        let note = NewNote::from_form("Visit", "Campus tour", "").unwrap();
        assert_eq!(note.deadline, None);

        assert!(NewNote::from_form("Visit", "Campus tour", "12/04/2025").is_err());
        assert!(NewNote::from_form("Visit", "", "2025-04-12").is_err());

        assert_eq!(character_count_label("abc"), "Character Count 3/2000");
    }
}
