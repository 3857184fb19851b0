//! Merging system deadlines and note deadlines into one calendar

use chrono::{DateTime, NaiveDate, Utc};

use crate::deadline::{DeadlineOrigin, DeadlineRecord, SystemDeadline};
use crate::error::PlannerResult;
use crate::export::IcsExport;
use crate::note::Note;
use crate::traits::DeadlineSource;

/// Concatenate system deadlines (first) and the notes that carry a deadline.
///
/// Relative order is preserved. Nothing is sorted nor de-duplicated.
pub fn aggregate(system: &[SystemDeadline], notes: &[Note]) -> Vec<DeadlineRecord> {
    system.iter()
        .map(DeadlineRecord::from)
        .chain(notes.iter()
            .filter(|note| note.has_deadline())
            .map(DeadlineRecord::from))
        .collect()
}

/// The records that fall on `day` (in UTC). Dateless records never match.
pub fn deadlines_on(records: &[DeadlineRecord], day: NaiveDate) -> Vec<&DeadlineRecord> {
    records.iter()
        .filter(|record| match record.date() {
            Some(date) => date.date_naive() == day,
            None => false,
        })
        .collect()
}


/// What a calendar tile shows for a day that has deadlines
#[derive(Clone, Debug, PartialEq)]
pub enum TileSummary {
    /// The college name (or note title) of the only deadline of that day
    Single { label: String, origin: DeadlineOrigin },
    /// How many deadlines there are that day
    Multiple(usize),
}


/// The deadline calendar of a user
#[derive(Clone, Debug, Default)]
pub struct DeadlineCalendar {
    records: Vec<DeadlineRecord>,
    selected: Option<NaiveDate>,
}

impl DeadlineCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a calendar from already-fetched data
    pub fn from_parts(system: &[SystemDeadline], notes: &[Note]) -> Self {
        Self { records: aggregate(system, notes), selected: None }
    }

    /// Fetch both origins of deadlines, and replace the current records.
    ///
    /// A failed origin is logged and considered empty. An error is returned only when both fail,
    /// and the current records are kept in that case.
    pub async fn refresh<S: DeadlineSource + ?Sized>(&mut self, source: &S, user_id: &str) -> PlannerResult<()> {
        let system_result = source.get_system_deadlines(user_id).await;
        let notes_result = source.get_notes(user_id).await;

        let (system, notes) = match (system_result, notes_result) {
            (Err(err), Err(_)) => {
                log::error!("Unable to fetch any deadline for user {}: {}", user_id, err);
                return Err(err);
            },
            (system, notes) => (
                system.unwrap_or_else(|err| {
                    log::warn!("Unable to fetch system deadlines: {}. Showing note deadlines only", err);
                    Vec::new()
                }),
                notes.unwrap_or_else(|err| {
                    log::warn!("Unable to fetch notes: {}. Showing system deadlines only", err);
                    Vec::new()
                }),
            ),
        };

        self.records = aggregate(&system, &notes);
        log::debug!("Calendar of user {} now has {} deadlines", user_id, self.records.len());
        Ok(())
    }

    pub fn all(&self) -> &[DeadlineRecord] {
        &self.records
    }

    pub fn on(&self, day: NaiveDate) -> Vec<&DeadlineRecord> {
        deadlines_on(&self.records, day)
    }

    /// Select a day, and return its deadlines
    pub fn select(&mut self, day: NaiveDate) -> Vec<&DeadlineRecord> {
        self.selected = Some(day);
        self.on(day)
    }

    pub fn selected(&self) -> Option<NaiveDate> {
        self.selected
    }

    pub fn tile(&self, day: NaiveDate) -> Option<TileSummary> {
        let records = self.on(day);
        match records.as_slice() {
            [] => None,
            [single] => Some(TileSummary::Single {
                label: single.display_title().to_string(),
                origin: single.origin(),
            }),
            many => Some(TileSummary::Multiple(many.len())),
        }
    }

    pub fn export(&self, now: &DateTime<Utc>) -> IcsExport {
        crate::ical::export_deadlines(&self.records, now)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn notes_only() {
        let notes = vec![
            Note::new("Scholarship essay", "500 words", Some(Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap())),
            Note::new("Random thought", "no deadline", None),
            Note::new("FAFSA", "submit", Some(Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap())),
        ];

        let records = aggregate(&[], &notes);
        let titles: Vec<_> = records.iter().map(|r| r.display_title()).collect();
        assert_eq!(titles, vec!["Scholarship essay", "FAFSA"]);
        assert!(records.iter().all(|r| r.is_from_note()));
    }

    #[test]
    fn unreadable_note_deadlines() {
        let notes: Vec<Note> = serde_json::from_str(r#"[
            { "title": "Portfolio", "content": "x", "deadline": "12/01/2025" },
            { "title": "Housing form", "content": "x", "deadline": "sometime in March" },
            { "title": "Ideas", "content": "x", "deadline": "" }
        ]"#).unwrap();

        let calendar = DeadlineCalendar::from_parts(&[], &notes);
        let titles: Vec<_> = calendar.all().iter().map(|r| r.display_title()).collect();
        assert_eq!(titles, vec!["Portfolio", "Housing form"]);
        assert_eq!(calendar.all()[1].date(), None);

        assert_eq!(calendar.tile(day(2025, 12, 1)), Some(TileSummary::Single { label: "Portfolio".to_string(), origin: DeadlineOrigin::Note }));
        let mut current = day(2024, 1, 1);
        while current <= day(2025, 12, 31) {
            assert!(calendar.on(current).iter().all(|r| r.display_title() != "Housing form"), "found on {}", current);
            current = current.succ_opt().unwrap();
        }
    }

    #[test]
    fn system_first() {
        let system = vec![SystemDeadline::new("MIT", "Early Action", Some(Utc.with_ymd_and_hms(2024, 11, 1, 0, 0, 0).unwrap()))];
        let notes = vec![Note::new("Visit", "campus tour", Some(Utc.with_ymd_and_hms(2024, 10, 1, 0, 0, 0).unwrap()))];

        let records = aggregate(&system, &notes);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].origin(), DeadlineOrigin::System);
        assert_eq!(records[1].origin(), DeadlineOrigin::Note);
    }

    #[test]
    fn days_and_tiles() {
        let system = vec![
            SystemDeadline::new("MIT", "Early Action", Some(Utc.with_ymd_and_hms(2024, 11, 1, 23, 59, 0).unwrap())),
            SystemDeadline::new("Yale", "Single-Choice Early Action", Some(Utc.with_ymd_and_hms(2024, 11, 1, 0, 0, 0).unwrap())),
            SystemDeadline::new("Rice", "Early Decision", Some(Utc.with_ymd_and_hms(2024, 11, 2, 0, 0, 0).unwrap())),
            SystemDeadline::new("Undated U", "Rolling", None),
        ];
        let mut calendar = DeadlineCalendar::from_parts(&system, &[]);

        assert_eq!(calendar.all().len(), 4);
        assert_eq!(calendar.on(day(2024, 11, 1)).len(), 2);
        assert_eq!(calendar.tile(day(2024, 11, 1)), Some(TileSummary::Multiple(2)));
        assert_eq!(calendar.tile(day(2024, 11, 2)), Some(TileSummary::Single { label: "Rice".to_string(), origin: DeadlineOrigin::System }));
        assert_eq!(calendar.tile(day(2024, 11, 3)), None);

        // The dateless record is listed, but on no day
        assert!(calendar.all().iter().any(|r| r.display_title() == "Undated U"));
        let mut current = day(2024, 1, 1);
        while current <= day(2025, 12, 31) {
            assert!(calendar.on(current).iter().all(|r| r.display_title() != "Undated U"), "found on {}", current);
            current = current.succ_opt().unwrap();
        }

        assert_eq!(calendar.selected(), None);
        let selected = calendar.select(day(2024, 11, 2));
        assert_eq!(selected.len(), 1);
        assert_eq!(calendar.selected(), Some(day(2024, 11, 2)));
    }
}
