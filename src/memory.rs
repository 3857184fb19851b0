//! An in-memory data source.
//!
//! It holds the same data the server would, and can stand in for the [`Client`](crate::client::Client)
//! wherever a [`DeadlineSource`], [`ChecklistSource`] or [`SuggestionSource`] is expected (e.g. in tests).

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use crate::checklist::{Checklist, ItemKey};
use crate::college::SuggestionKind;
use crate::deadline::SystemDeadline;
use crate::error::{PlannerError, PlannerResult};
use crate::mock_behaviour::MockBehaviour;
use crate::note::Note;
use crate::traits::{ChecklistSource, DeadlineSource, SuggestionSource};

#[derive(Debug, Default)]
struct MemoryData {
    system_deadlines: HashMap<String, Vec<SystemDeadline>>,
    notes: HashMap<String, Vec<Note>>,
    /// Keyed by (user id, college name)
    checklists: HashMap<(String, String), Checklist>,
    colleges: Vec<String>,
    majors: Vec<String>,
    /// Artificial latency of `get_checklist`, per college
    checklist_delays: HashMap<String, Duration>,
}

/// A data source that keeps everything in memory
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    data: Arc<Mutex<MemoryData>>,
    mock_behaviour: Option<Arc<Mutex<MockBehaviour>>>,
    suggestion_calls: Arc<Mutex<Vec<String>>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make this source fail the way `mock_behaviour` says
    pub fn with_mock_behaviour(mut self, mock_behaviour: Arc<Mutex<MockBehaviour>>) -> Self {
        self.mock_behaviour = Some(mock_behaviour);
        self
    }

    fn data(&self) -> MutexGuard<'_, MemoryData> {
        self.data.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_mock(&self, check: impl FnOnce(&mut MockBehaviour) -> PlannerResult<()>) -> PlannerResult<()> {
        match &self.mock_behaviour {
            None => Ok(()),
            Some(mock) => {
                let mut mock = mock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                check(&mut mock)
            }
        }
    }

    pub fn add_system_deadline(&self, user_id: &str, deadline: SystemDeadline) {
        self.data().system_deadlines.entry(user_id.to_string()).or_default().push(deadline);
    }

    pub fn add_note(&self, user_id: &str, note: Note) {
        self.data().notes.entry(user_id.to_string()).or_default().push(note);
    }

    pub fn set_checklist(&self, user_id: &str, college_name: &str, checklist: Checklist) {
        self.data().checklists.insert((user_id.to_string(), college_name.to_string()), checklist);
    }

    /// The checklist as the server currently knows it
    pub fn checklist(&self, user_id: &str, college_name: &str) -> Option<Checklist> {
        self.data().checklists.get(&(user_id.to_string(), college_name.to_string())).cloned()
    }

    /// Make `get_checklist` for this college take some time to answer
    pub fn delay_checklist(&self, college_name: &str, delay: Duration) {
        self.data().checklist_delays.insert(college_name.to_string(), delay);
    }

    pub fn add_college_name<S: ToString>(&self, name: S) {
        self.data().colleges.push(name.to_string());
    }

    pub fn add_major_name<S: ToString>(&self, name: S) {
        self.data().majors.push(name.to_string());
    }

    /// The queries `get_suggestions` has been called with, in order
    pub fn suggestion_calls(&self) -> Vec<String> {
        self.suggestion_calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).clone()
    }
}

#[async_trait]
impl DeadlineSource for MemorySource {
    async fn get_system_deadlines(&self, user_id: &str) -> PlannerResult<Vec<SystemDeadline>> {
        self.check_mock(MockBehaviour::can_get_system_deadlines)?;
        Ok(self.data().system_deadlines.get(user_id).cloned().unwrap_or_default())
    }

    async fn get_notes(&self, user_id: &str) -> PlannerResult<Vec<Note>> {
        self.check_mock(MockBehaviour::can_get_notes)?;
        Ok(self.data().notes.get(user_id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl ChecklistSource for MemorySource {
    async fn get_checklist(&self, user_id: &str, college_name: &str) -> PlannerResult<Checklist> {
        let delay = self.data().checklist_delays.get(college_name).cloned();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.check_mock(MockBehaviour::can_get_checklist)?;
        self.checklist(user_id, college_name)
            .ok_or_else(|| PlannerError::server("Checklist not found"))
    }

    async fn update_checklist_item(&self, user_id: &str, college_name: &str, key: &ItemKey, completed: bool) -> PlannerResult<()> {
        self.check_mock(MockBehaviour::can_update_checklist_item)?;
        let mut data = self.data();
        let checklist = data.checklists.get_mut(&(user_id.to_string(), college_name.to_string()))
            .ok_or_else(|| PlannerError::server("Checklist not found"))?;
        checklist.set_completed(key, completed)
    }

    async fn replace_checklist(&self, user_id: &str, college_name: &str, checklist: &Checklist) -> PlannerResult<()> {
        self.check_mock(MockBehaviour::can_replace_checklist)?;
        self.set_checklist(user_id, college_name, checklist.clone());
        Ok(())
    }
}

#[async_trait]
impl SuggestionSource for MemorySource {
    async fn get_suggestions(&self, kind: SuggestionKind, query: &str) -> PlannerResult<Vec<String>> {
        self.suggestion_calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).push(query.to_string());
        self.check_mock(MockBehaviour::can_get_suggestions)?;

        let query = query.to_lowercase();
        let data = self.data();
        let names = match kind {
            SuggestionKind::College => &data.colleges,
            SuggestionKind::Major => &data.majors,
        };
        Ok(names.iter()
            .filter(|name| name.to_lowercase().contains(&query))
            .cloned()
            .collect())
    }
}
