//! The seams between view models and the planning data
//!
//! They are implemented by the HTTP [`Client`](crate::client::Client), and by the in-memory
//! [`MemorySource`](crate::memory::MemorySource) that stands in for the server in tests.

use async_trait::async_trait;

use crate::checklist::{Checklist, ItemKey};
use crate::college::SuggestionKind;
use crate::deadline::SystemDeadline;
use crate::error::PlannerResult;
use crate::note::Note;

#[async_trait]
pub trait DeadlineSource: Send + Sync {
    /// Returns the deadlines the server assigned to this user's colleges
    async fn get_system_deadlines(&self, user_id: &str) -> PlannerResult<Vec<SystemDeadline>>;
    /// Returns every note of this user, with or without a deadline
    async fn get_notes(&self, user_id: &str) -> PlannerResult<Vec<Note>>;
}

#[async_trait]
pub trait ChecklistSource: Send + Sync {
    async fn get_checklist(&self, user_id: &str, college_name: &str) -> PlannerResult<Checklist>;

    /// Set the completion flag of a single item
    async fn update_checklist_item(&self, user_id: &str, college_name: &str, key: &ItemKey, completed: bool) -> PlannerResult<()>;

    /// Replace the whole checklist (after an edit)
    async fn replace_checklist(&self, user_id: &str, college_name: &str, checklist: &Checklist) -> PlannerResult<()>;
}

#[async_trait]
pub trait SuggestionSource: Send + Sync {
    /// Returns the names that complete `query`
    async fn get_suggestions(&self, kind: SuggestionKind, query: &str) -> PlannerResult<Vec<String>>;
}
