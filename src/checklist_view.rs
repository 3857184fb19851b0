//! The checklist of the college currently selected by the user.
//!
//! Loads are numbered, so that only the answer to the latest college selection is ever displayed.
//! Completion toggles are applied optimistically, then confirmed or rolled back once the server answers.

use crate::checklist::{Checklist, ChecklistDraft, ChecklistState, ItemKey};
use crate::error::{PlannerError, PlannerResult};
use crate::traits::ChecklistSource;

/// Identifies a checklist load. See [`ChecklistView::begin_load`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadTicket {
    seq: u64,
    college: String,
}

impl LoadTicket {
    pub fn college(&self) -> &str { &self.college }
}

/// Identifies an optimistic toggle. See [`ChecklistView::begin_toggle`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToggleTicket {
    seq: u64,
    key: ItemKey,
    completed: bool,
}

impl ToggleTicket {
    pub fn key(&self) -> &ItemKey { &self.key }
    pub fn completed(&self) -> bool { self.completed }
}


#[derive(Clone, Debug)]
pub struct ChecklistView {
    user_id: String,
    college: Option<String>,
    checklist: Checklist,
    state: ChecklistState,
    /// The number of the latest load
    seq: u64,
}

impl ChecklistView {
    pub fn new<S: ToString>(user_id: S) -> Self {
        Self {
            user_id: user_id.to_string(),
            college: None,
            checklist: Checklist::new(),
            state: ChecklistState::default(),
            seq: 0,
        }
    }

    pub fn user_id(&self) -> &str                { &self.user_id }
    pub fn college(&self) -> Option<&str>        { self.college.as_deref() }
    pub fn checklist(&self) -> &Checklist        { &self.checklist }
    pub fn state(&self) -> &ChecklistState       { &self.state }

    pub fn progress(&self) -> u8 {
        self.state.progress()
    }

    /// Select a college. Any load that has not finished yet becomes stale.
    pub fn begin_load<S: ToString>(&mut self, college: S) -> LoadTicket {
        self.seq += 1;
        let college = college.to_string();
        self.college = Some(college.clone());
        log::debug!("Loading the checklist of {} (load #{})", college, self.seq);
        LoadTicket { seq: self.seq, college }
    }

    /// Apply the result of a load.
    ///
    /// Returns `Ok(false)` (and changes nothing) when `ticket` has been superseded by a later load.
    /// A failed load of the current college empties the view.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: PlannerResult<Checklist>) -> PlannerResult<bool> {
        if ticket.seq != self.seq {
            log::debug!("Discarding the stale checklist of {} (load #{}, latest is #{})", ticket.college, ticket.seq, self.seq);
            return Ok(false);
        }

        match result {
            Ok(checklist) => {
                self.state = ChecklistState::from_checklist(&checklist);
                self.checklist = checklist;
                Ok(true)
            },
            Err(err) => {
                log::error!("Unable to load the checklist of {}: {}", ticket.college, err);
                self.checklist = Checklist::new();
                self.state = ChecklistState::default();
                Err(err)
            },
        }
    }

    /// Select a college and load its checklist
    pub async fn select_college<S: ChecklistSource + ?Sized>(&mut self, source: &S, college: &str) -> PlannerResult<bool> {
        let ticket = self.begin_load(college);
        let result = source.get_checklist(&self.user_id, college).await;
        self.finish_load(ticket, result)
    }

    /// Optimistically set the completion flag of an item
    pub fn begin_toggle(&mut self, key: &ItemKey, completed: bool) -> PlannerResult<ToggleTicket> {
        if self.college.is_none() {
            return Err(PlannerError::validation("No college selected"));
        }
        self.state.begin_toggle(key, completed)?;
        Ok(ToggleTicket { seq: self.seq, key: key.clone(), completed })
    }

    /// Confirm or roll back a toggle, once the server has answered.
    ///
    /// Answers for a checklist that is not displayed anymore are ignored.
    pub fn finish_toggle(&mut self, ticket: ToggleTicket, result: PlannerResult<()>) -> PlannerResult<()> {
        if ticket.seq != self.seq {
            log::debug!("Ignoring the update of item {}, its checklist is not displayed anymore", ticket.key);
            return Ok(());
        }

        match result {
            Ok(()) => {
                self.state.confirm(&ticket.key);
                if let Err(err) = self.checklist.set_completed(&ticket.key, ticket.completed) {
                    log::warn!("Confirmed item {} is missing from the checklist: {}", ticket.key, err);
                }
                Ok(())
            },
            Err(err) => {
                log::warn!("Unable to update item {}: {}. Rolling back", ticket.key, err);
                self.state.reject(&ticket.key);
                Err(err)
            },
        }
    }

    /// Toggle an item, and wait for the server to confirm it
    pub async fn toggle<S: ChecklistSource + ?Sized>(&mut self, source: &S, key: &ItemKey, completed: bool) -> PlannerResult<()> {
        let ticket = self.begin_toggle(key, completed)?;
        let result = match &self.college {
            Some(college) => source.update_checklist_item(&self.user_id, college, key, completed).await,
            None => Err(PlannerError::validation("No college selected")),
        };
        self.finish_toggle(ticket, result)
    }

    /// Start editing the current checklist
    pub fn edit(&self) -> ChecklistDraft {
        self.checklist.draft()
    }

    /// Send an edited checklist to the server. The view is updated only once the server accepted it.
    pub async fn save_draft<S: ChecklistSource + ?Sized>(&mut self, source: &S, draft: ChecklistDraft) -> PlannerResult<()> {
        let college = self.college.clone()
            .ok_or_else(|| PlannerError::validation("No college selected"))?;
        if self.state.has_pending() {
            return Err(PlannerError::validation("Some items are still being updated"));
        }

        let checklist = draft.finish();
        if let Err(err) = source.replace_checklist(&self.user_id, &college, &checklist).await {
            log::warn!("Unable to save the checklist of {}: {}", college, err);
            return Err(err);
        }

        self.state = ChecklistState::from_checklist(&checklist);
        self.checklist = checklist;
        Ok(())
    }
}
