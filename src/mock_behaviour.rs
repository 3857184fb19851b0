//! This module provides ways to tweak mocked data sources, so that they can return errors on some tests

use crate::error::{PlannerError, PlannerResult};

/// This stores some behaviour tweaks, that describe how a mocked instance will behave during a given test
///
/// So that a functions fails _n_ times after _m_ initial successes, set `(m, n)` for the suited parameter
#[derive(Default, Clone, Debug)]
pub struct MockBehaviour {
    /// If this is true, every action will be allowed
    pub is_suspended: bool,

    // From the DeadlineSource trait
    pub get_system_deadlines_behaviour: (u32, u32),
    pub get_notes_behaviour: (u32, u32),

    // From the ChecklistSource trait
    pub get_checklist_behaviour: (u32, u32),
    pub update_checklist_item_behaviour: (u32, u32),
    pub replace_checklist_behaviour: (u32, u32),

    // From the SuggestionSource trait
    pub get_suggestions_behaviour: (u32, u32),
}

impl MockBehaviour {
    pub fn new() -> Self {
        Self::default()
    }

    /// All actions will fail at once, for `n_fails` times
    pub fn fail_now(n_fails: u32) -> Self {
        Self {
            is_suspended: false,
            get_system_deadlines_behaviour: (0, n_fails),
            get_notes_behaviour: (0, n_fails),
            get_checklist_behaviour: (0, n_fails),
            update_checklist_item_behaviour: (0, n_fails),
            replace_checklist_behaviour: (0, n_fails),
            get_suggestions_behaviour: (0, n_fails),
        }
    }

    /// Suspend this mock behaviour until you call `resume`
    pub fn suspend(&mut self) {
        self.is_suspended = true;
    }
    /// Make this behaviour active again
    pub fn resume(&mut self) {
        self.is_suspended = false;
    }

    pub fn can_get_system_deadlines(&mut self) -> PlannerResult<()> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.get_system_deadlines_behaviour, "get_system_deadlines")
    }
    pub fn can_get_notes(&mut self) -> PlannerResult<()> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.get_notes_behaviour, "get_notes")
    }
    pub fn can_get_checklist(&mut self) -> PlannerResult<()> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.get_checklist_behaviour, "get_checklist")
    }
    pub fn can_update_checklist_item(&mut self) -> PlannerResult<()> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.update_checklist_item_behaviour, "update_checklist_item")
    }
    pub fn can_replace_checklist(&mut self) -> PlannerResult<()> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.replace_checklist_behaviour, "replace_checklist")
    }
    pub fn can_get_suggestions(&mut self) -> PlannerResult<()> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.get_suggestions_behaviour, "get_suggestions")
    }
}


/// Return Ok(()) in case the value is `(1+, _)` or `(_, 0)`, or return Err and decrement otherwise
fn decrement(value: &mut (u32, u32), descr: &str) -> PlannerResult<()> {
    let remaining_successes = value.0;
    let remaining_failures = value.1;

    if remaining_successes > 0 {
        value.0 -= 1;
        log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
        Ok(())
    } else if remaining_failures > 0 {
        value.1 -= 1;
        log::debug!("Mock behaviour: failing a {} ({:?})", descr, value);
        Err(PlannerError::server(format!("Mocked behaviour requires this {} to fail this time. ({:?})", descr, value)))
    } else {
        log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
        Ok(())
    }
}
