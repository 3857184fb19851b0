//! This crate provides the client side of the College Ready planner.
//!
//! It talks to the planning backend with the HTTP [`Client`](client::Client), which carries the identity of the
//! signed-in user through an explicit [`Session`](session::Session).
//!
//! The fetched data is then handled by in-memory view models: \
//! the [`DeadlineCalendar`](aggregate::DeadlineCalendar) merges system deadlines and note deadlines, and can export them
//! as an iCal file (see the [`ical`] and [`export`] modules) or as Google Calendar links (see [`gcal`]). \
//! The [`ChecklistView`](checklist_view::ChecklistView) shows the checklist of a college, and applies completion toggles
//! optimistically. \
//! The [`SuggestionBox`](suggestions::SuggestionBox) autocompletes college and major names while the user types.
//!
//! View models only depend on the traits of the [`traits`] module, so that the in-memory [`MemorySource`](memory::MemorySource)
//! can stand in for the server.

pub mod traits;
pub mod error;
pub use error::{PlannerError, PlannerResult};
pub mod config;
pub mod session;
pub use session::{Session, User};

pub mod envelope;
pub mod client;
pub use client::Client;

pub mod deadline;
pub use deadline::{DeadlineOrigin, DeadlineRecord, SystemDeadline};
pub mod note;
pub use note::{NewNote, Note};
pub mod checklist;
pub use checklist::{Checklist, ChecklistState, ItemKey};
pub mod college;
pub mod essay;
pub mod admin;

pub mod aggregate;
pub use aggregate::DeadlineCalendar;
pub mod checklist_view;
pub use checklist_view::ChecklistView;
pub mod debounce;
pub mod suggestions;
pub use suggestions::SuggestionBox;

pub mod event;
pub mod ical;
pub mod export;
pub mod gcal;

pub mod memory;
pub mod mock_behaviour;
pub mod utils;
