//! This module handles the generation of iCal files
//!
//! It is a wrapper around the `ics` crate, fed with the events derived from deadlines

mod builder;
pub use builder::build_calendar;
pub use builder::export_deadlines;
pub use builder::format_date_time;

use crate::config::{self, ORG_NAME, PRODUCT_NAME};

pub fn default_prod_id() -> String {
    format!("-//{}//{}//EN", config::get(&ORG_NAME), config::get(&PRODUCT_NAME))
}
