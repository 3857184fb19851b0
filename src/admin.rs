//! Records shown on the admin dashboard, and how to filter them

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The role that grants access to the admin dashboard
pub const ADMIN_ROLE: &str = "admin";

pub fn is_admin(role: &str) -> bool {
    role == ADMIN_ROLE
}

/// Dashboard counters. Their names are decided by the server.
pub type AdminMetrics = BTreeMap<String, Value>;

/// A record of the admin dashboard that can be searched
pub trait Searchable {
    /// The texts the search term is matched against
    fn search_keys(&self) -> Vec<&str>;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NamedRecord {
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Searchable for NamedRecord {
    fn search_keys(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    #[serde(default)]
    pub user_id: String,
    pub role: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Searchable for StaffMember {
    fn search_keys(&self) -> Vec<&str> {
        let mut keys = vec![self.user_id.as_str()];
        if let Some(role) = &self.role {
            keys.push(role);
        }
        keys
    }
}

/// A per-user document (followed colleges, profile notes)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(default)]
    pub user_id: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Searchable for UserRecord {
    fn search_keys(&self) -> Vec<&str> {
        vec![self.user_id.as_str()]
    }
}

/// Everything the admin dashboard shows
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AdminDashboard {
    pub metrics: AdminMetrics,
    pub colleges: Vec<NamedRecord>,
    pub staff: Vec<StaffMember>,
    pub major_colleges: Vec<NamedRecord>,
    pub user_colleges: Vec<UserRecord>,
    pub profile_notes: Vec<UserRecord>,
}

/// Keep the records that contain `term` in one of their search keys (case-insensitive).
/// An empty term keeps everything.
pub fn filter_records<'a, T: Searchable>(records: &'a [T], term: &str) -> Vec<&'a T> {
    let term = term.trim().to_lowercase();
    records.iter()
        .filter(|record| {
            term.is_empty() || record.search_keys().iter().any(|key| key.to_lowercase().contains(&term))
        })
        .collect()
}
