//! Colleges, and what the API knows about them

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A deadline listed on a college profile
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CollegeDeadline {
    #[serde(rename = "type", default)]
    pub deadline_type: String,
    #[serde(default)]
    pub date: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollegeDetails {
    #[serde(default)]
    pub deadlines: Vec<CollegeDeadline>,
    #[serde(default)]
    pub essay_prompts: Vec<String>,
    /// E.g. `transcripts`, `SAT_ACT`, `TeacherRecommendations`
    #[serde(default)]
    pub requirements: BTreeMap<String, Value>,
}

/// The profile of a college, as returned by a college search
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CollegeInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub links: Vec<String>,
    #[serde(default)]
    pub info: Option<CollegeDetails>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A college the user follows
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCollege {
    pub college_name: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl UserCollege {
    pub fn new<S: ToString>(college_name: S) -> Self {
        Self { college_name: college_name.to_string(), extra: BTreeMap::new() }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CollegeResources {
    #[serde(default)]
    pub links: Vec<String>,
    #[serde(default)]
    pub tips: Vec<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Ratios are between 0 and 1
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EthnicBreakdown {
    pub white: Option<f64>,
    pub black: Option<f64>,
    pub asian: Option<f64>,
    pub hispanic: Option<f64>,
    pub unknown: Option<f64>,
    pub first_gen: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Demographics {
    pub school_city: Option<String>,
    pub school_state: Option<String>,
    pub school_size: Option<u64>,
    pub school_grad_size: Option<u64>,
    pub admission_rate: Option<f64>,
    pub student_fac_ratio: Option<f64>,
    #[serde(default)]
    pub demographics: EthnicBreakdown,
}

impl Demographics {
    /// The admission rate as a percentage, e.g. `Some(4.0)` for a 4% rate
    pub fn admission_rate_percent(&self) -> Option<f64> {
        self.admission_rate.map(|rate| rate * 100.0)
    }
}

/// The statistics of admitted students of a major
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MajorStats {
    pub average_weighted_gpa: Option<Value>,
    pub average_sat_score: Option<Value>,
    #[serde(default)]
    pub extracurriculars: Vec<String>,
    #[serde(default)]
    pub essaytopics: Vec<String>,
    pub description: Option<String>,
}

/// Which kind of suggestions to fetch
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SuggestionKind {
    College,
    Major,
}
