use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::null_as_default;
use crate::models::student::Branch;

/// One entry of a job's admissible-branch list: a department or the `"ALL"` wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BranchSelector {
    All,
    Only(Branch),
}

impl BranchSelector {
    pub fn admits(&self, branch: Option<&Branch>) -> bool {
        match self {
            BranchSelector::All => true,
            BranchSelector::Only(wanted) => branch == Some(wanted),
        }
    }
}

impl From<String> for BranchSelector {
    fn from(value: String) -> Self {
        if value.trim().eq_ignore_ascii_case("ALL") {
            BranchSelector::All
        } else {
            BranchSelector::Only(Branch::from(value))
        }
    }
}

impl From<BranchSelector> for String {
    fn from(value: BranchSelector) -> Self {
        value.to_string()
    }
}

impl fmt::Display for BranchSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BranchSelector::All => f.write_str("ALL"),
            BranchSelector::Only(branch) => write!(f, "{branch}"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EligibilityCriteria {
    #[serde(deserialize_with = "null_as_default")]
    pub branches: Vec<BranchSelector>,
    #[serde(rename = "minimumCGPA", deserialize_with = "null_as_default")]
    pub minimum_cgpa: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub allow_backlogs: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub max_backlogs: u32,
    /// Admissible graduation batch years.
    #[serde(deserialize_with = "null_as_default")]
    pub batch: Vec<u16>,
    #[serde(deserialize_with = "null_as_default")]
    pub required_skills: Vec<String>,
}

impl EligibilityCriteria {
    pub fn admits_branch(&self, branch: Option<&Branch>) -> bool {
        self.branches.iter().any(|selector| selector.admits(branch))
    }

    pub fn admits_batch(&self, batch: Option<u16>) -> bool {
        batch.is_some_and(|year| self.batch.contains(&year))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    Active,
    Closed,
    Draft,
    Paused,
}

/// Job posting as stored by the portal. Read-only input to the scoring engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(deserialize_with = "null_as_default")]
    pub eligibility: EligibilityCriteria,
    pub application_deadline: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "null_as_default")]
    pub status: JobStatus,
}
