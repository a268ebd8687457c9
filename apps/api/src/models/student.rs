use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::null_as_default;

/// Academic department a student belongs to.
///
/// Parsing is case-insensitive. Departments the portal does not know about yet
/// are kept verbatim (upper-cased) in `Other` so a profile never fails to load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Branch {
    Cse,
    It,
    Ece,
    Eee,
    Mech,
    Civil,
    Chem,
    Other(String),
}

impl Branch {
    pub fn as_str(&self) -> &str {
        match self {
            Branch::Cse => "CSE",
            Branch::It => "IT",
            Branch::Ece => "ECE",
            Branch::Eee => "EEE",
            Branch::Mech => "MECH",
            Branch::Civil => "CIVIL",
            Branch::Chem => "CHEM",
            Branch::Other(name) => name,
        }
    }
}

impl From<&str> for Branch {
    fn from(value: &str) -> Self {
        let upper = value.trim().to_uppercase();
        match upper.as_str() {
            "CSE" => Branch::Cse,
            "IT" => Branch::It,
            "ECE" => Branch::Ece,
            "EEE" => Branch::Eee,
            "MECH" => Branch::Mech,
            "CIVIL" => Branch::Civil,
            "CHEM" => Branch::Chem,
            _ => Branch::Other(upper),
        }
    }
}

impl From<String> for Branch {
    fn from(value: String) -> Self {
        Branch::from(value.as_str())
    }
}

impl From<Branch> for String {
    fn from(value: Branch) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersonalInfo {
    #[serde(deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(deserialize_with = "null_as_default")]
    pub roll_number: String,
    pub branch: Option<Branch>,
    /// Graduation batch year, e.g. 2025.
    pub batch: Option<u16>,
    pub current_semester: Option<u8>,
}

/// Academic record. A freshly created profile carries zeros, which the
/// readiness checklist treats as "not filled in".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Academics {
    /// 0.0 – 10.0
    #[serde(deserialize_with = "null_as_default")]
    pub cgpa: f64,
    /// 0.0 – 100.0
    #[serde(deserialize_with = "null_as_default")]
    pub tenth_marks: f64,
    /// 0.0 – 100.0
    #[serde(deserialize_with = "null_as_default")]
    pub twelfth_marks: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub backlogs: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Skills {
    #[serde(deserialize_with = "null_as_default")]
    pub technical: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub programming: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub frameworks: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub tools: Vec<String>,
}

impl Skills {
    /// The four category lists, in declaration order.
    pub fn categories(&self) -> [&[String]; 4] {
        [
            &self.technical,
            &self.programming,
            &self.frameworks,
            &self.tools,
        ]
    }

    /// Every declared skill across all categories, blanks included.
    pub fn all(&self) -> impl Iterator<Item = &str> {
        self.categories()
            .into_iter()
            .flat_map(|category| category.iter().map(String::as_str))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    #[serde(deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(deserialize_with = "null_as_default")]
    pub role: String,
    /// internship | full_time | part_time | freelance
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
}

/// Student profile as stored by the portal. Read-only input to the scoring engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StudentProfile {
    pub id: Uuid,
    #[serde(deserialize_with = "null_as_default")]
    pub personal_info: PersonalInfo,
    #[serde(deserialize_with = "null_as_default")]
    pub academics: Academics,
    #[serde(deserialize_with = "null_as_default")]
    pub skills: Skills,
    #[serde(deserialize_with = "null_as_default")]
    pub projects: Vec<Project>,
    #[serde(deserialize_with = "null_as_default")]
    pub experience: Vec<Experience>,
    /// Last persisted PRS. Written by the caller, never by the engine.
    pub placement_readiness_score: Option<u8>,
}
