//! Related-skill taxonomy: canonical skill → set of related terms.
//!
//! Immutable once built. `AppState` holds it behind an `Arc` so it can be swapped
//! at startup (`SKILL_TAXONOMY_PATH`) without touching the matching algorithm.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::scoring::skills::normalize_skill;

const BUILT_IN_GROUPS: &[(&str, &[&str])] = &[
    (
        "javascript",
        &["js", "node", "nodejs", "node.js", "react", "vue", "angular", "typescript", "express"],
    ),
    ("python", &["django", "flask", "pandas", "numpy", "fastapi"]),
    ("java", &["spring", "spring boot", "hibernate", "maven"]),
    ("c++", &["cpp", "stl"]),
    ("sql", &["mysql", "postgresql", "postgres", "sqlite", "oracle"]),
    ("nosql", &["mongodb", "redis", "cassandra", "dynamodb"]),
    (
        "machine learning",
        &["ml", "tensorflow", "pytorch", "scikit-learn", "keras"],
    ),
    ("css", &["sass", "tailwind", "bootstrap"]),
    ("aws", &["ec2", "s3", "lambda", "cloud"]),
    ("docker", &["kubernetes", "containers", "k8s"]),
    ("git", &["github", "gitlab", "version control"]),
];

/// Map of canonical skill → related terms. Keys and terms are stored normalized
/// (trimmed, lowercase); blanks are dropped.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "HashMap<String, Vec<String>>")]
pub struct SkillTaxonomy {
    groups: HashMap<String, HashSet<String>>,
}

impl SkillTaxonomy {
    pub fn new<K, I, V>(groups: impl IntoIterator<Item = (K, I)>) -> Self
    where
        K: AsRef<str>,
        I: IntoIterator<Item = V>,
        V: AsRef<str>,
    {
        Self::empty().extend(groups)
    }

    pub fn empty() -> Self {
        Self {
            groups: HashMap::new(),
        }
    }

    /// Returns a new taxonomy with `groups` merged in. Terms for an existing
    /// canonical skill are unioned.
    pub fn extend<K, I, V>(mut self, groups: impl IntoIterator<Item = (K, I)>) -> Self
    where
        K: AsRef<str>,
        I: IntoIterator<Item = V>,
        V: AsRef<str>,
    {
        for (canonical, terms) in groups {
            let Some(canonical) = normalize_skill(canonical.as_ref()) else {
                continue;
            };
            let entry = self.groups.entry(canonical).or_default();
            entry.extend(
                terms
                    .into_iter()
                    .filter_map(|term| normalize_skill(term.as_ref())),
            );
        }
        self
    }

    /// Loads a taxonomy from a JSON object of `{ "canonical": ["term", ...] }`.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read skill taxonomy at {}", path.display()))?;
        let taxonomy: SkillTaxonomy = serde_json::from_str(&raw)
            .with_context(|| format!("Skill taxonomy at {} is not valid JSON", path.display()))?;
        Ok(taxonomy)
    }

    /// True when one side is a canonical skill and the other is one of its terms.
    /// Both arguments must already be normalized. Siblings under the same
    /// canonical skill (e.g. "react" and "vue") are not related to each other.
    pub fn are_related(&self, a: &str, b: &str) -> bool {
        let forward = self.groups.get(a).is_some_and(|terms| terms.contains(b));
        let backward = self.groups.get(b).is_some_and(|terms| terms.contains(a));
        forward || backward
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl Default for SkillTaxonomy {
    fn default() -> Self {
        Self::new(
            BUILT_IN_GROUPS
                .iter()
                .map(|(canonical, terms)| (*canonical, terms.iter().copied())),
        )
    }
}

impl From<HashMap<String, Vec<String>>> for SkillTaxonomy {
    fn from(value: HashMap<String, Vec<String>>) -> Self {
        Self::new(value)
    }
}
