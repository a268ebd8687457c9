//! Skill normalization and the skill-match score.
//!
//! Algorithm for `SkillMatcher::score`:
//! 1. Normalize both lists (flatten categories, trim, lowercase, drop blanks).
//! 2. No required skills left → flat `NO_REQUIREMENT_SCORE` (85).
//! 3. For each required skill:
//!    - exact: equal to some student skill
//!    - related: substring containment either way, or linked in the taxonomy
//!    - otherwise missing
//! 4. score = round(exact/total × 70 + related/total × 30), capped at 100.
//!
//! Exact takes precedence, so a required skill is never counted twice.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::models::Skills;
use crate::scoring::taxonomy::SkillTaxonomy;

/// Score returned when a job lists no required skills.
pub const NO_REQUIREMENT_SCORE: u8 = 85;

const EXACT_WEIGHT: f64 = 70.0;
const RELATED_WEIGHT: f64 = 30.0;

/// Trims and lowercases a skill. Blank input yields `None`.
pub fn normalize_skill(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

pub fn normalize_skills<'a>(raw: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    raw.into_iter().filter_map(normalize_skill).collect()
}

/// Case-insensitive containment used by the eligibility skill component:
/// `required` matches when some student skill contains it.
/// Both sides must already be normalized.
pub fn has_skill_containing(student_skills: &[String], required: &str) -> bool {
    student_skills.iter().any(|skill| skill.contains(required))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillMatchKind {
    Exact,
    Related,
    Missing,
}

/// Per-requirement classification, kept for UI display of gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillMatchEntry {
    pub required: String,
    pub kind: SkillMatchKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillMatchReport {
    pub score: u8,
    pub entries: Vec<SkillMatchEntry>,
}

impl SkillMatchReport {
    pub fn count(&self, kind: SkillMatchKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }
}

/// Exact/related skill overlap scorer. Holds the injected taxonomy.
#[derive(Debug, Clone)]
pub struct SkillMatcher {
    taxonomy: Arc<SkillTaxonomy>,
}

impl SkillMatcher {
    pub fn new(taxonomy: Arc<SkillTaxonomy>) -> Self {
        Self { taxonomy }
    }

    pub fn taxonomy(&self) -> &SkillTaxonomy {
        &self.taxonomy
    }

    pub fn score(&self, student_skills: &Skills, required_skills: &[String]) -> u8 {
        self.report(student_skills, required_skills).score
    }

    pub fn report(&self, student_skills: &Skills, required_skills: &[String]) -> SkillMatchReport {
        let required = normalize_skills(required_skills.iter().map(String::as_str));
        if required.is_empty() {
            return SkillMatchReport {
                score: NO_REQUIREMENT_SCORE,
                entries: vec![],
            };
        }

        let owned = normalize_skills(student_skills.all());

        let entries: Vec<SkillMatchEntry> = required
            .into_iter()
            .map(|req| {
                let kind = self.classify(&owned, &req);
                SkillMatchEntry {
                    required: req,
                    kind,
                }
            })
            .collect();

        let total = entries.len() as f64;
        let exact = entries
            .iter()
            .filter(|e| e.kind == SkillMatchKind::Exact)
            .count() as f64;
        let related = entries
            .iter()
            .filter(|e| e.kind == SkillMatchKind::Related)
            .count() as f64;

        let raw = (exact / total) * EXACT_WEIGHT + (related / total) * RELATED_WEIGHT;
        let score = raw.round().clamp(0.0, 100.0) as u8;

        SkillMatchReport { score, entries }
    }

    fn classify(&self, owned: &[String], required: &str) -> SkillMatchKind {
        if owned.iter().any(|skill| skill == required) {
            return SkillMatchKind::Exact;
        }

        let related = owned.iter().any(|skill| {
            skill.contains(required)
                || required.contains(skill.as_str())
                || self.taxonomy.are_related(required, skill)
        });

        if related {
            SkillMatchKind::Related
        } else {
            SkillMatchKind::Missing
        }
    }
}

impl Default for SkillMatcher {
    fn default() -> Self {
        Self::new(Arc::new(SkillTaxonomy::default()))
    }
}
