//! Placement Readiness Score (PRS): a job-independent 0–100 summary of a profile.
//!
//! PRS = round(0.4 × Academic + 0.3 × Skills + 0.2 × Experience + 0.1 × Completeness),
//! each sub-score rounded to an integer in [0, 100] first.
//!
//! `ReadinessScorer::compute` is pure. Persisting the score onto the student
//! record is the caller's job (`PlacementStore::save_readiness_score`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{Academics, StudentProfile};

/// Tier boundaries shared by feedback strings and recommendations.
pub const STRONG_TIER: u8 = 80;
pub const GOOD_TIER: u8 = 60;

const BACKLOG_PENALTY: f64 = 5.0;
const SKILL_POINTS: usize = 5;
const SKILL_BASE_CAP: usize = 80;
const CATEGORY_BONUS: usize = 5;
const PROJECT_POINTS: usize = 15;
const PROJECT_CAP: usize = 70;
const WORK_POINTS: usize = 15;
const WORK_CAP: usize = 30;
const CHECKLIST_ITEMS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessCategory {
    Academic,
    Skills,
    Experience,
    Completeness,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackTier {
    Strong,
    Good,
    NeedsImprovement,
}

impl FeedbackTier {
    pub fn for_score(score: u8) -> Self {
        match score {
            s if s >= STRONG_TIER => FeedbackTier::Strong,
            s if s >= GOOD_TIER => FeedbackTier::Good,
            _ => FeedbackTier::NeedsImprovement,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScore {
    pub score: u8,
    pub max_score: u8,
    pub tier: FeedbackTier,
    pub feedback: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessReport {
    pub score: u8,
    pub breakdown: BTreeMap<ReadinessCategory, CategoryScore>,
    pub recommendations: Vec<String>,
}

impl ReadinessReport {
    pub fn category(&self, category: ReadinessCategory) -> u8 {
        self.breakdown.get(&category).map(|c| c.score).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessWeights {
    pub academic: f64,
    pub skills: f64,
    pub experience: f64,
    pub completeness: f64,
}

impl Default for ReadinessWeights {
    fn default() -> Self {
        Self {
            academic: 0.4,
            skills: 0.3,
            experience: 0.2,
            completeness: 0.1,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReadinessScorer {
    weights: ReadinessWeights,
}

impl ReadinessScorer {
    pub fn new(weights: ReadinessWeights) -> Self {
        Self { weights }
    }

    pub fn score(&self, student: &StudentProfile) -> u8 {
        self.compute(student).score
    }

    pub fn compute(&self, student: &StudentProfile) -> ReadinessReport {
        let academic = academic_score(&student.academics);
        let skills = skills_score(student);
        let experience = experience_score(student);
        let completeness = completeness_score(student);

        let w = &self.weights;
        let weighted = w.academic * f64::from(academic)
            + w.skills * f64::from(skills)
            + w.experience * f64::from(experience)
            + w.completeness * f64::from(completeness);
        let score = weighted.round().clamp(0.0, 100.0) as u8;

        let mut breakdown = BTreeMap::new();
        let mut recommendations = Vec::new();
        for (category, value) in [
            (ReadinessCategory::Academic, academic),
            (ReadinessCategory::Skills, skills),
            (ReadinessCategory::Experience, experience),
            (ReadinessCategory::Completeness, completeness),
        ] {
            let tier = FeedbackTier::for_score(value);
            if tier == FeedbackTier::NeedsImprovement {
                recommendations.push(recommendation(category).to_string());
            }
            breakdown.insert(
                category,
                CategoryScore {
                    score: value,
                    max_score: 100,
                    tier,
                    feedback: feedback(category, tier).to_string(),
                },
            );
        }

        ReadinessReport {
            score,
            breakdown,
            recommendations,
        }
    }
}

/// Non-finite numbers (a corrupt document) count as zero.
fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// `cgpa/10×60 + tenth/100×20 + twelfth/100×20 − 5×backlogs`, clamped to [0, 100].
pub fn academic_score(academics: &Academics) -> u8 {
    let cgpa = finite_or_zero(academics.cgpa);
    let tenth = finite_or_zero(academics.tenth_marks);
    let twelfth = finite_or_zero(academics.twelfth_marks);

    let raw = (cgpa / 10.0) * 60.0 + (tenth / 100.0) * 20.0 + (twelfth / 100.0) * 20.0
        - BACKLOG_PENALTY * f64::from(academics.backlogs);
    raw.clamp(0.0, 100.0).round() as u8
}

/// `min(5 × skills, 80) + 5 × non-empty categories`, clamped to 100.
pub fn skills_score(student: &StudentProfile) -> u8 {
    let categories = student.skills.categories();
    let total: usize = categories
        .iter()
        .map(|items| items.iter().filter(|s| !s.trim().is_empty()).count())
        .sum();
    let diverse = categories
        .iter()
        .filter(|items| items.iter().any(|s| !s.trim().is_empty()))
        .count();

    let raw = (total * SKILL_POINTS).min(SKILL_BASE_CAP) + diverse * CATEGORY_BONUS;
    raw.min(100) as u8
}

/// `min(15 × projects, 70) + min(15 × work entries, 30)`.
pub fn experience_score(student: &StudentProfile) -> u8 {
    let projects = (student.projects.len() * PROJECT_POINTS).min(PROJECT_CAP);
    let work = (student.experience.len() * WORK_POINTS).min(WORK_CAP);
    (projects + work).min(100) as u8
}

/// Share of the 10-item profile checklist that is filled in, as a percentage.
pub fn completeness_score(student: &StudentProfile) -> u8 {
    let info = &student.personal_info;
    let academics = &student.academics;
    let filled = |s: &str| !s.trim().is_empty();
    let positive = |v: f64| v.is_finite() && v > 0.0;

    let checklist = [
        filled(&info.first_name),
        filled(&info.last_name),
        filled(&info.phone),
        filled(&info.roll_number),
        info.branch.is_some(),
        info.batch.is_some(),
        positive(academics.cgpa),
        positive(academics.tenth_marks),
        positive(academics.twelfth_marks),
        student.skills.all().any(filled),
    ];
    let done = checklist.iter().filter(|item| **item).count();

    ((done * 100) as f64 / CHECKLIST_ITEMS as f64).round() as u8
}

fn feedback(category: ReadinessCategory, tier: FeedbackTier) -> &'static str {
    use FeedbackTier::*;
    use ReadinessCategory::*;

    match (category, tier) {
        (Academic, Strong) => "Excellent academic record",
        (Academic, Good) => "Good academic standing",
        (Academic, NeedsImprovement) => "Academic performance needs improvement",
        (Skills, Strong) => "Strong and diverse skill set",
        (Skills, Good) => "Good range of skills",
        (Skills, NeedsImprovement) => "Add more skills across categories",
        (Experience, Strong) => "Great hands-on experience",
        (Experience, Good) => "Good practical exposure",
        (Experience, NeedsImprovement) => "Add projects or internships",
        (Completeness, Strong) => "Profile is complete",
        (Completeness, Good) => "Profile is mostly complete",
        (Completeness, NeedsImprovement) => "Complete the missing profile fields",
    }
}

fn recommendation(category: ReadinessCategory) -> &'static str {
    match category {
        ReadinessCategory::Academic => {
            "Clear pending backlogs and keep your CGPA and board marks up to date"
        }
        ReadinessCategory::Skills => {
            "List technical, programming, framework and tool skills you can demonstrate"
        }
        ReadinessCategory::Experience => {
            "Add projects with their technology stack, or an internship you have completed"
        }
        ReadinessCategory::Completeness => {
            "Fill in name, phone, roll number, branch, batch and academic marks"
        }
    }
}
