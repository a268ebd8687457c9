//! MatchRanker folds the eligibility gate, skill overlap and PRS into one
//! 0–100 compatibility score for a student-job pair.
//!
//! overall = round(0.4 × eligibility + 0.35 × skill_match + 0.25 × prs)
//!
//! `eligibility` here is binary (100 if the gate passes, else 0). The graded
//! eligibility score is only used by the eligibility rankings.
//!
//! Fail-closed: `calculate_match` never errors. Malformed input yields
//! `MatchResult::zeroed()` so a broken record can never rank highly.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::ScoringError;
use crate::models::{Job, StudentProfile};
use crate::scoring::eligibility::EligibilityEvaluator;
use crate::scoring::readiness::ReadinessScorer;
use crate::scoring::skills::SkillMatcher;
use crate::scoring::taxonomy::SkillTaxonomy;
use crate::scoring::{sort_ranked, Ranked};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchWeights {
    pub eligibility: f64,
    pub skill_match: f64,
    pub prs: f64,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            eligibility: 0.4,
            skill_match: 0.35,
            prs: 0.25,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchBreakdown {
    /// 0 or 100.
    pub eligibility: u8,
    pub skill_match: u8,
    pub prs: u8,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub overall_score: u8,
    pub breakdown: MatchBreakdown,
}

impl MatchResult {
    pub fn zeroed() -> Self {
        Self::default()
    }
}

/// Weighted sum of the three inputs, each expected in [0, 100].
pub fn overall_score(
    eligibility: u8,
    skill_match: u8,
    prs: u8,
    weights: &MatchWeights,
) -> Result<u8, ScoringError> {
    let raw = weights.eligibility * f64::from(eligibility)
        + weights.skill_match * f64::from(skill_match)
        + weights.prs * f64::from(prs);

    if !raw.is_finite() {
        return Err(ScoringError::ComputationFailure(format!(
            "overall score is not finite ({raw})"
        )));
    }
    Ok(raw.round().clamp(0.0, 100.0) as u8)
}

/// Stateless pipeline over the two leaf scorers and the skill matcher.
#[derive(Debug, Clone)]
pub struct MatchRanker {
    eligibility: EligibilityEvaluator,
    readiness: ReadinessScorer,
    skills: SkillMatcher,
    weights: MatchWeights,
}

impl MatchRanker {
    pub fn new(taxonomy: Arc<SkillTaxonomy>) -> Self {
        Self {
            eligibility: EligibilityEvaluator::default(),
            readiness: ReadinessScorer::default(),
            skills: SkillMatcher::new(taxonomy),
            weights: MatchWeights::default(),
        }
    }

    pub fn with_eligibility(mut self, eligibility: EligibilityEvaluator) -> Self {
        self.eligibility = eligibility;
        self
    }

    pub fn with_readiness(mut self, readiness: ReadinessScorer) -> Self {
        self.readiness = readiness;
        self
    }

    pub fn with_weights(mut self, weights: MatchWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn eligibility(&self) -> &EligibilityEvaluator {
        &self.eligibility
    }

    pub fn readiness(&self) -> &ReadinessScorer {
        &self.readiness
    }

    pub fn skills(&self) -> &SkillMatcher {
        &self.skills
    }

    pub fn skill_match_score(&self, student: &StudentProfile, job: &Job) -> u8 {
        self.skills
            .score(&student.skills, &job.eligibility.required_skills)
    }

    /// Full pipeline. Errors on out-of-range or non-finite numerics.
    pub fn try_calculate_match(
        &self,
        student: &StudentProfile,
        job: &Job,
    ) -> Result<MatchResult, ScoringError> {
        validate_student(student)?;
        validate_job(job)?;

        let eligibility = if self.eligibility.is_eligible(student, job) {
            100
        } else {
            0
        };
        let skill_match = self.skill_match_score(student, job);
        let prs = self.readiness.score(student);
        let overall = overall_score(eligibility, skill_match, prs, &self.weights)?;

        Ok(MatchResult {
            overall_score: overall,
            breakdown: MatchBreakdown {
                eligibility,
                skill_match,
                prs,
            },
        })
    }

    /// Fail-closed wrapper: any error becomes the zeroed result.
    pub fn calculate_match(&self, student: &StudentProfile, job: &Job) -> MatchResult {
        match self.try_calculate_match(student, job) {
            Ok(result) => result,
            Err(e) => {
                warn!(student_id = %student.id, job_id = %job.id, "match scoring failed closed: {e}");
                MatchResult::zeroed()
            }
        }
    }

    /// Scores raw documents as loaded from the document store.
    ///
    /// `null` nested blocks and fields decode as empty, so they only zero their
    /// own component. A root that is not an object, or a field of the wrong
    /// type, yields the zeroed result.
    pub fn calculate_match_value(&self, student: &Value, job: &Value) -> MatchResult {
        let parsed = decode::<StudentProfile>(student, "student")
            .and_then(|s| decode::<Job>(job, "job").map(|j| (s, j)));

        match parsed {
            Ok((student, job)) => self.calculate_match(&student, &job),
            Err(e) => {
                warn!("match scoring failed closed: {e}");
                MatchResult::zeroed()
            }
        }
    }

    /// Jobs ranked for a student by overall match score. Ties keep input order.
    pub fn rank_jobs_by_match<'a>(
        &self,
        student: &StudentProfile,
        jobs: &'a [Job],
    ) -> Vec<Ranked<&'a Job, MatchResult>> {
        let ranked = jobs
            .iter()
            .map(|job| Ranked::new(job, self.calculate_match(student, job)))
            .collect();
        debug!(student_id = %student.id, jobs = jobs.len(), "ranked jobs by match");
        sort_ranked(ranked, |m| m.overall_score)
    }

    /// Applicants ranked for a job by overall match score. Ties keep input order.
    pub fn rank_applicants_by_match<'a>(
        &self,
        job: &Job,
        students: &'a [StudentProfile],
    ) -> Vec<Ranked<&'a StudentProfile, MatchResult>> {
        let ranked = students
            .iter()
            .map(|student| Ranked::new(student, self.calculate_match(student, job)))
            .collect();
        debug!(job_id = %job.id, applicants = students.len(), "ranked applicants by match");
        sort_ranked(ranked, |m| m.overall_score)
    }
}

impl Default for MatchRanker {
    fn default() -> Self {
        Self::new(Arc::new(SkillTaxonomy::default()))
    }
}

fn decode<T: serde::de::DeserializeOwned>(value: &Value, what: &str) -> Result<T, ScoringError> {
    if !value.is_object() {
        return Err(ScoringError::InvalidInput(format!(
            "{what} must be a JSON object"
        )));
    }
    T::deserialize(value).map_err(|e| ScoringError::InvalidInput(format!("{what}: {e}")))
}

fn check_range(name: &str, value: f64, max: f64) -> Result<(), ScoringError> {
    if !value.is_finite() || !(0.0..=max).contains(&value) {
        return Err(ScoringError::InvalidInput(format!(
            "{name} must be within 0..={max}, got {value}"
        )));
    }
    Ok(())
}

fn validate_student(student: &StudentProfile) -> Result<(), ScoringError> {
    let academics = &student.academics;
    check_range("cgpa", academics.cgpa, 10.0)?;
    check_range("tenthMarks", academics.tenth_marks, 100.0)?;
    check_range("twelfthMarks", academics.twelfth_marks, 100.0)
}

fn validate_job(job: &Job) -> Result<(), ScoringError> {
    check_range("minimumCGPA", job.eligibility.minimum_cgpa, 10.0)
}
