//! Eligibility gate and graded eligibility score for a student-job pair.
//!
//! The gate (`is_eligible`) is four hard AND-ed checks. The score is computed
//! independently of the gate, so ineligible pairs still get an advisory number.
//! Its backlog rule is stricter than the gate's: with `allow_backlogs = true`
//! the gate always passes, but the score still requires `backlogs <= max_backlogs`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Job, JobStatus, StudentProfile};
use crate::scoring::skills::{has_skill_containing, normalize_skills};
use crate::scoring::{sort_ranked, Ranked};

/// How the CGPA component scales once the cutoff is cleared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CgpaScaling {
    /// `min(max, cgpa / minimum_cgpa × max)`; a zero cutoff awards the full max.
    ///
    /// The component is only awarded once `cgpa >= minimum_cgpa`, where the
    /// ratio is already at least 1, so under this scaling it is effectively
    /// all-or-nothing (0 or `max`). Use `TenPointScale` to grade above the cutoff.
    #[default]
    RelativeToCutoff,
    /// `min(max, cgpa / 10 × max)`.
    TenPointScale,
}

/// Component maxima of the eligibility score. The defaults sum to 100.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibilityWeights {
    pub cgpa: f64,
    pub branch: f64,
    pub backlogs: f64,
    pub batch: f64,
    pub skills: f64,
    pub cgpa_scaling: CgpaScaling,
}

impl Default for EligibilityWeights {
    fn default() -> Self {
        Self {
            cgpa: 30.0,
            branch: 25.0,
            backlogs: 20.0,
            batch: 15.0,
            skills: 10.0,
            cgpa_scaling: CgpaScaling::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityGate {
    Cgpa,
    Branch,
    Backlogs,
    Batch,
}

/// Unrounded per-component contributions, for audit display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EligibilityComponents {
    pub cgpa: f64,
    pub branch: f64,
    pub backlogs: f64,
    pub batch: f64,
    pub skills: f64,
}

impl EligibilityComponents {
    pub fn total(&self) -> f64 {
        self.cgpa + self.branch + self.backlogs + self.batch + self.skills
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityDecision {
    pub eligible: bool,
    pub score: u8,
    pub unmet: Vec<EligibilityGate>,
    pub components: EligibilityComponents,
}

/// Reason a student cannot submit an application right now.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ApplicationBlocker {
    Ineligible(EligibilityGate),
    JobNotActive(JobStatus),
    DeadlinePassed(DateTime<Utc>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationCheck {
    pub allowed: bool,
    pub blockers: Vec<ApplicationBlocker>,
}

/// Stateless evaluator applying the eligibility rules to a profile.
#[derive(Debug, Clone, Default)]
pub struct EligibilityEvaluator {
    weights: EligibilityWeights,
}

impl EligibilityEvaluator {
    pub fn new(weights: EligibilityWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &EligibilityWeights {
        &self.weights
    }

    /// Gates the student fails for this job, in a fixed order.
    pub fn unmet_gates(&self, student: &StudentProfile, job: &Job) -> Vec<EligibilityGate> {
        let criteria = &job.eligibility;
        let info = &student.personal_info;
        let academics = &student.academics;

        // NaN compares false, so a corrupt cgpa fails the gate.
        let cgpa_ok = academics.cgpa >= criteria.minimum_cgpa;

        let mut unmet = Vec::new();
        if !cgpa_ok {
            unmet.push(EligibilityGate::Cgpa);
        }
        if !criteria.admits_branch(info.branch.as_ref()) {
            unmet.push(EligibilityGate::Branch);
        }
        if !(criteria.allow_backlogs || academics.backlogs <= criteria.max_backlogs) {
            unmet.push(EligibilityGate::Backlogs);
        }
        if !criteria.admits_batch(info.batch) {
            unmet.push(EligibilityGate::Batch);
        }
        unmet
    }

    pub fn is_eligible(&self, student: &StudentProfile, job: &Job) -> bool {
        self.unmet_gates(student, job).is_empty()
    }

    pub fn components(&self, student: &StudentProfile, job: &Job) -> EligibilityComponents {
        let w = &self.weights;
        let criteria = &job.eligibility;
        let info = &student.personal_info;
        let academics = &student.academics;

        let cgpa = if academics.cgpa >= criteria.minimum_cgpa {
            let scaled = match w.cgpa_scaling {
                CgpaScaling::RelativeToCutoff if criteria.minimum_cgpa > 0.0 => {
                    academics.cgpa / criteria.minimum_cgpa * w.cgpa
                }
                CgpaScaling::RelativeToCutoff => w.cgpa,
                CgpaScaling::TenPointScale => academics.cgpa / 10.0 * w.cgpa,
            };
            scaled.min(w.cgpa).max(0.0)
        } else {
            0.0
        };

        let branch = if criteria.admits_branch(info.branch.as_ref()) {
            w.branch
        } else {
            0.0
        };

        let backlogs_ok = (criteria.allow_backlogs || academics.backlogs == 0)
            && academics.backlogs <= criteria.max_backlogs;
        let backlogs = if backlogs_ok { w.backlogs } else { 0.0 };

        let batch = if criteria.admits_batch(info.batch) {
            w.batch
        } else {
            0.0
        };

        let required = normalize_skills(criteria.required_skills.iter().map(String::as_str));
        let skills = if required.is_empty() {
            w.skills
        } else {
            let owned = normalize_skills(student.skills.all());
            let matched = required
                .iter()
                .filter(|req| has_skill_containing(&owned, req))
                .count();
            matched as f64 / required.len() as f64 * w.skills
        };

        EligibilityComponents {
            cgpa,
            branch,
            backlogs,
            batch,
            skills,
        }
    }

    /// Graded 0–100 score; computed whether or not the gate passes.
    pub fn score(&self, student: &StudentProfile, job: &Job) -> u8 {
        to_score(self.components(student, job).total())
    }

    pub fn evaluate(&self, student: &StudentProfile, job: &Job) -> EligibilityDecision {
        let unmet = self.unmet_gates(student, job);
        let components = self.components(student, job);
        EligibilityDecision {
            eligible: unmet.is_empty(),
            score: to_score(components.total()),
            unmet,
            components,
        }
    }

    /// Eligibility plus the job-side window: the posting must be active and
    /// `now` must not be past the deadline.
    pub fn check_application(
        &self,
        student: &StudentProfile,
        job: &Job,
        now: DateTime<Utc>,
    ) -> ApplicationCheck {
        let mut blockers: Vec<ApplicationBlocker> = self
            .unmet_gates(student, job)
            .into_iter()
            .map(ApplicationBlocker::Ineligible)
            .collect();

        if job.status != JobStatus::Active {
            blockers.push(ApplicationBlocker::JobNotActive(job.status));
        }
        if let Some(deadline) = job.application_deadline {
            if now > deadline {
                blockers.push(ApplicationBlocker::DeadlinePassed(deadline));
            }
        }

        ApplicationCheck {
            allowed: blockers.is_empty(),
            blockers,
        }
    }

    /// Eligible jobs for a student, best eligibility score first.
    /// Ties keep input order.
    pub fn rank_eligible_jobs_for_student<'a>(
        &self,
        student: &StudentProfile,
        jobs: &'a [Job],
    ) -> Vec<Ranked<&'a Job>> {
        let ranked: Vec<_> = jobs
            .iter()
            .filter(|job| self.is_eligible(student, job))
            .map(|job| Ranked::new(job, self.score(student, job)))
            .collect();

        debug!(
            student_id = %student.id,
            candidates = jobs.len(),
            eligible = ranked.len(),
            "ranked eligible jobs"
        );
        sort_ranked(ranked, |score| *score)
    }

    /// Eligible students for a job, best eligibility score first.
    /// Ties keep input order.
    pub fn rank_eligible_students_for_job<'a>(
        &self,
        job: &Job,
        students: &'a [StudentProfile],
    ) -> Vec<Ranked<&'a StudentProfile>> {
        let ranked: Vec<_> = students
            .iter()
            .filter(|student| self.is_eligible(student, job))
            .map(|student| Ranked::new(student, self.score(student, job)))
            .collect();

        debug!(
            job_id = %job.id,
            candidates = students.len(),
            eligible = ranked.len(),
            "ranked eligible students"
        );
        sort_ranked(ranked, |score| *score)
    }
}

fn to_score(raw: f64) -> u8 {
    if raw.is_finite() {
        raw.round().clamp(0.0, 100.0) as u8
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Branch, BranchSelector};
    use crate::scoring::test_support::{job, student};
    use chrono::Duration;

    #[test]
    fn test_scenario_full_marks_when_all_components_hold() {
        let evaluator = EligibilityEvaluator::default();
        let (s, j) = (student(), job());

        assert!(evaluator.is_eligible(&s, &j));
        assert_eq!(evaluator.score(&s, &j), 100);
    }

    #[test]
    fn test_batch_gate_alone_flips_eligibility() {
        let evaluator = EligibilityEvaluator::default();
        let s = student();
        let mut j = job();
        j.eligibility.batch = vec![2022];

        let decision = evaluator.evaluate(&s, &j);
        assert!(!decision.eligible);
        assert_eq!(decision.unmet, vec![EligibilityGate::Batch]);
        assert_eq!(decision.score, 85);
    }

    #[test]
    fn test_cgpa_gate_alone_flips_eligibility() {
        let evaluator = EligibilityEvaluator::default();
        let mut s = student();
        s.academics.cgpa = 6.99;
        let j = job();

        assert_eq!(evaluator.unmet_gates(&s, &j), vec![EligibilityGate::Cgpa]);
        assert_eq!(evaluator.components(&s, &j).cgpa, 0.0);
    }

    #[test]
    fn test_branch_gate_alone_flips_eligibility() {
        let evaluator = EligibilityEvaluator::default();
        let mut s = student();
        s.personal_info.branch = Some(Branch::Mech);

        assert_eq!(
            evaluator.unmet_gates(&s, &job()),
            vec![EligibilityGate::Branch]
        );
    }

    #[test]
    fn test_backlog_gate_alone_flips_eligibility() {
        let evaluator = EligibilityEvaluator::default();
        let mut s = student();
        s.academics.backlogs = 1;

        assert_eq!(
            evaluator.unmet_gates(&s, &job()),
            vec![EligibilityGate::Backlogs]
        );
    }

    #[test]
    fn test_cgpa_exactly_at_cutoff_passes() {
        let evaluator = EligibilityEvaluator::default();
        let mut s = student();
        s.academics.cgpa = 7.0;
        assert!(evaluator.is_eligible(&s, &job()));
        assert_eq!(evaluator.components(&s, &job()).cgpa, 30.0);
    }

    #[test]
    fn test_all_wildcard_admits_any_branch() {
        let evaluator = EligibilityEvaluator::default();
        let mut s = student();
        s.personal_info.branch = Some(Branch::Civil);
        let mut j = job();
        j.eligibility.branches = vec![BranchSelector::All];

        assert!(evaluator.is_eligible(&s, &j));
        assert_eq!(evaluator.components(&s, &j).branch, 25.0);
    }

    #[test]
    fn test_allow_backlogs_bypasses_gate_but_not_score_cap() {
        let evaluator = EligibilityEvaluator::default();
        let mut s = student();
        s.academics.backlogs = 3;
        let mut j = job();
        j.eligibility.allow_backlogs = true;
        j.eligibility.max_backlogs = 2;

        assert!(evaluator.is_eligible(&s, &j));
        assert_eq!(evaluator.components(&s, &j).backlogs, 0.0);

        j.eligibility.max_backlogs = 3;
        assert_eq!(evaluator.components(&s, &j).backlogs, 20.0);
    }

    #[test]
    fn test_backlogs_within_max_but_not_allowed_scores_zero() {
        // Gate passes (1 <= 2) but the score requires zero backlogs when not allowed.
        let evaluator = EligibilityEvaluator::default();
        let mut s = student();
        s.academics.backlogs = 1;
        let mut j = job();
        j.eligibility.max_backlogs = 2;

        assert!(evaluator.is_eligible(&s, &j));
        assert_eq!(evaluator.components(&s, &j).backlogs, 0.0);
    }

    #[test]
    fn test_no_required_skills_awards_full_ten() {
        let evaluator = EligibilityEvaluator::default();
        let mut s = student();
        s.skills = Default::default();
        let mut j = job();
        j.eligibility.required_skills.clear();

        assert_eq!(evaluator.components(&s, &j).skills, 10.0);
    }

    #[test]
    fn test_partial_skill_match_is_proportional() {
        let evaluator = EligibilityEvaluator::default();
        let s = student();
        let mut j = job();
        j.eligibility.required_skills = vec!["react".into(), "Kubernetes".into()];

        assert_eq!(evaluator.components(&s, &j).skills, 5.0);
    }

    #[test]
    fn test_empty_branch_and_batch_sets_score_zero() {
        let evaluator = EligibilityEvaluator::default();
        let mut j = job();
        j.eligibility.branches.clear();
        j.eligibility.batch.clear();

        let c = evaluator.components(&student(), &j);
        assert_eq!(c.branch, 0.0);
        assert_eq!(c.batch, 0.0);
    }

    #[test]
    fn test_relative_scaling_is_all_or_nothing() {
        let evaluator = EligibilityEvaluator::default();
        let mut s = student();

        for (cgpa, expected) in [(6.9, 0.0), (7.1, 30.0), (9.8, 30.0)] {
            s.academics.cgpa = cgpa;
            assert_eq!(evaluator.components(&s, &job()).cgpa, expected, "cgpa {cgpa}");
        }
    }

    #[test]
    fn test_ten_point_scaling() {
        let evaluator = EligibilityEvaluator::new(EligibilityWeights {
            cgpa_scaling: CgpaScaling::TenPointScale,
            ..EligibilityWeights::default()
        });
        let c = evaluator.components(&student(), &job());
        assert!((c.cgpa - 25.5).abs() < 1e-9);
        assert_eq!(evaluator.score(&student(), &job()), 96);
    }

    #[test]
    fn test_nan_cgpa_fails_gate_and_scores_zero_component() {
        let evaluator = EligibilityEvaluator::default();
        let mut s = student();
        s.academics.cgpa = f64::NAN;

        assert!(evaluator.unmet_gates(&s, &job()).contains(&EligibilityGate::Cgpa));
        assert_eq!(evaluator.components(&s, &job()).cgpa, 0.0);
    }

    #[test]
    fn test_score_is_deterministic_and_bounded() {
        let evaluator = EligibilityEvaluator::default();
        let (s, j) = (student(), job());
        let first = evaluator.score(&s, &j);
        assert_eq!(first, evaluator.score(&s, &j));
        assert!(first <= 100);
    }

    #[test]
    fn test_check_application_blocks_closed_and_expired_jobs() {
        let evaluator = EligibilityEvaluator::default();
        let now = Utc::now();
        let mut j = job();
        j.status = JobStatus::Closed;
        j.application_deadline = Some(now - Duration::days(1));

        let check = evaluator.check_application(&student(), &j, now);
        assert!(!check.allowed);
        assert_eq!(
            check.blockers,
            vec![
                ApplicationBlocker::JobNotActive(JobStatus::Closed),
                ApplicationBlocker::DeadlinePassed(now - Duration::days(1)),
            ]
        );
    }

    #[test]
    fn test_check_application_allows_open_job_before_deadline() {
        let evaluator = EligibilityEvaluator::default();
        let now = Utc::now();
        let mut j = job();
        j.application_deadline = Some(now + Duration::days(3));

        let check = evaluator.check_application(&student(), &j, now);
        assert!(check.allowed);
        assert!(check.blockers.is_empty());
    }

    #[test]
    fn test_rank_jobs_filters_ineligible_and_sorts_desc() {
        let evaluator = EligibilityEvaluator::default();
        let s = student();

        let strong = job();
        let mut weaker = job();
        weaker.eligibility.required_skills = vec!["React".into(), "Go".into()];
        let mut closed_batch = job();
        closed_batch.eligibility.batch = vec![2030];

        let jobs = vec![weaker.clone(), closed_batch, strong.clone()];
        let ranked = evaluator.rank_eligible_jobs_for_student(&s, &jobs);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].score, 100);
        assert_eq!(ranked[1].score, 95);
    }

    #[test]
    fn test_rank_students_ties_keep_input_order() {
        let evaluator = EligibilityEvaluator::default();
        let j = job();

        let mut first = student();
        first.personal_info.roll_number = "A".into();
        let mut second = student();
        second.personal_info.roll_number = "B".into();

        let students = vec![first, second];
        let ranked = evaluator.rank_eligible_students_for_job(&j, &students);
        assert_eq!(ranked[0].item.personal_info.roll_number, "A");
        assert_eq!(ranked[1].item.personal_info.roll_number, "B");
    }
}
