// Eligibility & Scoring Engine
// Implements: eligibility gate + graded score, Placement Readiness Score, skill match,
// overall match ranking. Every calculator is pure; persistence belongs to the caller.

pub mod batch;
pub mod eligibility;
pub mod handlers;
pub mod matching;
pub mod readiness;
pub mod skills;
pub mod taxonomy;

use serde::Serialize;

pub use batch::BatchConfig;
pub use eligibility::{EligibilityDecision, EligibilityEvaluator};
pub use matching::{MatchBreakdown, MatchRanker, MatchResult};
pub use readiness::{ReadinessReport, ReadinessScorer};
pub use skills::SkillMatcher;
pub use taxonomy::SkillTaxonomy;

/// An item with the score it was ranked by.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranked<T, S = u8> {
    pub item: T,
    pub score: S,
}

impl<T, S> Ranked<T, S> {
    pub fn new(item: T, score: S) -> Self {
        Self { item, score }
    }
}

/// Sorts descending by `key`. The sort is stable, so ties keep input order.
pub fn sort_ranked<T, S>(mut items: Vec<Ranked<T, S>>, key: impl Fn(&S) -> u8) -> Vec<Ranked<T, S>> {
    items.sort_by(|a, b| key(&b.score).cmp(&key(&a.score)));
    items
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::models::{
        Academics, Branch, BranchSelector, EligibilityCriteria, Experience, Job, JobStatus,
        PersonalInfo, Project, Skills, StudentProfile,
    };
    use uuid::Uuid;

    /// cgpa 8.5, CSE, batch 2021, no backlogs, "React" among programming skills.
    pub fn student() -> StudentProfile {
        StudentProfile {
            id: Uuid::new_v4(),
            personal_info: PersonalInfo {
                first_name: "Asha".into(),
                last_name: "Rao".into(),
                phone: "9876543210".into(),
                roll_number: "21CS042".into(),
                branch: Some(Branch::Cse),
                batch: Some(2021),
                current_semester: Some(7),
            },
            academics: Academics {
                cgpa: 8.5,
                tenth_marks: 90.0,
                twelfth_marks: 80.0,
                backlogs: 0,
                achievements: vec![],
            },
            skills: Skills {
                technical: vec!["Data Structures".into(), "Operating Systems".into()],
                programming: vec!["React".into(), "JavaScript".into()],
                frameworks: vec!["Node".into()],
                tools: vec!["Git".into()],
            },
            projects: vec![
                Project {
                    title: "Placement tracker".into(),
                    description: "Tracks drives".into(),
                    technologies: vec!["React".into()],
                },
                Project::default(),
            ],
            experience: vec![Experience {
                company: "Acme".into(),
                role: "SDE Intern".into(),
                kind: "internship".into(),
            }],
            placement_readiness_score: None,
        }
    }

    /// minimumCGPA 7.0, CSE/IT, no backlogs, batch 2021, requires "React".
    pub fn job() -> Job {
        Job {
            id: Uuid::new_v4(),
            title: "Frontend Engineer".into(),
            company: "Acme".into(),
            eligibility: EligibilityCriteria {
                branches: vec![
                    BranchSelector::Only(Branch::Cse),
                    BranchSelector::Only(Branch::It),
                ],
                minimum_cgpa: 7.0,
                allow_backlogs: false,
                max_backlogs: 0,
                batch: vec![2021],
                required_skills: vec!["React".into()],
            },
            application_deadline: None,
            status: JobStatus::Active,
        }
    }
}
