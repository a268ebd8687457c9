//! Batch scoring entry points for large candidate lists.
//!
//! # spawn_blocking pattern
//! Scoring is CPU-bound and every element is independent. Below
//! `parallel_threshold` the batch is scored inline. Above it, the input is split
//! into `workers` chunks, each scored on `tokio::task::spawn_blocking`, then the
//! results are put back in input order and sorted with a stable sort. The output
//! is identical to the sequential rankings in `matching`/`eligibility`.
//!
//! Cancellation: dropping the returned future abandons the batch; chunks already
//! running finish in bounded time and their results are discarded.

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::debug;

use crate::errors::ScoringError;
use crate::models::{Job, StudentProfile};
use crate::scoring::matching::{MatchRanker, MatchResult};
use crate::scoring::{sort_ranked, Ranked};

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub parallel_threshold: usize,
    pub workers: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: 256,
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
        }
    }
}

/// Applicants ranked for a job by overall match score.
pub async fn rank_applicants_by_match(
    ranker: Arc<MatchRanker>,
    job: Arc<Job>,
    students: Vec<StudentProfile>,
    config: &BatchConfig,
) -> Result<Vec<Ranked<StudentProfile, MatchResult>>, ScoringError> {
    let scored = fan_out(students, config, move |student| {
        Some(ranker.calculate_match(student, &job))
    })
    .await?;

    Ok(sort_ranked(scored, |m| m.overall_score))
}

/// Eligible students for a job ranked by graded eligibility score.
pub async fn rank_eligible_students(
    ranker: Arc<MatchRanker>,
    job: Arc<Job>,
    students: Vec<StudentProfile>,
    config: &BatchConfig,
) -> Result<Vec<Ranked<StudentProfile>>, ScoringError> {
    let scored = fan_out(students, config, move |student| {
        let evaluator = ranker.eligibility();
        evaluator
            .is_eligible(student, &job)
            .then(|| evaluator.score(student, &job))
    })
    .await?;

    Ok(sort_ranked(scored, |score| *score))
}

/// Scores every item, dropping those the scorer rejects (`None`).
/// The returned vector is in input order.
async fn fan_out<T, S, F>(
    items: Vec<T>,
    config: &BatchConfig,
    score: F,
) -> Result<Vec<Ranked<T, S>>, ScoringError>
where
    T: Send + 'static,
    S: Send + 'static,
    F: Fn(&T) -> Option<S> + Send + Sync + 'static,
{
    let total = items.len();
    let workers = config.workers.max(1);

    if total <= config.parallel_threshold || workers == 1 {
        return Ok(score_chunk(items.into_iter().enumerate(), &score)
            .into_iter()
            .map(|(_, ranked)| ranked)
            .collect());
    }

    let score = Arc::new(score);
    let chunk_size = total.div_ceil(workers);
    let mut set = JoinSet::new();
    let mut iter = items.into_iter().enumerate().peekable();

    while iter.peek().is_some() {
        let chunk: Vec<(usize, T)> = iter.by_ref().take(chunk_size).collect();
        let score = Arc::clone(&score);
        set.spawn_blocking(move || score_chunk(chunk.into_iter(), score.as_ref()));
    }

    let mut scored = Vec::with_capacity(total);
    while let Some(joined) = set.join_next().await {
        let chunk = joined.map_err(|e| {
            ScoringError::ComputationFailure(format!("batch scoring worker failed: {e}"))
        })?;
        scored.extend(chunk);
    }
    scored.sort_by_key(|(index, _)| *index);

    debug!(total, workers, kept = scored.len(), "batch scored in parallel");
    Ok(scored.into_iter().map(|(_, ranked)| ranked).collect())
}

fn score_chunk<T, S, F>(
    chunk: impl Iterator<Item = (usize, T)>,
    score: &F,
) -> Vec<(usize, Ranked<T, S>)>
where
    F: Fn(&T) -> Option<S>,
{
    chunk
        .filter_map(|(index, item)| score(&item).map(|s| (index, Ranked::new(item, s))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::test_support::{job, student};

    fn cohort(n: usize) -> Vec<StudentProfile> {
        (0..n)
            .map(|i| {
                let mut s = student();
                s.personal_info.roll_number = format!("R{i:04}");
                s.academics.cgpa = 6.5 + (i % 30) as f64 / 10.0;
                s.projects.truncate(i % 3);
                if i % 7 == 0 {
                    s.personal_info.batch = Some(2020);
                }
                s
            })
            .collect()
    }

    fn parallel() -> BatchConfig {
        BatchConfig {
            parallel_threshold: 8,
            workers: 4,
        }
    }

    fn inline() -> BatchConfig {
        BatchConfig {
            parallel_threshold: usize::MAX,
            workers: 1,
        }
    }

    fn roll_numbers<S>(ranked: &[Ranked<StudentProfile, S>]) -> Vec<String> {
        ranked
            .iter()
            .map(|r| r.item.personal_info.roll_number.clone())
            .collect()
    }

    #[tokio::test]
    async fn test_parallel_match_ranking_equals_sequential() {
        let ranker = Arc::new(MatchRanker::default());
        let job = Arc::new(job());
        let students = cohort(101);

        let sequential = ranker.rank_applicants_by_match(&job, &students);
        let fanned =
            rank_applicants_by_match(ranker.clone(), job.clone(), students.clone(), &parallel())
                .await
                .unwrap();

        assert_eq!(fanned.len(), sequential.len());
        for (p, s) in fanned.iter().zip(sequential.iter()) {
            assert_eq!(p.item.personal_info.roll_number, s.item.personal_info.roll_number);
            assert_eq!(p.score, s.score);
        }
    }

    #[tokio::test]
    async fn test_parallel_eligibility_ranking_equals_sequential() {
        let ranker = Arc::new(MatchRanker::default());
        let job = Arc::new(job());
        let students = cohort(64);

        let expected: Vec<String> = ranker
            .eligibility()
            .rank_eligible_students_for_job(&job, &students)
            .iter()
            .map(|r| r.item.personal_info.roll_number.clone())
            .collect();

        let ranked = rank_eligible_students(ranker, job, students, &parallel())
            .await
            .unwrap();
        assert_eq!(roll_numbers(&ranked), expected);
    }

    #[tokio::test]
    async fn test_inline_path_filters_ineligible() {
        let ranker = Arc::new(MatchRanker::default());
        let job = Arc::new(job());
        let students = cohort(14);

        let ranked = rank_eligible_students(ranker, job, students, &inline())
            .await
            .unwrap();
        assert!(ranked
            .iter()
            .all(|r| r.item.personal_info.batch == Some(2021)));
        assert!(!ranked.is_empty());
        assert!(ranked.len() < 14);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let ranked = rank_applicants_by_match(
            Arc::new(MatchRanker::default()),
            Arc::new(job()),
            vec![],
            &parallel(),
        )
        .await
        .unwrap();
        assert!(ranked.is_empty());
    }
}
