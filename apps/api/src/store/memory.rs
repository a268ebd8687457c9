//! In-process store. Backs the handler tests and local demos without Postgres.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{ApplicationRow, Job, JobStatus, StudentProfile};
use crate::scoring::MatchResult;
use crate::store::PlacementStore;

#[derive(Default)]
struct MemoryState {
    students: Vec<StudentProfile>,
    jobs: Vec<Job>,
    applications: Vec<ApplicationRow>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_student(&self, student: StudentProfile) {
        let mut state = self.state.write().await;
        state.students.retain(|s| s.id != student.id);
        state.students.push(student);
    }

    pub async fn insert_job(&self, job: Job) {
        let mut state = self.state.write().await;
        state.jobs.retain(|j| j.id != job.id);
        state.jobs.push(job);
    }

    pub async fn application(&self, student_id: Uuid, job_id: Uuid) -> Option<ApplicationRow> {
        self.state
            .read()
            .await
            .applications
            .iter()
            .find(|a| a.student_id == student_id && a.job_id == job_id)
            .cloned()
    }
}

#[async_trait]
impl PlacementStore for MemoryStore {
    async fn load_student(&self, id: Uuid) -> Result<Option<StudentProfile>, AppError> {
        let state = self.state.read().await;
        Ok(state.students.iter().find(|s| s.id == id).cloned())
    }

    async fn load_job(&self, id: Uuid) -> Result<Option<Job>, AppError> {
        let state = self.state.read().await;
        Ok(state.jobs.iter().find(|j| j.id == id).cloned())
    }

    async fn list_active_jobs(&self) -> Result<Vec<Job>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .jobs
            .iter()
            .filter(|j| j.status == JobStatus::Active)
            .cloned()
            .collect())
    }

    async fn list_students(&self) -> Result<Vec<StudentProfile>, AppError> {
        Ok(self.state.read().await.students.clone())
    }

    async fn list_applicants(&self, job_id: Uuid) -> Result<Vec<StudentProfile>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .applications
            .iter()
            .filter(|a| a.job_id == job_id)
            .filter_map(|a| state.students.iter().find(|s| s.id == a.student_id))
            .cloned()
            .collect())
    }

    async fn save_readiness_score(&self, student_id: Uuid, score: u8) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        let student = state
            .students
            .iter_mut()
            .find(|s| s.id == student_id)
            .ok_or_else(|| AppError::NotFound(format!("Student {student_id} not found")))?;
        student.placement_readiness_score = Some(score);
        Ok(())
    }

    async fn save_application(
        &self,
        student_id: Uuid,
        job_id: Uuid,
        result: &MatchResult,
    ) -> Result<ApplicationRow, AppError> {
        let mut state = self.state.write().await;

        if let Some(existing) = state
            .applications
            .iter_mut()
            .find(|a| a.student_id == student_id && a.job_id == job_id)
        {
            existing.overall_score = i32::from(result.overall_score);
            existing.eligibility_score = i32::from(result.breakdown.eligibility);
            existing.skill_match_score = i32::from(result.breakdown.skill_match);
            existing.prs_score = i32::from(result.breakdown.prs);
            return Ok(existing.clone());
        }

        let row = ApplicationRow {
            id: Uuid::new_v4(),
            student_id,
            job_id,
            overall_score: i32::from(result.overall_score),
            eligibility_score: i32::from(result.breakdown.eligibility),
            skill_match_score: i32::from(result.breakdown.skill_match),
            prs_score: i32::from(result.breakdown.prs),
            created_at: Utc::now(),
        };
        state.applications.push(row.clone());
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::test_support::{job, student};
    use crate::scoring::MatchBreakdown;

    #[tokio::test]
    async fn test_save_application_upserts() {
        let store = MemoryStore::new();
        let (s, j) = (student(), job());
        store.insert_student(s.clone()).await;
        store.insert_job(j.clone()).await;

        let first = MatchResult {
            overall_score: 50,
            breakdown: MatchBreakdown::default(),
        };
        let row = store.save_application(s.id, j.id, &first).await.unwrap();

        let second = MatchResult {
            overall_score: 70,
            ..first
        };
        let updated = store.save_application(s.id, j.id, &second).await.unwrap();

        assert_eq!(row.id, updated.id);
        assert_eq!(updated.overall_score, 70);
        assert_eq!(store.list_applicants(j.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_save_readiness_for_unknown_student_is_not_found() {
        let store = MemoryStore::new();
        let err = store.save_readiness_score(Uuid::new_v4(), 40).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_active_jobs_skips_drafts() {
        let store = MemoryStore::new();
        let mut draft = job();
        draft.status = JobStatus::Draft;
        store.insert_job(draft).await;
        store.insert_job(job()).await;

        assert_eq!(store.list_active_jobs().await.unwrap().len(), 1);
    }
}
