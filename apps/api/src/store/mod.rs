//! Persistence collaborator for the scoring engine.
//!
//! The engine never loads or writes records itself. Handlers load through a
//! `PlacementStore`, call the pure scorers, then persist results explicitly.
//! Carried in `AppState` as `Arc<dyn PlacementStore>`.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{ApplicationRow, Job, StudentProfile};
use crate::scoring::MatchResult;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait PlacementStore: Send + Sync {
    async fn load_student(&self, id: Uuid) -> Result<Option<StudentProfile>, AppError>;

    async fn load_job(&self, id: Uuid) -> Result<Option<Job>, AppError>;

    /// Jobs with status `active`, oldest posting first.
    async fn list_active_jobs(&self) -> Result<Vec<Job>, AppError>;

    async fn list_students(&self) -> Result<Vec<StudentProfile>, AppError>;

    /// Students who have applied to `job_id`, in application order.
    async fn list_applicants(&self, job_id: Uuid) -> Result<Vec<StudentProfile>, AppError>;

    /// Writes the PRS back onto the student record.
    async fn save_readiness_score(&self, student_id: Uuid, score: u8) -> Result<(), AppError>;

    /// Creates the application, or refreshes its scores if it already exists.
    async fn save_application(
        &self,
        student_id: Uuid,
        job_id: Uuid,
        result: &MatchResult,
    ) -> Result<ApplicationRow, AppError>;
}
