use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Application row carrying the match scores computed at apply time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub student_id: Uuid,
    pub job_id: Uuid,
    pub overall_score: i32,
    pub eligibility_score: i32,
    pub skill_match_score: i32,
    pub prs_score: i32,
    pub created_at: DateTime<Utc>,
}
