//! Postgres-backed store. Student and job documents live in JSONB columns so
//! partially-filled profiles load with serde defaults. Listings skip documents
//! that no longer decode; single loads report them as 422.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{ApplicationRow, Job, StudentProfile};
use crate::scoring::MatchResult;
use crate::store::PlacementStore;

// Documents are fetched as raw JSON and decoded per row, so one corrupt
// document fails only its own row.
type StudentRecord = (Uuid, Json<Value>, Option<i16>);
type JobRecord = (Uuid, Json<Value>);

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// A stored document that no longer deserializes into its model.
#[derive(Debug)]
struct MalformedDocument {
    id: Uuid,
    source: serde_json::Error,
}

impl From<MalformedDocument> for AppError {
    fn from(e: MalformedDocument) -> Self {
        AppError::UnprocessableEntity(format!("Stored document {} is malformed: {}", e.id, e.source))
    }
}

fn student_from_record(
    (id, Json(doc), prs): StudentRecord,
) -> Result<StudentProfile, MalformedDocument> {
    let mut profile: StudentProfile =
        serde_json::from_value(doc).map_err(|source| MalformedDocument { id, source })?;
    profile.id = id;
    profile.placement_readiness_score = prs.and_then(|s| u8::try_from(s).ok());
    Ok(profile)
}

fn job_from_record((id, Json(doc)): JobRecord) -> Result<Job, MalformedDocument> {
    let mut job: Job =
        serde_json::from_value(doc).map_err(|source| MalformedDocument { id, source })?;
    job.id = id;
    Ok(job)
}

/// Keeps the rows that decode. The rest are logged and left out of the listing.
fn keep_decodable<T>(
    rows: impl IntoIterator<Item = Result<T, MalformedDocument>>,
    table: &str,
) -> Vec<T> {
    rows.into_iter()
        .filter_map(|row| match row {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(id = %e.id, table, error = %e.source, "skipping malformed document");
                None
            }
        })
        .collect()
}

#[async_trait]
impl PlacementStore for PgStore {
    async fn load_student(&self, id: Uuid) -> Result<Option<StudentProfile>, AppError> {
        let record: Option<StudentRecord> = sqlx::query_as(
            "SELECT id, profile, placement_readiness_score FROM students WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(student_from_record).transpose()?)
    }

    async fn load_job(&self, id: Uuid) -> Result<Option<Job>, AppError> {
        let record: Option<JobRecord> = sqlx::query_as("SELECT id, posting FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record.map(job_from_record).transpose()?)
    }

    async fn list_active_jobs(&self) -> Result<Vec<Job>, AppError> {
        let records: Vec<JobRecord> = sqlx::query_as(
            r#"
            SELECT id, posting FROM jobs
            WHERE COALESCE(posting->>'status', 'active') = 'active'
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(keep_decodable(records.into_iter().map(job_from_record), "jobs"))
    }

    async fn list_students(&self) -> Result<Vec<StudentProfile>, AppError> {
        let records: Vec<StudentRecord> = sqlx::query_as(
            "SELECT id, profile, placement_readiness_score FROM students ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(keep_decodable(
            records.into_iter().map(student_from_record),
            "students",
        ))
    }

    async fn list_applicants(&self, job_id: Uuid) -> Result<Vec<StudentProfile>, AppError> {
        let records: Vec<StudentRecord> = sqlx::query_as(
            r#"
            SELECT s.id, s.profile, s.placement_readiness_score
            FROM applications a
            JOIN students s ON s.id = a.student_id
            WHERE a.job_id = $1
            ORDER BY a.created_at, a.id
            "#,
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(keep_decodable(
            records.into_iter().map(student_from_record),
            "students",
        ))
    }

    async fn save_readiness_score(&self, student_id: Uuid, score: u8) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE students SET placement_readiness_score = $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(i16::from(score))
        .bind(student_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Student {student_id} not found")));
        }
        info!(%student_id, score, "persisted placement readiness score");
        Ok(())
    }

    async fn save_application(
        &self,
        student_id: Uuid,
        job_id: Uuid,
        result: &MatchResult,
    ) -> Result<ApplicationRow, AppError> {
        let row = sqlx::query_as::<_, ApplicationRow>(
            r#"
            INSERT INTO applications
                (id, student_id, job_id, overall_score, eligibility_score, skill_match_score, prs_score)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (student_id, job_id) DO UPDATE SET
                overall_score = EXCLUDED.overall_score,
                eligibility_score = EXCLUDED.eligibility_score,
                skill_match_score = EXCLUDED.skill_match_score,
                prs_score = EXCLUDED.prs_score
            RETURNING id, student_id, job_id, overall_score, eligibility_score,
                      skill_match_score, prs_score, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(student_id)
        .bind(job_id)
        .bind(i32::from(result.overall_score))
        .bind(i32::from(result.breakdown.eligibility))
        .bind(i32::from(result.breakdown.skill_match))
        .bind(i32::from(result.breakdown.prs))
        .fetch_one(&self.pool)
        .await?;

        info!(%student_id, %job_id, overall = result.overall_score, "persisted application scores");
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::test_support::{job, student};
    use serde_json::json;

    fn student_record(doc: Value) -> StudentRecord {
        (Uuid::new_v4(), Json(doc), Some(68))
    }

    #[test]
    fn test_malformed_student_row_is_skipped() {
        let good = serde_json::to_value(student()).unwrap();
        let bad = json!({ "personalInfo": { "batch": "2021" } });
        let mut partial = good.clone();
        partial["academics"] = Value::Null;

        let rows = vec![student_record(good), student_record(bad), student_record(partial)];
        let ids: Vec<Uuid> = vec![rows[0].0, rows[2].0];

        let kept = keep_decodable(rows.into_iter().map(student_from_record), "students");

        assert_eq!(kept.iter().map(|s| s.id).collect::<Vec<_>>(), ids);
        assert_eq!(kept[0].placement_readiness_score, Some(68));
        assert_eq!(kept[1].academics.cgpa, 0.0);
    }

    #[test]
    fn test_row_id_overrides_document_id() {
        let id = Uuid::new_v4();
        let decoded = job_from_record((id, Json(serde_json::to_value(job()).unwrap()))).unwrap();
        assert_eq!(decoded.id, id);
    }

    #[test]
    fn test_malformed_single_load_is_unprocessable() {
        let err = job_from_record((Uuid::new_v4(), Json(json!({ "eligibility": "none" }))))
            .map(|_| ())
            .map_err(AppError::from)
            .unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));
    }

    #[test]
    fn test_out_of_range_prs_column_is_dropped() {
        let (id, doc, _) = student_record(serde_json::to_value(student()).unwrap());
        let profile = student_from_record((id, doc, Some(-1))).unwrap();
        assert_eq!(profile.placement_readiness_score, None);
    }
}
