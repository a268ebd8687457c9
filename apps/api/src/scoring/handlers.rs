//! Axum route handlers for the Scoring API.
//!
//! Every handler follows the same shape: load records through the store, call
//! the pure scorers, then persist explicitly where the route writes anything.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{ApplicationRow, Job, StudentProfile};
use crate::scoring::batch;
use crate::scoring::{EligibilityDecision, MatchResult, ReadinessReport};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct EligibilityResponse {
    pub student_id: Uuid,
    pub job_id: Uuid,
    #[serde(flatten)]
    pub decision: EligibilityDecision,
}

#[derive(Debug, Serialize)]
pub struct RankedJobResponse {
    pub job_id: Uuid,
    pub title: String,
    pub company: String,
    pub eligibility_score: u8,
}

#[derive(Debug, Serialize)]
pub struct RecommendedJobResponse {
    pub job_id: Uuid,
    pub title: String,
    pub company: String,
    #[serde(rename = "match")]
    pub match_result: MatchResult,
}

#[derive(Debug, Serialize)]
pub struct RankedStudentResponse {
    pub student_id: Uuid,
    pub roll_number: String,
    pub eligibility_score: u8,
}

#[derive(Debug, Serialize)]
pub struct RankedApplicantResponse {
    pub student_id: Uuid,
    pub roll_number: String,
    #[serde(rename = "match")]
    pub match_result: MatchResult,
}

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    #[serde(default)]
    pub student: Value,
    #[serde(default)]
    pub job: Value,
}

#[derive(Debug, Deserialize)]
pub struct ApplyRequest {
    pub student_id: Uuid,
    pub job_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ApplyResponse {
    pub application: ApplicationRow,
    #[serde(rename = "match")]
    pub match_result: MatchResult,
}

// ────────────────────────────────────────────────────────────────────────────
// Loaders
// ────────────────────────────────────────────────────────────────────────────

async fn require_student(state: &AppState, id: Uuid) -> Result<StudentProfile, AppError> {
    state
        .store
        .load_student(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Student {id} not found")))
}

async fn require_job(state: &AppState, id: Uuid) -> Result<Job, AppError> {
    state
        .store
        .load_job(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/students/:id/readiness
///
/// Computes the PRS, then persists it onto the student record as a separate step.
pub async fn handle_readiness(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
) -> Result<Json<ReadinessReport>, AppError> {
    let student = require_student(&state, student_id).await?;

    let report = state.ranker.readiness().compute(&student);
    state
        .store
        .save_readiness_score(student_id, report.score)
        .await?;

    Ok(Json(report))
}

/// GET /api/v1/students/:id/eligibility/:job_id
pub async fn handle_eligibility(
    State(state): State<AppState>,
    Path((student_id, job_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<EligibilityResponse>, AppError> {
    let student = require_student(&state, student_id).await?;
    let job = require_job(&state, job_id).await?;

    let decision = state.ranker.eligibility().evaluate(&student, &job);

    Ok(Json(EligibilityResponse {
        student_id,
        job_id,
        decision,
    }))
}

/// GET /api/v1/students/:id/jobs/eligible
///
/// Active jobs the student clears, best eligibility score first.
pub async fn handle_eligible_jobs(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
) -> Result<Json<Vec<RankedJobResponse>>, AppError> {
    let student = require_student(&state, student_id).await?;
    let jobs = state.store.list_active_jobs().await?;

    let ranked = state
        .ranker
        .eligibility()
        .rank_eligible_jobs_for_student(&student, &jobs)
        .into_iter()
        .map(|r| RankedJobResponse {
            job_id: r.item.id,
            title: r.item.title.clone(),
            company: r.item.company.clone(),
            eligibility_score: r.score,
        })
        .collect();

    Ok(Json(ranked))
}

/// GET /api/v1/students/:id/jobs/recommended
///
/// All active jobs ranked by overall match score, ineligible ones included.
pub async fn handle_recommended_jobs(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
) -> Result<Json<Vec<RecommendedJobResponse>>, AppError> {
    let student = require_student(&state, student_id).await?;
    let jobs = state.store.list_active_jobs().await?;

    let ranked = state
        .ranker
        .rank_jobs_by_match(&student, &jobs)
        .into_iter()
        .map(|r| RecommendedJobResponse {
            job_id: r.item.id,
            title: r.item.title.clone(),
            company: r.item.company.clone(),
            match_result: r.score,
        })
        .collect();

    Ok(Json(ranked))
}

/// GET /api/v1/jobs/:id/students/eligible
pub async fn handle_eligible_students(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Vec<RankedStudentResponse>>, AppError> {
    let job = require_job(&state, job_id).await?;
    let students = state.store.list_students().await?;

    let ranked =
        batch::rank_eligible_students(state.ranker.clone(), Arc::new(job), students, &state.batch)
            .await?;

    Ok(Json(
        ranked
            .into_iter()
            .map(|r| RankedStudentResponse {
                student_id: r.item.id,
                roll_number: r.item.personal_info.roll_number,
                eligibility_score: r.score,
            })
            .collect(),
    ))
}

/// GET /api/v1/jobs/:id/applicants/ranked
pub async fn handle_ranked_applicants(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Vec<RankedApplicantResponse>>, AppError> {
    let job = require_job(&state, job_id).await?;
    let applicants = state.store.list_applicants(job_id).await?;

    let ranked = batch::rank_applicants_by_match(
        state.ranker.clone(),
        Arc::new(job),
        applicants,
        &state.batch,
    )
    .await?;

    Ok(Json(
        ranked
            .into_iter()
            .map(|r| RankedApplicantResponse {
                student_id: r.item.id,
                roll_number: r.item.personal_info.roll_number,
                match_result: r.score,
            })
            .collect(),
    ))
}

/// POST /api/v1/match
///
/// Scores raw student/job documents. Malformed documents yield the zeroed result.
pub async fn handle_match(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Json<MatchResult> {
    Json(
        state
            .ranker
            .calculate_match_value(&request.student, &request.job),
    )
}

/// POST /api/v1/applications
///
/// Rejects with 422 and the blocker list when the student cannot apply;
/// otherwise scores the pair and stores the scores on the application.
pub async fn handle_apply(
    State(state): State<AppState>,
    Json(request): Json<ApplyRequest>,
) -> Result<(StatusCode, Json<ApplyResponse>), AppError> {
    let student = require_student(&state, request.student_id).await?;
    let job = require_job(&state, request.job_id).await?;

    let check = state
        .ranker
        .eligibility()
        .check_application(&student, &job, Utc::now());
    if !check.allowed {
        return Err(AppError::UnprocessableEntity(
            serde_json::to_string(&check).unwrap_or_default(),
        ));
    }

    let match_result = state.ranker.calculate_match(&student, &job);
    let application = state
        .store
        .save_application(student.id, job.id, &match_result)
        .await?;

    info!(
        student_id = %student.id,
        job_id = %job.id,
        overall = match_result.overall_score,
        "application submitted"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApplyResponse {
            application,
            match_result,
        }),
    ))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
