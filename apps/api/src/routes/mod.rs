pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::scoring::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Student-facing scoring
        .route(
            "/api/v1/students/:id/readiness",
            get(handlers::handle_readiness),
        )
        .route(
            "/api/v1/students/:id/eligibility/:job_id",
            get(handlers::handle_eligibility),
        )
        .route(
            "/api/v1/students/:id/jobs/eligible",
            get(handlers::handle_eligible_jobs),
        )
        .route(
            "/api/v1/students/:id/jobs/recommended",
            get(handlers::handle_recommended_jobs),
        )
        // Recruiter-facing ranking
        .route(
            "/api/v1/jobs/:id/students/eligible",
            get(handlers::handle_eligible_students),
        )
        .route(
            "/api/v1/jobs/:id/applicants/ranked",
            get(handlers::handle_ranked_applicants),
        )
        .route("/api/v1/match", post(handlers::handle_match))
        .route("/api/v1/applications", post(handlers::handle_apply))
        .with_state(state)
}
