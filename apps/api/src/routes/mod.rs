pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post},
    Router,
};

use crate::intake::handlers as intake;
use crate::jobs::handlers as jobs;
use crate::profile::handlers as profile;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.body_limit();

    Router::new()
        .route("/health", get(health::health_handler))
        // Resume intake
        .route("/api/v1/upload/resume", post(intake::handle_upload_resume))
        .route(
            "/api/v1/upload/resume/:file_name",
            delete(intake::handle_delete_resume),
        )
        // Profiles
        .route("/api/v1/profiles/register", post(profile::handle_register))
        .route("/api/v1/profiles/dashboard", get(profile::handle_dashboard))
        .route("/api/v1/profiles/exists", get(profile::handle_exists))
        .route("/api/v1/profiles/export/all", get(profile::handle_export_all))
        // Score-only analysis
        .route("/api/v1/ats/analyze", post(intake::handle_analyze_resume))
        .route("/api/v1/ats/sample", get(intake::handle_sample_result))
        // Jobs
        .route(
            "/api/v1/jobs",
            get(jobs::handle_list_jobs).post(jobs::handle_create_job),
        )
        .route("/api/v1/jobs/:id", get(jobs::handle_get_job))
        .route(
            "/api/v1/jobs/:id/status",
            patch(jobs::handle_update_job_status),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
