use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::store::{get_job, insert_job, list_jobs, update_job_status, NewJob};
use crate::models::job::{JobRow, JobStatus, JobType};
use crate::response::ApiResponse;
use crate::state::AppState;

const MAX_DESCRIPTION_LEN: usize = 2000;
const MAX_REQUIREMENTS_LEN: usize = 1000;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    pub title: String,
    pub description: Option<String>,
    pub company: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<JobType>,
    pub status: Option<JobStatus>,
    pub location: Option<String>,
    pub salary: Option<f64>,
    pub requirements: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct JobListQuery {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: JobStatus,
}

impl CreateJobRequest {
    fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("Job title is required".to_string()));
        }
        check_len("description", self.description.as_deref(), MAX_DESCRIPTION_LEN)?;
        check_len("requirements", self.requirements.as_deref(), MAX_REQUIREMENTS_LEN)?;
        if self.salary.is_some_and(|s| !s.is_finite() || s < 0.0) {
            return Err(AppError::Validation(
                "Salary must be a non-negative number".to_string(),
            ));
        }
        Ok(())
    }
}

fn check_len(field: &str, value: Option<&str>, max: usize) -> Result<(), AppError> {
    match value {
        Some(v) if v.chars().count() > max => Err(AppError::Validation(format!(
            "Job {field} must be at most {max} characters"
        ))),
        _ => Ok(()),
    }
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(req): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<ApiResponse<JobRow>>), AppError> {
    req.validate()?;

    let job = insert_job(
        &state.db,
        NewJob {
            title: req.title.trim(),
            description: req.description.as_deref(),
            company: req.company.as_deref(),
            job_type: req.job_type.unwrap_or_default(),
            status: req.status.unwrap_or_default(),
            location: req.location.as_deref(),
            salary: req.salary,
            requirements: req.requirements.as_deref(),
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(job).with_message("Job created successfully")),
    ))
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(params): Query<JobListQuery>,
) -> Result<Json<ApiResponse<Vec<JobRow>>>, AppError> {
    let status = params
        .status
        .as_deref()
        .map(str::parse::<JobStatus>)
        .transpose()
        .map_err(AppError::Validation)?;

    let jobs = list_jobs(&state.db, status).await?;
    Ok(Json(ApiResponse::ok(jobs)))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<JobRow>>, AppError> {
    let job = get_job(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;
    Ok(Json(ApiResponse::ok(job)))
}

/// PATCH /api/v1/jobs/:id/status
pub async fn handle_update_job_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<StatusUpdate>,
) -> Result<Json<ApiResponse<JobRow>>, AppError> {
    let job = update_job_status(&state.db, id, req.status)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;
    Ok(Json(ApiResponse::ok(job)))
}
