use std::collections::BTreeMap;

use axum::extract::{Multipart, Path, Query, State};
use axum::Json;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::extract::OwnerId;
use crate::intake::scoring::AtsScoreResult;
use crate::intake::{IntakeOutcome, UploadRequest};
use crate::response::{ApiResponse, MessageResponse};
use crate::state::AppState;

/// Multipart field that carries the resume.
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponseData {
    pub file_name: String,
    pub original_name: String,
    pub file_url: String,
    pub size: u64,
    pub ats_score: u32,
    pub ats_feedback: String,
}

impl From<IntakeOutcome> for UploadResponseData {
    fn from(outcome: IntakeOutcome) -> Self {
        Self {
            ats_feedback: outcome.score.summary(),
            ats_score: outcome.score.overall_score,
            file_name: outcome.stored_file.storage_name,
            original_name: outcome.original_name,
            file_url: outcome.file_url,
            size: outcome.stored_file.size_bytes,
        }
    }
}

/// Score-only response: `{ success, data, summary }`.
#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub success: bool,
    pub data: AtsScoreResult,
    pub summary: String,
}

impl From<AtsScoreResult> for AnalysisResponse {
    fn from(result: AtsScoreResult) -> Self {
        Self {
            success: true,
            summary: result.summary(),
            data: result,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

/// POST /api/v1/upload/resume
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    multipart: Multipart,
) -> Result<Json<ApiResponse<UploadResponseData>>, AppError> {
    let request = read_upload(multipart, owner_id).await?;
    let outcome = state.intake.ingest(request).await?;

    Ok(Json(
        ApiResponse::ok(UploadResponseData::from(outcome))
            .with_message("Resume uploaded and analyzed successfully"),
    ))
}

/// DELETE /api/v1/upload/resume/:file_name
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(file_name): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state.intake.delete(&file_name, &owner_id).await?;
    Ok(Json(MessageResponse::ok("Resume deleted successfully")))
}

/// POST /api/v1/ats/analyze
///
/// Owner comes from `X-User-Id`, else the `userId` query parameter; both are optional.
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    owner: Option<OwnerId>,
    Query(query): Query<AnalyzeQuery>,
    multipart: Multipart,
) -> Result<Json<AnalysisResponse>, AppError> {
    let owner_id = owner
        .map(|OwnerId(id)| id)
        .or(query.user_id)
        .unwrap_or_default();
    let request = read_upload(multipart, owner_id).await?;
    let result = state.intake.analyze(request).await?;
    Ok(Json(AnalysisResponse::from(result)))
}

/// GET /api/v1/ats/sample
pub async fn handle_sample_result() -> Json<AnalysisResponse> {
    Json(AnalysisResponse::from(sample_result()))
}

fn sample_result() -> AtsScoreResult {
    let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    AtsScoreResult {
        overall_score: 78,
        category_scores: BTreeMap::from([
            ("Education".to_string(), 90),
            ("Experience".to_string(), 80),
            ("Format".to_string(), 85),
            ("Keywords".to_string(), 75),
            ("Skills".to_string(), 60),
        ]),
        strengths: owned(&[
            "Clear professional summary",
            "Good education credentials",
            "Well-structured format",
        ]),
        weaknesses: owned(&[
            "Limited technical skills section",
            "Experience lacks quantifiable achievements",
        ]),
        improvements: owned(&[
            "Add more industry-specific keywords",
            "Quantify achievements in work experience",
            "Expand technical skills section",
        ]),
    }
}

/// Pulls the `file` field out of the form. A form without one becomes an
/// empty upload, which the validator rejects.
async fn read_upload(mut multipart: Multipart, owner_id: String) -> Result<UploadRequest, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let raw_filename = field.file_name().map(String::from);
        let content_type = field.content_type().map(String::from);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;

        return Ok(UploadRequest::new(raw_filename, content_type, owner_id, bytes));
    }

    Ok(UploadRequest::new(None, None, owner_id, Bytes::new()))
}
