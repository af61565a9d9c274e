use std::collections::BTreeSet;

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::{OwnerEmail, OwnerId};
use crate::models::profile::ProfileRow;
use crate::profile::completion::completion;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Registration body. Every field is optional; only supplied fields overwrite.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub current_year: Option<i32>,
    pub current_cgpa: Option<f64>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub resume_url: Option<String>,
    pub backlogs: Option<i32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponseData {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub department: String,
    pub current_year: i32,
    pub completion_percentage: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardProfile {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub department: String,
    pub current_year: i32,
    pub current_cgpa: String,
    pub completion_percentage: i32,
    pub ats_score: i32,
    pub ats_feedback: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub title: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub user_profile: DashboardProfile,
    pub recent_activity: Vec<Activity>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistsData {
    pub id: Uuid,
    pub completion_percentage: i32,
}

#[derive(Debug, Serialize)]
pub struct ExistsResponse {
    pub success: bool,
    pub exists: bool,
    pub data: Option<ExistsData>,
}

/// One row of the full export.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportProfile {
    pub id: Uuid,
    pub owner_id: String,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub current_year: Option<i32>,
    pub current_cgpa: Option<f64>,
    pub backlogs: Option<i32>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub resume_url: Option<String>,
    pub completion_percentage: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProfileRow> for ExportProfile {
    fn from(p: ProfileRow) -> Self {
        Self {
            id: p.id,
            full_name: p.full_name(),
            owner_id: p.owner_id,
            email: p.email,
            phone: p.phone,
            department: p.department,
            current_year: p.current_year,
            current_cgpa: p.current_cgpa,
            backlogs: p.backlogs,
            linkedin_url: p.linkedin_url,
            github_url: p.github_url,
            portfolio_url: p.portfolio_url,
            resume_url: p.resume_url,
            completion_percentage: p.profile_completion_percentage,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSummary {
    pub total_profiles: usize,
    /// Distinct non-empty departments, sorted.
    pub departments: Vec<String>,
    pub average_completion: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResponse {
    pub success: bool,
    pub timestamp: DateTime<Utc>,
    pub total_records: usize,
    pub profiles: Vec<ExportProfile>,
    pub summary: ExportSummary,
}

pub fn export_summary(profiles: &[ProfileRow]) -> ExportSummary {
    let departments: BTreeSet<&str> = profiles
        .iter()
        .filter_map(|p| p.department.as_deref())
        .filter(|d| !d.is_empty())
        .collect();

    let average_completion = if profiles.is_empty() {
        0.0
    } else {
        let total: i64 = profiles
            .iter()
            .map(|p| i64::from(p.profile_completion_percentage))
            .sum();
        total as f64 / profiles.len() as f64
    };

    ExportSummary {
        total_profiles: profiles.len(),
        departments: departments.into_iter().map(String::from).collect(),
        average_completion,
    }
}

/// Applies the supplied fields onto `profile` and recomputes completion.
pub fn apply_registration(profile: &mut ProfileRow, email: String, req: RegisterRequest) {
    profile.email = email;

    macro_rules! overwrite {
        ($($field:ident),*) => {
            $(if req.$field.is_some() { profile.$field = req.$field; })*
        };
    }
    overwrite!(
        first_name,
        last_name,
        phone,
        department,
        current_year,
        current_cgpa,
        linkedin_url,
        github_url,
        portfolio_url,
        resume_url,
        backlogs
    );

    profile.profile_completion_percentage = i32::from(completion(&profile.completion_input()));
}

/// POST /api/v1/profiles/register
pub async fn handle_register(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    OwnerEmail(email): OwnerEmail,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<RegisterResponseData>>, AppError> {
    let mut profile = match state.profiles.find_by_owner_id(&owner_id).await? {
        Some(existing) => {
            info!("Updating existing profile {} for user {owner_id}", existing.id);
            existing
        }
        None => {
            info!("Creating new profile for user {owner_id}");
            ProfileRow::new(&owner_id, &email)
        }
    };

    apply_registration(&mut profile, email, req);
    let saved = state.profiles.save(&profile).await?;
    info!(
        "Profile saved: id={} completion={}%",
        saved.id, saved.profile_completion_percentage
    );

    Ok(Json(
        ApiResponse::ok(RegisterResponseData {
            id: saved.id,
            full_name: saved.full_name(),
            department: saved
                .department
                .clone()
                .unwrap_or_else(|| "Not specified".to_string()),
            current_year: saved.current_year.unwrap_or(0),
            completion_percentage: saved.profile_completion_percentage,
            email: saved.email,
        })
        .with_message("Profile registered successfully"),
    ))
}

/// GET /api/v1/profiles/dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
) -> Result<Json<ApiResponse<DashboardData>>, AppError> {
    let profile = state
        .profiles
        .find_by_owner_id(&owner_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("Profile not found. Please complete registration first.".to_string())
        })?;

    Ok(Json(ApiResponse::ok(dashboard_view(profile))))
}

/// GET /api/v1/profiles/exists
pub async fn handle_exists(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
) -> Result<Json<ExistsResponse>, AppError> {
    let profile = state.profiles.find_by_owner_id(&owner_id).await?;
    Ok(Json(ExistsResponse {
        success: true,
        exists: profile.is_some(),
        data: profile.map(|p| ExistsData {
            id: p.id,
            completion_percentage: p.profile_completion_percentage,
        }),
    }))
}

/// GET /api/v1/profiles/export/all
pub async fn handle_export_all(State(state): State<AppState>) -> Result<Json<ExportResponse>, AppError> {
    let profiles = state.profiles.list_all().await?;
    let summary = export_summary(&profiles);
    info!("Exported {} profiles", profiles.len());

    Ok(Json(ExportResponse {
        success: true,
        timestamp: Utc::now(),
        total_records: profiles.len(),
        profiles: profiles.into_iter().map(ExportProfile::from).collect(),
        summary,
    }))
}

fn dashboard_view(profile: ProfileRow) -> DashboardData {
    let mut recent_activity = vec![Activity {
        title: "Profile Created".to_string(),
        description: "Welcome! Complete your profile to get started.".to_string(),
        timestamp: profile.created_at,
    }];
    if profile.resume_url.as_deref().is_some_and(|u| !u.is_empty()) {
        recent_activity.push(Activity {
            title: "Resume Uploaded".to_string(),
            description: "Your resume has been uploaded and analyzed.".to_string(),
            timestamp: profile.updated_at,
        });
    }

    DashboardData {
        user_profile: DashboardProfile {
            id: profile.id,
            full_name: profile.full_name(),
            phone: profile
                .phone
                .unwrap_or_else(|| "Not provided".to_string()),
            department: profile
                .department
                .unwrap_or_else(|| "Not specified".to_string()),
            current_year: profile.current_year.unwrap_or(0),
            current_cgpa: profile
                .current_cgpa
                .map(|c| c.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
            completion_percentage: profile.profile_completion_percentage,
            ats_score: profile.ats_score.unwrap_or(0),
            ats_feedback: profile
                .ats_feedback
                .unwrap_or_else(|| "Resume not yet analyzed".to_string()),
            email: profile.email,
        },
        recent_activity,
    }
}
