use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::profile::completion::ProfileCompletionInput;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub owner_id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub current_year: Option<i32>,
    pub current_cgpa: Option<f64>,
    pub backlogs: Option<i32>,
    pub resume_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub profile_completion_percentage: i32,
    pub is_profile_verified: bool,
    pub ats_score: Option<i32>,
    pub ats_feedback: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileRow {
    /// A fresh, unsaved profile for `owner_id`.
    pub fn new(owner_id: impl Into<String>, email: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.into(),
            email: email.into(),
            first_name: None,
            last_name: None,
            phone: None,
            department: None,
            current_year: None,
            current_cgpa: None,
            backlogs: None,
            resume_url: None,
            linkedin_url: None,
            github_url: None,
            portfolio_url: None,
            profile_completion_percentage: 0,
            is_profile_verified: false,
            ats_score: None,
            ats_feedback: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn full_name(&self) -> String {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (None, None) => "Anonymous".to_string(),
            (Some(first), None) => first.to_string(),
            (None, Some(last)) => last.to_string(),
            (Some(first), Some(last)) => format!("{first} {last}"),
        }
    }

    pub fn completion_input(&self) -> ProfileCompletionInput<'_> {
        ProfileCompletionInput {
            first_name: self.first_name.as_deref(),
            last_name: self.last_name.as_deref(),
            email: Some(self.email.as_str()),
            phone: self.phone.as_deref(),
            department: self.department.as_deref(),
            current_year: self.current_year,
            current_cgpa: self.current_cgpa,
            resume_url: self.resume_url.as_deref(),
            linkedin_url: self.linkedin_url.as_deref(),
            github_url: self.github_url.as_deref(),
        }
    }
}
