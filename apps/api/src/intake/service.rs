use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::intake::sanitize::has_forbidden_chars;
use crate::intake::scoring::{AtsScoreResult, AtsScorer};
use crate::intake::validation::{UploadRequest, UploadValidator, ValidatedUpload, ValidationError};
use crate::intake::IntakeConfig;
use crate::profile::ProfileStore;

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("Invalid user id")]
    InvalidOwner,

    #[error(transparent)]
    Rejected(#[from] ValidationError),

    #[error("failed to store upload: {0}")]
    Storage(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum DeleteError {
    #[error("Unauthorized to delete this file")]
    Forbidden,

    #[error("Invalid file name")]
    InvalidName,

    #[error("Resume not found")]
    NotFound,

    #[error("failed to delete upload: {0}")]
    Io(#[from] std::io::Error),
}

/// A resume written to disk. Never modified after creation.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub storage_name: String,
    pub path: PathBuf,
    pub size_bytes: u64,
}

#[derive(Debug, Clone)]
pub struct IntakeOutcome {
    pub stored_file: StoredFile,
    pub original_name: String,
    pub file_url: String,
    pub score: AtsScoreResult,
}

/// Validate → store → score → attach score to profile.
///
/// Storage success is not contingent on scoring or on the profile update:
/// once the file is written the upload is reported as successful.
pub struct IntakeService {
    config: IntakeConfig,
    validator: UploadValidator,
    scorer: Arc<dyn AtsScorer>,
    profiles: Arc<dyn ProfileStore>,
}

impl IntakeService {
    pub fn new(
        config: IntakeConfig,
        scorer: Arc<dyn AtsScorer>,
        profiles: Arc<dyn ProfileStore>,
    ) -> Self {
        Self {
            validator: UploadValidator::new(config.max_file_bytes),
            config,
            scorer,
            profiles,
        }
    }

    pub async fn ingest(&self, req: UploadRequest) -> Result<IntakeOutcome, IntakeError> {
        let owner_id = req.owner_id.as_str();
        if owner_id.trim().is_empty() || has_forbidden_chars(owner_id) {
            return Err(IntakeError::InvalidOwner);
        }

        let validated = self.validator.validate(&req).map_err(|e| {
            info!("Rejected resume upload for user {owner_id}: {e}");
            e
        })?;

        let stored_file = self.store(owner_id, &validated, &req.bytes).await?;
        info!(
            "Resume uploaded successfully for user {owner_id}: {}",
            stored_file.storage_name
        );

        let score = self.score_stored(owner_id, &stored_file).await;
        self.attach_score(owner_id, &score).await;

        Ok(IntakeOutcome {
            file_url: self.config.resume_url(&stored_file.storage_name),
            original_name: req.raw_filename.unwrap_or_default(),
            stored_file,
            score,
        })
    }

    /// Removes `storage_name`, which must belong to `requesting_owner`.
    pub async fn delete(&self, storage_name: &str, requesting_owner: &str) -> Result<(), DeleteError> {
        if !storage_name.starts_with(&format!("{requesting_owner}_")) {
            warn!("User {requesting_owner} attempted to delete {storage_name}");
            return Err(DeleteError::Forbidden);
        }
        if has_forbidden_chars(storage_name) || storage_name.contains("..") {
            return Err(DeleteError::InvalidName);
        }

        match fs::remove_file(self.config.resume_path(storage_name)).await {
            Ok(()) => {
                info!("Resume deleted successfully for user {requesting_owner}: {storage_name}");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(DeleteError::NotFound),
            Err(e) => Err(DeleteError::Io(e)),
        }
    }

    /// Scores an upload without storing it. When the request carries an owner,
    /// the score is also written onto that owner's profile.
    ///
    /// Anonymous requests are keyed on the sanitized file name instead.
    pub async fn analyze(&self, req: UploadRequest) -> Result<AtsScoreResult, IntakeError> {
        let owner_id = req.owner_id.trim();
        let validated = self.validator.validate(&req).map_err(|e| {
            info!("Rejected resume analysis: {e}");
            e
        })?;

        if owner_id.is_empty() {
            info!("Analyzing resume for anonymous user");
            return Ok(self.score_with(&validated.sanitized_name));
        }

        info!("Analyzing resume for user {owner_id}");
        let score = self.score_with(owner_id);
        self.attach_score(owner_id, &score).await;
        Ok(score)
    }

    async fn store(
        &self,
        owner_id: &str,
        validated: &ValidatedUpload,
        bytes: &Bytes,
    ) -> std::io::Result<StoredFile> {
        let dir = self.config.resume_dir();
        fs::create_dir_all(&dir).await?;

        let storage_name = format!(
            "{owner_id}_{}_{}{}",
            validated.base_name,
            Uuid::new_v4(),
            validated.extension
        );
        let path = dir.join(&storage_name);

        if let Err(e) = write_new_file(&path, bytes).await {
            error!("Failed to write resume {}: {e}", path.display());
            // best effort: a half-written file must not outlive the failed request
            let _ = fs::remove_file(&path).await;
            return Err(e);
        }

        Ok(StoredFile {
            storage_name,
            path,
            size_bytes: bytes.len() as u64,
        })
    }

    /// Scores a stored resume, substituting the zero-score result on failure.
    async fn score_stored(&self, owner_id: &str, stored: &StoredFile) -> AtsScoreResult {
        info!(
            "Starting ATS analysis for user {owner_id} with file: {}",
            stored.path.display()
        );

        match fs::try_exists(&stored.path).await {
            Ok(true) => {}
            Ok(false) => {
                error!("Resume file not found: {}", stored.path.display());
                return AtsScoreResult::failed("Resume file not found");
            }
            Err(e) => {
                error!("Failed to inspect resume {}: {e}", stored.path.display());
                return AtsScoreResult::failed(format!("Error reading resume file: {e}"));
            }
        }

        self.score_with(owner_id)
    }

    /// Runs the scorer keyed on `seed`, substituting the zero-score result on error.
    fn score_with(&self, seed: &str) -> AtsScoreResult {
        match self.scorer.score(seed) {
            Ok(result) => {
                info!("ATS score generated for {seed}: {}", result.overall_score);
                result
            }
            Err(e) => {
                error!("Failed to analyze resume for {seed}: {e}");
                AtsScoreResult::failed(format!("Error analyzing resume: {e}"))
            }
        }
    }

    /// Writes score and feedback onto the owner's profile. Failures are logged only.
    async fn attach_score(&self, owner_id: &str, score: &AtsScoreResult) {
        let mut profile = match self.profiles.find_by_owner_id(owner_id).await {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                warn!("No profile found for user {owner_id}, ATS score not saved");
                return;
            }
            Err(e) => {
                error!("Failed to load profile for user {owner_id}: {e:?}");
                return;
            }
        };

        profile.ats_score = Some(score.overall_score as i32);
        profile.ats_feedback = Some(score.summary());

        match self.profiles.save(&profile).await {
            Ok(_) => info!(
                "Updated ATS score for user {owner_id}: {}",
                score.overall_score
            ),
            Err(e) => error!("Failed to save ATS score for user {owner_id}: {e:?}"),
        }
    }
}

/// Creates `path` (never overwriting) and writes `bytes` to it. The handle is
/// dropped, and so closed, on every return path.
async fn write_new_file(path: &std::path::Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    Ok(())
}
