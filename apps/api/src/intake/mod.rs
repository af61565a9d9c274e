// Resume intake pipeline.
// Implements: filename sanitization, upload validation, deterministic ATS scoring,
// storage under a generated name, and write-back of the score onto the profile.

pub mod handlers;
pub mod sanitize;
pub mod scoring;
pub mod service;
pub mod validation;

use std::path::PathBuf;

pub use scoring::DeterministicAtsScorer;
pub use service::{DeleteError, IntakeError, IntakeOutcome, IntakeService};
pub use validation::UploadRequest;

/// Subdirectory of the upload root that holds resumes.
pub const RESUME_DIR: &str = "resumes";

/// Explicit intake settings, built once from `Config` and passed in at construction.
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    pub upload_root: PathBuf,
    pub max_file_bytes: u64,
    /// URL prefix under which the upload root is publicly served, without trailing slash.
    pub public_prefix: String,
}

impl IntakeConfig {
    pub const DEFAULT_MAX_FILE_BYTES: u64 = 5 * 1024 * 1024;

    pub fn resume_dir(&self) -> PathBuf {
        self.upload_root.join(RESUME_DIR)
    }

    pub fn resume_path(&self, storage_name: &str) -> PathBuf {
        self.resume_dir().join(storage_name)
    }

    pub fn resume_url(&self, storage_name: &str) -> String {
        format!("{}/{}/{}", self.public_prefix, RESUME_DIR, storage_name)
    }

    /// Default size ceiling and `/uploads` prefix under `upload_root`.
    #[cfg(test)]
    pub fn with_root(upload_root: impl AsRef<std::path::Path>) -> Self {
        Self {
            upload_root: upload_root.as_ref().to_path_buf(),
            max_file_bytes: Self::DEFAULT_MAX_FILE_BYTES,
            public_prefix: "/uploads".to_string(),
        }
    }
}
