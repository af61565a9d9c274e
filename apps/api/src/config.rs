use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::intake::IntakeConfig;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    pub upload_dir: String,
    pub max_upload_bytes: u64,
    pub public_upload_prefix: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            upload_dir: std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()),
            max_upload_bytes: std::env::var("MAX_UPLOAD_BYTES")
                .unwrap_or_else(|_| IntakeConfig::DEFAULT_MAX_FILE_BYTES.to_string())
                .parse::<u64>()
                .context("MAX_UPLOAD_BYTES must be a positive integer")?,
            public_upload_prefix: std::env::var("PUBLIC_UPLOAD_PREFIX")
                .unwrap_or_else(|_| "/uploads".to_string()),
        })
    }

    /// Intake settings handed to the validator and orchestrator at construction.
    pub fn intake(&self) -> IntakeConfig {
        IntakeConfig {
            upload_root: PathBuf::from(&self.upload_dir),
            max_file_bytes: self.max_upload_bytes,
            public_prefix: self.public_upload_prefix.trim_end_matches('/').to_string(),
        }
    }

    /// Transport-level body cap. Sits above the validator limit so oversize
    /// uploads still reach the validator and get its rejection message.
    pub fn body_limit(&self) -> usize {
        let limit = self.max_upload_bytes.saturating_mul(2).max(1024 * 1024);
        usize::try_from(limit).unwrap_or(usize::MAX)
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
