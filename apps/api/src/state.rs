use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::intake::IntakeService;
use crate::profile::ProfileStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// Profile persistence. Default: PgProfileStore over `db`.
    pub profiles: Arc<dyn ProfileStore>,
    /// Resume intake pipeline; shares `profiles` for score write-back.
    pub intake: Arc<IntakeService>,
}

#[cfg(test)]
impl AppState {
    /// State over a lazy (never connected) pool and the given profile store.
    pub fn for_tests(
        upload_dir: &std::path::Path,
        profiles: Arc<crate::profile::store::memory::InMemoryProfileStore>,
    ) -> Self {
        use crate::intake::DeterministicAtsScorer;

        let config = Config {
            database_url: "postgres://localhost/unused".to_string(),
            port: 0,
            rust_log: "info".to_string(),
            upload_dir: upload_dir.to_string_lossy().into_owned(),
            max_upload_bytes: 5 * 1024 * 1024,
            public_upload_prefix: "/uploads".to_string(),
        };
        let db = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .expect("lazy pool");
        let intake = IntakeService::new(
            config.intake(),
            Arc::new(DeterministicAtsScorer),
            profiles.clone(),
        );
        AppState {
            db,
            config,
            profiles,
            intake: Arc::new(intake),
        }
    }
}
