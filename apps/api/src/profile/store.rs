use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::profile::ProfileRow;

/// Profile persistence as seen by the rest of the service.
///
/// Carried in `AppState` as `Arc<dyn ProfileStore>` and handed to the intake
/// pipeline, which only ever looks a profile up and saves it back.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn find_by_owner_id(&self, owner_id: &str) -> Result<Option<ProfileRow>>;

    /// Every profile, oldest first.
    async fn list_all(&self) -> Result<Vec<ProfileRow>>;

    /// Inserts or overwrites the profile keyed by `owner_id`. Last write wins.
    async fn save(&self, profile: &ProfileRow) -> Result<ProfileRow>;
}

#[derive(Clone)]
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn find_by_owner_id(&self, owner_id: &str) -> Result<Option<ProfileRow>> {
        let row = sqlx::query_as::<_, ProfileRow>("SELECT * FROM user_profiles WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_all(&self) -> Result<Vec<ProfileRow>> {
        let rows = sqlx::query_as::<_, ProfileRow>(
            "SELECT * FROM user_profiles ORDER BY created_at, owner_id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn save(&self, profile: &ProfileRow) -> Result<ProfileRow> {
        let saved = sqlx::query_as::<_, ProfileRow>(
            r#"
            INSERT INTO user_profiles
                (id, owner_id, email, first_name, last_name, phone, department,
                 current_year, current_cgpa, backlogs, resume_url, linkedin_url,
                 github_url, portfolio_url, profile_completion_percentage,
                 is_profile_verified, ats_score, ats_feedback, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                    $11, $12, $13, $14, $15, $16, $17, $18, $19, NOW())
            ON CONFLICT (owner_id) DO UPDATE SET
                email = EXCLUDED.email,
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                phone = EXCLUDED.phone,
                department = EXCLUDED.department,
                current_year = EXCLUDED.current_year,
                current_cgpa = EXCLUDED.current_cgpa,
                backlogs = EXCLUDED.backlogs,
                resume_url = EXCLUDED.resume_url,
                linkedin_url = EXCLUDED.linkedin_url,
                github_url = EXCLUDED.github_url,
                portfolio_url = EXCLUDED.portfolio_url,
                profile_completion_percentage = EXCLUDED.profile_completion_percentage,
                is_profile_verified = EXCLUDED.is_profile_verified,
                ats_score = EXCLUDED.ats_score,
                ats_feedback = EXCLUDED.ats_feedback,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(profile.id)
        .bind(&profile.owner_id)
        .bind(&profile.email)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.phone)
        .bind(&profile.department)
        .bind(profile.current_year)
        .bind(profile.current_cgpa)
        .bind(profile.backlogs)
        .bind(&profile.resume_url)
        .bind(&profile.linkedin_url)
        .bind(&profile.github_url)
        .bind(&profile.portfolio_url)
        .bind(profile.profile_completion_percentage)
        .bind(profile.is_profile_verified)
        .bind(profile.ats_score)
        .bind(&profile.ats_feedback)
        .bind(profile.created_at)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(
            "Saved profile {} for owner {}",
            saved.id,
            saved.owner_id
        );
        Ok(saved)
    }
}

#[cfg(test)]
pub mod memory {
    //! In-memory store for tests that exercise callers without a database.

    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    use anyhow::{bail, Result};
    use async_trait::async_trait;
    use chrono::Utc;

    use super::ProfileStore;
    use crate::models::profile::ProfileRow;

    #[derive(Default)]
    pub struct InMemoryProfileStore {
        profiles: Mutex<HashMap<String, ProfileRow>>,
        fail_saves: AtomicBool,
    }

    impl InMemoryProfileStore {
        pub fn with_profile(profile: ProfileRow) -> Self {
            let store = Self::default();
            store
                .profiles
                .lock()
                .unwrap()
                .insert(profile.owner_id.clone(), profile);
            store
        }

        pub fn fail_saves(&self) {
            self.fail_saves.store(true, Ordering::SeqCst);
        }

        pub fn get(&self, owner_id: &str) -> Option<ProfileRow> {
            self.profiles.lock().unwrap().get(owner_id).cloned()
        }
    }

    #[async_trait]
    impl ProfileStore for InMemoryProfileStore {
        async fn find_by_owner_id(&self, owner_id: &str) -> Result<Option<ProfileRow>> {
            Ok(self.get(owner_id))
        }

        async fn list_all(&self) -> Result<Vec<ProfileRow>> {
            let mut rows: Vec<ProfileRow> = self.profiles.lock().unwrap().values().cloned().collect();
            rows.sort_by(|a, b| {
                a.created_at
                    .cmp(&b.created_at)
                    .then_with(|| a.owner_id.cmp(&b.owner_id))
            });
            Ok(rows)
        }

        async fn save(&self, profile: &ProfileRow) -> Result<ProfileRow> {
            if self.fail_saves.load(Ordering::SeqCst) {
                bail!("profile store unavailable");
            }
            let mut saved = profile.clone();
            saved.updated_at = Utc::now();
            self.profiles
                .lock()
                .unwrap()
                .insert(saved.owner_id.clone(), saved.clone());
            Ok(saved)
        }
    }
}
