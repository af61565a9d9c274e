use anyhow::Result;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::job::{JobRow, JobStatus, JobType};

/// Fields of a posting to be inserted.
pub struct NewJob<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub company: Option<&'a str>,
    pub job_type: JobType,
    pub status: JobStatus,
    pub location: Option<&'a str>,
    pub salary: Option<f64>,
    pub requirements: Option<&'a str>,
}

pub async fn insert_job(pool: &PgPool, job: NewJob<'_>) -> Result<JobRow> {
    let id = Uuid::new_v4();
    let row = sqlx::query_as::<_, JobRow>(
        r#"
        INSERT INTO jobs
            (id, title, description, company, job_type, status, location, salary, requirements)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(job.title)
    .bind(job.description)
    .bind(job.company)
    .bind(job.job_type.as_str())
    .bind(job.status.as_str())
    .bind(job.location)
    .bind(job.salary)
    .bind(job.requirements)
    .fetch_one(pool)
    .await?;

    info!("Created job {id} ({})", row.title);
    Ok(row)
}

/// Newest first, optionally restricted to one status.
pub async fn list_jobs(pool: &PgPool, status: Option<JobStatus>) -> Result<Vec<JobRow>> {
    let rows = match status {
        Some(status) => {
            sqlx::query_as::<_, JobRow>(
                "SELECT * FROM jobs WHERE status = $1 ORDER BY created_at DESC",
            )
            .bind(status.as_str())
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, JobRow>("SELECT * FROM jobs ORDER BY created_at DESC")
                .fetch_all(pool)
                .await?
        }
    };
    Ok(rows)
}

pub async fn get_job(pool: &PgPool, id: Uuid) -> Result<Option<JobRow>> {
    let row = sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn update_job_status(pool: &PgPool, id: Uuid, status: JobStatus) -> Result<Option<JobRow>> {
    let row = sqlx::query_as::<_, JobRow>(
        "UPDATE jobs SET status = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
    )
    .bind(status.as_str())
    .bind(id)
    .fetch_optional(pool)
    .await?;

    if row.is_some() {
        info!("Job {id} moved to {status}");
    }
    Ok(row)
}
