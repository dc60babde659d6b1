use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Job posting owned by an HR account.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: Uuid,
    pub hr_id: Uuid,
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub salary_range: Option<String>,
    pub is_open: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

const JOB_COLUMNS: &str = "id, hr_id, title, description, location, employment_type, \
     salary_range, is_open, created_at, updated_at";

impl Job {
    pub async fn list_open(db: &PgPool, limit: i64, offset: i64) -> anyhow::Result<Vec<Job>> {
        let rows = sqlx::query_as::<_, Job>(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs
             WHERE is_open
             ORDER BY created_at DESC
             LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Job>> {
        let job = sqlx::query_as::<_, Job>(&format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await?;
        Ok(job)
    }

    pub async fn create(
        db: &PgPool,
        hr_id: Uuid,
        title: &str,
        description: &str,
        location: Option<&str>,
        employment_type: Option<&str>,
        salary_range: Option<&str>,
    ) -> anyhow::Result<Job> {
        let job = sqlx::query_as::<_, Job>(&format!(
            "INSERT INTO jobs (hr_id, title, description, location, employment_type, salary_range)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {JOB_COLUMNS}"
        ))
        .bind(hr_id)
        .bind(title)
        .bind(description)
        .bind(location)
        .bind(employment_type)
        .bind(salary_range)
        .fetch_one(db)
        .await?;
        Ok(job)
    }

    /// Partial update; absent fields keep their stored value.
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        title: Option<&str>,
        description: Option<&str>,
        location: Option<&str>,
        employment_type: Option<&str>,
        salary_range: Option<&str>,
        is_open: Option<bool>,
    ) -> anyhow::Result<Job> {
        let job = sqlx::query_as::<_, Job>(&format!(
            "UPDATE jobs
             SET title = COALESCE($2, title),
                 description = COALESCE($3, description),
                 location = COALESCE($4, location),
                 employment_type = COALESCE($5, employment_type),
                 salary_range = COALESCE($6, salary_range),
                 is_open = COALESCE($7, is_open),
                 updated_at = now()
             WHERE id = $1
             RETURNING {JOB_COLUMNS}"
        ))
        .bind(id)
        .bind(title)
        .bind(description)
        .bind(location)
        .bind(employment_type)
        .bind(salary_range)
        .bind(is_open)
        .fetch_one(db)
        .await?;
        Ok(job)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }
}
