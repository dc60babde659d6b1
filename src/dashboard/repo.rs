use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::repo::Role;
use crate::interviews::repo::InterviewStatus;

pub async fn count_users_with_role(db: &PgPool, role: Role) -> anyhow::Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE role = $1")
        .bind(role)
        .fetch_one(db)
        .await?;
    Ok(count)
}

pub async fn count_jobs(db: &PgPool, only_open: bool) -> anyhow::Result<i64> {
    let count =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM jobs WHERE is_open OR NOT $1")
            .bind(only_open)
            .fetch_one(db)
            .await?;
    Ok(count)
}

pub async fn count_jobs_for_hr(db: &PgPool, hr_id: Uuid, only_open: bool) -> anyhow::Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM jobs WHERE hr_id = $1 AND (is_open OR NOT $2)",
    )
    .bind(hr_id)
    .bind(only_open)
    .fetch_one(db)
    .await?;
    Ok(count)
}

pub async fn count_interviews(db: &PgPool, status: InterviewStatus) -> anyhow::Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM interviews WHERE status = $1")
        .bind(status)
        .fetch_one(db)
        .await?;
    Ok(count)
}

pub async fn count_interviews_for_hr(
    db: &PgPool,
    hr_id: Uuid,
    status: InterviewStatus,
) -> anyhow::Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM interviews WHERE hr_id = $1 AND status = $2",
    )
    .bind(hr_id)
    .bind(status)
    .fetch_one(db)
    .await?;
    Ok(count)
}

pub async fn count_interviews_for_candidate(
    db: &PgPool,
    candidate_id: Uuid,
    status: InterviewStatus,
) -> anyhow::Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM interviews WHERE candidate_id = $1 AND status = $2",
    )
    .bind(candidate_id)
    .bind(status)
    .fetch_one(db)
    .await?;
    Ok(count)
}

pub async fn count_contact_messages(db: &PgPool) -> anyhow::Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM contact_messages")
        .fetch_one(db)
        .await?;
    Ok(count)
}
