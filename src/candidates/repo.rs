use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo::Role;

/// Candidate user joined with their profile, as browsed by hr and admins.
/// The profile side is a LEFT JOIN: accounts whose profile insert failed at
/// registration still show up here.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CandidateRow {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub headline: Option<String>,
    pub skills: Vec<String>,
    pub resume_url: Option<String>,
    pub created_at: OffsetDateTime,
}

const CANDIDATE_SELECT: &str = "SELECT u.id, u.email, u.name, p.headline, \
     COALESCE(p.skills, '{}') AS skills, p.resume_url, u.created_at
     FROM users u
     LEFT JOIN candidate_profiles p ON p.user_id = u.id";

impl CandidateRow {
    pub async fn list(db: &PgPool, limit: i64, offset: i64) -> anyhow::Result<Vec<CandidateRow>> {
        let rows = sqlx::query_as::<_, CandidateRow>(&format!(
            "{CANDIDATE_SELECT}
             WHERE u.role = $1 AND u.is_active
             ORDER BY u.created_at DESC
             LIMIT $2 OFFSET $3"
        ))
        .bind(Role::Candidate)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find(db: &PgPool, id: Uuid) -> anyhow::Result<Option<CandidateRow>> {
        let row = sqlx::query_as::<_, CandidateRow>(&format!(
            "{CANDIDATE_SELECT} WHERE u.role = $1 AND u.id = $2"
        ))
        .bind(Role::Candidate)
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }
}
