use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Interview lifecycle. Scheduled is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "interview_status", rename_all = "lowercase")]
pub enum InterviewStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl InterviewStatus {
    pub fn can_transition_to(self, next: InterviewStatus) -> bool {
        matches!(
            (self, next),
            (InterviewStatus::Scheduled, InterviewStatus::Completed)
                | (InterviewStatus::Scheduled, InterviewStatus::Cancelled)
        )
    }
}

impl std::fmt::Display for InterviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InterviewStatus::Scheduled => write!(f, "scheduled"),
            InterviewStatus::Completed => write!(f, "completed"),
            InterviewStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Interview {
    pub id: Uuid,
    pub job_id: Uuid,
    pub hr_id: Uuid,
    pub candidate_id: Uuid,
    pub scheduled_at: OffsetDateTime,
    pub status: InterviewStatus,
    pub feedback: Option<String>,
    pub created_at: OffsetDateTime,
}

const INTERVIEW_COLUMNS: &str =
    "id, job_id, hr_id, candidate_id, scheduled_at, status, feedback, created_at";

impl Interview {
    pub async fn create(
        db: &PgPool,
        job_id: Uuid,
        hr_id: Uuid,
        candidate_id: Uuid,
        scheduled_at: OffsetDateTime,
    ) -> anyhow::Result<Interview> {
        let interview = sqlx::query_as::<_, Interview>(&format!(
            "INSERT INTO interviews (job_id, hr_id, candidate_id, scheduled_at)
             VALUES ($1, $2, $3, $4)
             RETURNING {INTERVIEW_COLUMNS}"
        ))
        .bind(job_id)
        .bind(hr_id)
        .bind(candidate_id)
        .bind(scheduled_at)
        .fetch_one(db)
        .await?;
        Ok(interview)
    }

    pub async fn find(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Interview>> {
        let interview = sqlx::query_as::<_, Interview>(&format!(
            "SELECT {INTERVIEW_COLUMNS} FROM interviews WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(interview)
    }

    pub async fn list_for_candidate(
        db: &PgPool,
        candidate_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Interview>> {
        let rows = sqlx::query_as::<_, Interview>(&format!(
            "SELECT {INTERVIEW_COLUMNS} FROM interviews
             WHERE candidate_id = $1
             ORDER BY scheduled_at DESC
             LIMIT $2 OFFSET $3"
        ))
        .bind(candidate_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn list_for_hr(
        db: &PgPool,
        hr_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Interview>> {
        let rows = sqlx::query_as::<_, Interview>(&format!(
            "SELECT {INTERVIEW_COLUMNS} FROM interviews
             WHERE hr_id = $1
             ORDER BY scheduled_at DESC
             LIMIT $2 OFFSET $3"
        ))
        .bind(hr_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn list_all(db: &PgPool, limit: i64, offset: i64) -> anyhow::Result<Vec<Interview>> {
        let rows = sqlx::query_as::<_, Interview>(&format!(
            "SELECT {INTERVIEW_COLUMNS} FROM interviews
             ORDER BY scheduled_at DESC
             LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn set_status(
        db: &PgPool,
        id: Uuid,
        status: InterviewStatus,
    ) -> anyhow::Result<Interview> {
        let interview = sqlx::query_as::<_, Interview>(&format!(
            "UPDATE interviews SET status = $2 WHERE id = $1 RETURNING {INTERVIEW_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .fetch_one(db)
        .await?;
        Ok(interview)
    }

    pub async fn set_feedback(db: &PgPool, id: Uuid, feedback: &str) -> anyhow::Result<Interview> {
        let interview = sqlx::query_as::<_, Interview>(&format!(
            "UPDATE interviews SET feedback = $2 WHERE id = $1 RETURNING {INTERVIEW_COLUMNS}"
        ))
        .bind(id)
        .bind(feedback)
        .fetch_one(db)
        .await?;
        Ok(interview)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_scheduled_interviews_can_move() {
        use InterviewStatus::*;
        assert!(Scheduled.can_transition_to(Completed));
        assert!(Scheduled.can_transition_to(Cancelled));
        assert!(!Completed.can_transition_to(Scheduled));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Completed));
        assert!(!Scheduled.can_transition_to(Scheduled));
    }
}
