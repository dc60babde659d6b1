use axum::{extract::State, Json};
use serde::Serialize;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::{CurrentUser, Role},
    error::AppError,
    interviews::repo::InterviewStatus,
    response::ApiResponse,
    state::AppState,
};

use super::repo;

#[derive(Debug, Serialize)]
pub struct InterviewCounts {
    pub scheduled: i64,
    pub completed: i64,
    pub cancelled: i64,
}

#[derive(Debug, Serialize)]
pub struct AdminStats {
    pub candidates: i64,
    pub hr_accounts: i64,
    pub jobs: i64,
    pub open_jobs: i64,
    pub interviews: InterviewCounts,
    pub contact_messages: i64,
}

#[derive(Debug, Serialize)]
pub struct HrStats {
    pub jobs: i64,
    pub open_jobs: i64,
    pub interviews: InterviewCounts,
}

#[derive(Debug, Serialize)]
pub struct CandidateStats {
    pub interviews: InterviewCounts,
}

/// Widget payload shaped by the caller's role.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum DashboardStats {
    Admin(AdminStats),
    Hr(HrStats),
    Candidate(CandidateStats),
}

async fn global_interview_counts(db: &PgPool) -> anyhow::Result<InterviewCounts> {
    Ok(InterviewCounts {
        scheduled: repo::count_interviews(db, InterviewStatus::Scheduled).await?,
        completed: repo::count_interviews(db, InterviewStatus::Completed).await?,
        cancelled: repo::count_interviews(db, InterviewStatus::Cancelled).await?,
    })
}

async fn hr_interview_counts(db: &PgPool, hr_id: Uuid) -> anyhow::Result<InterviewCounts> {
    Ok(InterviewCounts {
        scheduled: repo::count_interviews_for_hr(db, hr_id, InterviewStatus::Scheduled).await?,
        completed: repo::count_interviews_for_hr(db, hr_id, InterviewStatus::Completed).await?,
        cancelled: repo::count_interviews_for_hr(db, hr_id, InterviewStatus::Cancelled).await?,
    })
}

async fn candidate_interview_counts(
    db: &PgPool,
    candidate_id: Uuid,
) -> anyhow::Result<InterviewCounts> {
    Ok(InterviewCounts {
        scheduled: repo::count_interviews_for_candidate(db, candidate_id, InterviewStatus::Scheduled)
            .await?,
        completed: repo::count_interviews_for_candidate(db, candidate_id, InterviewStatus::Completed)
            .await?,
        cancelled: repo::count_interviews_for_candidate(db, candidate_id, InterviewStatus::Cancelled)
            .await?,
    })
}

#[instrument(skip(state))]
pub async fn stats(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<ApiResponse<DashboardStats>>, AppError> {
    let db = &state.db;
    let stats = match current.role {
        Role::Admin => DashboardStats::Admin(AdminStats {
            candidates: repo::count_users_with_role(db, Role::Candidate).await?,
            hr_accounts: repo::count_users_with_role(db, Role::Hr).await?,
            jobs: repo::count_jobs(db, false).await?,
            open_jobs: repo::count_jobs(db, true).await?,
            interviews: global_interview_counts(db).await?,
            contact_messages: repo::count_contact_messages(db).await?,
        }),
        Role::Hr => DashboardStats::Hr(HrStats {
            jobs: repo::count_jobs_for_hr(db, current.id, false).await?,
            open_jobs: repo::count_jobs_for_hr(db, current.id, true).await?,
            interviews: hr_interview_counts(db, current.id).await?,
        }),
        Role::Candidate => DashboardStats::Candidate(CandidateStats {
            interviews: candidate_interview_counts(db, current.id).await?,
        }),
    };
    Ok(Json(ApiResponse::ok(stats)))
}
