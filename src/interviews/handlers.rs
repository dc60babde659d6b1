use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use time::OffsetDateTime;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{repo::User, CurrentUser, Role},
    error::AppError,
    jobs::repo::Job,
    response::{ApiResponse, Pagination},
    state::AppState,
};

use super::dto::{FeedbackRequest, ScheduleInterviewRequest, UpdateStatusRequest};
use super::repo::{Interview, InterviewStatus};

#[instrument(skip(state, payload))]
pub async fn schedule_interview(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(payload): Json<ScheduleInterviewRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Interview>>), AppError> {
    if payload.scheduled_at <= OffsetDateTime::now_utc() {
        return Err(AppError::Validation("Interview must be scheduled in the future".into()));
    }

    let job = Job::find(&state.db, payload.job_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".into()))?;
    if job.hr_id != current.id {
        warn!(job_id = %job.id, user_id = %current.id, "scheduling on foreign job");
        return Err(AppError::Forbidden("You do not own this job posting".into()));
    }

    let candidate = User::find_by_id(&state.db, payload.candidate_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Candidate not found".into()))?;
    if candidate.role != Role::Candidate {
        return Err(AppError::Validation("Selected user is not a candidate".into()));
    }

    let interview = Interview::create(
        &state.db,
        job.id,
        current.id,
        candidate.id,
        payload.scheduled_at,
    )
    .await?;

    info!(interview_id = %interview.id, job_id = %job.id, candidate_id = %candidate.id, "interview scheduled");
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(interview))))
}

/// Listing is shaped by the caller's role: candidates see their own
/// interviews, hr accounts the ones they scheduled, admins everything.
#[instrument(skip(state))]
pub async fn list_interviews(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(p): Query<Pagination>,
) -> Result<Json<ApiResponse<Vec<Interview>>>, AppError> {
    let (limit, offset) = p.clamped();
    let interviews = match current.role {
        Role::Candidate => Interview::list_for_candidate(&state.db, current.id, limit, offset).await?,
        Role::Hr => Interview::list_for_hr(&state.db, current.id, limit, offset).await?,
        Role::Admin => Interview::list_all(&state.db, limit, offset).await?,
    };
    Ok(Json(ApiResponse::ok(interviews)))
}

fn is_participant(interview: &Interview, current: &CurrentUser) -> bool {
    current.role == Role::Admin
        || interview.hr_id == current.id
        || interview.candidate_id == current.id
}

#[instrument(skip(state))]
pub async fn get_interview(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Interview>>, AppError> {
    let interview = Interview::find(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Interview not found".into()))?;
    if !is_participant(&interview, &current) {
        return Err(AppError::Forbidden("You are not part of this interview".into()));
    }
    Ok(Json(ApiResponse::ok(interview)))
}

async fn managed_interview(
    state: &AppState,
    current: &CurrentUser,
    id: Uuid,
) -> Result<Interview, AppError> {
    let interview = Interview::find(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Interview not found".into()))?;
    if current.role != Role::Admin && interview.hr_id != current.id {
        warn!(interview_id = %id, user_id = %current.id, "interview mutation denied");
        return Err(AppError::Forbidden("You did not schedule this interview".into()));
    }
    Ok(interview)
}

#[instrument(skip(state, payload))]
pub async fn update_status(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<ApiResponse<Interview>>, AppError> {
    let interview = managed_interview(&state, &current, id).await?;

    if !interview.status.can_transition_to(payload.status) {
        return Err(AppError::Validation(format!(
            "Cannot change status from {} to {}",
            interview.status, payload.status
        )));
    }

    let updated = Interview::set_status(&state.db, id, payload.status).await?;
    info!(interview_id = %id, status = %updated.status, "interview status updated");
    Ok(Json(ApiResponse::ok(updated)))
}

#[instrument(skip(state, payload))]
pub async fn record_feedback(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<FeedbackRequest>,
) -> Result<Json<ApiResponse<Interview>>, AppError> {
    if payload.feedback.trim().is_empty() {
        return Err(AppError::Validation("Feedback cannot be empty".into()));
    }

    let interview = managed_interview(&state, &current, id).await?;
    if interview.status != InterviewStatus::Completed {
        return Err(AppError::Validation(
            "Feedback can only be recorded for completed interviews".into(),
        ));
    }

    let updated = Interview::set_feedback(&state.db, id, payload.feedback.trim()).await?;
    info!(interview_id = %id, "interview feedback recorded");
    Ok(Json(ApiResponse::ok(updated)))
}
