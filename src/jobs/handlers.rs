use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{CurrentUser, Role},
    error::AppError,
    response::{ApiResponse, Pagination},
    state::AppState,
};

use super::dto::{CreateJobRequest, UpdateJobRequest};
use super::repo::Job;

#[instrument(skip(state))]
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(p): Query<Pagination>,
) -> Result<Json<ApiResponse<Vec<Job>>>, AppError> {
    let (limit, offset) = p.clamped();
    let jobs = Job::list_open(&state.db, limit, offset).await?;
    Ok(Json(ApiResponse::ok(jobs)))
}

#[instrument(skip(state))]
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Job>>, AppError> {
    let job = Job::find(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".into()))?;
    Ok(Json(ApiResponse::ok(job)))
}

#[instrument(skip(state, payload))]
pub async fn create_job(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(payload): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Job>>), AppError> {
    if payload.title.trim().is_empty() || payload.description.trim().is_empty() {
        return Err(AppError::Validation("Title and description are required".into()));
    }

    let job = Job::create(
        &state.db,
        current.id,
        payload.title.trim(),
        payload.description.trim(),
        payload.location.as_deref(),
        payload.employment_type.as_deref(),
        payload.salary_range.as_deref(),
    )
    .await?;

    info!(job_id = %job.id, hr_id = %current.id, "job created");
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(job))))
}

/// Postings may only be mutated by the owning hr account or an admin.
async fn owned_job(state: &AppState, current: &CurrentUser, id: Uuid) -> Result<Job, AppError> {
    let job = Job::find(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".into()))?;
    if current.role != Role::Admin && job.hr_id != current.id {
        warn!(job_id = %id, user_id = %current.id, "job mutation denied");
        return Err(AppError::Forbidden("You do not own this job posting".into()));
    }
    Ok(job)
}

#[instrument(skip(state, payload))]
pub async fn update_job(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateJobRequest>,
) -> Result<Json<ApiResponse<Job>>, AppError> {
    owned_job(&state, &current, id).await?;

    let job = Job::update(
        &state.db,
        id,
        payload.title.as_deref(),
        payload.description.as_deref(),
        payload.location.as_deref(),
        payload.employment_type.as_deref(),
        payload.salary_range.as_deref(),
        payload.is_open,
    )
    .await?;

    info!(job_id = %job.id, "job updated");
    Ok(Json(ApiResponse::ok(job)))
}

#[instrument(skip(state))]
pub async fn delete_job(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    owned_job(&state, &current, id).await?;
    Job::delete(&state.db, id).await?;

    info!(job_id = %id, "job deleted");
    Ok(Json(ApiResponse::message("Job deleted")))
}
