use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    error::AppError,
    response::{ApiResponse, Pagination},
    state::AppState,
};

use super::repo::CandidateRow;

#[instrument(skip(state))]
pub async fn list_candidates(
    State(state): State<AppState>,
    Query(p): Query<Pagination>,
) -> Result<Json<ApiResponse<Vec<CandidateRow>>>, AppError> {
    let (limit, offset) = p.clamped();
    let candidates = CandidateRow::list(&state.db, limit, offset).await?;
    Ok(Json(ApiResponse::ok(candidates)))
}

#[instrument(skip(state))]
pub async fn get_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CandidateRow>>, AppError> {
    let candidate = CandidateRow::find(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Candidate not found".into()))?;
    Ok(Json(ApiResponse::ok(candidate)))
}
