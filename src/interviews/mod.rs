mod dto;
pub mod handlers;
pub mod repo;

use axum::{
    extract::Request,
    middleware::{from_fn, from_fn_with_state, Next},
    response::IntoResponse,
    routing::{get, post, put},
    Router,
};

use crate::auth::middleware::{authenticate, authorize, HR_ONLY, HR_OR_ADMIN};
use crate::state::AppState;

async fn hr_only(req: Request, next: Next) -> impl IntoResponse {
    authorize(req, next, HR_ONLY).await
}

async fn hr_or_admin(req: Request, next: Next) -> impl IntoResponse {
    authorize(req, next, HR_OR_ADMIN).await
}

pub fn router(state: AppState) -> Router<AppState> {
    let shared = Router::new()
        .route("/interviews", get(handlers::list_interviews))
        .route("/interviews/:id", get(handlers::get_interview));

    let hr = Router::new()
        .route("/interviews", post(handlers::schedule_interview))
        .route("/interviews/:id/feedback", put(handlers::record_feedback))
        .route_layer(from_fn(hr_only));

    let manage = Router::new()
        .route("/interviews/:id/status", put(handlers::update_status))
        .route_layer(from_fn(hr_or_admin));

    shared
        .merge(hr)
        .merge(manage)
        .route_layer(from_fn_with_state(state, authenticate))
}
