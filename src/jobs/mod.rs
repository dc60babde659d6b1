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
    let public = Router::new()
        .route("/jobs", get(handlers::list_jobs))
        .route("/jobs/:id", get(handlers::get_job));

    let create = Router::new()
        .route("/jobs", post(handlers::create_job))
        .route_layer(from_fn(hr_only));

    let mutate = Router::new()
        .route(
            "/jobs/:id",
            put(handlers::update_job).delete(handlers::delete_job),
        )
        .route_layer(from_fn(hr_or_admin));

    let write = create
        .merge(mutate)
        .route_layer(from_fn_with_state(state, authenticate));

    public.merge(write)
}
