pub mod handlers;
pub mod repo;

use axum::{
    extract::Request,
    middleware::{from_fn, from_fn_with_state, Next},
    response::IntoResponse,
    routing::get,
    Router,
};

use crate::auth::middleware::{authenticate, authorize, HR_OR_ADMIN};
use crate::state::AppState;

async fn hr_or_admin(req: Request, next: Next) -> impl IntoResponse {
    authorize(req, next, HR_OR_ADMIN).await
}

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/candidates", get(handlers::list_candidates))
        .route("/candidates/:id", get(handlers::get_candidate))
        .route_layer(from_fn(hr_or_admin))
        .route_layer(from_fn_with_state(state, authenticate))
}
