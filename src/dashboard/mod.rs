pub mod handlers;
mod repo;

use axum::{middleware::from_fn_with_state, routing::get, Router};

use crate::auth::middleware::authenticate;
use crate::state::AppState;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/dashboard/stats", get(handlers::stats))
        .route_layer(from_fn_with_state(state, authenticate))
}
