use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};

use crate::state::AppState;

pub mod cookie;
pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod profiles;
pub mod repo;
pub mod reset;

pub use extractors::CurrentUser;
pub use repo::Role;

pub fn router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .route("/auth/refresh-token", post(handlers::refresh_token))
        .route("/auth/forgot-password", post(handlers::forgot_password))
        .route("/auth/reset-password", post(handlers::reset_password));

    let protected = Router::new()
        .route("/auth/me", get(handlers::me))
        .route("/auth/profile", put(handlers::update_profile))
        .route("/auth/change-password", post(handlers::change_password))
        .route("/auth/account", delete(handlers::delete_account))
        .route("/auth/language", put(handlers::update_language))
        .route("/auth/logout", post(handlers::logout))
        .route_layer(from_fn_with_state(state, middleware::authenticate));

    public.merge(protected)
}
