use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::auth::extractors::CurrentUser;
use crate::auth::jwt::{TokenError, TokenKeys};
use crate::auth::repo::{Role, User};
use crate::error::AppError;
use crate::state::AppState;

pub const HR_ONLY: &[Role] = &[Role::Hr];
pub const HR_OR_ADMIN: &[Role] = &[Role::Hr, Role::Admin];

fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Authentication required".into()))?;
    auth.strip_prefix("Bearer ")
        .or_else(|| auth.strip_prefix("bearer "))
        .ok_or_else(|| AppError::Unauthorized("Invalid Authorization header".into()))
}

/// Session middleware: verifies the bearer access token and attaches the
/// caller's identity to the request. Identity and role are trusted from the
/// signed token; a changed role is only picked up once the token expires,
/// unless `recheck_role` forces a store read per request.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(req.headers())?;
    let keys = TokenKeys::new(&state.config.jwt);

    let claims = keys.verify_access(token).map_err(|e| match e {
        // The expiry-specific message lets clients run their refresh flow.
        TokenError::Expired => AppError::Unauthorized("Access token expired".into()),
        TokenError::Invalid => {
            warn!("invalid access token");
            AppError::Unauthorized("Invalid access token".into())
        }
    })?;

    let mut current = CurrentUser {
        id: claims.sub,
        email: claims.email,
        role: claims.role,
    };

    if state.config.recheck_role {
        let user = User::find_by_id(&state.db, current.id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Account no longer exists".into()))?;
        if !user.is_active {
            return Err(AppError::Forbidden("Account is deactivated".into()));
        }
        current.role = user.role;
    }

    req.extensions_mut().insert(current);
    Ok(next.run(req).await)
}

/// Role gate: pure allow-list check over the identity attached by
/// `authenticate`. Composable per route via `route_layer`.
pub async fn authorize(
    req: Request,
    next: Next,
    allowed: &'static [Role],
) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(|| AppError::Unauthorized("Authentication required".into()))?;

    if !role_permitted(allowed, user.role) {
        let required = allowed
            .iter()
            .map(Role::to_string)
            .collect::<Vec<_>>()
            .join(" or ");
        warn!(user_id = %user.id, role = %user.role, %required, "role denied");
        return Err(AppError::Forbidden(format!(
            "Requires role {required}; current role is {}",
            user.role
        )));
    }

    Ok(next.run(req).await)
}

pub fn role_permitted(allowed: &[Role], role: Role) -> bool {
    allowed.contains(&role)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_list_membership() {
        assert!(role_permitted(HR_ONLY, Role::Hr));
        assert!(!role_permitted(HR_ONLY, Role::Candidate));
        assert!(role_permitted(HR_OR_ADMIN, Role::Admin));
        assert!(!role_permitted(HR_OR_ADMIN, Role::Candidate));
    }

    #[test]
    fn bearer_parsing() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_err());

        headers.insert(header::AUTHORIZATION, "Bearer abc".parse().unwrap());
        assert_eq!(bearer_token(&headers).unwrap(), "abc");

        headers.insert(header::AUTHORIZATION, "Basic abc".parse().unwrap());
        assert!(bearer_token(&headers).is_err());
    }
}
