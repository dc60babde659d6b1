use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    Json,
};
use lazy_static::lazy_static;
use regex::Regex;
use time::OffsetDateTime;
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        cookie::{build_clear_cookie, build_refresh_cookie, extract_cookie, REFRESH_COOKIE},
        dto::{
            AccessTokenData, AuthData, ChangePasswordRequest, DeleteAccountRequest,
            ForgotPasswordRequest, LoginRequest, MeData, PublicUser, RefreshRequest,
            RegisterRequest, ResetPasswordRequest, UpdateLanguageRequest, UpdateProfileRequest,
        },
        extractors::CurrentUser,
        jwt::TokenKeys,
        password::{hash_password, verify_password, MIN_PASSWORD_LEN},
        profiles::{CandidateProfile, HrProfile, RoleProfile},
        repo::{Role, User},
        reset::{generate_reset_token, hash_reset_token, RESET_TOKEN_TTL},
    },
    error::AppError,
    mailer::Mail,
    response::ApiResponse,
    state::AppState,
};

pub const SUPPORTED_LANGUAGES: &[&str] = &["en", "de", "es", "fr"];

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_new_password(new: &str, confirm: &str) -> Result<(), AppError> {
    if new != confirm {
        return Err(AppError::Validation("Passwords do not match".into()));
    }
    if new.len() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Refresh token from the cookie, falling back to the request body.
fn refresh_token_from(headers: &HeaderMap, body: Option<&RefreshRequest>) -> Option<String> {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| extract_cookie(v, REFRESH_COOKIE))
        .or_else(|| body.and_then(|b| b.refresh_token.clone()))
}

fn set_cookie_headers(state: &AppState, keys: &TokenKeys, refresh_token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let cookie = build_refresh_cookie(
        refresh_token,
        keys.refresh_max_age_secs(),
        state.config.is_production(),
    );
    headers.insert(header::SET_COOKIE, cookie.parse().expect("valid cookie"));
    headers
}

fn clear_cookie_headers(state: &AppState) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let cookie = build_clear_cookie(state.config.is_production());
    headers.insert(header::SET_COOKIE, cookie.parse().expect("valid cookie"));
    headers
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, HeaderMap, Json<ApiResponse<AuthData>>), AppError> {
    payload.email = normalize_email(&payload.email);

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(AppError::Validation("Invalid email".into()));
    }
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".into()));
    }
    if payload.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if payload.role == Role::Admin {
        return Err(AppError::Validation(
            "Registration is limited to candidate and hr accounts".into(),
        ));
    }
    let company_name = payload.company_name.as_deref().map(str::trim);
    if payload.role == Role::Hr && company_name.map_or(true, str::is_empty) {
        return Err(AppError::Validation(
            "Company name is required for hr accounts".into(),
        ));
    }

    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(AppError::Conflict("Email is already registered".into()));
    }

    let hash = hash_password(&payload.password, &state.config.argon2)?;
    let user = User::create(
        &state.db,
        &payload.email,
        &hash,
        payload.name.trim(),
        payload.role,
    )
    .await?;

    // The user row is not rolled back if this insert fails; the account is
    // left behind without a profile.
    let profile = RoleProfile::create_for(&state.db, &user, company_name)
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %user.id, "role profile creation failed");
            AppError::Internal(e)
        })?;

    let keys = TokenKeys::new(&state.config.jwt);
    let access_token = keys.sign_access(&user)?;
    let refresh_token = keys.sign_refresh(&user)?;
    User::push_refresh_token(&state.db, user.id, &refresh_token).await?;

    info!(user_id = %user.id, email = %user.email, role = %user.role, "user registered");
    Ok((
        StatusCode::CREATED,
        set_cookie_headers(&state, &keys, &refresh_token),
        Json(ApiResponse::ok_with_message(
            "Registration successful",
            AuthData {
                access_token,
                user: PublicUser::from(&user),
                profile: Some(profile),
            },
        )),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<ApiResponse<AuthData>>), AppError> {
    payload.email = normalize_email(&payload.email);

    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| {
            warn!(email = %payload.email, "login unknown email");
            AppError::Unauthorized("Invalid email or password".into())
        })?;

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(email = %payload.email, user_id = %user.id, "login invalid password");
        return Err(AppError::Unauthorized("Invalid email or password".into()));
    }

    if !user.is_active {
        warn!(user_id = %user.id, "login on deactivated account");
        return Err(AppError::Forbidden("Account is deactivated".into()));
    }

    let keys = TokenKeys::new(&state.config.jwt);
    let access_token = keys.sign_access(&user)?;
    let refresh_token = keys.sign_refresh(&user)?;
    User::record_login(&state.db, user.id, &refresh_token).await?;

    let profile = RoleProfile::find_for(&state.db, &user).await?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok((
        set_cookie_headers(&state, &keys, &refresh_token),
        Json(ApiResponse::ok_with_message(
            "Login successful",
            AuthData {
                access_token,
                user: PublicUser::from(&user),
                profile,
            },
        )),
    ))
}

#[instrument(skip(state, headers, body))]
pub async fn refresh_token(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Option<Json<RefreshRequest>>,
) -> Result<Json<ApiResponse<AccessTokenData>>, AppError> {
    let token = refresh_token_from(&headers, body.as_deref())
        .ok_or_else(|| AppError::Unauthorized("Refresh token required".into()))?;

    let keys = TokenKeys::new(&state.config.jwt);
    let claims = keys
        .verify_refresh(&token)
        .map_err(|_| AppError::Unauthorized("Invalid or expired refresh token".into()))?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid refresh token".into()))?;

    // Revoked or rotated tokens are detected against the stored set; the
    // token must be present verbatim.
    if !user.refresh_tokens.iter().any(|t| t == &token) {
        warn!(user_id = %user.id, "refresh with revoked token");
        return Err(AppError::Unauthorized("Refresh token has been revoked".into()));
    }

    // Role is signed from the freshly loaded row, not from the old token.
    let access_token = keys.sign_access(&user)?;
    Ok(Json(ApiResponse::ok(AccessTokenData { access_token })))
}

#[instrument(skip(state))]
pub async fn me(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<ApiResponse<MeData>>, AppError> {
    let user = User::find_by_id(&state.db, current.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Account no longer exists".into()))?;
    let profile = RoleProfile::find_for(&state.db, &user).await?;

    Ok(Json(ApiResponse::ok(MeData {
        user: PublicUser::from(&user),
        profile,
    })))
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<MeData>>, AppError> {
    if let Some(name) = payload.name.as_deref() {
        if name.trim().is_empty() {
            return Err(AppError::Validation("Name cannot be empty".into()));
        }
        User::update_name(&state.db, current.id, name.trim()).await?;
    }

    match current.role {
        Role::Candidate => {
            CandidateProfile::update(
                &state.db,
                current.id,
                payload.headline.as_deref(),
                payload.skills.as_deref(),
                payload.resume_url.as_deref(),
            )
            .await?;
        }
        Role::Hr => {
            if let Some(company) = payload.company_name.as_deref() {
                if company.trim().is_empty() {
                    return Err(AppError::Validation("Company name cannot be empty".into()));
                }
            }
            HrProfile::update(
                &state.db,
                current.id,
                payload.company_name.as_deref(),
                payload.position.as_deref(),
            )
            .await?;
        }
        Role::Admin => {}
    }

    let user = User::find_by_id(&state.db, current.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Account no longer exists".into()))?;
    let profile = RoleProfile::find_for(&state.db, &user).await?;

    info!(user_id = %user.id, "profile updated");
    Ok(Json(ApiResponse::ok_with_message(
        "Profile updated",
        MeData {
            user: PublicUser::from(&user),
            profile,
        },
    )))
}

#[instrument(skip(state, payload))]
pub async fn change_password(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    if payload.current_password.is_empty()
        || payload.new_password.is_empty()
        || payload.confirm_password.is_empty()
    {
        return Err(AppError::Validation(
            "Current, new and confirm passwords are required".into(),
        ));
    }
    validate_new_password(&payload.new_password, &payload.confirm_password)?;

    let user = User::find_by_id(&state.db, current.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Account no longer exists".into()))?;

    if !verify_password(&payload.current_password, &user.password_hash)? {
        warn!(user_id = %user.id, "change password with wrong current password");
        return Err(AppError::Unauthorized("Current password is incorrect".into()));
    }

    let hash = hash_password(&payload.new_password, &state.config.argon2)?;
    User::set_password(&state.db, user.id, &hash).await?;

    info!(user_id = %user.id, "password changed");
    Ok(Json(ApiResponse::message("Password changed")))
}

#[instrument(skip(state, payload))]
pub async fn delete_account(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(payload): Json<DeleteAccountRequest>,
) -> Result<(HeaderMap, Json<ApiResponse<()>>), AppError> {
    let user = User::find_by_id(&state.db, current.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Account no longer exists".into()))?;

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "account deletion with wrong password");
        return Err(AppError::Unauthorized("Password is incorrect".into()));
    }

    RoleProfile::delete_all_for(&state.db, user.id).await;
    User::delete(&state.db, user.id).await?;

    info!(user_id = %user.id, "account deleted");
    Ok((
        clear_cookie_headers(&state),
        Json(ApiResponse::message("Account deleted")),
    ))
}

#[instrument(skip(state, payload))]
pub async fn update_language(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(payload): Json<UpdateLanguageRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    if !SUPPORTED_LANGUAGES.contains(&payload.language.as_str()) {
        return Err(AppError::Validation(format!(
            "Unsupported language; expected one of: {}",
            SUPPORTED_LANGUAGES.join(", ")
        )));
    }
    User::update_language(&state.db, current.id, &payload.language).await?;
    Ok(Json(ApiResponse::message("Language updated")))
}

#[instrument(skip(state, headers, body))]
pub async fn logout(
    State(state): State<AppState>,
    current: CurrentUser,
    headers: HeaderMap,
    body: Option<Json<RefreshRequest>>,
) -> Result<(HeaderMap, Json<ApiResponse<()>>), AppError> {
    // Idempotent: a missing or already-removed token is not an error.
    if let Some(token) = refresh_token_from(&headers, body.as_deref()) {
        User::remove_refresh_token(&state.db, current.id, &token).await?;
    }

    info!(user_id = %current.id, "user logged out");
    Ok((
        clear_cookie_headers(&state),
        Json(ApiResponse::message("Logged out")),
    ))
}

#[instrument(skip(state, payload))]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let email = normalize_email(&payload.email);
    // The response is identical whether or not the account exists.
    let neutral = "If that email is registered, a reset link has been sent";

    let Some(user) = User::find_by_email(&state.db, &email).await? else {
        return Ok(Json(ApiResponse::message(neutral)));
    };

    let raw_token = generate_reset_token();
    let expires_at = OffsetDateTime::now_utc() + RESET_TOKEN_TTL;
    User::set_reset_token(&state.db, user.id, &hash_reset_token(&raw_token), expires_at).await?;

    let reset_link = format!(
        "{}/reset-password?token={raw_token}",
        state.config.frontend_origin
    );
    let mail = Mail::password_reset(&user.email, &user.name, &reset_link);

    if let Err(e) = state.mailer.send(mail).await {
        // A failed send rolls the stored reset fields back.
        error!(error = %e, user_id = %user.id, "reset mail dispatch failed");
        User::clear_reset_token(&state.db, user.id).await?;
        return Err(AppError::Internal(e.context("send reset email")));
    }

    info!(user_id = %user.id, "reset email sent");
    Ok(Json(ApiResponse::message(neutral)))
}

#[instrument(skip(state, payload))]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    if payload.token.is_empty() {
        return Err(AppError::Validation("Reset token is required".into()));
    }
    validate_new_password(&payload.new_password, &payload.confirm_password)?;

    // Unknown and expired tokens share one message.
    let user = User::find_by_reset_token(&state.db, &hash_reset_token(&payload.token))
        .await?
        .ok_or_else(|| AppError::Validation("Invalid or expired reset token".into()))?;

    let hash = hash_password(&payload.new_password, &state.config.argon2)?;
    User::apply_password_reset(&state.db, user.id, &hash).await?;

    // Confirmation mail is best-effort only.
    if let Err(e) = state
        .mailer
        .send(Mail::password_changed(&user.email, &user.name))
        .await
    {
        warn!(error = %e, user_id = %user.id, "password-changed mail dispatch failed");
    }

    info!(user_id = %user.id, "password reset, all sessions revoked");
    Ok(Json(ApiResponse::message("Password has been reset")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("a.b+c@sub.domain.org"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("a@b"));
    }

    #[test]
    fn email_normalization() {
        assert_eq!(normalize_email("  A@B.Com "), "a@b.com");
    }

    #[test]
    fn new_password_policy() {
        assert!(validate_new_password("abcdef", "abcdef").is_ok());
        assert!(matches!(
            validate_new_password("abcdef", "different"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            validate_new_password("short", "short"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn supported_languages_are_a_closed_set() {
        assert!(SUPPORTED_LANGUAGES.contains(&"en"));
        assert!(!SUPPORTED_LANGUAGES.contains(&"tlh"));
    }

    #[test]
    fn refresh_token_prefers_cookie_over_body() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, "refreshToken=from-cookie".parse().unwrap());
        let body = RefreshRequest {
            refresh_token: Some("from-body".into()),
        };
        assert_eq!(
            refresh_token_from(&headers, Some(&body)).as_deref(),
            Some("from-cookie")
        );
        assert_eq!(
            refresh_token_from(&HeaderMap::new(), Some(&body)).as_deref(),
            Some("from-body")
        );
        assert_eq!(refresh_token_from(&HeaderMap::new(), None), None);
    }
}
