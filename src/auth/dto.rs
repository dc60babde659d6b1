use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::profiles::RoleProfile;
use crate::auth::repo::{Role, User};

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Role,
    pub company_name: Option<String>,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Optional body for refresh and logout; the cookie takes precedence.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteAccountRequest {
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateLanguageRequest {
    pub language: String,
}

/// Partial update of the display name and the caller's role-profile fields.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub headline: Option<String>,
    pub skills: Option<Vec<String>>,
    pub resume_url: Option<String>,
    pub company_name: Option<String>,
    pub position: Option<String>,
}

/// Public part of the user returned to the client. Never carries the password
/// hash, token set or reset fields.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub language: String,
    pub is_active: bool,
    pub last_login_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
}

impl From<&User> for PublicUser {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            email: u.email.clone(),
            name: u.name.clone(),
            role: u.role,
            language: u.language.clone(),
            is_active: u.is_active,
            last_login_at: u.last_login_at,
            created_at: u.created_at,
        }
    }
}

/// Payload returned after register and login.
#[derive(Debug, Serialize)]
pub struct AuthData {
    pub access_token: String,
    pub user: PublicUser,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<RoleProfile>,
}

/// Payload returned by the refresh endpoint.
#[derive(Debug, Serialize)]
pub struct AccessTokenData {
    pub access_token: String,
}

/// Payload returned by `me` and profile updates.
#[derive(Debug, Serialize)]
pub struct MeData {
    pub user: PublicUser,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<RoleProfile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_user_never_exposes_secrets() {
        let user = User {
            id: Uuid::new_v4(),
            email: "a@b.com".into(),
            password_hash: "supersecret".into(),
            name: "A".into(),
            role: Role::Candidate,
            language: "en".into(),
            is_active: true,
            refresh_tokens: vec!["tok".into()],
            last_login_at: None,
            password_reset_token: Some("reset".into()),
            password_reset_expires_at: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
        };
        let json = serde_json::to_string(&PublicUser::from(&user)).unwrap();
        assert!(json.contains(r#""role":"candidate""#));
        assert!(!json.contains("password"));
        assert!(!json.contains("supersecret"));
        assert!(!json.contains("refresh_tokens"));
        assert!(!json.contains("reset"));
    }

    #[test]
    fn register_request_parses_roles() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"email":"a@b.com","password":"Abcd1234","name":"A","role":"hr","company_name":"Acme"}"#,
        )
        .unwrap();
        assert_eq!(req.role, Role::Hr);
        assert_eq!(req.company_name.as_deref(), Some("Acme"));

        let bad = serde_json::from_str::<RegisterRequest>(
            r#"{"email":"a@b.com","password":"x","name":"A","role":"superuser"}"#,
        );
        assert!(bad.is_err());
    }
}
