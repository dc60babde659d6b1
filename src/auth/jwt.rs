use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::auth::repo::{Role, User};
use crate::config::JwtConfig;
use crate::state::AppState;

/// Claims carried by a short-lived access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: Uuid,
    pub email: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

/// Claims carried by a refresh token. Carries no role; the refresh endpoint
/// reads the current role from the store when minting a new access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: Uuid,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid token")]
    Invalid,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid,
        }
    }
}

/// Signing and verification keys for both token classes. Access and refresh
/// tokens are signed with separate secrets.
#[derive(Clone)]
pub struct TokenKeys {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    issuer: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl FromRef<AppState> for TokenKeys {
    fn from_ref(state: &AppState) -> Self {
        Self::new(&state.config.jwt)
    }
}

impl TokenKeys {
    pub fn new(cfg: &JwtConfig) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(cfg.access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(cfg.access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(cfg.refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(cfg.refresh_secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            access_ttl: Duration::minutes(cfg.access_ttl_minutes),
            refresh_ttl: Duration::days(cfg.refresh_ttl_days),
        }
    }

    pub fn refresh_max_age_secs(&self) -> i64 {
        self.refresh_ttl.whole_seconds()
    }

    pub fn sign_access(&self, user: &User) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let claims = AccessClaims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            iat: now.unix_timestamp(),
            exp: (now + self.access_ttl).unix_timestamp(),
            iss: self.issuer.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.access_encoding)?;
        debug!(user_id = %user.id, "access token signed");
        Ok(token)
    }

    pub fn sign_refresh(&self, user: &User) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let claims = RefreshClaims {
            sub: user.id,
            email: user.email.clone(),
            iat: now.unix_timestamp(),
            exp: (now + self.refresh_ttl).unix_timestamp(),
            iss: self.issuer.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.refresh_encoding)?;
        debug!(user_id = %user.id, "refresh token signed");
        Ok(token)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::default();
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        validation
    }

    pub fn verify_access(&self, token: &str) -> Result<AccessClaims, TokenError> {
        let data = decode::<AccessClaims>(token, &self.access_decoding, &self.validation())?;
        Ok(data.claims)
    }

    pub fn verify_refresh(&self, token: &str) -> Result<RefreshClaims, TokenError> {
        let data = decode::<RefreshClaims>(token, &self.refresh_decoding, &self.validation())?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "a@b.com".into(),
            password_hash: "hash".into(),
            name: "A".into(),
            role: Role::Candidate,
            language: "en".into(),
            is_active: true,
            refresh_tokens: vec![],
            last_login_at: None,
            password_reset_token: None,
            password_reset_expires_at: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn keys_with_ttl(access_minutes: i64) -> TokenKeys {
        TokenKeys::new(&JwtConfig {
            access_secret: "access-secret".into(),
            refresh_secret: "refresh-secret".into(),
            issuer: "test-issuer".into(),
            access_ttl_minutes: access_minutes,
            refresh_ttl_days: 7,
        })
    }

    #[test]
    fn sign_and_verify_access_token() {
        let keys = keys_with_ttl(15);
        let user = test_user();
        let token = keys.sign_access(&user).expect("sign access");
        let claims = keys.verify_access(&token).expect("verify access");
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.role, Role::Candidate);
        assert_eq!(claims.iss, "test-issuer");
    }

    #[test]
    fn refresh_claims_carry_no_role() {
        let keys = keys_with_ttl(15);
        let token = keys.sign_refresh(&test_user()).expect("sign refresh");
        let claims = keys.verify_refresh(&token).expect("verify refresh");
        assert_eq!(claims.email, "a@b.com");
        let json = serde_json::to_value(&claims).unwrap();
        assert!(json.get("role").is_none());
    }

    #[test]
    fn secrets_are_not_interchangeable() {
        let keys = keys_with_ttl(15);
        let user = test_user();
        let access = keys.sign_access(&user).unwrap();
        let refresh = keys.sign_refresh(&user).unwrap();
        // A token of one class never verifies against the other secret.
        assert_eq!(keys.verify_refresh(&access).unwrap_err(), TokenError::Invalid);
        assert_eq!(keys.verify_access(&refresh).unwrap_err(), TokenError::Invalid);
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        // Negative lifetime mints a token already past the validation leeway.
        let keys = keys_with_ttl(-5);
        let token = keys.sign_access(&test_user()).unwrap();
        assert_eq!(keys.verify_access(&token).unwrap_err(), TokenError::Expired);
    }

    #[test]
    fn tampered_token_is_invalid() {
        let keys = keys_with_ttl(15);
        let mut token = keys.sign_access(&test_user()).unwrap();
        token.push('x');
        assert_eq!(keys.verify_access(&token).unwrap_err(), TokenError::Invalid);
    }

    #[test]
    fn foreign_issuer_is_invalid() {
        let keys = keys_with_ttl(15);
        let other = TokenKeys::new(&JwtConfig {
            access_secret: "access-secret".into(),
            refresh_secret: "refresh-secret".into(),
            issuer: "someone-else".into(),
            access_ttl_minutes: 15,
            refresh_ttl_days: 7,
        });
        let token = other.sign_access(&test_user()).unwrap();
        assert_eq!(keys.verify_access(&token).unwrap_err(), TokenError::Invalid);
    }
}
