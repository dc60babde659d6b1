use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Account role. Closed set; immutable after creation, no endpoint changes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum Role {
    Candidate,
    Hr,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Candidate => write!(f, "candidate"),
            Role::Hr => write!(f, "hr"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub role: Role,
    pub language: String,
    pub is_active: bool,
    /// Currently-valid refresh tokens, stored verbatim. Removed one at a time
    /// on logout, wholesale on password reset.
    #[serde(skip_serializing)]
    pub refresh_tokens: Vec<String>,
    pub last_login_at: Option<OffsetDateTime>,
    #[serde(skip_serializing)]
    pub password_reset_token: Option<String>,
    #[serde(skip_serializing)]
    pub password_reset_expires_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
}

const USER_COLUMNS: &str = "id, email, password_hash, name, role, language, is_active, \
     refresh_tokens, last_login_at, password_reset_token, password_reset_expires_at, created_at";

impl User {
    /// Find a user by (already normalized) email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a new user with a hashed password.
    pub async fn create(
        db: &PgPool,
        email: &str,
        password_hash: &str,
        name: &str,
        role: Role,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, password_hash, name, role)
             VALUES ($1, $2, $3, $4)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(email)
        .bind(password_hash)
        .bind(name)
        .bind(role)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Append a refresh token to the stored set.
    pub async fn push_refresh_token(db: &PgPool, id: Uuid, token: &str) -> anyhow::Result<()> {
        sqlx::query("UPDATE users SET refresh_tokens = array_append(refresh_tokens, $2) WHERE id = $1")
            .bind(id)
            .bind(token)
            .execute(db)
            .await?;
        Ok(())
    }

    /// Stamp the login time and append the freshly issued refresh token in one write.
    pub async fn record_login(db: &PgPool, id: Uuid, refresh_token: &str) -> anyhow::Result<()> {
        sqlx::query(
            "UPDATE users
             SET last_login_at = now(), refresh_tokens = array_append(refresh_tokens, $2)
             WHERE id = $1",
        )
        .bind(id)
        .bind(refresh_token)
        .execute(db)
        .await?;
        Ok(())
    }

    /// Remove a single refresh token. Idempotent: removing an absent token is
    /// not an error.
    pub async fn remove_refresh_token(db: &PgPool, id: Uuid, token: &str) -> anyhow::Result<()> {
        sqlx::query("UPDATE users SET refresh_tokens = array_remove(refresh_tokens, $2) WHERE id = $1")
            .bind(id)
            .bind(token)
            .execute(db)
            .await?;
        Ok(())
    }

    pub async fn set_password(db: &PgPool, id: Uuid, password_hash: &str) -> anyhow::Result<()> {
        sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(db)
            .await?;
        Ok(())
    }

    pub async fn set_reset_token(
        db: &PgPool,
        id: Uuid,
        token_hash: &str,
        expires_at: OffsetDateTime,
    ) -> anyhow::Result<()> {
        sqlx::query(
            "UPDATE users SET password_reset_token = $2, password_reset_expires_at = $3 WHERE id = $1",
        )
        .bind(id)
        .bind(token_hash)
        .bind(expires_at)
        .execute(db)
        .await?;
        Ok(())
    }

    pub async fn clear_reset_token(db: &PgPool, id: Uuid) -> anyhow::Result<()> {
        sqlx::query(
            "UPDATE users SET password_reset_token = NULL, password_reset_expires_at = NULL WHERE id = $1",
        )
        .bind(id)
        .execute(db)
        .await?;
        Ok(())
    }

    /// Look up the holder of an unexpired reset token by its one-way hash.
    pub async fn find_by_reset_token(
        db: &PgPool,
        token_hash: &str,
    ) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users
             WHERE password_reset_token = $1 AND password_reset_expires_at > now()"
        ))
        .bind(token_hash)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Consume a reset: replace the hash, drop the reset fields and revoke
    /// every session, all in one atomic statement.
    pub async fn apply_password_reset(
        db: &PgPool,
        id: Uuid,
        password_hash: &str,
    ) -> anyhow::Result<()> {
        sqlx::query(
            "UPDATE users
             SET password_hash = $2,
                 password_reset_token = NULL,
                 password_reset_expires_at = NULL,
                 refresh_tokens = '{}'
             WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(db)
        .await?;
        Ok(())
    }

    pub async fn update_name(db: &PgPool, id: Uuid, name: &str) -> anyhow::Result<()> {
        sqlx::query("UPDATE users SET name = $2 WHERE id = $1")
            .bind(id)
            .bind(name)
            .execute(db)
            .await?;
        Ok(())
    }

    pub async fn update_language(db: &PgPool, id: Uuid, language: &str) -> anyhow::Result<()> {
        sqlx::query("UPDATE users SET language = $2 WHERE id = $1")
            .bind(id)
            .bind(language)
            .execute(db)
            .await?;
        Ok(())
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }
}
