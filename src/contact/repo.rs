use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Message submitted through the public contact form.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub created_at: OffsetDateTime,
}

impl ContactMessage {
    pub async fn create(
        db: &PgPool,
        name: &str,
        email: &str,
        subject: Option<&str>,
        message: &str,
    ) -> anyhow::Result<ContactMessage> {
        let row = sqlx::query_as::<_, ContactMessage>(
            "INSERT INTO contact_messages (name, email, subject, message)
             VALUES ($1, $2, $3, $4)
             RETURNING id, name, email, subject, message, created_at",
        )
        .bind(name)
        .bind(email)
        .bind(subject)
        .bind(message)
        .fetch_one(db)
        .await?;
        Ok(row)
    }
}
