use axum::{extract::State, http::StatusCode, Json};
use tracing::{info, instrument, warn};

use crate::{
    auth::handlers::is_valid_email,
    error::AppError,
    mailer::Mail,
    response::ApiResponse,
    state::AppState,
};

use super::dto::ContactRequest;
use super::repo::ContactMessage;

#[instrument(skip(state, payload))]
pub async fn submit(
    State(state): State<AppState>,
    Json(payload): Json<ContactRequest>,
) -> Result<(StatusCode, Json<ApiResponse<()>>), AppError> {
    let email = payload.email.trim().to_lowercase();
    if payload.name.trim().is_empty() || payload.message.trim().is_empty() {
        return Err(AppError::Validation("Name and message are required".into()));
    }
    if !is_valid_email(&email) {
        return Err(AppError::Validation("Invalid email".into()));
    }

    let message = ContactMessage::create(
        &state.db,
        payload.name.trim(),
        &email,
        payload.subject.as_deref().map(str::trim),
        payload.message.trim(),
    )
    .await?;

    // Inbox notification is best-effort; the message is already stored.
    let mail = Mail::contact_notification(
        &state.config.mail.contact_inbox,
        &message.name,
        &message.email,
        message.subject.as_deref(),
        &message.message,
    );
    if let Err(e) = state.mailer.send(mail).await {
        warn!(error = %e, message_id = %message.id, "contact notification dispatch failed");
    }

    info!(message_id = %message.id, "contact message received");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::message("Thanks for reaching out; we'll get back to you soon")),
    ))
}
