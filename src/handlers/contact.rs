use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use super::required_text;
use crate::{
    core::{AppError, AppResult},
    models::{ContactMessage, ContactRequest},
    state::AppState,
};

pub async fn submit_message(
    State(state): State<AppState>,
    payload: Result<Json<ContactRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ContactMessage>)> {
    let Json(payload) = payload?;

    let name = required_text("name", &payload.name, 100)?;
    let email = required_text("email", &payload.email, 254)?;
    if !email.contains('@') {
        return Err(AppError::validation("email must be a valid address"));
    }
    let message = required_text("message", &payload.message, 5000)?;

    let stored = state
        .repo
        .insert_message(ContactMessage {
            id: Uuid::new_v4(),
            name,
            email,
            message,
            created_at: Utc::now(),
        })
        .await?;

    tracing::info!(message_id = %stored.id, "contact message received");
    Ok((StatusCode::CREATED, Json(stored)))
}
