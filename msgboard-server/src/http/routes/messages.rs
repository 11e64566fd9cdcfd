//! Message endpoints

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::Deserialize;

use crate::http::error::ApiError;
use crate::http::extractors::{MessageId, MessageIdQuery};
use crate::models::{Message, MessageContent, ValidationError};
use crate::state::AppState;

/// Create message request
///
/// A missing or `null` `content` decodes as empty and is rejected as such.
#[derive(Deserialize)]
pub struct CreateMessageRequest {
    #[serde(default)]
    pub content: Option<String>,
}

/// GET /api/messages - newest messages first
async fn list_messages(State(state): State<AppState>) -> Result<Json<Vec<Message>>, ApiError> {
    let messages = state.store().list().await?;
    Ok(Json(messages))
}

/// POST /api/messages - add a message
///
/// The body is decoded as JSON whatever the `Content-Type` says.
async fn create_message(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    let req: CreateMessageRequest = serde_json::from_slice(&body).map_err(|_| {
        ApiError::Validation(ValidationError::InvalidFormat {
            field: "json",
            reason: "malformed request body",
        })
    })?;

    let content = MessageContent::new(req.content.as_deref().unwrap_or_default())?;
    let message = state.store().create(content).await?;

    Ok((StatusCode::CREATED, Json(message)))
}

/// DELETE /api/messages/{id}
async fn delete_message(
    State(state): State<AppState>,
    MessageId(id): MessageId,
) -> Result<StatusCode, ApiError> {
    state.store().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/messages?id={id} - form used by the web frontend
async fn delete_message_by_query(
    State(state): State<AppState>,
    MessageIdQuery(id): MessageIdQuery,
) -> Result<StatusCode, ApiError> {
    state.store().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Message routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/messages",
            get(list_messages)
                .post(create_message)
                .delete(delete_message_by_query),
        )
        .route("/api/messages/{id}", delete(delete_message))
}
