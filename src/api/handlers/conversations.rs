//! Conversation retrieval and deletion handlers.

use crate::{
    AppState,
    types::{ConversationResponse, Result, StatusResponse},
};
use axum::{
    Json,
    extract::{Path, State},
};
use tracing::{info, warn};

/// Get a conversation's turns, in the order they were appended.
#[utoipa::path(
    get,
    path = "/conversation/{id}",
    params(
        ("id" = String, Path, description = "Conversation ID")
    ),
    responses(
        (status = 200, description = "Conversation history", body = ConversationResponse),
        (status = 404, description = "Conversation not found")
    ),
    tag = "conversations"
)]
pub async fn get_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ConversationResponse>> {
    info!(conversation_id = %id, "Retrieving conversation");

    let messages = state.sessions.get(&id).await.inspect_err(|_| {
        warn!(conversation_id = %id, "Conversation not found");
    })?;

    Ok(Json(ConversationResponse {
        conversation_id: id,
        messages,
    }))
}

/// Delete a conversation and all its turns.
#[utoipa::path(
    delete,
    path = "/conversation/{id}",
    params(
        ("id" = String, Path, description = "Conversation ID")
    ),
    responses(
        (status = 200, description = "Conversation deleted", body = StatusResponse),
        (status = 404, description = "Conversation not found")
    ),
    tag = "conversations"
)]
pub async fn delete_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StatusResponse>> {
    info!(conversation_id = %id, "Deleting conversation");

    state.sessions.delete(&id).await.inspect_err(|_| {
        warn!(conversation_id = %id, "Conversation not found for deletion");
    })?;

    info!(conversation_id = %id, "Deleted conversation");
    Ok(Json(StatusResponse {
        status: "success".to_string(),
        message: "Conversation deleted successfully".to_string(),
    }))
}
