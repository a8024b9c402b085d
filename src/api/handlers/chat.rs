use crate::{
    AppState,
    session::Session,
    types::{AppError, ChatRequest, ChatResponse, Result, Turn},
    utils::config::UnknownConversationPolicy,
};
use axum::{Json, extract::State, extract::rejection::JsonRejection};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Send a message and receive the reasoned response with the full history
#[utoipa::path(
    post,
    path = "/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Chat response", body = ChatResponse),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Conversation not found (reject policy only)"),
        (status = 502, description = "Reasoning backend failed")
    ),
    tag = "chat"
)]
pub async fn chat(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>> {
    let Json(payload) = payload.map_err(|e| AppError::InvalidInput(e.body_text()))?;

    if payload.message.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "message must not be empty".to_string(),
        ));
    }

    let user_turn = Turn::user(payload.message);
    let (conversation_id, session, created) =
        resolve_conversation(&state, payload.conversation_id.as_deref())?;

    // Held until both turns are stored, so concurrent requests on one
    // conversation are applied in sequence.
    let mut turns = session.lock().await.inspect_err(|_| {
        warn!(conversation_id = %conversation_id, "Conversation deleted before the exchange started");
    })?;
    info!(
        conversation_id = %conversation_id,
        turns = turns.len(),
        model = state.reasoner.model_name(),
        "Processing message"
    );

    let response = match state.reasoner.respond(&turns, &user_turn.content).await {
        Ok(response) => response,
        Err(e) => {
            error!(conversation_id = %conversation_id, error = %e, "Reasoner failed");
            drop(turns);
            if created {
                // The id was never handed out.
                if let Err(cleanup) = state.sessions.delete(&conversation_id).await {
                    warn!(
                        conversation_id = %conversation_id,
                        error = %cleanup,
                        "Failed to remove conversation after reasoner error"
                    );
                }
            }
            return Err(match e {
                AppError::LLM(_) => e,
                other => AppError::LLM(other.to_string()),
            });
        }
    };

    turns.push(user_turn);
    turns.push(Turn::assistant(response.clone()));
    let history = turns.clone();
    drop(turns);

    info!(
        conversation_id = %conversation_id,
        turns = history.len(),
        "Stored exchange"
    );

    Ok(Json(ChatResponse {
        status: "success".to_string(),
        conversation_id,
        response,
        history,
    }))
}

/// Looks up the requested conversation, or creates one.
///
/// Returns the id, its session handle and whether it was created by this call.
fn resolve_conversation(
    state: &AppState,
    requested: Option<&str>,
) -> Result<(String, Arc<Session>, bool)> {
    if let Some(id) = requested {
        match state.sessions.session(id) {
            Ok(session) => return Ok((id.to_string(), session, false)),
            Err(e) => match state.config.chat.unknown_conversation {
                UnknownConversationPolicy::Reject => {
                    warn!(conversation_id = %id, "Conversation not found");
                    return Err(e);
                }
                UnknownConversationPolicy::Create => {
                    warn!(conversation_id = %id, "Unknown conversation, starting a new one");
                }
            },
        }
    }

    let id = state.sessions.create();
    let session = state.sessions.session(&id)?;
    info!(conversation_id = %id, "Created new conversation");
    Ok((id, session, true))
}
