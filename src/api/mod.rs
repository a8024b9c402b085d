//! HTTP API Handlers and Routes
//!
//! This module provides the REST API layer for Parley, built on the Axum web framework.
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::routes`](crate::api::routes) - Route definitions and router configuration
//!
//! # API Endpoints
//!
//! ## Chat
//! - `POST /chat` - Send a message, receive the answer and the full history
//!
//! ## Conversations
//! - `GET /conversation/{id}` - Get a conversation's turns
//! - `DELETE /conversation/{id}` - Delete a conversation
//!
//! ## Health
//! - `GET /health` - Liveness probe
//! - `GET /` - Service banner
//!
//! # Errors
//!
//! Failures are returned as `{"error": "<message>"}` with 400 (invalid
//! input), 404 (unknown conversation) or 502 (reasoning backend failed).
//!
//! # OpenAPI Documentation
//!
//! When the `swagger-ui` feature is enabled, interactive API documentation
//! is available at `/swagger-ui/`.

use utoipa::OpenApi;

/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;

/// OpenAPI description of the HTTP surface.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::chat::chat,
        handlers::conversations::get_conversation,
        handlers::conversations::delete_conversation,
        handlers::health::health,
        handlers::health::root,
    ),
    components(schemas(
        crate::types::ChatRequest,
        crate::types::ChatResponse,
        crate::types::ConversationResponse,
        crate::types::StatusResponse,
        crate::types::HealthResponse,
        crate::types::Turn,
        crate::types::MessageRole,
    )),
    tags(
        (name = "chat", description = "Conversational reasoning"),
        (name = "conversations", description = "Conversation history"),
        (name = "health", description = "Service status"),
    )
)]
pub struct ApiDoc;
