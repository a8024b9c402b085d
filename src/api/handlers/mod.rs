//! API request handlers.
//!
//! This module contains all HTTP request handlers organized by functionality.

/// Chat handler.
pub mod chat;
/// Conversation retrieval and deletion handlers.
pub mod conversations;
/// Liveness and banner handlers.
pub mod health;
