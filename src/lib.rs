//! # Parley
//!
//! A conversational chat server built in Rust. Each message is answered by a
//! chain-of-thought reasoning pipeline running on a hosted language model, and
//! every conversation's history is kept in process memory.
//!
//! ## Overview
//!
//! Parley can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `parley-server` binary
//! 2. **As a library** - Mount the router in your own Axum application, or
//!    plug in your own [`Reasoner`]
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use parley::{AppState, ChainOfThought, ParleyConfig, Provider, SessionStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ParleyConfig::load("parley.toml")?;
//!     let client = Provider::from_config(&config.reasoner)?.create_client()?;
//!
//!     let state = AppState::new(config, Arc::new(ChainOfThought::new(client)));
//!     let app = parley::api::routes::create_router(state);
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `openai` | OpenAI-compatible hosted models (default) |
//! | `ollama` | Ollama local inference |
//! | `swagger-ui` | Interactive API docs at `/swagger-ui` |
//!
//! ## Modules
//!
//! - [`api`] - REST API handlers and routes
//! - [`llm`] - LLM client implementations
//! - [`reasoning`] - Chain-of-thought reasoning over an LLM client
//! - [`session`] - In-memory conversation store
//! - [`types`] - Common types and error handling
//! - [`utils`] - Configuration

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

/// HTTP API handlers and routes.
pub mod api;
/// Command-line interface.
pub mod cli;
/// LLM provider clients and abstractions.
pub mod llm;
/// Reasoning pipeline turning history plus a message into a reply.
pub mod reasoning;
/// In-memory conversation storage.
pub mod session;
/// Core types (requests, responses, errors).
pub mod types;
/// Configuration utilities.
pub mod utils;

// Re-export commonly used types
pub use llm::{LLMClient, ModelParams, Provider};
pub use reasoning::{ChainOfThought, Reasoner};
pub use session::SessionStore;
pub use types::{AppError, Result};
pub use utils::config::ParleyConfig;

use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Configuration the server was started with
    pub config: Arc<ParleyConfig>,
    /// Conversation store
    pub sessions: Arc<SessionStore>,
    /// Reasoning backend answering chat messages
    pub reasoner: Arc<dyn Reasoner>,
}

impl AppState {
    /// Create state with an empty conversation store
    pub fn new(config: ParleyConfig, reasoner: Arc<dyn Reasoner>) -> Self {
        Self {
            config: Arc::new(config),
            sessions: Arc::new(SessionStore::new()),
            reasoner,
        }
    }
}
