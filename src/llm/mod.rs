//! LLM Provider Clients
//!
//! A single [`LLMClient`] trait hides the provider behind the reasoning
//! pipeline. [`Provider`] selects and constructs the concrete client from
//! configuration.
//!
//! # Supported Providers
//!
//! Enable providers via Cargo features:
//! - `openai` - OpenAI API and compatible gateways (default)
//! - `ollama` - Local Ollama server
//!
//! # Example
//!
//! ```ignore
//! use parley::llm::Provider;
//!
//! let provider = Provider::from_config(&config.reasoner)?;
//! let client = provider.create_client()?;
//!
//! let answer = client.generate_with_system("Be brief.", "What is 2+2?").await?;
//! ```

/// Core LLM client trait and provider selection.
pub mod client;

#[cfg(feature = "ollama")]
pub mod ollama;

#[cfg(feature = "openai")]
pub mod openai;

pub use client::{LLMClient, ModelParams, Provider};
