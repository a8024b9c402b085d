//! LLM client abstraction and provider selection
//!
//! - **OpenAI**: any OpenAI-compatible chat completions endpoint (hosted, default)
//! - **Ollama**: local inference through an Ollama server

use crate::types::{AppError, Result};
use crate::utils::config::{ProviderKind, ReasonerConfig};
use async_trait::async_trait;

/// Generic LLM client trait for provider abstraction
///
/// Every provider implements this trait so the reasoning pipeline can be
/// pointed at a different backend without code changes.
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate a completion from a system prompt and a user prompt
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String>;

    /// Get the model name/identifier
    fn model_name(&self) -> &str;
}

/// Inference parameters passed through to the provider
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelParams {
    /// Sampling temperature
    pub temperature: Option<f32>,
    /// Upper bound on generated tokens
    pub max_tokens: Option<u32>,
}

/// Provider enum for runtime selection
#[derive(Clone)]
pub enum Provider {
    /// OpenAI API provider (including compatible gateways)
    ///
    /// # Example
    /// ```rust,ignore
    /// let provider = Provider::OpenAI {
    ///     api_key: "sk-...".to_string(),
    ///     api_base: "https://api.openai.com/v1".to_string(),
    ///     model: "gpt-4o-mini".to_string(),
    ///     params: ModelParams::default(),
    /// };
    /// ```
    OpenAI {
        api_key: String,
        api_base: String,
        model: String,
        params: ModelParams,
    },

    /// Ollama local LLM provider
    Ollama {
        base_url: String,
        model: String,
        params: ModelParams,
    },
}

// Hand-written so the API key never ends up in logs.
impl std::fmt::Debug for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::OpenAI {
                api_base, model, ..
            } => f
                .debug_struct("OpenAI")
                .field("api_base", api_base)
                .field("model", model)
                .finish_non_exhaustive(),
            Provider::Ollama {
                base_url, model, ..
            } => f
                .debug_struct("Ollama")
                .field("base_url", base_url)
                .field("model", model)
                .finish_non_exhaustive(),
        }
    }
}

impl Provider {
    /// Build a provider from the `[reasoner]` section of the configuration
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Configuration`] if the OpenAI provider is selected
    /// and the environment variable named by `api_key_env` is unset or empty.
    pub fn from_config(config: &ReasonerConfig) -> Result<Self> {
        let params = ModelParams {
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        };

        match config.provider {
            ProviderKind::OpenAI => {
                let api_key = std::env::var(&config.api_key_env)
                    .ok()
                    .filter(|key| !key.trim().is_empty())
                    .ok_or_else(|| {
                        AppError::Configuration(format!(
                            "{} environment variable is not set",
                            config.api_key_env
                        ))
                    })?;

                Ok(Provider::OpenAI {
                    api_key,
                    api_base: config.api_base(),
                    model: config.model.clone(),
                    params,
                })
            }
            ProviderKind::Ollama => Ok(Provider::Ollama {
                base_url: config.api_base(),
                model: config.model.clone(),
                params,
            }),
        }
    }

    /// Create a client instance for this provider
    ///
    /// # Errors
    ///
    /// Returns an error if the provider was compiled out (missing cargo
    /// feature) or its configuration is invalid.
    pub fn create_client(&self) -> Result<Box<dyn LLMClient>> {
        match self {
            #[cfg(feature = "openai")]
            Provider::OpenAI {
                api_key,
                api_base,
                model,
                params,
            } => Ok(Box::new(super::openai::OpenAIClient::with_params(
                api_key.clone(),
                api_base.clone(),
                model.clone(),
                params.clone(),
            ))),

            #[cfg(not(feature = "openai"))]
            Provider::OpenAI { .. } => Err(AppError::Configuration(
                "OpenAI provider requires the `openai` feature".to_string(),
            )),

            #[cfg(feature = "ollama")]
            Provider::Ollama {
                base_url,
                model,
                params,
            } => Ok(Box::new(super::ollama::OllamaClient::with_params(
                base_url,
                model.clone(),
                params.clone(),
            )?)),

            #[cfg(not(feature = "ollama"))]
            Provider::Ollama { .. } => Err(AppError::Configuration(
                "Ollama provider requires the `ollama` feature".to_string(),
            )),
        }
    }

    /// Check if this provider was compiled into the binary
    pub fn is_enabled(&self) -> bool {
        match self {
            Provider::OpenAI { .. } => cfg!(feature = "openai"),
            Provider::Ollama { .. } => cfg!(feature = "ollama"),
        }
    }

    /// Get a human-readable name for this provider
    pub fn name(&self) -> &'static str {
        match self {
            Provider::OpenAI { .. } => "OpenAI",
            Provider::Ollama { .. } => "Ollama",
        }
    }

    /// Model identifier requested from the provider
    pub fn model(&self) -> &str {
        match self {
            Provider::OpenAI { model, .. } | Provider::Ollama { model, .. } => model,
        }
    }
}
