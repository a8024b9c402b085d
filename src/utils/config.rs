//! TOML-based configuration for Parley
//!
//! Configuration is read from `parley.toml` (path overridable on the command
//! line). A missing file yields the defaults. After parsing, a handful of
//! `PARLEY_*` environment variables override the server section, which keeps
//! container deployments free of config files.
//!
//! Secrets are never stored in the file: the `[reasoner]` section names the
//! environment variable that holds the API key (`api_key_env`).

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding `server.host`
pub const ENV_HOST: &str = "PARLEY_HOST";
/// Environment variable overriding `server.port`
pub const ENV_PORT: &str = "PARLEY_PORT";
/// Environment variable overriding `server.log_level`
pub const ENV_LOG_LEVEL: &str = "PARLEY_LOG_LEVEL";

/// Root configuration structure loaded from parley.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParleyConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub reasoner: ReasonerConfig,

    #[serde(default)]
    pub chat: ChatConfig,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Maximum accepted request body size
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_body_limit() -> usize {
    64 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding a listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

// ============= Reasoner Configuration =============

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    OpenAI,
    Ollama,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::OpenAI => f.write_str("openai"),
            ProviderKind::Ollama => f.write_str("ollama"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasonerConfig {
    #[serde(default)]
    pub provider: ProviderKind,

    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable containing the API key (OpenAI only)
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Provider endpoint; defaults depend on the provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

impl Default for ReasonerConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            api_base: None,
            temperature: None,
            max_tokens: None,
        }
    }
}

impl ReasonerConfig {
    /// Endpoint to talk to, falling back to the provider's usual address
    pub fn api_base(&self) -> String {
        match (&self.api_base, self.provider) {
            (Some(base), _) => base.clone(),
            (None, ProviderKind::OpenAI) => "https://api.openai.com/v1".to_string(),
            (None, ProviderKind::Ollama) => "http://localhost:11434".to_string(),
        }
    }
}

// ============= Chat Configuration =============

/// What `POST /chat` does with a `conversation_id` the store doesn't know
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownConversationPolicy {
    /// Start a fresh conversation with a newly generated id
    Create,
    /// Answer 404
    #[default]
    Reject,
}

impl std::fmt::Display for UnknownConversationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnknownConversationPolicy::Create => f.write_str("create"),
            UnknownConversationPolicy::Reject => f.write_str("reject"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default)]
    pub unknown_conversation: UnknownConversationPolicy,
}

// ============= Loading =============

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file {0}: {1}")]
    ReadError(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to render TOML: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Invalid value for {0}: '{1}'")]
    InvalidOverride(&'static str, String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl ParleyConfig {
    /// Load configuration from `path`, apply environment overrides and validate.
    ///
    /// A missing file is not an error; defaults are used instead.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let mut config = if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| ConfigError::ReadError(path.to_path_buf(), e))?;
            Self::parse(&content)?
        } else {
            Self::default()
        };

        config.apply_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration from a TOML string without validating it.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `PARLEY_*` overrides, reading variables through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(ENV_HOST) {
            self.server.host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidOverride(ENV_PORT, port.clone()))?;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.server.log_level = level;
        }
        Ok(())
    }

    /// Check the configuration for values the server cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be non-zero".to_string(),
            ));
        }
        if self.server.body_limit_bytes == 0 {
            return Err(ConfigError::ValidationError(
                "server.body_limit_bytes must be non-zero".to_string(),
            ));
        }
        if self.reasoner.model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "reasoner.model must not be empty".to_string(),
            ));
        }
        if self.reasoner.provider == ProviderKind::OpenAI
            && self.reasoner.api_key_env.trim().is_empty()
        {
            return Err(ConfigError::ValidationError(
                "reasoner.api_key_env must name an environment variable".to_string(),
            ));
        }
        if let Some(temperature) = self.reasoner.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(ConfigError::ValidationError(format!(
                    "reasoner.temperature must be between 0 and 2, got {}",
                    temperature
                )));
            }
        }
        Ok(())
    }

    /// Render the configuration back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
