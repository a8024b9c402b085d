//! Init command implementation
//!
//! Scaffolds a Parley deployment directory: `parley.toml`, `.env.example`
//! and a `.gitignore` that keeps `.env` out of version control.

use super::output::{Mark, Output, Step};
use crate::utils::config::{ConfigError, ParleyConfig, ProviderKind};
use std::fs;
use std::path::{Path, PathBuf};

/// Result of the init operation
#[derive(Debug, PartialEq, Eq)]
pub enum InitResult {
    /// Initialization completed successfully
    Success,
    /// Project already exists (parley.toml found)
    AlreadyExists,
    /// An error occurred during initialization
    Error(String),
}

/// Configuration for the init command
pub struct InitConfig {
    /// Directory to initialize
    pub path: PathBuf,
    /// Overwrite existing files
    pub force: bool,
    /// LLM provider to configure
    pub provider: ProviderKind,
    /// Host address for the server
    pub host: String,
    /// Port for the server
    pub port: u16,
}

/// Run the init command
pub fn run(config: InitConfig, output: &Output) -> InitResult {
    output.banner();
    output.section(&format!("init {}", config.path.display()));

    let base_path = &config.path;
    if let Err(e) = fs::create_dir_all(base_path) {
        output.status(
            Mark::Fail,
            &format!("Cannot create {}: {}", base_path.display(), e),
        );
        return InitResult::Error(e.to_string());
    }

    let config_path = base_path.join("parley.toml");
    if config_path.exists() && !config.force {
        output.status(
            Mark::Warn,
            "parley.toml already exists, rerun with --force to replace it",
        );
        return InitResult::AlreadyExists;
    }

    let written = generate_parley_toml(&config)
        .map_err(|e| e.to_string())
        .and_then(|content| write_file(&config_path, &content, true).map_err(|e| e.to_string()));
    if let Err(e) = written {
        output.status(Mark::Fail, &format!("parley.toml: {}", e));
        return InitResult::Error(e);
    }
    output.file("parley.toml", true);

    let env_example_path = base_path.join(".env.example");
    match write_file(&env_example_path, &generate_env_example(&config), config.force) {
        Ok(written) => output.file(".env.example", written),
        Err(e) => {
            output.status(Mark::Fail, &format!(".env.example: {}", e));
            return InitResult::Error(e.to_string());
        }
    }

    // Best effort; an unwritable .gitignore doesn't fail the init.
    match write_file(&base_path.join(".gitignore"), ".env\n/target\n", false) {
        Ok(written) => output.file(".gitignore", written),
        Err(e) => output.status(Mark::Warn, &format!(".gitignore: {}", e)),
    }

    output.section("next steps");
    let prepare = match config.provider {
        ProviderKind::OpenAI => Step {
            title: "Provide the API key",
            commands: &["cp .env.example .env", "$EDITOR .env   # OPENAI_API_KEY=..."],
        },
        ProviderKind::Ollama => Step {
            title: "Make sure the model is available",
            commands: &["ollama serve", "ollama pull llama3.2"],
        },
    };
    let serve = Step {
        title: "Start the server",
        commands: &["parley-server"],
    };
    output.steps(&[prepare, serve]);
    output.status(
        Mark::Ok,
        &format!("Ready, the API will listen on http://{}:{}", config.host, config.port),
    );

    InitResult::Success
}

/// Writes `content` to `path`. Returns `false` when an existing file was left alone.
fn write_file(path: &Path, content: &str, force: bool) -> std::io::Result<bool> {
    if path.exists() && !force {
        return Ok(false);
    }
    fs::write(path, content)?;
    Ok(true)
}

fn generate_parley_toml(init: &InitConfig) -> Result<String, ConfigError> {
    let mut config = ParleyConfig::default();
    config.server.host = init.host.clone();
    config.server.port = init.port;
    config.reasoner.provider = init.provider;
    if init.provider == ProviderKind::Ollama {
        config.reasoner.model = "llama3.2".to_string();
        config.reasoner.api_base = Some(config.reasoner.api_base());
    }

    Ok(format!(
        "# Parley configuration\n# Environment overrides: PARLEY_HOST, PARLEY_PORT, PARLEY_LOG_LEVEL\n\n{}",
        config.to_toml()?
    ))
}

fn generate_env_example(init: &InitConfig) -> String {
    let mut content = String::from("# Copy to .env and fill in\n");
    if init.provider == ProviderKind::OpenAI {
        content.push_str("OPENAI_API_KEY=sk-...\n");
    }
    content.push_str("# RUST_LOG=parley=debug,tower_http=debug\n");
    content
}
