//! CLI module for Parley
//!
//! Provides command-line interface parsing for the parley-server binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod init;
pub mod output;

use crate::utils::config::ProviderKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Parley - conversational reasoning server
#[derive(Parser, Debug)]
#[command(
    name = "parley-server",
    version,
    about = "Parley - conversational reasoning server",
    long_about = "A chat server that answers each message with a chain-of-thought reasoning\n\
                  pipeline on a hosted language model and keeps per-conversation history.\n\n\
                  Run without arguments to start the server, or use 'init' to scaffold a config.",
    after_help = "EXAMPLES:\n    \
                  parley-server init                  # Write parley.toml and .env.example\n    \
                  parley-server                       # Start the server\n    \
                  parley-server serve --port 9000     # Start on another port\n    \
                  parley-server config --validate     # Check the configuration"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "parley.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute (defaults to `serve`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve {
        /// Override the configured host
        #[arg(long)]
        host: Option<String>,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Write a starter parley.toml and .env.example
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite existing files without prompting
        #[arg(short, long)]
        force: bool,

        /// LLM provider to configure
        #[arg(long, default_value = "openai", value_parser = ["openai", "ollama"])]
        provider: String,

        /// Host address for the server
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port for the server
        #[arg(long, default_value = "8000")]
        port: u16,
    },

    /// Show configuration information
    Config {
        /// Only validate the configuration file
        #[arg(long)]
        validate: bool,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Maps the `--provider` flag value to a provider kind
pub fn parse_provider(name: &str) -> ProviderKind {
    match name {
        "ollama" => ProviderKind::Ollama,
        _ => ProviderKind::OpenAI,
    }
}
