//! Terminal output for the `parley-server` commands.
//!
//! Every line is rendered to a `String` first so the plain (no-color) form can
//! be asserted in tests; the print methods only add the destination stream.

use crate::utils::config::ParleyConfig;
use owo_colors::OwoColorize;
use std::path::Path;

/// Leading marker of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Ok,
    Info,
    Warn,
    Fail,
}

impl Mark {
    fn plain(self) -> &'static str {
        match self {
            Mark::Ok => "[ok]",
            Mark::Info => "[..]",
            Mark::Warn => "[!!]",
            Mark::Fail => "[xx]",
        }
    }
}

/// One numbered entry of a "next steps" list.
pub struct Step<'a> {
    pub title: &'a str,
    pub commands: &'a [&'a str],
}

pub struct Output {
    colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    pub fn new() -> Self {
        Self { colored: true }
    }

    pub fn no_color() -> Self {
        Self { colored: false }
    }

    pub fn banner(&self) {
        let version = format!("v{}", env!("CARGO_PKG_VERSION"));
        if self.colored {
            println!(
                "\n  {} {}  {}\n",
                "parley".bright_cyan().bold(),
                version.dimmed(),
                "chain-of-thought chat server".dimmed()
            );
        } else {
            println!("\n  parley {}  chain-of-thought chat server\n", version);
        }
    }

    /// Print a status line. Failures go to stderr.
    pub fn status(&self, mark: Mark, message: &str) {
        let line = self.render_status(mark, message);
        if mark == Mark::Fail {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }

    /// Report whether a scaffolded file was written or left in place.
    pub fn file(&self, path: &str, written: bool) {
        println!("{}", self.render_file(path, written));
    }

    pub fn section(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.bold().underline());
        } else {
            println!("\n  {}", title);
            println!("  {}", "-".repeat(title.len()));
        }
    }

    /// Print the effective configuration as an aligned table.
    pub fn config_summary(&self, source: &Path, config: &ParleyConfig) {
        for line in self.render_config_summary(source, config) {
            println!("{}", line);
        }
    }

    pub fn steps(&self, steps: &[Step<'_>]) {
        for (n, step) in steps.iter().enumerate() {
            if self.colored {
                println!("  {} {}", format!("{}.", n + 1).bold(), step.title);
            } else {
                println!("  {}. {}", n + 1, step.title);
            }
            for cmd in step.commands {
                if self.colored {
                    println!("       {}", cmd.cyan());
                } else {
                    println!("       {}", cmd);
                }
            }
        }
    }

    fn render_status(&self, mark: Mark, message: &str) -> String {
        if !self.colored {
            return format!("  {} {}", mark.plain(), message);
        }
        match mark {
            Mark::Ok => format!("  {} {}", "✓".green().bold(), message),
            Mark::Info => format!("  {} {}", "·".blue(), message),
            Mark::Warn => format!("  {} {}", "!".yellow().bold(), message.yellow()),
            Mark::Fail => format!("  {} {}", "✗".red().bold(), message.red()),
        }
    }

    fn render_file(&self, path: &str, written: bool) -> String {
        match (written, self.colored) {
            (true, true) => format!("  {} {}", "wrote".green(), path),
            (true, false) => format!("  wrote {}", path),
            (false, true) => format!("  {} {} (exists)", "kept ".dimmed(), path.dimmed()),
            (false, false) => format!("  kept  {} (exists)", path),
        }
    }

    fn render_config_summary(&self, source: &Path, config: &ParleyConfig) -> Vec<String> {
        let reasoner = &config.reasoner;
        let rows = [
            ("file", source.display().to_string()),
            ("listen", config.server.bind_addr()),
            ("provider", reasoner.provider.to_string()),
            ("model", reasoner.model.clone()),
            ("api_base", reasoner.api_base()),
            ("unknown ids", config.chat.unknown_conversation.to_string()),
        ];
        let width = rows.iter().map(|(key, _)| key.len()).max().unwrap_or(0);

        rows.iter()
            .map(|(key, value)| {
                let key = format!("{:<width$}", key, width = width);
                if self.colored {
                    format!("    {}  {}", key.dimmed(), value)
                } else {
                    format!("    {}  {}", key, value)
                }
            })
            .collect()
    }
}
