//! Command-line argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Standard and scientific calculator with a rolling history.
#[derive(Parser, Debug, Clone)]
#[command(name = "mathflow")]
#[command(about = "Standard and scientific calculator with a rolling history")]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Start in scientific mode.
    #[arg(long, global = true)]
    pub scientific: bool,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Read key names from stdin, one or more per line (default)
    Repl,

    /// Press a sequence of keys and print the final display
    Press {
        /// Key names, e.g. `7 ÷ 2 =` or `1 6 sqrt`
        #[arg(required = true, allow_hyphen_values = true)]
        keys: Vec<String>,
    },

    /// Evaluate an expression such as "6 × 7" and print the result
    Eval {
        /// The expression; `×` and `÷` are accepted
        #[arg(allow_hyphen_values = true)]
        expression: String,
    },
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The subcommand, defaulting to the REPL.
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Repl)
    }
}
