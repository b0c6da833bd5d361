//! CLI module for Lexgate
//!
//! Provides command-line interface parsing for the lexgate-server binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Lexgate - cookie-session authentication server
///
/// Registration, login, logout and session lookup over HTTP, with
/// PASETO v4.public session tokens carried in an HttpOnly cookie.
#[derive(Parser, Debug)]
#[command(
    name = "lexgate-server",
    version,
    about = "Lexgate - cookie-session authentication server",
    long_about = "Lexgate authentication backend: issues PASETO v4.public session tokens in an\n\
                  HttpOnly, SameSite=Strict cookie.\n\n\
                  Run without arguments to start the server, or use 'keygen' to create a signing key pair.",
    after_help = "EXAMPLES:\n    \
                  lexgate-server keygen --env         # Print a key pair as .env lines\n    \
                  lexgate-server config --validate    # Check lexgate.toml and its env vars\n    \
                  lexgate-server                      # Start the server (requires lexgate.toml)\n    \
                  lexgate-server --config my.toml     # Use a custom config file"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "lexgate.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Generate a PASETO v4 Ed25519 key pair (hex encoded)
    Keygen {
        /// Print the keys as .env assignments
        #[arg(long)]
        env: bool,
    },

    /// Show configuration information
    Config {
        /// Validate the configuration file and referenced env vars
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
