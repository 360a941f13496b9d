//! CLI command definitions and dispatch for the `chatrelay` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod purge;
pub mod serve;
pub mod session;
pub mod token;
pub mod user;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use chatrelay_observe::tracing_setup::LogFormat;

/// Relay chat messages to AI agents and serve answers for polling.
#[derive(Parser)]
#[command(name = "chatrelay", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Data directory holding `config.toml` and the database.
    #[arg(long, global = true, env = "CHATRELAY_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Log line format (pretty or json).
    #[arg(long, global = true, default_value = "pretty", env = "CHATRELAY_LOG_FORMAT")]
    pub log_format: LogFormat,

    /// Also export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Default log filter for this invocation when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 if self.quiet => "error",
            0 if matches!(self.command, Commands::Serve { .. }) => {
                chatrelay_observe::tracing_setup::DEFAULT_FILTER
            }
            0 => "warn",
            1 => "debug,sqlx=warn,hyper=info,reqwest=info",
            _ => "trace",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Create user accounts from a JSON array of {email, name, password}.
    #[command(name = "seed-users")]
    SeedUsers {
        /// JSON file to read; defaults to the TEST_USERS_JSON variable.
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Issue an access token for development use.
    Token {
        #[arg(long)]
        user_id: String,

        #[arg(long)]
        email: String,
    },

    /// Show a session the way a polling client sees it.
    Session {
        /// Session ID.
        id: String,

        /// Only show chunks after this index (-1 for all).
        #[arg(long, default_value = "-1", allow_hyphen_values = true)]
        last_chunk_index: i64,
    },

    /// Delete expired sessions.
    Purge,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_session_with_negative_index() {
        let cli = Cli::try_parse_from(["chatrelay", "session", "abc", "--last-chunk-index", "-1"]).unwrap();
        match cli.command {
            Commands::Session { id, last_chunk_index } => {
                assert_eq!(id, "abc");
                assert_eq!(last_chunk_index, -1);
            }
            _ => panic!("expected session command"),
        }
    }

    #[test]
    fn test_log_filter_by_command() {
        let serve = Cli::try_parse_from(["chatrelay", "serve"]).unwrap();
        assert_eq!(serve.log_filter(), chatrelay_observe::tracing_setup::DEFAULT_FILTER);

        let purge = Cli::try_parse_from(["chatrelay", "purge"]).unwrap();
        assert_eq!(purge.log_filter(), "warn");

        let quiet = Cli::try_parse_from(["chatrelay", "--quiet", "serve"]).unwrap();
        assert_eq!(quiet.log_filter(), "error");
    }

    #[test]
    fn test_seed_users_name() {
        let cli = Cli::try_parse_from(["chatrelay", "seed-users", "--file", "users.json"]).unwrap();
        assert!(matches!(cli.command, Commands::SeedUsers { file: Some(_) }));
    }
}
