//! chatrelay CLI and REST API entry point.
//!
//! Binary name: `chatrelay`
//!
//! Parses CLI arguments, initializes tracing, database and services, then
//! dispatches to the command handler or starts the REST API server.

mod cli;
mod http;
mod state;
mod sweeper;

use anyhow::anyhow;
use clap::Parser;
use clap_complete::generate;

use chatrelay_infra::config::resolve_data_dir;
use chatrelay_observe::tracing_setup::{init_tracing_with_filter, shutdown_tracing};

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need tracing or app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "chatrelay", &mut std::io::stdout());
        return Ok(());
    }

    init_tracing_with_filter(cli.log_format, cli.log_filter(), cli.otel)
        .map_err(|e| anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let data_dir = cli.data_dir.clone().unwrap_or_else(resolve_data_dir);
    let state = AppState::init(data_dir).await?;

    match cli.command {
        Commands::Serve { port, host } => {
            cli::serve::serve(state, &host, port).await?;
        }

        Commands::SeedUsers { file } => {
            cli::user::seed_users(&state, file.as_deref(), cli.json).await?;
        }

        Commands::Token { user_id, email } => {
            cli::token::issue_token(&state, &user_id, &email, cli.json)?;
        }

        Commands::Session { id, last_chunk_index } => {
            cli::session::show_session(&state, &id, last_chunk_index, cli.json).await?;
        }

        Commands::Purge => {
            cli::purge::purge(&state, cli.json).await?;
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}
