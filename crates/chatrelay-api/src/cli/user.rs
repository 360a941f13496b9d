//! `chatrelay seed-users`: bulk account creation.

use std::path::Path;

use anyhow::{Context, Result, bail};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use chatrelay_types::user::SeedUser;

use crate::state::AppState;

/// Environment variable consulted when no `--file` is given.
pub const SEED_ENV_VAR: &str = "TEST_USERS_JSON";

/// Seed users from `file`, or from `TEST_USERS_JSON` when no file is given.
pub async fn seed_users(state: &AppState, file: Option<&Path>, json: bool) -> Result<()> {
    let raw = match file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => match std::env::var(SEED_ENV_VAR) {
            Ok(raw) => raw,
            Err(_) => bail!("no users given: pass --file or set {SEED_ENV_VAR}"),
        },
    };
    let entries = parse_seed(&raw)?;

    let report = state.user_service.seed(&entries).await?;

    if json {
        let out = serde_json::json!({
            "created": report.created,
            "existing": report.existing,
            "incomplete": report.incomplete,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if report.created.is_empty() && report.existing.is_empty() {
        println!("  {} No complete user entries found", style("!").yellow());
    } else {
        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL_CONDENSED);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec![
            Cell::new("Email").fg(Color::White),
            Cell::new("Result").fg(Color::White),
        ]);
        for email in &report.created {
            table.add_row(vec![Cell::new(email), Cell::new("created").fg(Color::Green)]);
        }
        for email in &report.existing {
            table.add_row(vec![Cell::new(email), Cell::new("already exists").fg(Color::DarkGrey)]);
        }
        println!("{table}");
    }

    if report.incomplete > 0 {
        println!(
            "  {} Skipped {} incomplete entr{}",
            style("!").yellow(),
            report.incomplete,
            if report.incomplete == 1 { "y" } else { "ies" }
        );
    }
    Ok(())
}

/// The seed payload must be a JSON array of objects.
fn parse_seed(raw: &str) -> Result<Vec<SeedUser>> {
    serde_json::from_str(raw).context("seed users must be a JSON array of {email, name, password}")
}
