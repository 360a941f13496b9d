//! `chatrelay session`: inspect a session from the command line.

use anyhow::{Result, bail};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use chatrelay_types::error::StoreError;
use chatrelay_types::session::SessionStatus;

use crate::state::AppState;

/// Print the poll view of `session_id`: status, new chunks, assembled text.
pub async fn show_session(
    state: &AppState,
    session_id: &str,
    last_chunk_index: i64,
    json: bool,
) -> Result<()> {
    let view = match state.status_query.query(session_id, last_chunk_index).await {
        Ok(view) => view,
        Err(StoreError::NotFound) => bail!("Session not found: {session_id}"),
        Err(e) => return Err(e.into()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    let status = match view.status {
        SessionStatus::Processing => style(view.status.as_str()).yellow(),
        SessionStatus::Completed => style(view.status.as_str()).green(),
        SessionStatus::Error => style(view.status.as_str()).red(),
    };

    println!();
    println!("  {} Session {}", style("💬").bold(), style(session_id).cyan());
    println!("  Status: {status}");
    println!("  Chunks: {}", view.total_chunks);
    if let Some(err) = &view.error_message {
        println!("  Error:  {}", style(err).red());
    }
    println!();

    if !view.chunks.is_empty() {
        let first_index = if last_chunk_index < 0 { 0 } else { last_chunk_index + 1 };

        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL_CONDENSED);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec![
            Cell::new("#").fg(Color::White),
            Cell::new("Chunk").fg(Color::White),
        ]);
        for (offset, chunk) in view.chunks.iter().enumerate() {
            table.add_row(vec![
                Cell::new(first_index + offset as i64).fg(Color::DarkGrey),
                Cell::new(chunk),
            ]);
        }
        println!("{table}");
        println!();
    }

    if !view.response.is_empty() {
        println!("  {}", style("── Response ──").dim());
        println!("  {}", view.response);
        println!();
    }
    Ok(())
}
