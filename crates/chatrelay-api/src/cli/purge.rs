//! `chatrelay purge`: delete expired sessions once.

use anyhow::Result;
use console::style;

use crate::state::AppState;
use crate::sweeper;

pub async fn purge(state: &AppState, json: bool) -> Result<()> {
    let removed = sweeper::purge_once(state.sessions.as_ref()).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "removed": removed }))?);
    } else if removed == 0 {
        println!("  {} No expired sessions", style("✓").green());
    } else {
        println!(
            "  {} Removed {} expired session{}",
            style("✓").green(),
            style(removed).bold(),
            if removed == 1 { "" } else { "s" }
        );
    }
    Ok(())
}
