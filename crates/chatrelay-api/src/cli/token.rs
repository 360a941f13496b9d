//! `chatrelay token`: issue a development access token.

use anyhow::{Result, anyhow};
use console::style;

use chatrelay_core::auth::token::TokenIssuer;

use crate::state::AppState;

/// Sign a token for `user_id` with the configured secret and lifetime.
pub fn issue_token(state: &AppState, user_id: &str, email: &str, json: bool) -> Result<()> {
    let token = state
        .tokens
        .issue(user_id, email)
        .map_err(|e| anyhow!("failed to sign token: {e}"))?;

    if json {
        let out = serde_json::json!({
            "token": token,
            "userId": user_id,
            "email": email,
            "expiresInHours": state.config.token_ttl_hours,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Token for {} (valid {}h):",
        style("🔑").bold(),
        style(email).cyan(),
        state.config.token_ttl_hours
    );
    println!();
    println!("  {}", style(&token).yellow());
    println!();
    println!(
        "  {}",
        style("Send as 'Authorization: Bearer <token>'").dim()
    );
    println!();
    Ok(())
}
