//! Login and logout.

use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::json;

use lingo_core::store;
use lingo_core::types::{ActivityAction, LoginRequest};
use lingo_core::ActivityEvent;

use super::Runtime;
use crate::config::Config;

pub async fn login(email: &str, name: Option<&str>, config: &Config) -> Result<()> {
    let rt = Runtime::new(config)?;

    let req = LoginRequest {
        email: email.to_string(),
        display_name: name.map(str::to_string),
    };
    let resp = rt.client.login(&req).await.context("Login failed")?;

    rt.manager
        .update_session_after_login(resp.session.session_id.clone(), resp.user.id.clone());

    rt.manager
        .track_activity(
            ActivityEvent::new(ActivityAction::PageView, "/")
                .with_component("cli")
                .with_details(login_details(email)),
        )
        .await;

    let shown = resp.user.display_name.as_deref().unwrap_or(&resp.user.email);
    println!("{} Logged in as {}", "✓".green(), shown.green().bold());
    println!("  User:    {}", resp.user.id);
    println!("  Session: {}", resp.session.session_id);

    Ok(())
}

pub async fn logout(config: &Config) -> Result<()> {
    let rt = Runtime::new(config)?;

    let Some((session_id, _)) = store::load_pair(rt.store.as_ref())? else {
        println!("{}", "Not logged in".yellow());
        return Ok(());
    };

    // Cleared locally no matter what the backend says.
    match rt.manager.end_session().await {
        Ok(()) => println!("{} Session {} ended", "✓".green(), session_id),
        Err(e) if e.is_not_found() => {
            println!("{} Session {} was already gone", "○".yellow(), session_id)
        }
        Err(e) => {
            println!("{}", format!("✗ Backend did not end the session: {}", e).red());
            println!("  Local session cleared anyway");
        }
    }

    Ok(())
}

fn login_details(email: &str) -> serde_json::Value {
    json!({
        "action": "user_login",
        "userEmail": email,
    })
}
