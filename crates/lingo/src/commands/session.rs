//! Session commands.

use anyhow::Result;
use colored::Colorize;

use lingo_core::store;
use lingo_core::utils::{format_datetime, now_utc};
use lingo_core::{Session, SessionGateway};

use super::Runtime;
use crate::cli::{SessionAction, SessionCommand};
use crate::config::Config;

pub async fn execute(cmd: SessionCommand, config: &Config) -> Result<()> {
    match cmd.action {
        SessionAction::Init => init(config).await,
        SessionAction::Status => status(config).await,
    }
}

async fn init(config: &Config) -> Result<()> {
    let rt = Runtime::new(config)?;

    println!("{}", "Initializing session...".cyan());
    let session = rt.manager.initialize_session().await?;
    print_session(&session);

    Ok(())
}

async fn status(config: &Config) -> Result<()> {
    let rt = Runtime::new(config)?;

    let Some((session_id, user_id)) = store::load_pair(rt.store.as_ref())? else {
        println!("{}", "No persisted session".yellow());
        println!("  Run {} to create one", "lingo session init".cyan());
        return Ok(());
    };

    println!("{}", "Persisted session".cyan().bold());
    println!("  Session: {}", session_id);
    println!("  User:    {}", user_id);
    println!("  Store:   {}", rt.store.path().display());

    print!("  Backend: ");
    match rt.client.get_session(&session_id).await {
        Ok(Some(record)) => {
            let session = Session::from_record(record);
            let max_age = rt.manager.config().max_age();
            if session.is_active && session.is_valid_at(now_utc(), max_age) {
                println!("{}", "✓ active".green());
            } else if session.is_active {
                println!("{}", "○ idle too long, will be replaced".yellow());
            } else {
                println!("{}", "○ ended, will be replaced".yellow());
            }
            println!(
                "  Last activity: {}",
                format_datetime(&session.last_activity).dimmed()
            );
        }
        Ok(None) => println!("{}", "✗ unknown to backend".red()),
        Err(e) => println!("{}", format!("✗ {}", e).red()),
    }

    Ok(())
}

pub(crate) fn print_session(session: &Session) {
    println!("{} {}", "✓".green(), "Session ready".green().bold());
    println!("  Session: {}", session.session_id);
    if session.is_anonymous() {
        println!("  User:    {}", session.user_id.dimmed());
    } else {
        println!("  User:    {}", session.user_id);
    }
    println!(
        "  Last activity: {}",
        format_datetime(&session.last_activity)
    );
}
