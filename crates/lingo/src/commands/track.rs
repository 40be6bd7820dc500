//! Activity tracking command.

use anyhow::{Context, Result};
use colored::Colorize;

use lingo_core::ActivityEvent;
use lingo_core::types::ActivityAction;

use super::Runtime;
use crate::config::Config;

pub async fn execute(
    action: &str,
    page: &str,
    component: Option<&str>,
    details: Option<&str>,
    config: &Config,
) -> Result<()> {
    let event = build_event(action, page, component, details)?;

    let rt = Runtime::new(config)?;
    let session = rt.manager.initialize_session().await?;

    rt.manager.track_activity(event.clone()).await;

    println!(
        "{} {} on {} ({})",
        "✓".green(),
        event.action.to_string().cyan(),
        event.page,
        session.session_id.dimmed()
    );

    Ok(())
}

fn build_event(
    action: &str,
    page: &str,
    component: Option<&str>,
    details: Option<&str>,
) -> Result<ActivityEvent> {
    let action: ActivityAction = action.parse()?;
    let mut event = ActivityEvent::new(action, page);

    if let Some(component) = component {
        event = event.with_component(component);
    }
    if let Some(raw) = details {
        let value: serde_json::Value =
            serde_json::from_str(raw).context("--details must be valid JSON")?;
        event = event.with_details(value);
    }

    Ok(event)
}
