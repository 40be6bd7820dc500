//! Diagnostics command.

use anyhow::Result;
use colored::Colorize;

use lingo_core::client::ApiClient;
use lingo_core::store;
use lingo_core::FileStore;

use crate::config::Config;

pub async fn execute(config: &Config) -> Result<()> {
    println!("{}", "lingo Doctor".cyan().bold());
    println!("{}", "─".repeat(50));
    println!();

    let mut issues = Vec::new();

    // Check config file
    print!("  Config file: ");
    let config_path = Config::config_path();
    if config_path.exists() {
        println!("{}", "✓ exists".green());
    } else {
        println!("{}", "○ not found (using defaults)".yellow());
    }

    print!("  Config values: ");
    match config.validate() {
        Ok(()) => println!("{}", "✓ valid".green()),
        Err(e) => {
            println!("{}", format!("✗ {}", e).red());
            issues.push("Invalid configuration");
        }
    }

    // Check data directory
    print!("  Data directory: ");
    if config.paths.data_dir.exists() {
        println!("{}", "✓ exists".green());
    } else {
        println!("{}", "○ will be created".yellow());
    }

    // Check the persisted session
    print!("  Session store: ");
    let file_store = FileStore::new(config.store_path());
    match store::load_pair(&file_store) {
        Ok(Some((session_id, _))) => println!("{} ({})", "✓ session saved".green(), session_id),
        Ok(None) => println!("{}", "○ no session yet".yellow()),
        Err(e) => {
            println!("{}", format!("✗ {}", e).red());
            issues.push("Session store is unreadable - delete it to start over");
        }
    }

    // Check API connectivity
    print!("  API ({}):", config.api.url);
    match ApiClient::new(&config.client_config()) {
        Ok(client) => match client.health().await {
            Ok(health) => println!(" {}", format!("✓ {}", health.status).green()),
            Err(e) => {
                println!(" {}", format!("✗ {}", e).red());
                issues.push("Cannot reach the Lingo backend");
            }
        },
        Err(e) => {
            println!(" {}", format!("✗ {}", e).red());
            issues.push("Cannot build the API client");
        }
    }

    // Summary
    println!();
    if issues.is_empty() {
        println!("{}", "✓ All checks passed".green().bold());
    } else {
        println!("{}", format!("✗ {} issue(s) found:", issues.len()).red().bold());
        for issue in &issues {
            println!("  • {}", issue);
        }
    }

    Ok(())
}
