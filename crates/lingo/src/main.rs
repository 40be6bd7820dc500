//! lingo - session CLI for the Lingo learning backend
//!
//! Restores or creates the learning session, logs users in and records
//! activity the same way the web client does.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod cli;
mod commands;
mod config;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::from_default_env()
                .add_directive("lingo=info".parse()?)
                .add_directive("lingo_core=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = config::Config::load()?;
    config.ensure_dirs()?;

    // Execute command
    match cli.command {
        Commands::Session(cmd) => commands::session::execute(cmd, &config).await,
        Commands::Login { email, name } => {
            commands::auth::login(&email, name.as_deref(), &config).await
        }
        Commands::Logout => commands::auth::logout(&config).await,
        Commands::Track {
            action,
            page,
            component,
            details,
        } => {
            commands::track::execute(
                &action,
                &page,
                component.as_deref(),
                details.as_deref(),
                &config,
            )
            .await
        }
        Commands::Doctor => commands::doctor::execute(&config).await,
        Commands::Version => {
            println!("lingo {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
