//! CLI argument definitions using clap derive macros.

use clap::{Args, Parser, Subcommand};

/// Lingo CLI
///
/// Bootstraps and inspects the learning session shared with the backend.
#[derive(Parser, Debug)]
#[command(name = "lingo")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Session management (init, status)
    Session(SessionCommand),

    /// Log in (creating the user on first use) and adopt the returned session
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Display name for a new account
        #[arg(short, long)]
        name: Option<String>,
    },

    /// End the session on the backend and forget it locally
    Logout,

    /// Record an activity against the current session
    Track {
        /// Action kind (page_view, button_click, form_submit, navigation, error, other)
        action: String,

        /// Page the action happened on
        #[arg(short, long, default_value = "/")]
        page: String,

        /// Component name
        #[arg(short, long)]
        component: Option<String>,

        /// Free-form details as JSON
        #[arg(short, long)]
        details: Option<String>,
    },

    /// Run diagnostics
    Doctor,

    /// Show version information
    Version,
}

// ─────────────────────────────────────────────────────────────────────────────
// Session Commands
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct SessionCommand {
    #[command(subcommand)]
    pub action: SessionAction,
}

#[derive(Subcommand, Debug)]
pub enum SessionAction {
    /// Restore the persisted session or create a new one
    Init,

    /// Show the persisted session and whether the backend still accepts it
    Status,
}
