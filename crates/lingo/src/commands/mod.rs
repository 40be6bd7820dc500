//! Command implementations for the lingo CLI.
//!
//! Each submodule implements the logic for a command group.

pub mod auth;
pub mod doctor;
pub mod session;
pub mod track;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::debug;

use lingo_core::client::ApiClient;
use lingo_core::metadata::ClientMetadata;
use lingo_core::{FileStore, SessionManager};

use crate::config::Config;

/// Wired-up backend client, local store and session manager.
pub struct Runtime {
    pub client: Arc<ApiClient>,
    pub store: Arc<FileStore>,
    pub manager: SessionManager,
}

impl Runtime {
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        let client = Arc::new(
            ApiClient::new(&config.client_config()).context("Failed to create API client")?,
        );
        let store = Arc::new(FileStore::new(config.store_path()));
        let manager = SessionManager::builder(client.clone(), store.clone())
            .config(config.session_config())
            .metadata(ClientMetadata::detect())
            .build();

        debug!(
            api = %client.base_url(),
            store = %store.path().display(),
            "Runtime ready"
        );

        Ok(Self {
            client,
            store,
            manager,
        })
    }
}
