//! lingo-core - Core library for Lingo
//!
//! This crate provides the session layer shared by every Lingo client:
//!
//! - **session**: Single-flight session coordinator and activity tracking
//! - **gateway**: The backend's session endpoints, as a trait
//! - **client**: HTTP implementation of the gateway (feature `client`)
//! - **store**: Persistent local key-value store for the session pair
//! - **config**: Session and client configuration
//! - **types**: Session model and wire types

#[cfg(feature = "client")]
pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod metadata;
pub mod session;
pub mod store;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use error::{Error, Result};
pub use gateway::SessionGateway;
pub use session::{ActivityEvent, SessionManager, SessionState};
pub use store::{FileStore, LocalStore, MemoryStore};
pub use types::{ANONYMOUS_USER_ID, Session};
