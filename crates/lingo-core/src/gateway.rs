//! Remote session gateway.
//!
//! The backend owns session records; the coordinator only needs these
//! operations from it. [`crate::client::ApiClient`] is the HTTP
//! implementation.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ActivityRecord, CreateSessionRequest, SessionRecord};

/// Backend session endpoints.
#[async_trait]
pub trait SessionGateway: Send + Sync {
    /// Create a new session record.
    async fn create_session(&self, req: &CreateSessionRequest) -> Result<SessionRecord>;

    /// Fetch a session by id. `Ok(None)` means the backend does not know it.
    async fn get_session(&self, session_id: &str) -> Result<Option<SessionRecord>>;

    /// Refresh the session's last-activity timestamp.
    async fn touch_session(&self, session_id: &str) -> Result<()>;

    /// Persist an analytics event.
    async fn record_activity(&self, record: &ActivityRecord) -> Result<()>;

    /// Mark the session as ended.
    async fn end_session(&self, session_id: &str) -> Result<()>;
}
