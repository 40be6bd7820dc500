//! Best-effort activity tracking against the current session.

use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use super::SessionManager;
use super::manager::Inner;
use crate::error::Result;
use crate::types::{ActivityAction, ActivityRecord, Session};

/// A user action to record.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityEvent {
    pub action: ActivityAction,
    pub page: String,
    pub component: Option<String>,
    pub details: Option<serde_json::Value>,
}

impl ActivityEvent {
    pub fn new(action: ActivityAction, page: impl Into<String>) -> Self {
        Self {
            action,
            page: page.into(),
            component: None,
            details: None,
        }
    }

    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl SessionManager {
    /// Record an activity and refresh the session's last activity.
    ///
    /// Never fails: without a current session this is a no-op, and gateway
    /// errors are logged and dropped. The current session is left in place
    /// either way.
    pub async fn track_activity(&self, event: ActivityEvent) {
        let Some(session) = self.get_current_session() else {
            warn!(action = %event.action, page = %event.page, "No session to track activity against");
            return;
        };

        if let Err(e) = self.inner.send_activity(&session, event).await {
            error!(session_id = %session.session_id, error = %e, "Failed to track activity");
        }
    }

    /// [`track_activity`](Self::track_activity) on a detached task.
    pub fn spawn_track_activity(&self, event: ActivityEvent) -> JoinHandle<()> {
        let manager = self.clone();
        tokio::spawn(async move { manager.track_activity(event).await })
    }
}

impl Inner {
    async fn send_activity(&self, session: &Session, event: ActivityEvent) -> Result<()> {
        let record = ActivityRecord {
            session_id: session.session_id.clone(),
            user_id: (!session.is_anonymous()).then(|| session.user_id.clone()),
            action: event.action,
            page: event.page,
            component: event.component,
            details: event.details,
            user_agent: Some(self.metadata.user_agent.clone()),
        };

        self.gateway.record_activity(&record).await?;
        self.gateway.touch_session(&session.session_id).await?;

        let now = self.clock.now();
        let mut state = self.lock();
        // A login may have replaced the session meanwhile; leave that one alone.
        if let Some(current) = state.current.as_mut() {
            if current.session_id == session.session_id {
                current.last_activity = now;
            }
        }
        debug!(session_id = %session.session_id, action = %record.action, "Activity tracked");
        Ok(())
    }
}
