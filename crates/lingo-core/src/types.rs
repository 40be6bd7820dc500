//! Session model and backend wire types.
//!
//! The backend speaks camelCase JSON and wraps every payload in an
//! [`ApiEnvelope`].

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// User id recorded for sessions that have not logged in.
pub const ANONYMOUS_USER_ID: &str = "anonymous";

// ─────────────────────────────────────────────────────────────────────────────
// Session
// ─────────────────────────────────────────────────────────────────────────────

/// The current client session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Server-issued session id
    pub session_id: String,
    /// Logged-in user id, or [`ANONYMOUS_USER_ID`]
    pub user_id: String,
    pub is_active: bool,
    pub last_activity: DateTime<Utc>,
}

impl Session {
    /// Whether this session belongs to the not-logged-in identity.
    pub fn is_anonymous(&self) -> bool {
        self.user_id == ANONYMOUS_USER_ID
    }

    /// A session is usable only while `now - last_activity < max_age`.
    pub fn is_valid_at(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        now.signed_duration_since(self.last_activity) < max_age
    }

    /// Adopt a record returned by the gateway.
    pub fn from_record(record: SessionRecord) -> Self {
        Self {
            session_id: record.session_id,
            user_id: record
                .user_id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| ANONYMOUS_USER_ID.to_string()),
            is_active: record.is_active,
            last_activity: record.last_activity,
        }
    }
}

/// Session record as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub is_active: bool,
    pub last_activity: DateTime<Utc>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Envelope
// ─────────────────────────────────────────────────────────────────────────────

/// Response wrapper used by every backend route.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub error: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Unwrap the payload, turning a failed or empty envelope into an error.
    pub fn into_data(self) -> Result<T> {
        match self {
            ApiEnvelope {
                success: true,
                data: Some(data),
                ..
            } => Ok(data),
            ApiEnvelope {
                message: Some(message),
                ..
            } => Err(Error::api(message)),
            ApiEnvelope {
                error: Some(error), ..
            } => Err(Error::api(error)),
            _ => Err(Error::InvalidResponse(
                "backend response is invalid or missing data".into(),
            )),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Requests
// ─────────────────────────────────────────────────────────────────────────────

/// Best-effort description of the client device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    pub platform: String,
    pub language: String,
    pub cookie_enabled: bool,
    pub on_line: bool,
}

/// Create session request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_info: Option<DeviceInfo>,
}

/// Kind of user action recorded by activity tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    PageView,
    ButtonClick,
    FormSubmit,
    Navigation,
    Error,
    Other,
}

impl ActivityAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityAction::PageView => "page_view",
            ActivityAction::ButtonClick => "button_click",
            ActivityAction::FormSubmit => "form_submit",
            ActivityAction::Navigation => "navigation",
            ActivityAction::Error => "error",
            ActivityAction::Other => "other",
        }
    }
}

impl fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "page_view" => Ok(ActivityAction::PageView),
            "button_click" => Ok(ActivityAction::ButtonClick),
            "form_submit" => Ok(ActivityAction::FormSubmit),
            "navigation" => Ok(ActivityAction::Navigation),
            "error" => Ok(ActivityAction::Error),
            "other" => Ok(ActivityAction::Other),
            other => Err(Error::Other(format!("Unknown activity action: {}", other))),
        }
    }
}

/// Activity event as sent to the backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub action: ActivityAction,
    pub page: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Login
// ─────────────────────────────────────────────────────────────────────────────

/// Login (or create) user request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default)]
    pub login_count: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginSession {
    pub session_id: String,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_active: bool,
}

/// Result of a successful login exchange
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub user: User,
    pub session: LoginSession,
}

/// Health check response
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
