//! API client for the Lingo backend.
//!
//! Implements [`SessionGateway`] over HTTP and exposes the login and health
//! endpoints the CLI needs.
//!
//! # Usage
//!
//! ```rust,no_run
//! use lingo_core::client::ApiClient;
//! use lingo_core::config::ClientConfig;
//!
//! #[tokio::main]
//! async fn main() -> lingo_core::Result<()> {
//!     let client = ApiClient::new(&ClientConfig::default())?;
//!     let health = client.health().await?;
//!     println!("{}", health.status);
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::gateway::SessionGateway;
use crate::types::*;

/// API client for the Lingo backend
#[derive(Clone)]
pub struct ApiClient {
    /// Base URL without trailing slash
    base_url: String,
    /// HTTP client
    client: reqwest::Client,
}

impl ApiClient {
    /// Create a new API client from config
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if the backend is available
    pub async fn health(&self) -> Result<HealthResponse> {
        let resp = self.send(reqwest::Method::GET, "/health", Option::<&()>::None).await?;
        resp.json()
            .await
            .map_err(|e| Error::InvalidResponse(e.to_string()))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // User Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Log in, creating the user on first use
    pub async fn login(&self, req: &LoginRequest) -> Result<LoginResponse> {
        self.post("/api/users/login", req).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // HTTP Helpers
    // ─────────────────────────────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(reqwest::Method::GET, path, Option::<&()>::None)
            .await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        self.request(reqwest::Method::POST, path, Some(body)).await
    }

    /// Send and check the status, ignoring the body
    async fn patch_empty(&self, path: &str) -> Result<()> {
        self.send(reqwest::Method::PATCH, path, Option::<&()>::None)
            .await?;
        Ok(())
    }

    async fn request<T: DeserializeOwned, B: Serialize>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T> {
        let resp = self.send(method, path, body).await?;
        let envelope: ApiEnvelope<T> = resp
            .json()
            .await
            .map_err(|e| Error::InvalidResponse(format!("{}: {}", path, e)))?;
        envelope.into_data()
    }

    async fn send<B: Serialize>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        debug!("API request: {} {}", method, url);

        let mut req = self.client.request(method, &url);
        if let Some(b) = body {
            req = req.json(b);
        }

        let resp = req.send().await.map_err(|e| self.transport_error(path, e))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let error_text = resp.text().await.unwrap_or_default();
        Err(status_error(path, status, &error_text))
    }

    fn transport_error(&self, path: &str, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout(path.to_string())
        } else if e.is_connect() {
            Error::Unreachable(self.base_url.clone())
        } else {
            Error::Other(format!("HTTP request failed: {}", e))
        }
    }
}

/// Map a non-success status to an error, preferring the body's message.
fn status_error(path: &str, status: reqwest::StatusCode, body: &str) -> Error {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("error"))
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| body.trim().to_string());

    match status {
        reqwest::StatusCode::NOT_FOUND => Error::NotFound(path.to_string()),
        reqwest::StatusCode::TOO_MANY_REQUESTS => Error::RateLimited,
        s if s.is_server_error() => Error::Server {
            status: s.as_u16(),
            message,
        },
        s if message.is_empty() => Error::api(format!("request failed with status {}", s)),
        _ => Error::api(message),
    }
}

#[async_trait]
impl SessionGateway for ApiClient {
    async fn create_session(&self, req: &CreateSessionRequest) -> Result<SessionRecord> {
        self.post("/api/sessions", req).await
    }

    async fn get_session(&self, session_id: &str) -> Result<Option<SessionRecord>> {
        let result: Result<SessionRecord> = self.get(&format!("/api/sessions/{}", session_id)).await;
        match result {
            Ok(s) => Ok(Some(s)),
            Err(Error::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn touch_session(&self, session_id: &str) -> Result<()> {
        self.patch_empty(&format!("/api/sessions/{}/activity", session_id))
            .await
    }

    async fn record_activity(&self, record: &ActivityRecord) -> Result<()> {
        self.send(reqwest::Method::POST, "/api/frontend-activities", Some(record))
            .await?;
        Ok(())
    }

    async fn end_session(&self, session_id: &str) -> Result<()> {
        self.patch_empty(&format!("/api/sessions/{}/end", session_id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(uri: &str) -> ApiClient {
        ApiClient::new(&ClientConfig::new(uri)).expect("client")
    }

    fn session_json(id: &str) -> serde_json::Value {
        json!({
            "success": true,
            "data": {
                "sessionId": id,
                "isActive": true,
                "lastActivity": "2024-01-15T10:30:00.000Z"
            }
        })
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(ApiClient::new(&ClientConfig::new("localhost:3001")).is_err());
        let client = test_client("http://localhost:3001/");
        assert_eq!(client.base_url(), "http://localhost:3001");
    }

    #[tokio::test]
    async fn test_create_session_sends_identity_and_device() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/sessions"))
            .and(body_partial_json(json!({
                "userId": "anonymous",
                "deviceInfo": {"platform": "linux-x86_64", "onLine": true}
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(session_json("s1")))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let record = client
            .create_session(&CreateSessionRequest {
                user_id: ANONYMOUS_USER_ID.into(),
                user_agent: Some("lingo/test".into()),
                device_info: Some(DeviceInfo {
                    platform: "linux-x86_64".into(),
                    language: "vi-VN".into(),
                    cookie_enabled: false,
                    on_line: true,
                }),
            })
            .await
            .unwrap();

        assert_eq!(record.session_id, "s1");
        assert!(record.is_active);
        assert!(record.user_id.is_none());
    }

    #[tokio::test]
    async fn test_get_session_not_found_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/sessions/gone"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"success": false, "message": "Session not found"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/sessions/s1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(session_json("s1")))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        assert!(client.get_session("gone").await.unwrap().is_none());
        assert_eq!(
            client.get_session("s1").await.unwrap().map(|s| s.session_id),
            Some("s1".to_string())
        );
    }

    #[tokio::test]
    async fn test_failed_envelope_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/sessions/s1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"success": false, "message": "Session expired"})),
            )
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.get_session("s1").await.unwrap_err();
        assert!(matches!(err, Error::Api { ref message } if message == "Session expired"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/sessions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client
            .create_session(&CreateSessionRequest {
                user_id: ANONYMOUS_USER_ID.into(),
                user_agent: None,
                device_info: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/api/sessions/busy/activity"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/api/sessions/broken/activity"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "db down"})))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        assert!(matches!(
            client.touch_session("busy").await,
            Err(Error::RateLimited)
        ));
        match client.touch_session("broken").await {
            Err(Error::Server { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "db down");
            }
            other => panic!("expected server error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        // Nothing listens on port 9 (discard) in CI containers
        let client = test_client("http://127.0.0.1:9");
        let err = client.end_session("s1").await.unwrap_err();
        assert!(err.is_transient(), "unexpected error: {:?}", err);
    }

    #[tokio::test]
    async fn test_record_activity_and_end_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/frontend-activities"))
            .and(body_partial_json(json!({
                "sessionId": "s1",
                "action": "button_click",
                "page": "/",
                "component": "AnalyzeButton"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/api/sessions/s1/end"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        client
            .record_activity(&ActivityRecord {
                session_id: "s1".into(),
                user_id: None,
                action: ActivityAction::ButtonClick,
                page: "/".into(),
                component: Some("AnalyzeButton".into()),
                details: Some(json!({"action": "analyze_image"})),
                user_agent: None,
            })
            .await
            .unwrap();
        client.end_session("s1").await.unwrap();
    }

    #[tokio::test]
    async fn test_login_and_health() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/users/login"))
            .and(body_partial_json(json!({"email": "an@example.com"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {
                    "user": {"id": "u1", "email": "an@example.com", "displayName": "An", "loginCount": 3},
                    "session": {"sessionId": "s9", "startTime": "2024-01-15T10:30:00Z", "isActive": true}
                }
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "OK", "uptime": 12.5})))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let login = client
            .login(&LoginRequest {
                email: "an@example.com".into(),
                display_name: None,
            })
            .await
            .unwrap();
        assert_eq!(login.user.id, "u1");
        assert_eq!(login.user.login_count, Some(3));
        assert_eq!(login.session.session_id, "s9");

        let health = client.health().await.unwrap();
        assert_eq!(health.status, "OK");
        assert!(health.extra.contains_key("uptime"));
    }
}
