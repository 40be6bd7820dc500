//! Single-flight session coordinator.

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info, warn};

use crate::config::SessionConfig;
use crate::error::{Error, Result};
use crate::gateway::SessionGateway;
use crate::metadata::ClientMetadata;
use crate::store::{self, LocalStore};
use crate::types::{ANONYMOUS_USER_ID, CreateSessionRequest, Session};
use crate::utils::time::{Clock, SystemClock};

/// The pending initialization every concurrent caller awaits.
type InitFuture = Shared<BoxFuture<'static, std::result::Result<Session, Arc<Error>>>>;

/// Observable coordinator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No session cached and nothing in flight (also the state after logout).
    Uninitialized,
    /// A restore-or-create sequence is running.
    Initializing,
    /// An anonymous session is cached.
    Ready,
    /// A session obtained through login is cached.
    LoggedIn,
}

#[derive(Default)]
pub(super) struct State {
    pub(super) current: Option<Session>,
    in_flight: Option<InitFuture>,
}

pub(super) struct Inner {
    pub(super) gateway: Arc<dyn SessionGateway>,
    store: Arc<dyn LocalStore>,
    pub(super) clock: Arc<dyn Clock>,
    config: SessionConfig,
    pub(super) metadata: ClientMetadata,
    state: Mutex<State>,
}

/// Owns the current session for one client instance.
///
/// Cloning is cheap and every clone shares the same state, so construct one
/// at startup and hand clones to consumers.
#[derive(Clone)]
pub struct SessionManager {
    pub(super) inner: Arc<Inner>,
}

/// Builder for [`SessionManager`].
pub struct SessionManagerBuilder {
    gateway: Arc<dyn SessionGateway>,
    store: Arc<dyn LocalStore>,
    clock: Arc<dyn Clock>,
    config: SessionConfig,
    metadata: Option<ClientMetadata>,
}

impl SessionManagerBuilder {
    /// Set the session configuration
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the time source
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Set the metadata sent with new sessions and activity events
    pub fn metadata(mut self, metadata: ClientMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn build(self) -> SessionManager {
        SessionManager {
            inner: Arc::new(Inner {
                gateway: self.gateway,
                store: self.store,
                clock: self.clock,
                config: self.config,
                metadata: self.metadata.unwrap_or_else(ClientMetadata::detect),
                state: Mutex::new(State::default()),
            }),
        }
    }
}

impl SessionManager {
    /// Create a manager with default configuration and the system clock.
    pub fn new(gateway: Arc<dyn SessionGateway>, store: Arc<dyn LocalStore>) -> Self {
        Self::builder(gateway, store).build()
    }

    pub fn builder(
        gateway: Arc<dyn SessionGateway>,
        store: Arc<dyn LocalStore>,
    ) -> SessionManagerBuilder {
        SessionManagerBuilder {
            gateway,
            store,
            clock: Arc::new(SystemClock),
            config: SessionConfig::default(),
            metadata: None,
        }
    }

    /// Return a usable session, restoring or creating one if needed.
    ///
    /// Concurrent callers share a single restore-or-create sequence and all
    /// observe the same session, or the same failure. A failed sequence
    /// leaves the manager uninitialized so the next call starts over.
    pub async fn initialize_session(&self) -> Result<Session> {
        let init = {
            let mut state = self.inner.lock();

            if let Some(in_flight) = &state.in_flight {
                debug!("Joining in-flight session initialization");
                in_flight.clone()
            } else {
                if let Some(session) = &state.current {
                    if self.inner.is_valid(session) {
                        return Ok(session.clone());
                    }
                    info!(session_id = %session.session_id, "Cached session is stale");
                }

                let init = Arc::clone(&self.inner).initialize().boxed().shared();
                state.in_flight = Some(init.clone());
                init
            }
        };

        init.await.map_err(Error::Initialization)
    }

    /// Adopt the session returned by a successful login.
    ///
    /// Overwrites the cached session and the persisted pair without asking
    /// the gateway. Callers holding an older session keep it until they call
    /// [`initialize_session`](Self::initialize_session) again.
    pub fn update_session_after_login(
        &self,
        session_id: impl Into<String>,
        user_id: impl Into<String>,
    ) {
        let session = Session {
            session_id: session_id.into(),
            user_id: user_id.into(),
            is_active: true,
            last_activity: self.inner.clock.now(),
        };

        if let Err(e) = store::save_pair(
            self.inner.store.as_ref(),
            &session.session_id,
            &session.user_id,
        ) {
            warn!(error = %e, "Failed to persist session after login");
        }

        info!(
            session_id = %session.session_id,
            user_id = %session.user_id,
            "Session updated after login"
        );
        self.inner.lock().current = Some(session);
    }

    /// Forget the current session locally. The backend is not told.
    pub fn clear_session(&self) {
        let previous = self.inner.lock().current.take();

        if let Err(e) = store::clear_pair(self.inner.store.as_ref()) {
            warn!(error = %e, "Failed to remove persisted session");
        }

        if let Some(session) = previous {
            info!(session_id = %session.session_id, "Session cleared");
        }
    }

    /// End the current session on the backend, then clear it locally.
    ///
    /// Without a cached session the persisted pair is ended instead, so a
    /// fresh process can log out. The local session is cleared even when the
    /// backend call fails; that failure is returned so callers can report it.
    pub async fn end_session(&self) -> Result<()> {
        let session_id = match self.get_current_session() {
            Some(session) => Some(session.session_id),
            None => match store::load_pair(self.inner.store.as_ref()) {
                Ok(pair) => pair.map(|(session_id, _)| session_id),
                Err(e) => {
                    warn!(error = %e, "Failed to read persisted session");
                    None
                }
            },
        };

        let remote = match &session_id {
            Some(id) => self.inner.gateway.end_session(id).await,
            None => Ok(()),
        };

        if let Err(e) = &remote {
            warn!(error = %e, "Failed to end session on backend");
        }

        self.clear_session();
        remote
    }

    /// The cached session, without validation or I/O.
    pub fn get_current_session(&self) -> Option<Session> {
        self.inner.lock().current.clone()
    }

    /// Snapshot of the coordinator state.
    pub fn state(&self) -> SessionState {
        let state = self.inner.lock();
        if state.in_flight.is_some() {
            return SessionState::Initializing;
        }
        match &state.current {
            None => SessionState::Uninitialized,
            Some(s) if s.is_anonymous() => SessionState::Ready,
            Some(_) => SessionState::LoggedIn,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }
}

impl Inner {
    pub(super) fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_valid(&self, session: &Session) -> bool {
        session.is_valid_at(self.clock.now(), self.config.max_age())
    }

    /// Run one restore-or-create sequence and publish its outcome.
    async fn initialize(self: Arc<Self>) -> std::result::Result<Session, Arc<Error>> {
        let result = self.restore_or_create().await;

        let mut state = self.lock();
        state.in_flight = None;
        match result {
            Ok(session) => {
                state.current = Some(session.clone());
                Ok(session)
            }
            Err(e) => {
                error!(error = %e, "Failed to initialize session");
                state.current = None;
                Err(Arc::new(e))
            }
        }
    }

    async fn restore_or_create(&self) -> Result<Session> {
        match store::load_pair(self.store.as_ref()) {
            Ok(Some((session_id, user_id))) => {
                match self.restore(&session_id).await {
                    Ok(session) => {
                        // The backend owns the user id; keep the pair in step with it.
                        if session.user_id != user_id {
                            self.persist(&session);
                        }
                        info!(session_id = %session.session_id, "Restored persisted session");
                        return Ok(session);
                    }
                    Err(e) => {
                        warn!(session_id = %session_id, reason = %e, "Persisted session rejected, discarding");
                        if let Err(e) = store::clear_pair(self.store.as_ref()) {
                            warn!(error = %e, "Failed to remove persisted session");
                        }
                    }
                }
            }
            Ok(None) => debug!("No persisted session"),
            Err(e) => warn!(error = %e, "Failed to read persisted session"),
        }

        self.create().await
    }

    /// Validate a persisted session against the gateway.
    async fn restore(&self, session_id: &str) -> Result<Session> {
        let record = self
            .gateway
            .get_session(session_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("session {}", session_id)))?;

        if record.session_id != session_id {
            return Err(Error::InvalidResponse(format!(
                "asked for session {}, got {}",
                session_id, record.session_id
            )));
        }

        let session = Session::from_record(record);

        if !session.is_active {
            return Err(Error::SessionExpired(format!("{} is no longer active", session_id)));
        }
        if !self.is_valid(&session) {
            return Err(Error::SessionExpired(format!(
                "{} idle since {}",
                session_id, session.last_activity
            )));
        }

        Ok(session)
    }

    fn persist(&self, session: &Session) {
        if let Err(e) = store::save_pair(self.store.as_ref(), &session.session_id, &session.user_id) {
            warn!(session_id = %session.session_id, error = %e, "Failed to persist session");
        }
    }

    /// Create an anonymous session and persist it.
    async fn create(&self) -> Result<Session> {
        let req = CreateSessionRequest {
            user_id: ANONYMOUS_USER_ID.to_string(),
            user_agent: Some(self.metadata.user_agent.clone()),
            device_info: Some(self.metadata.device.clone()),
        };

        let record = self.gateway.create_session(&req).await?;
        if record.session_id.is_empty() {
            return Err(Error::InvalidResponse("created session has no sessionId".into()));
        }

        let mut session = Session {
            session_id: record.session_id,
            user_id: ANONYMOUS_USER_ID.to_string(),
            is_active: record.is_active,
            last_activity: record.last_activity,
        };

        // A backend clock running behind can hand out a session that is
        // already stale here.
        if !self.is_valid(&session) {
            warn!(
                session_id = %session.session_id,
                last_activity = %session.last_activity,
                "New session outside validity window, using local time"
            );
            session.last_activity = self.clock.now();
        }

        self.persist(&session);

        info!(session_id = %session.session_id, "Created new session");
        Ok(session)
    }
}
