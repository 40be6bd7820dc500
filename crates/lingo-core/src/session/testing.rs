//! In-memory gateway for coordinator tests.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::gateway::SessionGateway;
use crate::types::{ActivityRecord, CreateSessionRequest, SessionRecord};
use crate::utils::time::Clock;
use crate::utils::time::testing::ManualClock;

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
}

/// Backend double: sessions live in a map and ids are `s1`, `s2`, ...
pub struct FakeGateway {
    clock: Arc<ManualClock>,
    sessions: Mutex<HashMap<String, SessionRecord>>,
    create_requests: Mutex<Vec<CreateSessionRequest>>,
    activities: Mutex<Vec<ActivityRecord>>,
    next_id: AtomicUsize,
    delay: Duration,
    lag: chrono::Duration,
    fail_create: AtomicBool,
    fail_get: AtomicBool,
    fail_activity: AtomicBool,

    pub creates: AtomicUsize,
    pub gets: AtomicUsize,
    pub touches: AtomicUsize,
    pub ends: AtomicUsize,
}

impl FakeGateway {
    pub fn new(clock: Arc<ManualClock>) -> Self {
        Self {
            clock,
            sessions: Mutex::new(HashMap::new()),
            create_requests: Mutex::new(Vec::new()),
            activities: Mutex::new(Vec::new()),
            next_id: AtomicUsize::new(1),
            delay: Duration::ZERO,
            lag: chrono::Duration::zero(),
            fail_create: AtomicBool::new(false),
            fail_get: AtomicBool::new(false),
            fail_activity: AtomicBool::new(false),
            creates: AtomicUsize::new(0),
            gets: AtomicUsize::new(0),
            touches: AtomicUsize::new(0),
            ends: AtomicUsize::new(0),
        }
    }

    /// Delay every create, so concurrent callers overlap.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Stamp created sessions with a clock running `lag` behind.
    pub fn lagging_by(mut self, lag: chrono::Duration) -> Self {
        self.lag = lag;
        self
    }

    pub fn starting_at(self, next_id: usize) -> Self {
        self.next_id.store(next_id, Ordering::SeqCst);
        self
    }

    pub fn failing_create(self) -> Self {
        self.set_fail_create(true);
        self
    }

    pub fn failing_get(self) -> Self {
        self.fail_get.store(true, Ordering::SeqCst);
        self
    }

    pub fn failing_activity(self) -> Self {
        self.fail_activity.store(true, Ordering::SeqCst);
        self
    }

    pub fn set_fail_create(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::SeqCst);
    }

    pub fn seed(&self, record: SessionRecord) {
        self.sessions
            .lock()
            .unwrap()
            .insert(record.session_id.clone(), record);
    }

    pub fn record(&self, session_id: &str) -> Option<SessionRecord> {
        self.sessions.lock().unwrap().get(session_id).cloned()
    }

    pub fn create_requests(&self) -> Vec<CreateSessionRequest> {
        self.create_requests.lock().unwrap().clone()
    }

    pub fn activities(&self) -> Vec<ActivityRecord> {
        self.activities.lock().unwrap().clone()
    }
}

#[async_trait]
impl SessionGateway for FakeGateway {
    async fn create_session(&self, req: &CreateSessionRequest) -> Result<SessionRecord> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.creates.fetch_add(1, Ordering::SeqCst);
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.create_requests.lock().unwrap().push(req.clone());

        if self.fail_create.load(Ordering::SeqCst) {
            return Err(Error::Unreachable("http://fake".into()));
        }

        let record = SessionRecord {
            session_id: format!("s{}", n),
            user_id: Some(req.user_id.clone()),
            is_active: true,
            last_activity: self.clock.now() - self.lag,
        };
        self.seed(record.clone());
        Ok(record)
    }

    async fn get_session(&self, session_id: &str) -> Result<Option<SessionRecord>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(Error::Timeout(format!("/api/sessions/{}", session_id)));
        }
        Ok(self.record(session_id))
    }

    async fn touch_session(&self, session_id: &str) -> Result<()> {
        self.touches.fetch_add(1, Ordering::SeqCst);
        let now = self.clock.now();
        match self.sessions.lock().unwrap().get_mut(session_id) {
            Some(record) => {
                record.last_activity = now;
                Ok(())
            }
            None => Err(Error::NotFound(session_id.to_string())),
        }
    }

    async fn record_activity(&self, record: &ActivityRecord) -> Result<()> {
        if self.fail_activity.load(Ordering::SeqCst) {
            return Err(Error::Server {
                status: 500,
                message: "activity store down".into(),
            });
        }
        self.activities.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn end_session(&self, session_id: &str) -> Result<()> {
        self.ends.fetch_add(1, Ordering::SeqCst);
        match self.sessions.lock().unwrap().get_mut(session_id) {
            Some(record) => {
                record.is_active = false;
                Ok(())
            }
            None => Err(Error::NotFound(session_id.to_string())),
        }
    }
}
