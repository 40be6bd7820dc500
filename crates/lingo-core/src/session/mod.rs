//! Session coordination.
//!
//! One [`SessionManager`] per running client owns the current session. However
//! many callers ask for a session at once, only one restore-or-create sequence
//! runs and all of them observe its result.
//!
//! ## Lifecycle
//!
//! ```text
//! Uninitialized ──initialize_session()──► Initializing ──ok──► Ready
//!       ▲                                   │    ▲              │
//!       │                                 error  └─ joiners     │ stale (>= max age)
//!       └───────────────────────────────────┘                   ▼
//!       ▲                                                  Initializing
//!       │
//!   clear_session()  ◄── Ready / LoggedIn ◄── update_session_after_login()
//! ```
//!
//! Initialization:
//!
//! ```text
//! persisted pair?
//!   ├─ yes ─► gateway.get_session ─► active & fresh ─► adopt
//!   │                              └─ otherwise ─► drop pair ─┐
//!   └─ no ───────────────────────────────────────────────────┴─► gateway.create_session
//!                                                                 └─► persist pair, adopt
//! ```

mod activity;
mod manager;
#[cfg(test)]
mod testing;

pub use activity::ActivityEvent;
pub use manager::{SessionManager, SessionManagerBuilder, SessionState};
