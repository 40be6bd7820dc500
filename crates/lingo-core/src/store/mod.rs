//! Persistent local store for the session pair.
//!
//! The session id and user id survive restarts as two string keys. They are
//! always written and removed together.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::Result;

/// Key holding the persisted session id.
pub const SESSION_ID_KEY: &str = "lingo_session_id";

/// Key holding the persisted user id.
pub const USER_ID_KEY: &str = "lingo_user_id";

/// String key-value storage that outlives the process.
pub trait LocalStore: Send + Sync {
    /// Read a key.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a key.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Read the persisted `(session_id, user_id)` pair.
///
/// Returns `None` unless both keys are present and non-empty.
pub fn load_pair(store: &dyn LocalStore) -> Result<Option<(String, String)>> {
    let session_id = store.get(SESSION_ID_KEY)?.filter(|v| !v.is_empty());
    let user_id = store.get(USER_ID_KEY)?.filter(|v| !v.is_empty());
    Ok(session_id.zip(user_id))
}

/// Persist the `(session_id, user_id)` pair.
pub fn save_pair(store: &dyn LocalStore, session_id: &str, user_id: &str) -> Result<()> {
    store.set(SESSION_ID_KEY, session_id)?;
    store.set(USER_ID_KEY, user_id)
}

/// Remove both keys.
pub fn clear_pair(store: &dyn LocalStore) -> Result<()> {
    // Attempt both even if the first fails.
    let first = store.remove(SESSION_ID_KEY);
    let second = store.remove(USER_ID_KEY);
    first.and(second)
}
