//! Session management
//!
//! The only piece of session state is the signed-in user's identifier.
//! It lives in a [`SessionStore`] which is handed to every screen explicitly;
//! screens never cache it, they read it on each visit.
//!
//! - [`store`]: SQLite-backed store that survives restarts
//! - [`MemorySessionStore`]: in-memory store for tests and as a fallback

pub mod store;

use serde::Deserialize;
use std::fmt;
use std::sync::Mutex;
use thiserror::Error;
use tracing::warn;

pub use store::SqliteSessionStore;

/// Opaque numeric user handle returned by register/login
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl UserId {
    /// Parse the string encoding used by the store
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse::<i64>().ok().map(UserId)
    }
}

/// Errors raised by a session backend
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("session storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("session store lock poisoned")]
    Poisoned,
}

/// Key/value slot holding the signed-in user identifier.
///
/// The slot is only ever read, overwritten in full, or cleared.
pub trait SessionStore: Send + Sync {
    /// Current identifier, if any
    fn get(&self) -> Result<Option<UserId>, SessionError>;

    /// Overwrite the identifier
    fn set(&self, user_id: UserId) -> Result<(), SessionError>;

    /// Forget the identifier (logout)
    fn clear(&self) -> Result<(), SessionError>;
}

/// The single "require session" guard used by every authenticated screen.
///
/// A read failure counts as signed out.
pub fn require_session(store: &dyn SessionStore) -> Option<UserId> {
    match store.get() {
        Ok(user_id) => user_id,
        Err(e) => {
            warn!("⚠️  Could not read session, treating as signed out: {}", e);
            None
        }
    }
}

/// In-memory session store
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<UserId>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with an identifier
    #[cfg(test)]
    pub fn signed_in(user_id: UserId) -> Self {
        MemorySessionStore {
            slot: Mutex::new(Some(user_id)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Result<Option<UserId>, SessionError> {
        let slot = self.slot.lock().map_err(|_| SessionError::Poisoned)?;
        Ok(*slot)
    }

    fn set(&self, user_id: UserId) -> Result<(), SessionError> {
        let mut slot = self.slot.lock().map_err(|_| SessionError::Poisoned)?;
        *slot = Some(user_id);
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        let mut slot = self.slot.lock().map_err(|_| SessionError::Poisoned)?;
        *slot = None;
        Ok(())
    }
}
