//! Session Store Port - per-identity conversation sessions.
//!
//! Every mutation of a session happens while holding that identity's
//! [`TurnGuard`]. Guards are FIFO per identity, so turns for one conversation
//! apply in arrival order while distinct identities never contend.

use async_trait::async_trait;
use tokio::sync::OwnedMutexGuard;

use crate::domain::foundation::{ConversationKey, Timestamp};
use crate::domain::intake::ConversationSession;

/// Errors from session store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionStoreError {
    #[error("turn guard for {held} cannot be used for {requested}")]
    GuardMismatch {
        held: ConversationKey,
        requested: ConversationKey,
    },

    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

/// Serialization token for one conversation identity.
///
/// Dropping the guard lets the next queued turn for the same identity run.
pub struct TurnGuard {
    key: ConversationKey,
    _permit: OwnedMutexGuard<()>,
}

impl TurnGuard {
    pub fn new(key: ConversationKey, permit: OwnedMutexGuard<()>) -> Self {
        Self {
            key,
            _permit: permit,
        }
    }

    pub fn key(&self) -> &ConversationKey {
        &self.key
    }

    /// Fails unless this guard serializes `key`.
    pub fn check(&self, key: &ConversationKey) -> Result<(), SessionStoreError> {
        if &self.key == key {
            Ok(())
        } else {
            Err(SessionStoreError::GuardMismatch {
                held: self.key.clone(),
                requested: key.clone(),
            })
        }
    }
}

impl std::fmt::Debug for TurnGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnGuard").field("key", &self.key).finish()
    }
}

/// How a session was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOrigin {
    Existing,
    /// First event for this identity.
    Created,
    /// The previous session had expired and was replaced.
    Expired,
}

/// Session returned by [`SessionStore::get_or_create`].
#[derive(Debug, Clone)]
pub struct SessionLookup {
    pub session: ConversationSession,
    pub origin: SessionOrigin,
}

/// Port for session lifecycle and per-identity serialization.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Waits for this identity's turn.
    async fn lock(&self, key: &ConversationKey) -> TurnGuard;

    /// Live session for `key`, or a fresh idle one if none exists or the
    /// stored one expired before `now`.
    async fn get_or_create(
        &self,
        guard: &TurnGuard,
        now: Timestamp,
    ) -> Result<SessionLookup, SessionStoreError>;

    /// Stored session without expiry handling.
    async fn get(
        &self,
        key: &ConversationKey,
    ) -> Result<Option<ConversationSession>, SessionStoreError>;

    /// Replaces the stored session atomically.
    async fn put(
        &self,
        guard: &TurnGuard,
        session: ConversationSession,
    ) -> Result<(), SessionStoreError>;

    /// Destroys the session. Returns whether one existed.
    async fn remove(&self, guard: &TurnGuard) -> Result<bool, SessionStoreError>;

    /// Drops every session inactive past the timeout whose identity is not
    /// mid-turn. Returns the number removed.
    async fn prune(&self, now: Timestamp) -> Result<usize, SessionStoreError>;
}
