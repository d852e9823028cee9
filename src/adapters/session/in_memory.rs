//! In-Memory Session Store Adapter
//!
//! Sessions live in process memory and are lost on restart. Each identity
//! owns a FIFO `tokio` mutex that serializes its turns.

use async_trait::async_trait;
use chrono::Duration;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{Mutex as TurnLock, RwLock};

use crate::domain::foundation::{ConversationKey, Timestamp};
use crate::domain::intake::ConversationSession;
use crate::ports::{
    SessionLookup, SessionOrigin, SessionStore, SessionStoreError, TurnGuard,
};

/// In-memory session store with inactivity expiry.
#[derive(Debug, Clone)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<ConversationKey, ConversationSession>>>,
    turns: Arc<Mutex<HashMap<ConversationKey, Arc<TurnLock<()>>>>>,
    timeout: Duration,
}

impl InMemorySessionStore {
    pub fn new(timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            turns: Arc::new(Mutex::new(HashMap::new())),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Number of stored sessions, expired ones included.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    fn turn_table(&self) -> MutexGuard<'_, HashMap<ConversationKey, Arc<TurnLock<()>>>> {
        // The table holds no invariant a panicking writer could break.
        self.turns.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn lock(&self, key: &ConversationKey) -> TurnGuard {
        let lock = self
            .turn_table()
            .entry(key.clone())
            .or_insert_with(|| Arc::new(TurnLock::new(())))
            .clone();
        TurnGuard::new(key.clone(), lock.lock_owned().await)
    }

    async fn get_or_create(
        &self,
        guard: &TurnGuard,
        now: Timestamp,
    ) -> Result<SessionLookup, SessionStoreError> {
        let key = guard.key();
        let mut sessions = self.sessions.write().await;
        let lookup = match sessions.get(key) {
            Some(session) if !session.is_expired(now, self.timeout) => SessionLookup {
                session: session.clone(),
                origin: SessionOrigin::Existing,
            },
            Some(_) => {
                let fresh = ConversationSession::new(key.clone(), now);
                sessions.insert(key.clone(), fresh.clone());
                SessionLookup {
                    session: fresh,
                    origin: SessionOrigin::Expired,
                }
            }
            None => {
                let fresh = ConversationSession::new(key.clone(), now);
                sessions.insert(key.clone(), fresh.clone());
                SessionLookup {
                    session: fresh,
                    origin: SessionOrigin::Created,
                }
            }
        };
        Ok(lookup)
    }

    async fn get(
        &self,
        key: &ConversationKey,
    ) -> Result<Option<ConversationSession>, SessionStoreError> {
        Ok(self.sessions.read().await.get(key).cloned())
    }

    async fn put(
        &self,
        guard: &TurnGuard,
        session: ConversationSession,
    ) -> Result<(), SessionStoreError> {
        guard.check(session.id())?;
        self.sessions
            .write()
            .await
            .insert(session.id().clone(), session);
        Ok(())
    }

    async fn remove(&self, guard: &TurnGuard) -> Result<bool, SessionStoreError> {
        Ok(self.sessions.write().await.remove(guard.key()).is_some())
    }

    async fn prune(&self, now: Timestamp) -> Result<usize, SessionStoreError> {
        let mut sessions = self.sessions.write().await;
        let mut turns = self.turn_table();

        let expired: Vec<ConversationKey> = sessions
            .iter()
            .filter(|(_, session)| session.is_expired(now, self.timeout))
            .map(|(key, _)| key.clone())
            .collect();

        let mut removed = 0;
        for key in expired {
            // Any handle besides the table's means a turn holds or awaits the
            // lock; such identities are left for the next sweep.
            let idle = turns.get(&key).map_or(true, |lock| {
                Arc::strong_count(lock) == 1 && lock.try_lock().is_ok()
            });
            if idle {
                sessions.remove(&key);
                turns.remove(&key);
                removed += 1;
            }
        }

        // Locks for identities that never got a session.
        turns.retain(|key, lock| sessions.contains_key(key) || Arc::strong_count(lock) > 1);
        Ok(removed)
    }
}
