//! PruneSessionsHandler - periodic removal of inactive sessions.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::foundation::Timestamp;
use crate::ports::{SessionStore, SessionStoreError};

pub struct PruneSessionsHandler {
    sessions: Arc<dyn SessionStore>,
}

impl PruneSessionsHandler {
    pub fn new(sessions: Arc<dyn SessionStore>) -> Self {
        Self { sessions }
    }

    /// One sweep. Returns how many sessions were removed.
    pub async fn handle(&self, now: Timestamp) -> Result<usize, SessionStoreError> {
        let removed = self.sessions.prune(now).await?;
        if removed > 0 {
            info!(removed, "pruned inactive sessions");
        } else {
            debug!("no inactive sessions to prune");
        }
        Ok(removed)
    }

    /// Sweeps every `period` until the task is aborted.
    pub fn spawn(self, period: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(error) = self.handle(Timestamp::now()).await {
                    warn!(error = %error, "session prune failed");
                }
            }
        })
    }
}
