//! In-memory session store using moka
//!
//! Every quote session lives here until it is dropped by the user or sits
//! idle longer than the configured limit. Nothing is persisted.

use moka::future::Cache;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::pricing::{QuoteSession, QuoteSettings};

pub type SharedSession = Arc<Mutex<QuoteSession>>;

/// Application cache holding live quote sessions
#[derive(Clone)]
pub struct AppCache {
    /// Quote sessions (session id -> session)
    pub sessions: Cache<Uuid, SharedSession>,
}

impl AppCache {
    /// Create a new cache with the given capacity and idle expiry
    pub fn new(max_sessions: u64, idle: Duration) -> Self {
        Self {
            sessions: Cache::builder()
                .max_capacity(max_sessions)
                .time_to_idle(idle)
                .build(),
        }
    }

    /// Start a fresh session and return its id
    pub async fn create_session(&self, settings: QuoteSettings) -> Uuid {
        let session = QuoteSession::new(settings);
        let id = session.id;
        self.sessions.insert(id, Arc::new(Mutex::new(session))).await;
        info!("Quote session started: {}", id);
        id
    }

    pub async fn session(&self, id: &Uuid) -> Option<SharedSession> {
        self.sessions.get(id).await
    }

    /// Drop a session; returns whether it existed
    pub async fn end_session(&self, id: &Uuid) -> bool {
        let existed = self.sessions.remove(id).await.is_some();
        if existed {
            info!("Quote session ended: {}", id);
        }
        existed
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            sessions: self.sessions.entry_count(),
        }
    }
}

impl Default for AppCache {
    fn default() -> Self {
        // 1000 sessions, 2 hour idle expiry
        Self::new(1000, Duration::from_secs(2 * 60 * 60))
    }
}

/// Cache statistics for the health endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub sessions: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::{QuoteCommand, ServiceInput};

    #[tokio::test]
    async fn test_create_and_fetch_session() {
        let cache = AppCache::default();
        let id = cache.create_session(QuoteSettings::default()).await;

        let session = cache.session(&id).await.expect("session should exist");
        let mut session = session.lock().await;
        session
            .apply(QuoteCommand::AddService(ServiceInput::Transport))
            .unwrap();
        assert_eq!(session.cart().len(), 1);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let cache = AppCache::default();
        let a = cache.create_session(QuoteSettings::default()).await;
        let b = cache.create_session(QuoteSettings::default()).await;
        assert_ne!(a, b);

        {
            let session = cache.session(&a).await.unwrap();
            session
                .lock()
                .await
                .apply(QuoteCommand::AddService(ServiceInput::Transport))
                .unwrap();
        }

        let other = cache.session(&b).await.unwrap();
        assert!(other.lock().await.cart().is_empty());
    }

    #[tokio::test]
    async fn test_end_session() {
        let cache = AppCache::default();
        let id = cache.create_session(QuoteSettings::default()).await;

        assert!(cache.end_session(&id).await);
        assert!(cache.session(&id).await.is_none());
        assert!(!cache.end_session(&id).await);
    }
}
