//! In-memory store of live checkout sessions.
//!
//! Sessions are keyed by a random [`CheckoutId`] that the visitor's cookie
//! session carries. Each entry sits behind its own async mutex so two
//! requests for the same checkout serialize on it, while different buyers
//! never contend. Entries that go untouched for the idle timeout are evicted.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::CheckoutSession;

/// Upper bound on concurrently tracked checkouts.
const MAX_SESSIONS: u64 = 10_000;

/// Opaque identifier of a checkout session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckoutId(Uuid);

impl CheckoutId {
    /// Generate a new random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for CheckoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A checkout session shared between requests.
pub type SharedCheckout = Arc<Mutex<CheckoutSession>>;

/// Registry of live checkout sessions.
#[derive(Clone)]
pub struct CheckoutRegistry {
    sessions: Cache<CheckoutId, SharedCheckout>,
}

impl CheckoutRegistry {
    /// Create a registry that drops sessions idle for longer than
    /// `idle_timeout`.
    #[must_use]
    pub fn new(idle_timeout: Duration) -> Self {
        let sessions = Cache::builder()
            .max_capacity(MAX_SESSIONS)
            .time_to_idle(idle_timeout)
            .build();
        Self { sessions }
    }

    /// Store `session` under a fresh identifier.
    pub async fn insert(&self, session: CheckoutSession) -> (CheckoutId, SharedCheckout) {
        let id = CheckoutId::generate();
        let shared = Arc::new(Mutex::new(session));
        self.sessions.insert(id, Arc::clone(&shared)).await;
        tracing::debug!(checkout_id = %id, "Checkout session created");
        (id, shared)
    }

    /// Look up a live session.
    pub async fn get(&self, id: &CheckoutId) -> Option<SharedCheckout> {
        self.sessions.get(id).await
    }

    /// Forget a session.
    pub async fn remove(&self, id: &CheckoutId) {
        if self.sessions.remove(id).await.is_some() {
            tracing::debug!(checkout_id = %id, "Checkout session removed");
        }
    }
}

impl fmt::Debug for CheckoutRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckoutRegistry")
            .field("entries", &self.sessions.entry_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use dev_books_core::CheckoutPhase;

    use super::*;

    #[tokio::test]
    async fn test_insert_then_get_shares_state() {
        let registry = CheckoutRegistry::new(Duration::from_secs(60));
        let (id, shared) = registry.insert(CheckoutSession::new()).await;

        let found = registry.get(&id).await;

        assert!(found.is_some_and(|s| Arc::ptr_eq(&s, &shared)));
    }

    #[tokio::test]
    async fn test_unknown_id_is_absent() {
        let registry = CheckoutRegistry::new(Duration::from_secs(60));
        assert!(registry.get(&CheckoutId::generate()).await.is_none());
    }

    #[tokio::test]
    async fn test_remove() {
        let registry = CheckoutRegistry::new(Duration::from_secs(60));
        let (id, _) = registry.insert(CheckoutSession::new()).await;

        registry.remove(&id).await;

        assert!(registry.get(&id).await.is_none());
    }

    #[tokio::test]
    async fn test_idle_session_expires() {
        let registry = CheckoutRegistry::new(Duration::from_millis(50));
        let (id, _) = registry.insert(CheckoutSession::new()).await;
        assert!(registry.get(&id).await.is_some());

        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(registry.get(&id).await.is_none());
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let registry = CheckoutRegistry::new(Duration::from_secs(60));
        let (first, _) = registry.insert(CheckoutSession::new()).await;
        let (second, _) = registry.insert(CheckoutSession::new()).await;
        assert_ne!(first, second);

        let catalog = dev_books_core::Catalog::sample().unwrap_or_else(|e| panic!("{e}"));
        if let Some(shared) = registry.get(&first).await {
            shared.lock().await.activate(Some("1"), &catalog);
        }

        let first_phase = match registry.get(&first).await {
            Some(shared) => Some(shared.lock().await.phase()),
            None => None,
        };
        let second_phase = match registry.get(&second).await {
            Some(shared) => Some(shared.lock().await.phase()),
            None => None,
        };
        assert_eq!(first_phase, Some(CheckoutPhase::Ready));
        assert_eq!(second_phase, Some(CheckoutPhase::Loading));
    }

    #[test]
    fn test_checkout_id_serializes_as_uuid_string() {
        let id = CheckoutId::generate();
        let json = serde_json::to_string(&id).unwrap_or_default();
        assert_eq!(json, format!("\"{id}\""));
        let back: Option<CheckoutId> = serde_json::from_str(&json).ok();
        assert_eq!(back, Some(id));
    }
}
