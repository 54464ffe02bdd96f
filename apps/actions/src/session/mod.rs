//! Per-conversation resume store.
//!
//! Sits in front of event-history replay: a turn whose slots came back empty
//! first asks the store, and only replays tracker events when the store has
//! nothing either. Store failures never fail a turn.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::models::conversation::ConversationState;

pub mod redis_store;

pub use redis_store::RedisSessionStore;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, sender_id: &str) -> Result<Option<ConversationState>, SessionError>;

    async fn save(&self, sender_id: &str, state: &ConversationState) -> Result<(), SessionError>;

    /// Forgets the conversation. Returns whether anything was stored.
    async fn clear(&self, sender_id: &str) -> Result<bool, SessionError>;

    /// Short label for startup logging.
    fn backend(&self) -> &'static str;
}

/// Process-local store. Entries expire `ttl` after their last write.
pub struct MemorySessionStore {
    ttl: Duration,
    entries: RwLock<HashMap<String, (Instant, ConversationState)>>,
}

impl MemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, sender_id: &str) -> Result<Option<ConversationState>, SessionError> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(sender_id)
            .filter(|(written, _)| written.elapsed() < self.ttl)
            .map(|(_, state)| state.clone()))
    }

    async fn save(&self, sender_id: &str, state: &ConversationState) -> Result<(), SessionError> {
        let mut entries = self.entries.write().await;
        entries.retain(|_, (written, _)| written.elapsed() < self.ttl);
        entries.insert(sender_id.to_string(), (Instant::now(), state.clone()));
        Ok(())
    }

    async fn clear(&self, sender_id: &str) -> Result<bool, SessionError> {
        let mut entries = self.entries.write().await;
        Ok(entries
            .remove(sender_id)
            .is_some_and(|(written, _)| written.elapsed() < self.ttl))
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_roundtrip_per_sender() {
        let store = MemorySessionStore::new(Duration::from_secs(60));
        store
            .save("alice", &ConversationState::uploaded("Skills: Rust"))
            .await
            .unwrap();

        assert_eq!(
            store.load("alice").await.unwrap(),
            Some(ConversationState::uploaded("Skills: Rust"))
        );
        assert_eq!(store.load("bob").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_later_write_replaces_earlier() {
        let store = MemorySessionStore::new(Duration::from_secs(60));
        store.save("alice", &ConversationState::uploaded("A")).await.unwrap();
        store.save("alice", &ConversationState::uploaded("B")).await.unwrap();
        assert_eq!(
            store.load("alice").await.unwrap(),
            Some(ConversationState::uploaded("B"))
        );
    }

    #[tokio::test]
    async fn test_clear_forgets_only_that_sender() {
        let store = MemorySessionStore::new(Duration::from_secs(60));
        store.save("alice", &ConversationState::uploaded("A")).await.unwrap();
        store.save("bob", &ConversationState::uploaded("B")).await.unwrap();

        assert!(store.clear("alice").await.unwrap());
        assert!(!store.clear("alice").await.unwrap());
        assert_eq!(store.load("alice").await.unwrap(), None);
        assert_eq!(
            store.load("bob").await.unwrap(),
            Some(ConversationState::uploaded("B"))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_entries_expire_after_ttl() {
        let store = MemorySessionStore::new(Duration::from_secs(10));
        store.save("alice", &ConversationState::uploaded("A")).await.unwrap();

        tokio::time::advance(Duration::from_secs(11)).await;
        assert_eq!(store.load("alice").await.unwrap(), None);
    }
}
