use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use tracing::info;

use crate::models::conversation::ConversationState;
use crate::session::{SessionError, SessionStore};

const KEY_PREFIX: &str = "resume-session";

/// Redis-backed store: one JSON value per conversation, written with `SET .. EX ttl`.
pub struct RedisSessionStore {
    conn: MultiplexedConnection,
    ttl_secs: u64,
}

impl RedisSessionStore {
    pub async fn connect(redis_url: &str, ttl_secs: u64) -> Result<Self, SessionError> {
        let client = redis::Client::open(redis_url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        info!("Redis session store connected");
        Ok(Self { conn, ttl_secs })
    }
}

fn session_key(sender_id: &str) -> String {
    format!("{KEY_PREFIX}:{sender_id}")
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn load(&self, sender_id: &str) -> Result<Option<ConversationState>, SessionError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = redis::cmd("GET")
            .arg(session_key(sender_id))
            .query_async(&mut conn)
            .await?;
        raw.map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(SessionError::from)
    }

    async fn save(&self, sender_id: &str, state: &ConversationState) -> Result<(), SessionError> {
        let json = serde_json::to_string(state)?;
        let mut conn = self.conn.clone();
        redis::cmd("SET")
            .arg(session_key(sender_id))
            .arg(json)
            .arg("EX")
            .arg(self.ttl_secs)
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }

    async fn clear(&self, sender_id: &str) -> Result<bool, SessionError> {
        let mut conn = self.conn.clone();
        let removed: u64 = redis::cmd("DEL")
            .arg(session_key(sender_id))
            .query_async(&mut conn)
            .await?;
        Ok(removed > 0)
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
