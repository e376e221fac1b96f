use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::SessionUser;

const KEY_PREFIX: &str = "hirestream:session:";

/// Opaque bearer tokens mapped to the user that signed in.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Starts a session and returns its token.
    async fn create(&self, user: &SessionUser) -> Result<String, AppError>;

    /// Resolves a token. Expired and unknown tokens resolve to `None`.
    async fn get(&self, token: &str) -> Result<Option<SessionUser>, AppError>;

    async fn revoke(&self, token: &str) -> Result<(), AppError>;
}

fn new_token() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Sessions stored as JSON under `hirestream:session:<token>` with a Redis TTL.
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: MultiplexedConnection,
    ttl_secs: u64,
}

impl RedisSessionStore {
    pub async fn connect(client: &redis::Client, ttl_secs: u64) -> Result<Self, AppError> {
        let conn = client.get_multiplexed_async_connection().await?;
        Ok(Self { conn, ttl_secs })
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn create(&self, user: &SessionUser) -> Result<String, AppError> {
        let token = new_token();
        let payload = serde_json::to_string(user)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode session: {e}")))?;
        let mut conn = self.conn.clone();
        redis::cmd("SET")
            .arg(format!("{KEY_PREFIX}{token}"))
            .arg(payload)
            .arg("EX")
            .arg(self.ttl_secs)
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(token)
    }

    async fn get(&self, token: &str) -> Result<Option<SessionUser>, AppError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = redis::cmd("GET")
            .arg(format!("{KEY_PREFIX}{token}"))
            .query_async(&mut conn)
            .await?;
        Ok(raw.and_then(|raw| match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!("Discarding unreadable session payload: {e}");
                None
            }
        }))
    }

    async fn revoke(&self, token: &str) -> Result<(), AppError> {
        let mut conn = self.conn.clone();
        redis::cmd("DEL")
            .arg(format!("{KEY_PREFIX}{token}"))
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }
}

/// In-process sessions. Expiry is checked on read, and expired entries are
/// swept whenever a session is created.
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, (SessionUser, Instant)>>,
    ttl: Duration,
}

impl MemorySessionStore {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl: Duration::from_secs(ttl_secs),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, user: &SessionUser) -> Result<String, AppError> {
        let token = new_token();
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        // Drop expired sessions.
        sessions.retain(|_, (_, expires_at)| *expires_at > now);
        sessions.insert(token.clone(), (user.clone(), now + self.ttl));
        Ok(token)
    }

    async fn get(&self, token: &str) -> Result<Option<SessionUser>, AppError> {
        let mut sessions = self.sessions.write().await;
        match sessions.get(token) {
            Some((_, expires_at)) if *expires_at <= Instant::now() => {
                sessions.remove(token);
                Ok(None)
            }
            Some((user, _)) => Ok(Some(user.clone())),
            None => Ok(None),
        }
    }

    async fn revoke(&self, token: &str) -> Result<(), AppError> {
        self.sessions.write().await.remove(token);
        Ok(())
    }
}
