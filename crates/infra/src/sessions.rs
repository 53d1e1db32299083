//! Session key-value store adapter (redis).
//!
//! Sessions themselves belong to the HTTP layer; the pipeline core only
//! shares the bootstrap pattern with this store and reads one advisory
//! number from it for the status view.

use redis::aio::MultiplexedConnection;

use crate::bootstrap::connect_with_retry;

/// Process-lifetime client for the session store.
#[derive(Clone)]
pub struct SessionStore {
    conn: MultiplexedConnection,
}

/// Bootstrap the session store connection, retrying forever on failure.
pub async fn connect_store(url: &str) -> SessionStore {
    connect_with_retry("redis", || try_connect(url)).await
}

async fn try_connect(url: &str) -> Result<SessionStore, redis::RedisError> {
    let client = redis::Client::open(url)?;
    let conn = client.get_multiplexed_async_connection().await?;
    Ok(SessionStore { conn })
}

impl SessionStore {
    /// Count of active sessions, for display only.
    ///
    /// KEYS is a full scan; tolerable at this store's size, and the number
    /// is advisory anyway.
    pub async fn active_sessions(&self) -> Result<usize, redis::RedisError> {
        let mut conn = self.conn.clone();
        let keys: Vec<String> = redis::cmd("KEYS")
            .arg("sess:*")
            .query_async(&mut conn)
            .await?;
        Ok(keys.len())
    }
}
