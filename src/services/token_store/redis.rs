use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tracing::debug;

use super::TokenStore;
use crate::errors::{ModoosError, Result};

/// 基于 Redis 的存储，连接断开时由 ConnectionManager 自动重连
pub struct RedisTokenStore {
    conn: ConnectionManager,
    key_prefix: String,
}

impl RedisTokenStore {
    pub async fn connect(url: &str, key_prefix: &str) -> Result<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| ModoosError::token_store(format!("Invalid redis url {}: {}", url, e)))?;
        let mut conn = ConnectionManager::new(client).await?;

        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        debug!("Redis token store connected ({}), PING -> {}", url, pong);

        Ok(Self {
            conn,
            key_prefix: key_prefix.to_string(),
        })
    }

    fn make_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl TokenStore for RedisTokenStore {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let mut conn = self.conn.clone();
        // SET EX 不接受 0
        let secs = ttl.as_secs().max(1);
        let _: () = conn.set_ex(self.make_key(key), value, secs).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(self.make_key(key)).await?;
        Ok(value)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: i64 = conn.del(self.make_key(key)).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
