//! Short-lived key/value storage for refresh tokens, the access-token
//! blacklist and email verification codes.

mod memory;
mod redis;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use crate::config::TokenStoreConfig;
use crate::errors::{ModoosError, Result};

pub use self::memory::MemoryTokenStore;
pub use self::redis::RedisTokenStore;

/// 按键前缀区分用途
pub mod keys {
    pub fn refresh_token(email: &str) -> String {
        format!("RT:{}", email)
    }

    pub fn blacklist(jti: &str) -> String {
        format!("BL:{}", jti)
    }

    pub fn email_verification(email: &str) -> String {
        format!("EV:{}", email)
    }
}

#[async_trait]
pub trait TokenStore: Send + Sync {
    /// 写入并设置 TTL，覆盖已有值
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn delete(&self, key: &str) -> Result<()>;
    fn backend_name(&self) -> &'static str;

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }
}

pub async fn create_token_store(config: &TokenStoreConfig) -> Result<Arc<dyn TokenStore>> {
    let store: Arc<dyn TokenStore> = match config.store_type.as_str() {
        "memory" => Arc::new(MemoryTokenStore::new(config.max_capacity)),
        "redis" => Arc::new(RedisTokenStore::connect(&config.redis_url, &config.key_prefix).await?),
        other => {
            return Err(ModoosError::validation(format!(
                "Unknown token_store.type '{}', expected memory or redis",
                other
            )));
        }
    };

    info!("Token store initialized: {}", store.backend_name());
    Ok(store)
}
