//! Redis connection pool.
//!
//! `bb8` bounds live connections with `max_size` and reaps connections idle
//! longer than `idle_timeout`. It has no separate idle ceiling; `min_idle`
//! is the number of connections kept warm.

use std::time::Duration;

use bb8_redis::RedisConnectionManager;
use bb8_redis::bb8::{Pool, PooledConnection};

/// Errors raised while building or using the Redis pool.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CachePoolError {
    #[error("invalid redis configuration: {message}")]
    Config { message: String },
    #[error("failed to get redis connection: {message}")]
    Checkout { message: String },
}

/// Settings for [`RedisPool`].
#[derive(Debug, Clone)]
pub struct CachePoolConfig {
    url: String,
    max_active: u32,
    min_idle: Option<u32>,
    idle_timeout: Duration,
    connection_timeout: Duration,
}

impl CachePoolConfig {
    /// Defaults: 12000 active connections, none kept warm, 240 second idle
    /// timeout, 1 second checkout timeout.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_active: 12_000,
            min_idle: None,
            idle_timeout: Duration::from_secs(240),
            connection_timeout: Duration::from_secs(1),
        }
    }

    #[must_use]
    pub fn with_max_active(mut self, max_active: u32) -> Self {
        self.max_active = max_active;
        self
    }

    #[must_use]
    pub fn with_min_idle(mut self, min_idle: Option<u32>) -> Self {
        self.min_idle = min_idle;
        self
    }

    #[must_use]
    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    #[must_use]
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }
}

/// Shared pool of multiplexed Redis connections.
#[derive(Clone)]
pub struct RedisPool {
    inner: Pool<RedisConnectionManager>,
}

impl RedisPool {
    /// Build the pool. Connections open on demand, so an unreachable server
    /// only shows up at checkout time.
    pub fn new(config: &CachePoolConfig) -> Result<Self, CachePoolError> {
        let manager = RedisConnectionManager::new(config.url.as_str()).map_err(|err| {
            CachePoolError::Config {
                message: err.to_string(),
            }
        })?;
        let inner = Pool::builder()
            .max_size(config.max_active)
            .min_idle(config.min_idle)
            .idle_timeout(Some(config.idle_timeout))
            .connection_timeout(config.connection_timeout)
            .build_unchecked(manager);
        Ok(Self { inner })
    }

    /// Check out a connection.
    pub async fn get(&self) -> Result<PooledConnection<'_, RedisConnectionManager>, CachePoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| CachePoolError::Checkout {
                message: err.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_follow_settings_table() {
        let config = CachePoolConfig::new("redis://localhost");
        assert_eq!(config.max_active, 12_000);
        assert_eq!(config.min_idle, None);
        assert_eq!(config.idle_timeout, Duration::from_secs(240));
        assert_eq!(config.connection_timeout, Duration::from_secs(1));
    }

    #[rstest]
    fn rejects_unparseable_url() {
        let result = RedisPool::new(&CachePoolConfig::new("not a url"));
        assert!(matches!(result, Err(CachePoolError::Config { .. })));
    }

    #[rstest]
    #[tokio::test]
    async fn builds_without_contacting_server() {
        let config = CachePoolConfig::new("redis://127.0.0.1:1")
            .with_max_active(4)
            .with_min_idle(None);
        assert!(RedisPool::new(&config).is_ok());
    }
}
