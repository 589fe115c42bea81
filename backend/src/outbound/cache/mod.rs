//! User cache adapters.
//!
//! - [`RedisUserCache`]: JSON snapshots in Redis through a `bb8` pool.
//! - [`DisabledUserCache`]: always misses; used when no Redis URL is set.
//!
//! Both honour the advisory contract of [`crate::domain::ports::UserCache`].

mod pool;
mod redis_user_cache;
pub(crate) mod snapshot;

use async_trait::async_trait;

use crate::domain::ports::{UserCache, UserCacheError};
use crate::domain::{User, UserId};

pub use pool::{CachePoolConfig, CachePoolError, RedisPool};
pub use redis_user_cache::RedisUserCache;

/// Cache that stores nothing. Every `get` misses and every `put` succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledUserCache;

#[async_trait]
impl UserCache for DisabledUserCache {
    async fn get(&self, _id: UserId) -> Result<Option<User>, UserCacheError> {
        Ok(None)
    }

    async fn put(&self, _user: &User) -> Result<(), UserCacheError> {
        Ok(())
    }
}
