//! Redis-backed [`UserCache`].

use async_trait::async_trait;
use bb8_redis::redis::AsyncCommands;
use tracing::debug;

use crate::domain::ports::{UserCache, UserCacheError};
use crate::domain::{User, UserId};

use super::pool::RedisPool;
use super::snapshot::{cache_key, decode, encode};

/// Stores user snapshots as JSON strings keyed by decimal id. Entries never
/// expire; `put` overwrites.
#[derive(Clone)]
pub struct RedisUserCache {
    pool: RedisPool,
}

impl RedisUserCache {
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }
}

fn backend_error(err: impl std::fmt::Display) -> UserCacheError {
    UserCacheError::backend(err.to_string())
}

#[async_trait]
impl UserCache for RedisUserCache {
    async fn get(&self, id: UserId) -> Result<Option<User>, UserCacheError> {
        let mut conn = self.pool.get().await.map_err(backend_error)?;
        let payload: Option<String> = conn.get(cache_key(id)).await.map_err(backend_error)?;
        debug!(user_id = %id, hit = payload.is_some(), "redis lookup");
        payload.as_deref().map(decode).transpose()
    }

    async fn put(&self, user: &User) -> Result<(), UserCacheError> {
        let payload = encode(user)?;
        let mut conn = self.pool.get().await.map_err(backend_error)?;
        conn.set::<_, _, ()>(cache_key(user.id()), payload)
            .await
            .map_err(backend_error)
    }
}
