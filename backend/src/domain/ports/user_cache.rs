//! Port for the advisory user cache.
//!
//! Entries are full user snapshots keyed by id. The cache is never
//! authoritative: an entry may be stale, and "unreachable" may surface as a
//! miss. There is no delete or expiry; `put` always overwrites.

use async_trait::async_trait;

use crate::domain::{User, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user cache adapters.
    pub enum UserCacheError {
        /// The cache backend failed or timed out.
        Backend { message: String } =>
            "user cache backend failed: {message}",
        /// A cached payload could not be encoded or decoded.
        Serialization { message: String } =>
            "user cache payload invalid: {message}",
    }
}

/// Key-value cache of user snapshots.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserCache: Send + Sync {
    /// Look up a snapshot. `Ok(None)` is a miss.
    async fn get(&self, id: UserId) -> Result<Option<User>, UserCacheError>;

    /// Store `user` under its id, overwriting any previous entry.
    async fn put(&self, user: &User) -> Result<(), UserCacheError>;
}
