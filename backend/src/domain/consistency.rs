//! Consistency orchestration between the persistent store and the cache.
//!
//! The persistent store is authoritative and always written first. The cache
//! is advisory: every cache failure is logged at `warn` and swallowed, on
//! create, on update and on read-through repopulation alike. No per-entity
//! locking happens here; concurrent writers race on the persistent store and
//! readers may briefly observe stale cache entries.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::ports::{UserCache, UserStore, UserStoreError};
use crate::domain::{Interrupted, NewUser, OperationContext, ProfileField, User, UserId, Username};

/// How `read_by_id` treats the cache after a persistent fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadPolicy {
    /// Repopulate the cache with the fetched snapshot.
    #[default]
    ReadThrough,
    /// Leave the cache untouched after a fallback.
    CacheAside,
}

/// Error returned when a [`ReadPolicy`] name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown read policy `{0}`; expected `read-through` or `cache-aside`")]
pub struct ReadPolicyParseError(String);

impl FromStr for ReadPolicy {
    type Err = ReadPolicyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "read-through" | "read_through" => Ok(Self::ReadThrough),
            "cache-aside" | "cache_aside" => Ok(Self::CacheAside),
            other => Err(ReadPolicyParseError(other.to_owned())),
        }
    }
}

impl fmt::Display for ReadPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadThrough => f.write_str("read-through"),
            Self::CacheAside => f.write_str("cache-aside"),
        }
    }
}

/// Failures surfaced by the orchestrator. Cache failures never appear here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConsistencyError {
    #[error("no user with {lookup}")]
    NotFound { lookup: String },
    #[error("username already taken: {username}")]
    DuplicateUsername { username: String },
    #[error(transparent)]
    Persistence(UserStoreError),
    #[error(transparent)]
    Interrupted(#[from] Interrupted),
}

impl From<UserStoreError> for ConsistencyError {
    fn from(error: UserStoreError) -> Self {
        match error {
            UserStoreError::DuplicateUsername { username } => Self::DuplicateUsername { username },
            UserStoreError::MissingUser { id } => Self::NotFound {
                lookup: format!("id {id}"),
            },
            other => Self::Persistence(other),
        }
    }
}

/// Coordinates reads and writes across a [`UserStore`] and a [`UserCache`].
pub struct UserOrchestrator<S: ?Sized, C: ?Sized> {
    store: Arc<S>,
    cache: Arc<C>,
    policy: ReadPolicy,
}

impl<S: ?Sized, C: ?Sized> Clone for UserOrchestrator<S, C> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            cache: Arc::clone(&self.cache),
            policy: self.policy,
        }
    }
}

impl<S: ?Sized, C: ?Sized> UserOrchestrator<S, C> {
    /// Create an orchestrator using [`ReadPolicy::ReadThrough`].
    pub fn new(store: Arc<S>, cache: Arc<C>) -> Self {
        Self {
            store,
            cache,
            policy: ReadPolicy::default(),
        }
    }

    /// Override the read policy.
    #[must_use]
    pub fn with_read_policy(mut self, policy: ReadPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn read_policy(&self) -> ReadPolicy {
        self.policy
    }
}

impl<S, C> UserOrchestrator<S, C>
where
    S: UserStore + ?Sized,
    C: UserCache + ?Sized,
{
    /// Persist `user`, assign its id, then try to cache it.
    ///
    /// Succeeds once the persistent write succeeds, whatever the cache does.
    pub async fn create(
        &self,
        ctx: &OperationContext,
        user: NewUser,
    ) -> Result<User, ConsistencyError> {
        let id = ctx.run(self.store.create(&user)).await??;
        let user = user.into_user(id);
        self.put_best_effort(ctx, &user, "create").await;
        Ok(user)
    }

    /// Cache first, then the persistent store.
    pub async fn read_by_id(
        &self,
        ctx: &OperationContext,
        id: UserId,
    ) -> Result<User, ConsistencyError> {
        if let Some(user) = self.cached(ctx, id).await {
            return Ok(user);
        }

        let user = self.fetch_persistent(ctx, id).await?;
        if self.policy == ReadPolicy::ReadThrough {
            self.put_best_effort(ctx, &user, "read_through").await;
        }
        Ok(user)
    }

    /// Persistent store only; there is no cache entry keyed by username.
    pub async fn read_by_username(
        &self,
        ctx: &OperationContext,
        username: &Username,
    ) -> Result<User, ConsistencyError> {
        ctx.run(self.store.find_by_username(username))
            .await??
            .ok_or_else(|| ConsistencyError::NotFound {
                lookup: format!("username {username}"),
            })
    }

    /// Persist the field change, then read-modify-write the cache.
    ///
    /// The cache copy is preferred as the base snapshot; on a miss the
    /// just-updated persistent row is used instead. Returns the snapshot that
    /// was offered to the cache.
    pub async fn update_field(
        &self,
        ctx: &OperationContext,
        id: UserId,
        field: ProfileField,
    ) -> Result<User, ConsistencyError> {
        ctx.run(self.store.update_field(id, &field)).await??;

        let mut snapshot = match self.cached(ctx, id).await {
            Some(user) => user,
            None => self.fetch_persistent(ctx, id).await?,
        };
        snapshot.apply(&field);
        debug!(user_id = %id, field = field.name(), "profile field updated");
        self.put_best_effort(ctx, &snapshot, "update").await;
        Ok(snapshot)
    }

    async fn fetch_persistent(
        &self,
        ctx: &OperationContext,
        id: UserId,
    ) -> Result<User, ConsistencyError> {
        ctx.run(self.store.find_by_id(id))
            .await??
            .ok_or_else(|| ConsistencyError::NotFound {
                lookup: format!("id {id}"),
            })
    }

    async fn cached(&self, ctx: &OperationContext, id: UserId) -> Option<User> {
        match ctx.run(self.cache.get(id)).await {
            Ok(Ok(Some(user))) if user.id() == id => {
                debug!(user_id = %id, "user cache hit");
                Some(user)
            }
            Ok(Ok(Some(user))) => {
                warn!(user_id = %id, cached_id = %user.id(), "user cache returned mismatched entry");
                None
            }
            Ok(Ok(None)) => {
                debug!(user_id = %id, "user cache miss");
                None
            }
            Ok(Err(error)) => {
                warn!(user_id = %id, error = %error, "user cache read failed");
                None
            }
            Err(interrupted) => {
                warn!(user_id = %id, error = %interrupted, "user cache read interrupted");
                None
            }
        }
    }

    async fn put_best_effort(&self, ctx: &OperationContext, user: &User, operation: &'static str) {
        match ctx.run(self.cache.put(user)).await {
            Ok(Ok(())) => debug!(user_id = %user.id(), operation, "user cached"),
            Ok(Err(error)) => {
                warn!(user_id = %user.id(), operation, error = %error, "user cache write failed");
            }
            Err(interrupted) => {
                warn!(user_id = %user.id(), operation, error = %interrupted, "user cache write interrupted");
            }
        }
    }
}

#[cfg(test)]
#[path = "consistency_tests.rs"]
mod tests;
