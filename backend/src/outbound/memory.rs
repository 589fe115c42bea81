//! In-process store and cache adapters.
//!
//! Used when no database or Redis URL is configured and by the integration
//! tests. State lives behind a `std::sync::Mutex`; no lock is held across an
//! await point.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{UserCache, UserCacheError, UserStore, UserStoreError};
use crate::domain::{NewUser, ProfileField, User, UserId, Username};

use super::cache::snapshot::{cache_key, decode, encode};

#[derive(Debug, Default)]
struct StoreState {
    last_id: i64,
    by_id: HashMap<i64, User>,
    by_username: HashMap<String, i64>,
}

/// Persistent-store stand-in. Ids start at 1 and increase by one.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    state: Mutex<StoreState>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, UserStoreError> {
        self.state
            .lock()
            .map_err(|_| UserStoreError::connection("memory store lock poisoned"))
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, user: &NewUser) -> Result<UserId, UserStoreError> {
        let mut state = self.lock()?;
        let username = user.username().as_ref();
        // Check and insert under one lock so concurrent creates cannot both win.
        if state.by_username.contains_key(username) {
            return Err(UserStoreError::duplicate_username(username));
        }
        let id = UserId::new(state.last_id + 1)
            .map_err(|err| UserStoreError::query(err.to_string()))?;
        state.last_id = id.get();
        state.by_username.insert(username.to_owned(), id.get());
        state.by_id.insert(id.get(), user.clone().into_user(id));
        Ok(id)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserStoreError> {
        Ok(self.lock()?.by_id.get(&id.get()).cloned())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserStoreError> {
        let state = self.lock()?;
        Ok(state
            .by_username
            .get(username.as_ref())
            .and_then(|id| state.by_id.get(id))
            .cloned())
    }

    async fn update_field(&self, id: UserId, field: &ProfileField) -> Result<(), UserStoreError> {
        let mut state = self.lock()?;
        let user = state
            .by_id
            .get_mut(&id.get())
            .ok_or_else(|| UserStoreError::missing_user(id.get()))?;
        user.apply(field);
        Ok(())
    }
}

/// Cache stand-in holding the same JSON snapshots as the Redis adapter.
///
/// [`MemoryUserCache::set_available`] simulates an outage: while unavailable
/// every call fails with a backend error.
#[derive(Debug)]
pub struct MemoryUserCache {
    entries: Mutex<HashMap<String, String>>,
    available: AtomicBool,
}

impl Default for MemoryUserCache {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }
}

impl MemoryUserCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle the simulated outage.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entries(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, UserCacheError> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(UserCacheError::backend("memory cache unavailable"));
        }
        self.entries
            .lock()
            .map_err(|_| UserCacheError::backend("memory cache lock poisoned"))
    }
}

#[async_trait]
impl UserCache for MemoryUserCache {
    async fn get(&self, id: UserId) -> Result<Option<User>, UserCacheError> {
        let payload = self.entries()?.get(&cache_key(id)).cloned();
        payload.as_deref().map(decode).transpose()
    }

    async fn put(&self, user: &User) -> Result<(), UserCacheError> {
        let payload = encode(user)?;
        self.entries()?.insert(cache_key(user.id()), payload);
        Ok(())
    }
}
