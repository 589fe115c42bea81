//! Port for the persistent user store.
//!
//! The persistent store is the source of truth. It assigns identifiers and
//! enforces username uniqueness; every failure it reports is fatal to the
//! enclosing operation.

use async_trait::async_trait;

use crate::domain::{NewUser, ProfileField, User, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Errors raised by persistent user store adapters.
    pub enum UserStoreError {
        /// The store could not be reached or a connection was not available.
        Connection { message: String } =>
            "user store connection failed: {message}",
        /// A query or mutation failed during execution.
        Query { message: String } =>
            "user store query failed: {message}",
        /// Another user already holds this username.
        DuplicateUsername { username: String } =>
            "username already taken: {username}",
        /// An update addressed an id with no stored user.
        MissingUser { id: i64 } =>
            "user {id} does not exist",
    }
}

/// Durable user storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert `user` and return the assigned id.
    ///
    /// Fails with [`UserStoreError::DuplicateUsername`] when the username is
    /// taken. Concurrent inserts of the same name race on the uniqueness
    /// constraint; exactly one succeeds.
    async fn create(&self, user: &NewUser) -> Result<UserId, UserStoreError>;

    /// Fetch a user by id. `Ok(None)` means no such user.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserStoreError>;

    /// Fetch a user by exact username. `Ok(None)` means no such user.
    async fn find_by_username(&self, username: &Username)
    -> Result<Option<User>, UserStoreError>;

    /// Overwrite exactly one profile field.
    ///
    /// Fails with [`UserStoreError::MissingUser`] when no row matches `id`.
    async fn update_field(&self, id: UserId, field: &ProfileField) -> Result<(), UserStoreError>;
}
