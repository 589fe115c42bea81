//! Driving port for registration and login.
//!
//! Inbound adapters call this port without knowing which stores back it, so
//! handler tests can substitute a mock.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, OperationContext, Registration, UserId, UserProfile};

/// Account use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Register a new user and return its public profile.
    ///
    /// A taken username yields [`crate::domain::ErrorCode::Conflict`].
    async fn register(
        &self,
        ctx: &OperationContext,
        registration: &Registration,
    ) -> Result<UserProfile, Error>;

    /// Check credentials and return the authenticated user id.
    ///
    /// Unknown usernames and wrong passwords are indistinguishable.
    async fn authenticate(
        &self,
        ctx: &OperationContext,
        credentials: &LoginCredentials,
    ) -> Result<UserId, Error>;
}
