//! Driving port for reading and editing a user's own profile.

use async_trait::async_trait;

use crate::domain::{Error, OperationContext, ProfileField, UserId, UserProfile};

/// Profile use-cases. Ownership is checked by the caller before these run.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileService: Send + Sync {
    /// Load the public profile for `id`.
    async fn profile(&self, ctx: &OperationContext, id: UserId) -> Result<UserProfile, Error>;

    /// Overwrite one field and return the resulting profile.
    async fn update_profile(
        &self,
        ctx: &OperationContext,
        id: UserId,
        field: ProfileField,
    ) -> Result<UserProfile, Error>;
}
