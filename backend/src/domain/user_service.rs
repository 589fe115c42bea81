//! Account and profile services.
//!
//! Implements the driving ports on top of [`UserOrchestrator`] and a
//! [`SecretHasher`], translating orchestration failures into domain
//! [`Error`]s.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{error, info, warn};

use crate::domain::consistency::{ConsistencyError, UserOrchestrator};
use crate::domain::ports::{
    AccountService, ProfileService, SecretHasher, SecretHasherError, UserCache, UserStore,
    UserStoreError,
};
use crate::domain::{
    Error, Interrupted, LoginCredentials, NewUser, OperationContext, ProfileField, Registration,
    UserId, UserProfile,
};

const INVALID_CREDENTIALS: &str = "invalid username or password";

/// Account and profile use-cases backed by the orchestrator.
pub struct UserAccountService<S: ?Sized, C: ?Sized, H: ?Sized> {
    users: UserOrchestrator<S, C>,
    hasher: Arc<H>,
}

impl<S: ?Sized, C: ?Sized, H: ?Sized> Clone for UserAccountService<S, C, H> {
    fn clone(&self) -> Self {
        Self {
            users: self.users.clone(),
            hasher: Arc::clone(&self.hasher),
        }
    }
}

impl<S: ?Sized, C: ?Sized, H: ?Sized> UserAccountService<S, C, H> {
    /// Create the service.
    pub fn new(users: UserOrchestrator<S, C>, hasher: Arc<H>) -> Self {
        Self { users, hasher }
    }
}

fn map_interrupted(interrupted: Interrupted) -> Error {
    match interrupted {
        Interrupted::Cancelled => Error::service_unavailable("request cancelled"),
        Interrupted::DeadlineExceeded => Error::service_unavailable("request deadline exceeded"),
    }
}

fn map_consistency_error(err: ConsistencyError) -> Error {
    match err {
        ConsistencyError::NotFound { .. } => Error::not_found("user not found"),
        ConsistencyError::DuplicateUsername { .. } => duplicate_username(),
        ConsistencyError::Interrupted(interrupted) => map_interrupted(interrupted),
        ConsistencyError::Persistence(store_error) => map_store_error(store_error),
    }
}

fn map_store_error(err: UserStoreError) -> Error {
    match err {
        UserStoreError::Connection { message } => {
            warn!(error = %message, "user store unavailable");
            Error::service_unavailable("user store unavailable")
        }
        UserStoreError::Query { message } => {
            error!(error = %message, "user store query failed");
            Error::internal(format!("user store error: {message}"))
        }
        UserStoreError::DuplicateUsername { .. } => duplicate_username(),
        UserStoreError::MissingUser { .. } => Error::not_found("user not found"),
    }
}

fn map_hasher_error(err: SecretHasherError) -> Error {
    error!(error = %err, "secret hasher failed");
    Error::internal(err.to_string())
}

fn duplicate_username() -> Error {
    Error::conflict("username already taken").with_details(json!({
        "field": "username",
        "code": "duplicate_username",
    }))
}

#[async_trait]
impl<S, C, H> AccountService for UserAccountService<S, C, H>
where
    S: UserStore + ?Sized,
    C: UserCache + ?Sized,
    H: SecretHasher + ?Sized,
{
    async fn register(
        &self,
        ctx: &OperationContext,
        registration: &Registration,
    ) -> Result<UserProfile, Error> {
        // The name is free only when the lookup reports NotFound.
        match self.users.read_by_username(ctx, registration.username()).await {
            Ok(_) => return Err(duplicate_username()),
            Err(ConsistencyError::NotFound { .. }) => {}
            Err(other) => return Err(map_consistency_error(other)),
        }

        let secret = ctx
            .run(self.hasher.hash(registration.password()))
            .await
            .map_err(map_interrupted)?
            .map_err(map_hasher_error)?;
        let draft = NewUser::new(registration.username().clone(), secret)
            .with_nickname(registration.nickname().cloned());

        let user = self
            .users
            .create(ctx, draft)
            .await
            .map_err(map_consistency_error)?;
        info!(user_id = %user.id(), "user registered");
        Ok(user.profile())
    }

    async fn authenticate(
        &self,
        ctx: &OperationContext,
        credentials: &LoginCredentials,
    ) -> Result<UserId, Error> {
        let user = match self.users.read_by_username(ctx, credentials.username()).await {
            Ok(user) => user,
            Err(ConsistencyError::NotFound { .. }) => {
                return Err(Error::unauthorized(INVALID_CREDENTIALS));
            }
            Err(other) => return Err(map_consistency_error(other)),
        };

        let matches = ctx
            .run(self.hasher.verify(user.secret(), credentials.password()))
            .await
            .map_err(map_interrupted)?
            .map_err(map_hasher_error)?;
        if !matches {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        Ok(user.id())
    }
}

#[async_trait]
impl<S, C, H> ProfileService for UserAccountService<S, C, H>
where
    S: UserStore + ?Sized,
    C: UserCache + ?Sized,
    H: SecretHasher + ?Sized,
{
    async fn profile(&self, ctx: &OperationContext, id: UserId) -> Result<UserProfile, Error> {
        self.users
            .read_by_id(ctx, id)
            .await
            .map(|user| user.profile())
            .map_err(map_consistency_error)
    }

    async fn update_profile(
        &self,
        ctx: &OperationContext,
        id: UserId,
        field: ProfileField,
    ) -> Result<UserProfile, Error> {
        self.users
            .update_field(ctx, id, field)
            .await
            .map(|user| user.profile())
            .map_err(map_consistency_error)
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
