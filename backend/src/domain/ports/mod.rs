//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (`UserStore`, `UserCache`, `SecretHasher`) are implemented by
//! outbound adapters. Driving ports (`AccountService`, `ProfileService`) are
//! called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_service;
mod profile_service;
mod secret_hasher;
mod user_cache;
mod user_store;

#[cfg(test)]
pub use account_service::MockAccountService;
pub use account_service::AccountService;
#[cfg(test)]
pub use profile_service::MockProfileService;
pub use profile_service::ProfileService;
#[cfg(test)]
pub use secret_hasher::MockSecretHasher;
pub use secret_hasher::{SecretHasher, SecretHasherError};
#[cfg(test)]
pub use user_cache::MockUserCache;
pub use user_cache::{UserCache, UserCacheError};
#[cfg(test)]
pub use user_store::MockUserStore;
pub use user_store::{UserStore, UserStoreError};
