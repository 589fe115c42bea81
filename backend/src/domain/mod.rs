//! Domain entities, services and ports.
//!
//! Purpose: hold the user model, the store/cache consistency rules and the
//! credential gate without reference to HTTP, SQL or Redis.
//!
//! Public surface:
//! - `Error` / `ErrorCode`: transport-agnostic failure payload.
//! - `User`, `NewUser`, `UserProfile` and their validated fields.
//! - `UserOrchestrator`: persistent-first writes, cache-first reads.
//! - `CredentialGate`: bearer token issue and ownership checks.
//! - `UserAccountService`: implementation of the driving ports.

pub mod auth;
pub mod consistency;
pub mod credential_gate;
pub mod error;
pub mod operation;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_service;

pub use self::auth::{CredentialValidationError, LoginCredentials, Registration};
pub use self::consistency::{ConsistencyError, ReadPolicy, ReadPolicyParseError, UserOrchestrator};
pub use self::credential_gate::{AuthError, CredentialGate, TOKEN_LIFETIME_SECS, TokenSecret};
pub use self::error::{Error, ErrorCode};
pub use self::operation::{Interrupted, OperationContext};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    AvatarRef, FIELD_MAX, NewUser, Nickname, ProfileField, SecretHash, User, UserId, UserProfile,
    UserValidationError, Username,
};
pub use self::user_service::UserAccountService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use profile_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
