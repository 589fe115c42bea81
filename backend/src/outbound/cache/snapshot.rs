//! JSON snapshot stored under each cache key.
//!
//! The key is the decimal user id. The value is the whole entity, secret hash
//! included, so a cache hit can stand in for a persistent read.

use serde::{Deserialize, Serialize};

use crate::domain::ports::UserCacheError;
use crate::domain::{AvatarRef, NewUser, Nickname, SecretHash, User, UserId, Username};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct CachedUser {
    id: i64,
    username: String,
    secret: String,
    nickname: Option<String>,
    profile_image: Option<String>,
}

/// Cache key for `id`.
pub(crate) fn cache_key(id: UserId) -> String {
    id.to_string()
}

impl From<&User> for CachedUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().get(),
            username: user.username().as_ref().to_owned(),
            secret: user.secret().as_ref().to_owned(),
            nickname: user.nickname().map(|n| n.as_ref().to_owned()),
            profile_image: user.avatar_ref().map(|a| a.as_ref().to_owned()),
        }
    }
}

impl TryFrom<CachedUser> for User {
    type Error = UserCacheError;

    fn try_from(cached: CachedUser) -> Result<Self, Self::Error> {
        let invalid = |err: crate::domain::UserValidationError| {
            UserCacheError::serialization(format!("cached user {}: {err}", cached.id))
        };
        let id = UserId::new(cached.id).map_err(invalid)?;
        let draft = NewUser::new(
            Username::new(&cached.username).map_err(invalid)?,
            SecretHash::new(cached.secret.clone()).map_err(invalid)?,
        )
        .with_nickname(
            cached
                .nickname
                .as_deref()
                .map(Nickname::new)
                .transpose()
                .map_err(invalid)?,
        )
        .with_avatar_ref(
            cached
                .profile_image
                .as_deref()
                .map(AvatarRef::new)
                .transpose()
                .map_err(invalid)?,
        );
        Ok(draft.into_user(id))
    }
}

/// Encode `user` for storage.
pub(crate) fn encode(user: &User) -> Result<String, UserCacheError> {
    serde_json::to_string(&CachedUser::from(user))
        .map_err(|err| UserCacheError::serialization(err.to_string()))
}

/// Decode a stored payload.
pub(crate) fn decode(payload: &str) -> Result<User, UserCacheError> {
    let cached: CachedUser = serde_json::from_str(payload)
        .map_err(|err| UserCacheError::serialization(err.to_string()))?;
    User::try_from(cached)
}
