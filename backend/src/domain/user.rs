//! User entity and its validated fields.
//!
//! A [`NewUser`] becomes a [`User`] once the persistent store assigns an id.
//! [`UserProfile`] is the public projection and never carries the secret.

use std::fmt;
use std::str::FromStr;

/// Maximum length, in characters, of any textual user field.
pub const FIELD_MAX: usize = 240;

/// Validation errors raised while constructing user fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    InvalidId,
    EmptyUsername,
    UsernameTooLong { max: usize },
    EmptySecretHash,
    EmptyNickname,
    NicknameTooLong { max: usize },
    EmptyAvatarRef,
    AvatarRefTooLong { max: usize },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "user id must be a positive integer"),
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::UsernameTooLong { max } => {
                write!(f, "username must be at most {max} characters")
            }
            Self::EmptySecretHash => write!(f, "secret hash must not be empty"),
            Self::EmptyNickname => write!(f, "nickname must not be empty"),
            Self::NicknameTooLong { max } => {
                write!(f, "nickname must be at most {max} characters")
            }
            Self::EmptyAvatarRef => write!(f, "avatar reference must not be empty"),
            Self::AvatarRefTooLong { max } => {
                write!(f, "avatar reference must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Identifier assigned by the persistent store. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(i64);

impl UserId {
    /// Validate and wrap a raw identifier.
    ///
    /// # Examples
    /// ```
    /// use profile_backend::domain::UserId;
    ///
    /// assert_eq!(UserId::new(7).expect("positive").get(), 7);
    /// assert!(UserId::new(0).is_err());
    /// ```
    pub fn new(raw: i64) -> Result<Self, UserValidationError> {
        if raw <= 0 {
            return Err(UserValidationError::InvalidId);
        }
        Ok(Self(raw))
    }

    /// Raw integer value.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s
            .parse::<i64>()
            .map_err(|_| UserValidationError::InvalidId)?;
        Self::new(raw)
    }
}

impl TryFrom<i64> for UserId {
    type Error = UserValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Unique login name. Trimmed before validation; any other text is accepted
/// up to the column width.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if trimmed.chars().count() > FIELD_MAX {
            return Err(UserValidationError::UsernameTooLong { max: FIELD_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hashed credential in PHC string form.
///
/// `Debug` never prints the hash.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretHash(String);

impl SecretHash {
    /// Wrap an encoded hash produced by a [`crate::domain::ports::SecretHasher`].
    pub fn new(encoded: impl Into<String>) -> Result<Self, UserValidationError> {
        let encoded = encoded.into();
        if encoded.is_empty() {
            return Err(UserValidationError::EmptySecretHash);
        }
        Ok(Self(encoded))
    }
}

impl AsRef<str> for SecretHash {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for SecretHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretHash(<redacted>)")
    }
}

fn bounded_text(
    raw: &str,
    empty: UserValidationError,
    too_long: UserValidationError,
) -> Result<String, UserValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(empty);
    }
    if trimmed.chars().count() > FIELD_MAX {
        return Err(too_long);
    }
    Ok(trimmed.to_owned())
}

/// Free-form display nickname.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nickname(String);

impl Nickname {
    /// Validate and construct a [`Nickname`].
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        bounded_text(
            raw.as_ref(),
            UserValidationError::EmptyNickname,
            UserValidationError::NicknameTooLong { max: FIELD_MAX },
        )
        .map(Self)
    }
}

impl AsRef<str> for Nickname {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Reference to a stored avatar image, such as a file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarRef(String);

impl AvatarRef {
    /// Validate and construct an [`AvatarRef`].
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        bounded_text(
            raw.as_ref(),
            UserValidationError::EmptyAvatarRef,
            UserValidationError::AvatarRefTooLong { max: FIELD_MAX },
        )
        .map(Self)
    }
}

impl AsRef<str> for AvatarRef {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// User awaiting id assignment by the persistent store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    username: Username,
    secret: SecretHash,
    nickname: Option<Nickname>,
    avatar_ref: Option<AvatarRef>,
}

impl NewUser {
    /// Build a new user with no optional profile fields.
    pub fn new(username: Username, secret: SecretHash) -> Self {
        Self {
            username,
            secret,
            nickname: None,
            avatar_ref: None,
        }
    }

    /// Set the initial nickname.
    #[must_use]
    pub fn with_nickname(mut self, nickname: Option<Nickname>) -> Self {
        self.nickname = nickname;
        self
    }

    /// Set the initial avatar reference.
    #[must_use]
    pub fn with_avatar_ref(mut self, avatar_ref: Option<AvatarRef>) -> Self {
        self.avatar_ref = avatar_ref;
        self
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn secret(&self) -> &SecretHash {
        &self.secret
    }

    pub fn nickname(&self) -> Option<&Nickname> {
        self.nickname.as_ref()
    }

    pub fn avatar_ref(&self) -> Option<&AvatarRef> {
        self.avatar_ref.as_ref()
    }

    /// Attach the store-assigned identifier.
    pub fn into_user(self, id: UserId) -> User {
        let Self {
            username,
            secret,
            nickname,
            avatar_ref,
        } = self;
        User {
            id,
            username,
            secret,
            nickname,
            avatar_ref,
        }
    }
}

/// Stored user, including the secret hash.
///
/// ## Invariants
/// - `id` is positive and immutable once assigned.
/// - `username` is unique across the persistent store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    username: Username,
    secret: SecretHash,
    nickname: Option<Nickname>,
    avatar_ref: Option<AvatarRef>,
}

impl User {
    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn secret(&self) -> &SecretHash {
        &self.secret
    }

    pub fn nickname(&self) -> Option<&Nickname> {
        self.nickname.as_ref()
    }

    pub fn avatar_ref(&self) -> Option<&AvatarRef> {
        self.avatar_ref.as_ref()
    }

    /// Overwrite the single field named by `field`.
    pub fn apply(&mut self, field: &ProfileField) {
        match field {
            ProfileField::Nickname(value) => self.nickname = Some(value.clone()),
            ProfileField::AvatarRef(value) => self.avatar_ref = Some(value.clone()),
        }
    }

    /// Public projection without the secret.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            nickname: self.nickname.clone(),
            avatar_ref: self.avatar_ref.clone(),
        }
    }
}

/// Public view of a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: UserId,
    pub username: Username,
    pub nickname: Option<Nickname>,
    pub avatar_ref: Option<AvatarRef>,
}

/// A single mutable profile field together with its new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileField {
    Nickname(Nickname),
    AvatarRef(AvatarRef),
}

impl ProfileField {
    /// Column-style name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Nickname(_) => "nickname",
            Self::AvatarRef(_) => "avatar_ref",
        }
    }
}

#[cfg(test)]
mod tests;
