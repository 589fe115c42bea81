//! Credential payloads for login and registration.
//!
//! Handlers build these from raw strings before talking to a driving port, so
//! services only ever see validated input. Plain passwords are zeroized on
//! drop.

use std::fmt;

use zeroize::Zeroizing;

use super::user::{Nickname, UserValidationError, Username};

/// Domain error returned when credential payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialValidationError {
    /// Username was blank or violated username rules.
    Username(UserValidationError),
    /// Password was blank.
    EmptyPassword,
    /// Nickname was supplied but invalid.
    Nickname(UserValidationError),
}

impl fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Username(err) | Self::Nickname(err) => write!(f, "{err}"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for CredentialValidationError {}

fn checked_password(password: &str) -> Result<Zeroizing<String>, CredentialValidationError> {
    if password.is_empty() {
        return Err(CredentialValidationError::EmptyPassword);
    }
    Ok(Zeroizing::new(password.to_owned()))
}

/// Validated login credentials.
///
/// ## Invariants
/// - `username` satisfies [`Username`] rules.
/// - `password` is non-empty; surrounding whitespace is preserved.
///
/// # Examples
/// ```
/// use profile_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" alice ", "s1").expect("valid");
/// assert_eq!(creds.username().as_ref(), "alice");
/// assert_eq!(creds.password(), "s1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: Username,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, CredentialValidationError> {
        let username = Username::new(username).map_err(CredentialValidationError::Username)?;
        let password = checked_password(password)?;
        Ok(Self { username, password })
    }

    /// Username used for the lookup.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Password provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    username: Username,
    password: Zeroizing<String>,
    nickname: Option<Nickname>,
}

impl Registration {
    /// Construct a registration from raw inputs. A blank nickname counts as
    /// absent.
    pub fn try_from_parts(
        username: &str,
        password: &str,
        nickname: Option<&str>,
    ) -> Result<Self, CredentialValidationError> {
        let username = Username::new(username).map_err(CredentialValidationError::Username)?;
        let password = checked_password(password)?;
        let nickname = nickname
            .filter(|raw| !raw.trim().is_empty())
            .map(Nickname::new)
            .transpose()
            .map_err(CredentialValidationError::Nickname)?;
        Ok(Self {
            username,
            password,
            nickname,
        })
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    pub fn nickname(&self) -> Option<&Nickname> {
        self.nickname.as_ref()
    }
}
