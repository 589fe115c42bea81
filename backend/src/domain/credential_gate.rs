//! Bearer token issuing and ownership checks.
//!
//! Tokens are HS256-signed claim sets `{authorized, user_id, exp}` with a fixed
//! lifetime. The signing key is handed to [`CredentialGate::new`] explicitly;
//! there is no process-wide secret. Expiry is checked against an injected
//! [`Clock`] rather than the system time.

use std::fmt;
use std::sync::Arc;

use argon2::password_hash::rand_core::{OsRng, RngCore};
use chrono::TimeDelta;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use super::UserId;

/// Fixed token lifetime in seconds.
pub const TOKEN_LIFETIME_SECS: i64 = 30 * 60;

const FINGERPRINT_BYTES: usize = 8;
const EPHEMERAL_SECRET_BYTES: usize = 32;

/// Symmetric signing key material.
#[derive(Clone)]
pub struct TokenSecret(Zeroizing<Vec<u8>>);

impl TokenSecret {
    /// Wrap caller-supplied key bytes. Empty keys are rejected.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Option<Self> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return None;
        }
        Some(Self(Zeroizing::new(bytes)))
    }

    /// Random key for development runs. Tokens do not survive a restart.
    pub fn generate() -> Self {
        let mut bytes = vec![0_u8; EPHEMERAL_SECRET_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(Zeroizing::new(bytes))
    }

    /// Truncated SHA-256 of the key as 16 lowercase hex characters.
    ///
    /// Safe to log; lets operators tell which key is active.
    ///
    /// # Examples
    /// ```
    /// use profile_backend::domain::TokenSecret;
    ///
    /// let secret = TokenSecret::new(b"topsecret".to_vec()).expect("non-empty");
    /// let fp = secret.fingerprint();
    /// assert_eq!(fp.len(), 16);
    /// assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    /// ```
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.0.as_slice());
        hex::encode(digest.iter().take(FINGERPRINT_BYTES).copied().collect::<Vec<u8>>())
    }

    fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl fmt::Debug for TokenSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenSecret(fingerprint={})", self.fingerprint())
    }
}

/// Reasons a token is refused. All map to an access denial.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("authorization token missing")]
    MissingToken,
    #[error("authorization token malformed")]
    Malformed,
    #[error("authorization token signature invalid")]
    BadSignature,
    #[error("authorization token expired")]
    Expired,
    #[error("authorization token does not grant access")]
    NotAuthorized,
    #[error("token subject {subject} may not act on user {resource}")]
    SubjectMismatch { subject: i64, resource: i64 },
    #[error("failed to sign token: {message}")]
    Signing { message: String },
}

impl AuthError {
    /// Whether the caller proved an identity but targeted someone else.
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::SubjectMismatch { .. })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    authorized: bool,
    user_id: i64,
    exp: i64,
}

/// Issues and checks bearer tokens.
#[derive(Clone)]
pub struct CredentialGate {
    encoding: EncodingKey,
    decoding: DecodingKey,
    clock: Arc<dyn Clock>,
    lifetime: TimeDelta,
}

impl CredentialGate {
    /// Create a gate signing with `secret` and reading time from `clock`.
    pub fn new(secret: &TokenSecret, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            clock,
            lifetime: TimeDelta::seconds(TOKEN_LIFETIME_SECS),
        }
    }

    /// Sign a token for `subject`, valid for [`TOKEN_LIFETIME_SECS`].
    pub fn issue_token(&self, subject: UserId) -> Result<String, AuthError> {
        let claims = Claims {
            authorized: true,
            user_id: subject.get(),
            exp: (self.clock.utc() + self.lifetime).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|err| {
            AuthError::Signing {
                message: err.to_string(),
            }
        })
    }

    /// Verify signature and expiry, then return the bound subject.
    pub fn validate_and_extract_subject(&self, token: &str) -> Result<UserId, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked below against the injected clock.
        validation.validate_exp = false;

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|err| {
            match err.kind() {
                ErrorKind::InvalidSignature => AuthError::BadSignature,
                _ => AuthError::Malformed,
            }
        })?;
        let claims = data.claims;

        if claims.exp <= self.clock.utc().timestamp() {
            return Err(AuthError::Expired);
        }
        if !claims.authorized {
            return Err(AuthError::NotAuthorized);
        }
        UserId::new(claims.user_id).map_err(|_| AuthError::Malformed)
    }

    /// Validate `token` and require its subject to equal `resource`.
    pub fn authorize(&self, token: Option<&str>, resource: UserId) -> Result<UserId, AuthError> {
        let token = token.ok_or(AuthError::MissingToken)?;
        let subject = self.validate_and_extract_subject(token)?;
        if subject != resource {
            return Err(AuthError::SubjectMismatch {
                subject: subject.get(),
                resource: resource.get(),
            });
        }
        Ok(subject)
    }
}
