//! Port for one-way credential hashing.

use async_trait::async_trait;

use crate::domain::SecretHash;

use super::define_port_error;

define_port_error! {
    /// Errors raised by secret hasher adapters.
    pub enum SecretHasherError {
        /// Hashing itself failed.
        Hashing { message: String } =>
            "secret hashing failed: {message}",
        /// A stored hash could not be parsed.
        MalformedHash { message: String } =>
            "stored secret hash is malformed: {message}",
    }
}

/// Salted one-way hashing of plain secrets.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SecretHasher: Send + Sync {
    /// Hash `plain` with a fresh salt.
    async fn hash(&self, plain: &str) -> Result<SecretHash, SecretHasherError>;

    /// Check `plain` against a stored hash. A mismatch is `Ok(false)`.
    async fn verify(&self, hash: &SecretHash, plain: &str) -> Result<bool, SecretHasherError>;
}
