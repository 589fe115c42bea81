//! Argon2id [`SecretHasher`].
//!
//! Hashing is CPU-bound, so both operations run on tokio's blocking pool.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::SecretHash;
use crate::domain::ports::{SecretHasher, SecretHasherError};

/// Argon2id with default parameters and a random 16-byte salt per hash.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2SecretHasher;

fn hash_blocking(plain: &str) -> Result<SecretHash, SecretHasherError> {
    let salt = SaltString::generate(&mut OsRng);
    let encoded = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|err| SecretHasherError::hashing(err.to_string()))?
        .to_string();
    SecretHash::new(encoded).map_err(|err| SecretHasherError::hashing(err.to_string()))
}

fn verify_blocking(encoded: &str, plain: &str) -> Result<bool, SecretHasherError> {
    let parsed =
        PasswordHash::new(encoded).map_err(|err| SecretHasherError::malformed_hash(err.to_string()))?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

#[async_trait]
impl SecretHasher for Argon2SecretHasher {
    async fn hash(&self, plain: &str) -> Result<SecretHash, SecretHasherError> {
        let plain = Zeroizing::new(plain.to_owned());
        tokio::task::spawn_blocking(move || hash_blocking(&plain))
            .await
            .map_err(|err| SecretHasherError::hashing(err.to_string()))?
    }

    async fn verify(&self, hash: &SecretHash, plain: &str) -> Result<bool, SecretHasherError> {
        let encoded = hash.as_ref().to_owned();
        let plain = Zeroizing::new(plain.to_owned());
        tokio::task::spawn_blocking(move || verify_blocking(&encoded, &plain))
            .await
            .map_err(|err| SecretHasherError::hashing(err.to_string()))?
    }
}
