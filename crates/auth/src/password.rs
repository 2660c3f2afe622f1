//! Credential hashing seam.
//!
//! Orchestrators depend on the [`CredentialHasher`] trait so tests can swap in
//! a cheap fake; production wiring uses Argon2id with a per-password salt.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HashError {
    #[error("stored password hash is malformed")]
    Malformed,

    #[error("password hashing failed: {0}")]
    Hashing(String),
}

/// One-way password hashing with salted verification.
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, HashError>;

    /// Compare a candidate password against a stored hash.
    fn verify(&self, password: &str, stored: &str) -> Result<bool, HashError>;
}

/// Argon2id with the crate's recommended defaults.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2Hasher;

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, HashError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| HashError::Hashing(e.to_string()))
    }

    fn verify(&self, password: &str, stored: &str) -> Result<bool, HashError> {
        let parsed = PasswordHash::new(stored).map_err(|_| HashError::Malformed)?;
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(HashError::Hashing(e.to_string())),
        }
    }
}
