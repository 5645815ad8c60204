//! One-way password encoding.

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use thiserror::Error;

/// Password hashing failed (bad parameters or RNG failure).
#[derive(Debug, Error)]
#[error("password hashing failed")]
pub struct PasswordHashError;

/// Credential hasher used for customer passwords.
///
/// Encoding is salted, so two encodings of the same plaintext differ.
pub trait PasswordEncoder: Send + Sync {
    /// Encode a plaintext password.
    ///
    /// # Errors
    ///
    /// Returns `PasswordHashError` if hashing fails.
    fn encode(&self, raw: &str) -> Result<String, PasswordHashError>;
}

/// Argon2id encoder with the crate's default parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2PasswordEncoder;

impl PasswordEncoder for Argon2PasswordEncoder {
    fn encode(&self, raw: &str) -> Result<String, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(raw.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| PasswordHashError)
    }
}
