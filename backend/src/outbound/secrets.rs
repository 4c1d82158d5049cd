//! Argon2id hashing for passwords and PINs.
//!
//! Hashes are stored in PHC string form, so the salt and parameters travel
//! with the hash and verification needs nothing else.

use argon2::{
    Argon2,
    password_hash::{
        self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use thiserror::Error;

/// Stored PHC-format hash of a secret.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretHash(String);

impl SecretHash {
    /// Wrap a PHC string produced elsewhere, checking it parses.
    pub fn parse(phc: impl Into<String>) -> Result<Self, SecretHashError> {
        let phc = phc.into();
        PasswordHash::new(&phc).map_err(|err| SecretHashError::Malformed {
            message: err.to_string(),
        })?;
        Ok(Self(phc))
    }

    /// PHC string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SecretHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretHash(..)")
    }
}

/// Errors raised while hashing or verifying secrets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecretHashError {
    /// Hashing failed.
    #[error("failed to hash secret: {message}")]
    Hash { message: String },
    /// Stored hash is not a valid PHC string.
    #[error("stored secret hash is malformed: {message}")]
    Malformed { message: String },
}

/// Hash `secret` with Argon2id and a fresh random salt.
///
/// # Examples
/// ```
/// use hearth::outbound::secrets::{hash_secret, verify_secret};
///
/// let hash = hash_secret("2468").expect("hashes");
/// assert!(verify_secret("2468", &hash).expect("verifies"));
/// assert!(!verify_secret("1357", &hash).expect("verifies"));
/// ```
pub fn hash_secret(secret: &str) -> Result<SecretHash, SecretHashError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map_err(|err| SecretHashError::Hash {
            message: err.to_string(),
        })?;
    Ok(SecretHash(hash.to_string()))
}

/// Check `secret` against `hash` in constant time.
///
/// A mismatch is `Ok(false)`; only a corrupt hash is an error.
pub fn verify_secret(secret: &str, hash: &SecretHash) -> Result<bool, SecretHashError> {
    let parsed = PasswordHash::new(hash.as_str()).map_err(|err| SecretHashError::Malformed {
        message: err.to_string(),
    })?;
    match Argon2::default().verify_password(secret.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(err) => Err(SecretHashError::Malformed {
            message: err.to_string(),
        }),
    }
}
