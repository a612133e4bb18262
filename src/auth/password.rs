use std::fmt;
use std::sync::Arc;

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier as _, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;
use thiserror::Error;

use crate::config::PasswordConfig;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("invalid argon2 parameters: {0}")]
    Params(String),

    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("hashing task did not complete: {0}")]
    Task(String),
}

/// A password in its stored, one-way hashed form. Only a `PasswordVerifier`
/// produces one, so plaintext cannot reach the user table by accident.
#[derive(Clone, PartialEq)]
pub struct HashedPassword(String);

impl HashedPassword {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    #[cfg(test)]
    pub(crate) fn from_stored(hash: &str) -> Self {
        Self(hash.to_string())
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HashedPassword([REDACTED])")
    }
}

/// One-way hash and verify
pub trait PasswordVerifier: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<HashedPassword, PasswordError>;

    /// False for a wrong password and for a stored hash that cannot be parsed
    fn verify(&self, plaintext: &str, stored: &str) -> bool;
}

/// Argon2id with configurable cost. Verification reads the parameters
/// embedded in the stored hash, so cost changes do not lock anyone out.
#[derive(Debug, Clone)]
pub struct Argon2Verifier {
    params: Params,
}

impl Argon2Verifier {
    pub fn new(config: &PasswordConfig) -> Result<Self, PasswordError> {
        let params = Params::new(config.memory_cost_kib, config.time_cost, config.parallelism, None)
            .map_err(|e| PasswordError::Params(e.to_string()))?;
        Ok(Self { params })
    }
}

impl PasswordVerifier for Argon2Verifier {
    fn hash(&self, plaintext: &str) -> Result<HashedPassword, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone());

        argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|h| HashedPassword(h.to_string()))
            .map_err(|e| PasswordError::Hash(e.to_string()))
    }

    fn verify(&self, plaintext: &str, stored: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(stored) else {
            tracing::warn!("Stored password hash could not be parsed");
            return false;
        };

        Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }
}

/// Hash on the blocking pool; argon2 is deliberately slow
pub async fn hash_password(
    verifier: Arc<dyn PasswordVerifier>,
    plaintext: String,
) -> Result<HashedPassword, PasswordError> {
    tokio::task::spawn_blocking(move || verifier.hash(&plaintext))
        .await
        .map_err(|e| PasswordError::Task(e.to_string()))?
}

pub async fn verify_password(
    verifier: Arc<dyn PasswordVerifier>,
    plaintext: String,
    stored: String,
) -> Result<bool, PasswordError> {
    tokio::task::spawn_blocking(move || verifier.verify(&plaintext, &stored))
        .await
        .map_err(|e| PasswordError::Task(e.to_string()))
}
