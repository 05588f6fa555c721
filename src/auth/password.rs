// Password handling: secret-wrapped plaintext and Argon2 PHC hashes

use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use password_hash::{PasswordHash, SaltString};
use rand::rngs::OsRng;
use rand::RngCore;
use secrecy::{ExposeSecret, Secret};
use std::fmt;

use crate::core::errors::CryptoError;

/// Stored Argon2 hash in PHC string format (`$argon2id$v=19$...`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPasswordHash(String);

impl StoredPasswordHash {
    /// Wrap an existing PHC string, rejecting anything that does not parse
    pub fn from_phc_string(phc: &str) -> Result<Self, CryptoError> {
        PasswordHash::new(phc).map_err(|e| CryptoError::HashingError(e.to_string()))?;
        Ok(Self(phc.to_string()))
    }

    /// Wrap a string as-is; verification treats an unparseable value as a mismatch
    pub fn from_raw(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check a candidate password against this hash
    ///
    /// Returns `Ok(false)` on a wrong password and `Err` when the stored
    /// value is not a valid PHC string.
    pub fn verify(&self, candidate: &Password) -> Result<bool, CryptoError> {
        let parsed = PasswordHash::new(&self.0).map_err(|e| CryptoError::HashingError(e.to_string()))?;
        Ok(Argon2::default()
            .verify_password(candidate.expose_secret().as_bytes(), &parsed)
            .is_ok())
    }
}

impl fmt::Display for StoredPasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Plaintext password with memory protection
///
/// Uses `secrecy::Secret` so the value never shows up in logs.
pub struct Password(Secret<String>);

impl Password {
    pub fn new(password: &str) -> Self {
        Self(Secret::new(password.to_string()))
    }

    /// Expose the plaintext (use with caution)
    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }

    pub fn is_empty(&self) -> bool {
        self.0.expose_secret().is_empty()
    }

    /// Hash with Argon2id and a fresh 16-byte random salt
    pub fn hash(&self) -> Result<StoredPasswordHash, CryptoError> {
        let mut salt_bytes = [0u8; 16];
        OsRng
            .try_fill_bytes(&mut salt_bytes)
            .map_err(|_| CryptoError::RandomError)?;
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| CryptoError::HashingError(e.to_string()))?;
        let phc = Argon2::default()
            .hash_password(self.expose_secret().as_bytes(), &salt)
            .map_err(|e| CryptoError::HashingError(e.to_string()))?
            .to_string();
        Ok(StoredPasswordHash(phc))
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Password")
            .field("value", &"<REDACTED>")
            .finish()
    }
}

impl fmt::Display for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<REDACTED>")
    }
}
