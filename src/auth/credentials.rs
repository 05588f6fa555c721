// Credential verification shared by session sign-in and token issuance

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::auth::password::{Password, StoredPasswordHash};
use crate::core::errors::CampError;

/// Identity record as held by the identity store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredIdentity {
    pub username: String,
    pub password_hash: StoredPasswordHash,
}

/// Lookup of identities by username
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<StoredIdentity>, CampError>;
}

/// An identity whose password has been checked
///
/// Only the verifier can construct one, so holding a value is proof of a
/// successful check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    username: String,
}

impl VerifiedIdentity {
    pub(crate) fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

/// Result of a credential check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    Verified(VerifiedIdentity),
    NotFound,
    Mismatch,
}

impl VerificationOutcome {
    pub fn is_verified(&self) -> bool {
        matches!(self, VerificationOutcome::Verified(_))
    }
}

/// The single credential check used by every authentication path
#[derive(Clone)]
pub struct CredentialVerifier {
    store: Arc<dyn IdentityStore>,
}

impl CredentialVerifier {
    pub fn new(store: Arc<dyn IdentityStore>) -> Self {
        Self { store }
    }

    /// Verify `password` against the hash stored for `username`
    ///
    /// Store failures propagate as `Err`; callers turn them into their own
    /// generic failure outcome.
    pub async fn verify(
        &self,
        username: &str,
        password: &Password,
    ) -> Result<VerificationOutcome, CampError> {
        if username.is_empty() {
            return Ok(VerificationOutcome::NotFound);
        }

        let identity = match self.store.find_by_username(username).await? {
            Some(identity) => identity,
            None => {
                debug!(username_len = username.len(), "No identity for username");
                return Ok(VerificationOutcome::NotFound);
            }
        };

        if password.is_empty() {
            return Ok(VerificationOutcome::Mismatch);
        }

        // Argon2 is CPU-bound; keep it off the async workers
        let candidate = Password::new(password.expose_secret());
        let stored = identity.password_hash.clone();
        let checked = tokio::task::spawn_blocking(move || stored.verify(&candidate))
            .await
            .map_err(|e| CampError::StateError(format!("Password check task failed: {}", e)))?;

        match checked {
            Ok(true) => Ok(VerificationOutcome::Verified(VerifiedIdentity::new(identity.username))),
            Ok(false) => Ok(VerificationOutcome::Mismatch),
            Err(e) => {
                warn!(error = %e, "Stored password hash is malformed; treating as mismatch");
                Ok(VerificationOutcome::Mismatch)
            }
        }
    }
}
