// Stateless bearer-token issuance

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

use crate::auth::audit_logger::{AuditLogger, AuthChannel, AuthEvent, ClientInfo};
use crate::auth::credentials::{CredentialVerifier, VerificationOutcome, VerifiedIdentity};
use crate::auth::password::Password;
use crate::core::constants::token;
use crate::core::crypto::TokenSigner;
use crate::core::errors::CampError;
use crate::core::models::ClaimSet;
use crate::utils::time::Clock;

/// A signed token and the instant it stops being valid
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub expiration: DateTime<Utc>,
}

/// Mints signed, time-bounded tokens for verified identities
///
/// Nothing is recorded server-side; a token is checked purely by its
/// signature, issuer, audience and expiration.
pub struct TokenIssuer {
    verifier: CredentialVerifier,
    signer: Arc<TokenSigner>,
    clock: Arc<dyn Clock>,
    validity: Duration,
    audit_logger: AuditLogger,
}

impl TokenIssuer {
    pub fn new(
        verifier: CredentialVerifier,
        signer: Arc<TokenSigner>,
        clock: Arc<dyn Clock>,
        validity: Duration,
        audit_logger: AuditLogger,
    ) -> Self {
        Self {
            verifier,
            signer,
            clock,
            validity,
            audit_logger,
        }
    }

    pub fn signer(&self) -> &TokenSigner {
        &self.signer
    }

    /// Sign a token for an already verified identity
    pub fn issue(&self, identity: &VerifiedIdentity) -> Result<IssuedToken, CampError> {
        if identity.username().is_empty() {
            return Err(CampError::IssuanceFailure("empty subject".to_string()));
        }

        let mut claims = ClaimSet::new();
        claims.push(token::CLAIM_SUBJECT, identity.username());
        claims.push(token::CLAIM_TOKEN_ID, Uuid::new_v4().to_string());

        // Tokens carry whole seconds
        let now = self.clock.now();
        let issued_at = DateTime::<Utc>::from_timestamp(now.timestamp(), 0).unwrap_or(now);
        let expiration = issued_at
            .checked_add_signed(self.validity)
            .ok_or_else(|| CampError::IssuanceFailure("expiration out of range".to_string()))?;

        let token = self
            .signer
            .sign(&claims, issued_at, expiration)
            .map_err(|e| CampError::IssuanceFailure(e.to_string()))?;

        Ok(IssuedToken { token, expiration })
    }

    /// Verify credentials, then issue
    ///
    /// A wrong or unknown credential yields `Mismatch`; any internal fault
    /// yields `IssuanceFailure`. Both surface identically to HTTP callers.
    pub async fn issue_for_credentials(
        &self,
        username: &str,
        password: &Password,
        client: &ClientInfo,
    ) -> Result<IssuedToken, CampError> {
        let outcome = self.verifier.verify(username, password).await.map_err(|e| {
            error!(error = %e, "Credential check failed during token issuance");
            self.audit_failure(username, "internal error", client);
            CampError::IssuanceFailure(e.to_string())
        })?;

        let identity = match outcome {
            VerificationOutcome::Verified(identity) => identity,
            VerificationOutcome::NotFound => {
                self.audit_failure(username, "unknown user", client);
                return Err(CampError::Mismatch);
            }
            VerificationOutcome::Mismatch => {
                self.audit_failure(username, "password mismatch", client);
                return Err(CampError::Mismatch);
            }
        };

        let issued = self.issue(&identity).map_err(|e| {
            error!(error = %e, "Token signing failed");
            e
        })?;

        self.audit_logger
            .log_auth_event(AuthChannel::Token, &AuthEvent::AuthSuccess, identity.username(), client);
        info!(expiration = %issued.expiration, "Token issued");

        Ok(issued)
    }

    fn audit_failure(&self, username: &str, reason: &str, client: &ClientInfo) {
        self.audit_logger.log_auth_event(
            AuthChannel::Token,
            &AuthEvent::AuthFailure {
                reason: reason.to_string(),
            },
            username,
            client,
        );
    }
}
