// Session sign-in: the stateful caller of the credential verifier

use chrono::{DateTime, Utc};
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tracing::error;

use crate::auth::audit_logger::{AuditLogger, AuthChannel, AuthEvent, ClientInfo};
use crate::auth::credentials::{CredentialVerifier, VerificationOutcome};
use crate::auth::password::Password;
use crate::core::constants::session;
use crate::core::crypto::SessionSigner;
use crate::core::errors::CampError;
use crate::utils::time::Clock;

/// Server-side state for one signed-in user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub username: String,
    pub established_at: DateTime<Utc>,
}

/// Handed back to the caller after a successful sign-in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTicket {
    pub session_id: String,
    pub username: String,
}

/// Establishes and tracks sessions
///
/// Sessions expire after `ttl` without use.
pub struct SessionManager {
    verifier: CredentialVerifier,
    signer: SessionSigner,
    sessions: Cache<String, SessionRecord>,
    clock: Arc<dyn Clock>,
    audit_logger: AuditLogger,
}

impl SessionManager {
    pub fn new(
        verifier: CredentialVerifier,
        clock: Arc<dyn Clock>,
        ttl: Duration,
        audit_logger: AuditLogger,
    ) -> Result<Self, CampError> {
        let sessions = Cache::builder()
            .time_to_idle(ttl)
            .max_capacity(session::MAX_SESSIONS)
            .build();

        Ok(Self {
            verifier,
            signer: SessionSigner::try_new()?,
            sessions,
            clock,
            audit_logger,
        })
    }

    /// Verify credentials and open a session
    ///
    /// Every failure, including store faults, collapses to `CampError::Mismatch`.
    pub async fn sign_in(
        &self,
        username: &str,
        password: &Password,
        client: &ClientInfo,
    ) -> Result<SessionTicket, CampError> {
        let outcome = match self.verifier.verify(username, password).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(error = %e, "Credential check failed during sign-in");
                self.audit_failure(username, "internal error", client);
                return Err(CampError::Mismatch);
            }
        };

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

        let session_id = self.signer.generate_session_id().map_err(|e| {
            error!(error = %e, "Failed to mint session id");
            CampError::Mismatch
        })?;

        let record = SessionRecord {
            username: identity.username().to_string(),
            established_at: self.clock.now(),
        };
        self.sessions.insert(session_id.clone(), record).await;

        self.audit_logger
            .log_auth_event(AuthChannel::Session, &AuthEvent::AuthSuccess, identity.username(), client);

        Ok(SessionTicket {
            session_id,
            username: identity.username().to_string(),
        })
    }

    /// Look up a live session; forged or expired ids yield `None`
    pub async fn session(&self, session_id: &str) -> Option<SessionRecord> {
        if !self.signer.validate_session_id(session_id) {
            return None;
        }
        self.sessions.get(session_id).await
    }

    pub async fn sign_out(&self, session_id: &str) {
        self.sessions.invalidate(session_id).await;
    }

    fn audit_failure(&self, username: &str, reason: &str, client: &ClientInfo) {
        self.audit_logger.log_auth_event(
            AuthChannel::Session,
            &AuthEvent::AuthFailure {
                reason: reason.to_string(),
            },
            username,
            client,
        );
    }
}
