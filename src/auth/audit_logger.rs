// Security event logging

use axum::http::HeaderMap;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

/// Which authentication path produced an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthChannel {
    Session,
    Token,
}

impl AuthChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthChannel::Session => "session",
            AuthChannel::Token => "token",
        }
    }
}

/// Authentication event type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    AuthSuccess,
    AuthFailure { reason: String },
}

/// Caller details attached to audit records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInfo {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl ClientInfo {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            ip_address: extract_ip_address(headers),
            user_agent: extract_user_agent(headers),
        }
    }
}

fn extract_ip_address(headers: &HeaderMap) -> Option<String> {
    headers
        .get("X-Forwarded-For")
        .or_else(|| headers.get("X-Real-IP"))
        .and_then(|v| v.to_str().ok())
        .map(|s| s.split(',').next().unwrap_or(s).trim().to_string())
}

fn extract_user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get("User-Agent")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

/// SHA-256 hex of the username, so logs can correlate attempts without
/// recording account names
pub fn username_fingerprint(username: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(username.as_bytes());
    hex::encode(hasher.finalize())
}

/// Audit logger for security events
#[derive(Debug, Clone, Default)]
pub struct AuditLogger;

impl AuditLogger {
    pub fn new() -> Self {
        Self
    }

    /// Log an authentication event as a structured tracing record
    pub fn log_auth_event(
        &self,
        channel: AuthChannel,
        event: &AuthEvent,
        username: &str,
        client: &ClientInfo,
    ) {
        let fingerprint = username_fingerprint(username);
        match event {
            AuthEvent::AuthSuccess => {
                info!(
                    channel = channel.as_str(),
                    user = %fingerprint,
                    ip_address = ?client.ip_address,
                    user_agent = ?client.user_agent,
                    "Authentication successful"
                );
            }
            AuthEvent::AuthFailure { reason } => {
                warn!(
                    channel = channel.as_str(),
                    user = %fingerprint,
                    ip_address = ?client.ip_address,
                    user_agent = ?client.user_agent,
                    reason = %reason,
                    "Authentication failed"
                );
            }
        }
    }
}
