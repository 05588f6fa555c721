//! Camp API constants - Single source of truth for protocol and configuration values.

/// Signed token format
pub mod token {
    /// Default validity window in minutes
    pub const DEFAULT_VALIDITY_MINUTES: i64 = 15;
    /// Default issuer and audience identifier
    pub const DEFAULT_ISSUER: &str = "http://mycodecamp.org";
    pub const DEFAULT_AUDIENCE: &str = "http://mycodecamp.org";
    /// Minimum accepted signing secret length in bytes
    pub const MIN_SECRET_LENGTH: usize = 16;

    pub const CLAIM_SUBJECT: &str = "sub";
    pub const CLAIM_TOKEN_ID: &str = "jti";
}

/// Session sign-in
pub mod session {
    /// HMAC-SHA256 session key length in bytes
    pub const SECRET_KEY_LENGTH: usize = 32;
    /// Session ID format version
    pub const SESSION_ID_VERSION: &str = "1";
    /// Response header carrying the session ID
    pub const SESSION_HEADER: &str = "x-session-id";
    /// Default idle lifetime of a session
    pub const DEFAULT_TTL_SECS: u64 = 1200;
    pub const MAX_SESSIONS: u64 = 10_000;
}

/// Named routes used for link generation
pub mod routes {
    pub const CAMP_GET: &str = "CampGet";
    pub const SPEAKER_GET: &str = "SpeakerGet";
    pub const TALK_GET: &str = "GetTalk";

    pub const CAMP_TEMPLATE: &str = "/api/camps/{camp_id}";
    pub const SPEAKER_TEMPLATE: &str = "/api/camps/{camp_id}/speakers/{speaker_id}";
    pub const TALK_TEMPLATE: &str = "/api/camps/{camp_id}/speakers/{speaker_id}/talks/{talk_id}";
}

/// Generic failure messages returned to callers
pub mod messages {
    pub const LOGIN_FAILED: &str = "Failed to login";
    pub const TOKEN_FAILED: &str = "Failed to generate token";
}

/// Configuration Environment Variables
pub mod config {
    pub const ENV_BIND_ADDRESS: &str = "BIND_ADDRESS";
    pub const ENV_PORT: &str = "PORT";
    pub const ENV_JWT_SECRET: &str = "JWT_SECRET";
    pub const ENV_JWT_ISSUER: &str = "JWT_ISSUER";
    pub const ENV_JWT_AUDIENCE: &str = "JWT_AUDIENCE";
    pub const ENV_TOKEN_VALIDITY_MINUTES: &str = "TOKEN_VALIDITY_MINUTES";
    pub const ENV_SESSION_TTL_SECS: &str = "SESSION_TTL_SECS";
    pub const ENV_SEED_YAML_PATH: &str = "SEED_YAML_PATH";
    pub const ENV_PUBLIC_BASE_URL: &str = "PUBLIC_BASE_URL";
    pub const ENV_REQUEST_TIMEOUT_SECS: &str = "REQUEST_TIMEOUT_SECS";
    pub const ENV_BODY_SIZE_LIMIT_BYTES: &str = "BODY_SIZE_LIMIT_BYTES";
    pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
    pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";
}
