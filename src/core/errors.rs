// Domain error types - Secure error handling with no information disclosure

use thiserror::Error;

/// Main error type for the camp API
#[derive(Error, Debug)]
pub enum CampError {
    /// Entity or identity absent (HTTP 404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Credential check failed (HTTP 400)
    #[error("Credential mismatch")]
    Mismatch,

    /// Malformed input, e.g. an end date before the start date (HTTP 400)
    #[error("Validation error: {0}")]
    ValidationFailure(String),

    /// Unexpected fault while issuing a token (HTTP 400)
    #[error("Token issuance failed: {0}")]
    IssuanceFailure(String),

    /// Resource URL synthesis is missing required context (HTTP 500)
    #[error("URL resolution failed: {0}")]
    ResolutionFailure(String),

    /// Cryptographic error (HTTP 500)
    #[error("Cryptographic error: {0}")]
    CryptoError(#[from] CryptoError),

    /// Configuration error (HTTP 500)
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Storage or runtime state error (HTTP 500)
    #[error("State error: {0}")]
    StateError(String),
}

/// Cryptographic operation errors
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Signing key rejected
    #[error("Invalid signing key: {0}")]
    KeyError(String),

    /// Failed to sign token
    #[error("Failed to sign token: {0}")]
    SigningError(String),

    /// Failed to hash or verify a password
    #[error("Failed to hash password: {0}")]
    HashingError(String),

    /// Failed to generate random bytes
    #[error("Failed to generate random bytes")]
    RandomError,
}

/// Reasons a presented token is refused
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Malformed token: {0}")]
    Malformed(String),

    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Issuer mismatch")]
    IssuerMismatch,

    #[error("Audience mismatch")]
    AudienceMismatch,

    #[error("Token expired")]
    Expired,
}

impl CampError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            CampError::NotFound(_) => 404,
            CampError::Mismatch => 400,
            CampError::ValidationFailure(_) => 400,
            CampError::IssuanceFailure(_) => 400,
            CampError::ResolutionFailure(_) => 500,
            CampError::CryptoError(_) => 500,
            CampError::ConfigurationError(_) => 500,
            CampError::StateError(_) => 500,
        }
    }

    /// Get user-friendly error message (no sensitive information)
    ///
    /// Not-found messages carry the requested identifier; credential and
    /// issuance failures stay generic so callers cannot enumerate accounts.
    pub fn user_message(&self) -> String {
        match self {
            CampError::NotFound(message) => message.clone(),
            CampError::Mismatch => "Authentication failed".to_string(),
            CampError::ValidationFailure(reason) => format!("Validation failed: {}", reason),
            CampError::IssuanceFailure(_) => "Failed to generate token".to_string(),
            CampError::ResolutionFailure(_) => "Internal error".to_string(),
            CampError::CryptoError(_) => "Internal error".to_string(),
            CampError::ConfigurationError(_) => "Internal error".to_string(),
            CampError::StateError(_) => "Internal error".to_string(),
        }
    }
}
