// Configuration management

use crate::core::constants::{config as keys, session, token};
use crate::core::errors::CampError;
use secrecy::{ExposeSecret, Secret};
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

/// Application configuration loaded from environment variables
///
/// All configuration is validated on load with clear error messages.
pub struct Config {
    // Server configuration
    pub bind_address: String,
    pub port: u16,

    // Token signing
    pub jwt_secret: Secret<String>,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    pub token_validity_minutes: u64,

    // Sessions
    pub session_ttl_secs: u64,

    // Seed data and link generation
    pub seed_yaml_path: Option<PathBuf>,
    pub public_base_url: Option<url::Url>,

    // Middleware configuration
    pub request_timeout_secs: u64,
    pub body_size_limit_bytes: usize,

    // Logging configuration
    pub log_level: String,
    pub log_format: String, // "json" or "text"
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Supports `.env` file loading in development (via dotenv crate).
    pub fn from_env() -> Result<Self, CampError> {
        // Skip in test builds to avoid interfering with test environment variables
        #[cfg(not(test))]
        {
            dotenv::dotenv().ok();
        }

        let config = Self {
            bind_address: Self::get_env_or_default(keys::ENV_BIND_ADDRESS, "0.0.0.0"),
            port: Self::parse_port()?,
            jwt_secret: Secret::new(Self::get_required_env(keys::ENV_JWT_SECRET)?),
            jwt_issuer: Self::get_env_or_default(keys::ENV_JWT_ISSUER, token::DEFAULT_ISSUER),
            jwt_audience: Self::get_env_or_default(keys::ENV_JWT_AUDIENCE, token::DEFAULT_AUDIENCE),
            token_validity_minutes: Self::parse_u64_or_default(
                keys::ENV_TOKEN_VALIDITY_MINUTES,
                token::DEFAULT_VALIDITY_MINUTES as u64,
            )?,
            session_ttl_secs: Self::parse_u64_or_default(keys::ENV_SESSION_TTL_SECS, session::DEFAULT_TTL_SECS)?,
            seed_yaml_path: Self::get_optional_env(keys::ENV_SEED_YAML_PATH).map(PathBuf::from),
            public_base_url: Self::get_optional_env(keys::ENV_PUBLIC_BASE_URL)
                .map(|raw| Self::parse_url(&raw, keys::ENV_PUBLIC_BASE_URL))
                .transpose()?,
            request_timeout_secs: Self::parse_u64_or_default(keys::ENV_REQUEST_TIMEOUT_SECS, 30)?,
            body_size_limit_bytes: Self::parse_usize_or_default(keys::ENV_BODY_SIZE_LIMIT_BYTES, 1024 * 1024)?,
            log_level: Self::get_env_or_default(keys::ENV_LOG_LEVEL, "info"),
            log_format: Self::get_env_or_default(keys::ENV_LOG_FORMAT, "json"),
        };

        config.validate()?;

        Ok(config)
    }

    /// Signing secret bytes (use with caution)
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.expose_secret().as_bytes()
    }

    fn get_env_or_default(key: &str, default: &str) -> String {
        env::var(key).unwrap_or_else(|_| default.to_string())
    }

    fn get_optional_env(key: &str) -> Option<String> {
        match env::var(key) {
            Ok(value) if !value.is_empty() => Some(value),
            _ => None,
        }
    }

    fn get_required_env(key: &str) -> Result<String, CampError> {
        Self::get_optional_env(key)
            .ok_or_else(|| CampError::ConfigurationError(format!("{} not set", key)))
    }

    /// Parse port from PORT environment variable
    fn parse_port() -> Result<u16, CampError> {
        let port_str = env::var(keys::ENV_PORT).unwrap_or_else(|_| "8000".to_string());
        let port = port_str.parse::<u16>().map_err(|e| {
            CampError::ConfigurationError(format!("Invalid PORT value '{}': {}", port_str, e))
        })?;

        if port == 0 {
            return Err(CampError::ConfigurationError(
                "PORT must be between 1 and 65535".to_string(),
            ));
        }

        Ok(port)
    }

    /// Parse a positive u64 from an environment variable or return default
    fn parse_u64_or_default(key: &str, default: u64) -> Result<u64, CampError> {
        match env::var(key) {
            Ok(value) => {
                let parsed = value.parse::<u64>().map_err(|e| {
                    CampError::ConfigurationError(format!("Invalid {} value '{}': {}", key, value, e))
                })?;

                if parsed == 0 {
                    return Err(CampError::ConfigurationError(format!(
                        "{} must be greater than 0",
                        key
                    )));
                }

                Ok(parsed)
            }
            _ => Ok(default),
        }
    }

    fn parse_usize_or_default(key: &str, default: usize) -> Result<usize, CampError> {
        let parsed = Self::parse_u64_or_default(key, default as u64)?;
        usize::try_from(parsed)
            .map_err(|e| CampError::ConfigurationError(format!("Invalid {} value '{}': {}", key, parsed, e)))
    }

    fn parse_url(raw: &str, key: &str) -> Result<url::Url, CampError> {
        let parsed = url::Url::parse(raw)
            .map_err(|e| CampError::ConfigurationError(format!("Invalid {} URL '{}': {}", key, raw, e)))?;
        if parsed.host_str().is_none() {
            return Err(CampError::ConfigurationError(format!(
                "{} URL '{}' has no host",
                key, raw
            )));
        }
        Ok(parsed)
    }

    /// Validate all configuration values
    fn validate(&self) -> Result<(), CampError> {
        if self.jwt_secret_bytes().len() < token::MIN_SECRET_LENGTH {
            return Err(CampError::ConfigurationError(format!(
                "{} must be at least {} bytes",
                keys::ENV_JWT_SECRET,
                token::MIN_SECRET_LENGTH
            )));
        }

        if self.jwt_issuer.is_empty() || self.jwt_audience.is_empty() {
            return Err(CampError::ConfigurationError(
                "JWT issuer and audience must not be empty".to_string(),
            ));
        }

        // chrono::Duration::minutes panics beyond i64::MAX / 60_000
        if self.token_validity_minutes > 60 * 24 * 365 {
            return Err(CampError::ConfigurationError(format!(
                "{} must be at most one year",
                keys::ENV_TOKEN_VALIDITY_MINUTES
            )));
        }

        if let Some(ref path) = self.seed_yaml_path {
            Self::validate_file_path(path, "Seed YAML file")?;
        }

        Self::validate_log_level(&self.log_level)?;
        Self::validate_log_format(&self.log_format)?;

        Ok(())
    }

    /// Validate that a file path exists and is readable
    fn validate_file_path(path: &Path, description: &str) -> Result<(), CampError> {
        if !path.is_file() {
            return Err(CampError::ConfigurationError(format!(
                "{} not found at {:?}",
                description, path
            )));
        }

        std::fs::File::open(path).map_err(|e| {
            CampError::ConfigurationError(format!("Cannot read {} at {:?}: {}", description, path, e))
        })?;

        Ok(())
    }

    fn validate_log_level(level: &str) -> Result<(), CampError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&level.to_lowercase().as_str()) {
            return Err(CampError::ConfigurationError(format!(
                "Invalid LOG_LEVEL '{}': must be one of {}",
                level,
                valid_levels.join(", ")
            )));
        }
        Ok(())
    }

    fn validate_log_format(format: &str) -> Result<(), CampError> {
        if format != "json" && format != "text" {
            return Err(CampError::ConfigurationError(format!(
                "Invalid LOG_FORMAT '{}': must be 'json' or 'text'",
                format
            )));
        }
        Ok(())
    }

    /// Create a test configuration
    ///
    /// Bypasses environment variable loading and file validation.
    pub fn test_config() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 8000,
            jwt_secret: Secret::new("VERYLONGKEYVALUETHATISSECURE".to_string()),
            jwt_issuer: token::DEFAULT_ISSUER.to_string(),
            jwt_audience: token::DEFAULT_AUDIENCE.to_string(),
            token_validity_minutes: token::DEFAULT_VALIDITY_MINUTES as u64,
            session_ttl_secs: session::DEFAULT_TTL_SECS,
            seed_yaml_path: None,
            public_base_url: None,
            request_timeout_secs: 30,
            body_size_limit_bytes: 1024 * 1024,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("port", &self.port)
            .field("jwt_secret", &"<REDACTED>")
            .field("jwt_issuer", &self.jwt_issuer)
            .field("jwt_audience", &self.jwt_audience)
            .field("token_validity_minutes", &self.token_validity_minutes)
            .field("session_ttl_secs", &self.session_ttl_secs)
            .field("seed_yaml_path", &self.seed_yaml_path)
            .field("public_base_url", &self.public_base_url.as_ref().map(|u| u.as_str()))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("body_size_limit_bytes", &self.body_size_limit_bytes)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .finish()
    }
}
