// Cryptographic utilities: HS256 token signing/verification and HMAC-bound session IDs

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::fmt;
use uuid::Uuid;

use crate::core::constants::{session, token};
use crate::core::errors::{CryptoError, TokenError};
use crate::core::models::ClaimSet;

type HmacSha256 = Hmac<Sha256>;

/// `aud` may be a single string or a list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum Audience {
    One(String),
    Many(Vec<String>),
}

/// Token payload; field order is the order written on the wire
#[derive(Debug, Serialize, Deserialize)]
struct TokenClaims {
    sub: String,
    jti: String,
    iss: String,
    aud: Audience,
    exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    iat: Option<i64>,
}

/// Claims recovered from a token that passed every check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedClaims {
    pub claims: ClaimSet,
    pub issuer: String,
    pub audience: String,
    pub expires_at: DateTime<Utc>,
    pub issued_at: Option<DateTime<Utc>>,
}

impl VerifiedClaims {
    pub fn subject(&self) -> Option<&str> {
        self.claims.subject()
    }
}

/// Symmetric signer for bearer tokens
///
/// Tokens are compact HS256 JWTs. The payload carries `sub` and `jti` in
/// that order, followed by `iss`, `aud`, `exp` and `iat`.
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
}

impl TokenSigner {
    /// Create a signer bound to one issuer/audience pair
    pub fn new(
        secret: &[u8],
        issuer: impl Into<String>,
        audience: impl Into<String>,
    ) -> Result<Self, CryptoError> {
        if secret.len() < token::MIN_SECRET_LENGTH {
            return Err(CryptoError::KeyError(format!(
                "signing secret must be at least {} bytes, got {}",
                token::MIN_SECRET_LENGTH,
                secret.len()
            )));
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            issuer: issuer.into(),
            audience: audience.into(),
        })
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    /// Sign a claim set together with issuer, audience and validity instants
    ///
    /// The claim set must hold exactly `sub` then `jti`.
    pub fn sign(
        &self,
        claims: &ClaimSet,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<String, CryptoError> {
        let mut entries = claims.iter();
        let (sub, jti) = match (entries.next(), entries.next(), entries.next()) {
            (Some((token::CLAIM_SUBJECT, sub)), Some((token::CLAIM_TOKEN_ID, jti)), None) => (sub, jti),
            _ => {
                let keys: Vec<&str> = claims.iter().map(|(k, _)| k).collect();
                return Err(CryptoError::SigningError(format!(
                    "claim set must be [sub, jti], got {:?}",
                    keys
                )));
            }
        };

        let payload = TokenClaims {
            sub: sub.to_string(),
            jti: jti.to_string(),
            iss: self.issuer.clone(),
            aud: Audience::One(self.audience.clone()),
            exp: expires_at.timestamp(),
            iat: Some(issued_at.timestamp()),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &payload, &self.encoding)
            .map_err(|e| CryptoError::SigningError(e.to_string()))
    }

    /// Verify a token's signature, issuer, audience and expiration as of `now`
    ///
    /// Expiry is judged against `now` rather than the system clock; a token
    /// is dead from its `exp` second onward.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<VerifiedClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.leeway = 0;
        validation.validate_exp = false;

        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding, &validation)
            .map_err(|e| Self::token_error(e.into_kind()))?;
        let payload = data.claims;

        if now.timestamp() >= payload.exp {
            return Err(TokenError::Expired);
        }
        let expires_at = DateTime::<Utc>::from_timestamp(payload.exp, 0)
            .ok_or_else(|| TokenError::Malformed("exp out of range".to_string()))?;
        let issued_at = payload
            .iat
            .and_then(|iat| DateTime::<Utc>::from_timestamp(iat, 0));

        let mut claims = ClaimSet::new();
        claims.push(token::CLAIM_SUBJECT, payload.sub);
        claims.push(token::CLAIM_TOKEN_ID, payload.jti);

        Ok(VerifiedClaims {
            claims,
            issuer: payload.iss,
            audience: self.audience.clone(),
            expires_at,
            issued_at,
        })
    }

    fn token_error(kind: ErrorKind) -> TokenError {
        match kind {
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                TokenError::UnsupportedAlgorithm("only HS256 is accepted".to_string())
            }
            ErrorKind::InvalidIssuer => TokenError::IssuerMismatch,
            ErrorKind::InvalidAudience => TokenError::AudienceMismatch,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::MissingRequiredClaim(claim) => TokenError::Malformed(format!("missing {}", claim)),
            other => TokenError::Malformed(format!("{:?}", other)),
        }
    }
}

impl fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSigner")
            .field("secret", &"<REDACTED>")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish()
    }
}

/// Mints and checks opaque session identifiers
pub struct SessionSigner {
    secret: [u8; session::SECRET_KEY_LENGTH],
}

impl SessionSigner {
    /// Create a new signer with a secure random ephemeral key
    pub fn try_new() -> Result<Self, CryptoError> {
        let mut secret = [0u8; session::SECRET_KEY_LENGTH];
        OsRng
            .try_fill_bytes(&mut secret)
            .map_err(|_| CryptoError::RandomError)?;
        Ok(Self { secret })
    }

    /// Generate a cryptographically bound Session ID
    /// Format: "{version}.{uuid_b64}.{hmac_b64}"
    pub fn generate_session_id(&self) -> Result<String, CryptoError> {
        let uuid = Uuid::new_v4();
        let uuid_bytes = uuid.as_bytes();

        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| CryptoError::KeyError(e.to_string()))?;
        mac.update(uuid_bytes);
        let signature = mac.finalize().into_bytes();

        Ok(format!(
            "{}.{}.{}",
            session::SESSION_ID_VERSION,
            URL_SAFE_NO_PAD.encode(uuid_bytes),
            URL_SAFE_NO_PAD.encode(signature)
        ))
    }

    /// Validate a Session ID's integrity using constant-time comparison
    pub fn validate_session_id(&self, session_id: &str) -> bool {
        let parts: Vec<&str> = session_id.split('.').collect();
        if parts.len() != 3 || parts[0] != session::SESSION_ID_VERSION {
            return false;
        }

        let uuid_bytes = match URL_SAFE_NO_PAD.decode(parts[1]) {
            Ok(b) => b,
            Err(_) => return false,
        };
        let provided_sig = match URL_SAFE_NO_PAD.decode(parts[2]) {
            Ok(b) => b,
            Err(_) => return false,
        };

        let mut mac = match HmacSha256::new_from_slice(&self.secret) {
            Ok(m) => m,
            Err(_) => return false,
        };
        mac.update(&uuid_bytes);
        mac.verify_slice(&provided_sig).is_ok()
    }
}
