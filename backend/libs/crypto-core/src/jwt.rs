/// RS256 JWT issuing and validation shared by the story services.
///
/// Validation is instance based: a service builds one [`TokenValidator`] from the
/// public key at startup and shares it between workers. Only RS256 is accepted,
/// so a token signed with a symmetric algorithm never validates.
///
/// ```rust,ignore
/// use crypto_core::jwt::{load_validation_key, TokenValidator};
///
/// let validator = TokenValidator::from_rsa_pem(&load_validation_key()?)?;
/// let claims = validator.validate(token)?;
/// ```
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JWT algorithm. Anything else is rejected during validation.
pub const JWT_ALGORITHM: Algorithm = Algorithm::RS256;

const ACCESS_TOKEN_EXPIRY_MINUTES: i64 = 60;
const REFRESH_TOKEN_EXPIRY_DAYS: i64 = 30;

pub const ACCESS_TOKEN_TYPE: &str = "access";
pub const REFRESH_TOKEN_TYPE: &str = "refresh";

/// Claims carried by every story-platform token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject: the caller's user id.
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// "access" or "refresh"
    pub token_type: String,
    pub username: String,
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT public key not configured: set JWT_PUBLIC_KEY_PEM or JWT_PUBLIC_KEY_FILE")]
    MissingKey,

    #[error("failed to read JWT key file {path}: {source}")]
    KeyFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse RSA key: {0}")]
    InvalidKey(#[source] jsonwebtoken::errors::Error),

    #[error("token expired")]
    Expired,

    #[error("token validation failed: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),

    #[error("expected an {expected} token, got {actual}")]
    WrongTokenType { expected: &'static str, actual: String },

    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Load the PEM encoded validation key from the environment.
///
/// `JWT_PUBLIC_KEY_PEM` holds the key inline; `JWT_PUBLIC_KEY_FILE` points at a
/// file containing it. The inline variable wins when both are set.
pub fn load_validation_key() -> Result<String, JwtError> {
    if let Ok(pem) = std::env::var("JWT_PUBLIC_KEY_PEM") {
        if !pem.trim().is_empty() {
            tracing::debug!("JWT validation key loaded from JWT_PUBLIC_KEY_PEM");
            return Ok(pem);
        }
    }

    let path = std::env::var("JWT_PUBLIC_KEY_FILE").map_err(|_| JwtError::MissingKey)?;
    let pem = std::fs::read_to_string(&path)
        .map_err(|source| JwtError::KeyFile { path: path.clone(), source })?;
    tracing::debug!(path = %path, "JWT validation key loaded from file");
    Ok(pem)
}

/// Validates access tokens against one RSA public key.
#[derive(Clone)]
pub struct TokenValidator {
    key: DecodingKey,
    validation: Validation,
}

impl TokenValidator {
    pub fn from_rsa_pem(public_key_pem: &str) -> Result<Self, JwtError> {
        let key =
            DecodingKey::from_rsa_pem(public_key_pem.as_bytes()).map_err(JwtError::InvalidKey)?;

        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = true;
        validation.leeway = 0;

        Ok(Self { key, validation })
    }

    /// Verify signature and expiry, and require an access token.
    pub fn validate(&self, token: &str) -> Result<Claims, JwtError> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Invalid(e),
            }
        })?;

        if data.claims.token_type != ACCESS_TOKEN_TYPE {
            return Err(JwtError::WrongTokenType {
                expected: ACCESS_TOKEN_TYPE,
                actual: data.claims.token_type,
            });
        }

        Ok(data.claims)
    }
}

/// Signs tokens with an RSA private key. Used by the identity side and by tests.
pub struct TokenIssuer {
    key: EncodingKey,
    access_ttl: Duration,
}

impl TokenIssuer {
    pub fn from_rsa_pem(private_key_pem: &str) -> Result<Self, JwtError> {
        let key =
            EncodingKey::from_rsa_pem(private_key_pem.as_bytes()).map_err(JwtError::InvalidKey)?;

        Ok(Self {
            key,
            access_ttl: Duration::minutes(ACCESS_TOKEN_EXPIRY_MINUTES),
        })
    }

    /// Override the access token lifetime. A negative value yields already expired tokens.
    pub fn with_access_ttl(mut self, ttl: Duration) -> Self {
        self.access_ttl = ttl;
        self
    }

    pub fn issue_access_token(&self, user_id: &str, username: &str) -> Result<String, JwtError> {
        self.issue(user_id, username, ACCESS_TOKEN_TYPE, self.access_ttl)
    }

    pub fn issue_refresh_token(&self, user_id: &str, username: &str) -> Result<String, JwtError> {
        self.issue(
            user_id,
            username,
            REFRESH_TOKEN_TYPE,
            Duration::days(REFRESH_TOKEN_EXPIRY_DAYS),
        )
    }

    fn issue(
        &self,
        user_id: &str,
        username: &str,
        token_type: &str,
        ttl: Duration,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            token_type: token_type.to_string(),
            username: username.to_string(),
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.key).map_err(JwtError::Signing)
    }
}
