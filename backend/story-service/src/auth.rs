/// Auth verifier: turns a bearer credential into a caller identity.
///
/// The router only talks to the [`AuthVerifier`] trait. Production uses
/// [`JwtVerifier`] backed by `crypto-core`; when no key is configured the
/// service runs with [`DenyAllVerifier`] and every protected route answers 401.
use crypto_core::jwt::{JwtError, TokenValidator};
use thiserror::Error;

/// Identity of an authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub user_id: String,
    pub username: String,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingCredentials,

    #[error("Invalid Authorization scheme")]
    InvalidScheme,

    #[error("Invalid or expired token")]
    InvalidToken(#[source] JwtError),

    #[error("Authentication is not configured")]
    NotConfigured,
}

pub trait AuthVerifier: Send + Sync {
    /// Verify a bearer token (without the `Bearer ` prefix).
    fn verify(&self, token: &str) -> Result<CallerIdentity, AuthError>;
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthError::MissingCredentials)?;
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::InvalidScheme)
}

/// RS256 JWT verification.
pub struct JwtVerifier {
    validator: TokenValidator,
}

impl JwtVerifier {
    pub fn new(validator: TokenValidator) -> Self {
        Self { validator }
    }

    pub fn from_public_key_pem(pem: &str) -> Result<Self, JwtError> {
        Ok(Self::new(TokenValidator::from_rsa_pem(pem)?))
    }
}

impl AuthVerifier for JwtVerifier {
    fn verify(&self, token: &str) -> Result<CallerIdentity, AuthError> {
        let claims = self
            .validator
            .validate(token)
            .map_err(AuthError::InvalidToken)?;

        Ok(CallerIdentity {
            user_id: claims.sub,
            username: claims.username,
        })
    }
}

/// Rejects every credential. Installed when no JWT key is available.
pub struct DenyAllVerifier;

impl AuthVerifier for DenyAllVerifier {
    fn verify(&self, _token: &str) -> Result<CallerIdentity, AuthError> {
        Err(AuthError::NotConfigured)
    }
}
