//! Token-table verifier for integration tests.
//!
//! Accepts exactly the tokens it was built with and counts verification calls.

use crypto_core::JwtError;
use jsonwebtoken::errors::ErrorKind;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use story_service::auth::{AuthError, AuthVerifier, CallerIdentity};

pub const ALICE_TOKEN: &str = "token-alice";
pub const BOB_TOKEN: &str = "token-bob";

#[derive(Clone)]
pub struct StaticTokenVerifier {
    identities: Arc<HashMap<String, CallerIdentity>>,
    verify_calls: Arc<AtomicUsize>,
}

impl StaticTokenVerifier {
    pub fn new(entries: Vec<(&str, &str, &str)>) -> Self {
        let identities = entries
            .into_iter()
            .map(|(token, user_id, username)| {
                (
                    token.to_string(),
                    CallerIdentity {
                        user_id: user_id.to_string(),
                        username: username.to_string(),
                    },
                )
            })
            .collect();

        Self {
            identities: Arc::new(identities),
            verify_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Alice (u1) and Bob (u2).
    pub fn with_default_users() -> Self {
        Self::new(vec![(ALICE_TOKEN, "u1", "alice"), (BOB_TOKEN, "u2", "bob")])
    }

    pub fn verify_calls(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }
}

impl AuthVerifier for StaticTokenVerifier {
    fn verify(&self, token: &str) -> Result<CallerIdentity, AuthError> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        self.identities.get(token).cloned().ok_or_else(|| {
            AuthError::InvalidToken(JwtError::Invalid(ErrorKind::InvalidToken.into()))
        })
    }
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}
