//! Token primitives shared by the story platform services.

pub mod jwt;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use jwt::{Claims, JwtError, TokenIssuer, TokenValidator};
