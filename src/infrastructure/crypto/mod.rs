//! Token signing and verification

pub mod jwt;

pub use jwt::{issue_token, sign_claims, verify_token, Claims, JwtConfig};
