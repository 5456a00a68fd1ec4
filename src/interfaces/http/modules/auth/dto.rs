//! Token DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Signed token returned by `POST /jwt`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

/// Documentation shape for the claims body. Any JSON object is accepted;
/// `email` is the claim every guarded route reads.
#[allow(dead_code)]
#[derive(Debug, Deserialize, ToSchema)]
pub struct TokenRequestDoc {
    #[schema(example = "ana@example.com")]
    pub email: Option<String>,
}
