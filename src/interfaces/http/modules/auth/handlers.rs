//! Token handler

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde_json::{Map, Value};
use tracing::{debug, error};

use super::dto::TokenResponse;
use crate::infrastructure::crypto::jwt::issue_token;
use crate::interfaces::http::common::{ApiError, ErrorResponse};
use crate::interfaces::http::middleware::AuthState;

#[utoipa::path(
    post,
    path = "/jwt",
    tag = "Authentication",
    request_body(content = super::dto::TokenRequestDoc, description = "Arbitrary claims object"),
    responses(
        (status = 200, description = "Signed token", body = TokenResponse),
        (status = 400, description = "Body is not a JSON object", body = ErrorResponse)
    )
)]
pub async fn issue_jwt(
    State(state): State<AuthState>,
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(claims) = body.map_err(|e| ApiError::bad_request(format!("Invalid JSON: {}", e.body_text())))?;

    debug!(email = ?claims.get("email"), "Issuing token");
    let token = issue_token(claims, &state.jwt_config).map_err(|e| {
        error!("Failed to sign token: {}", e);
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    })?;

    Ok(Json(TokenResponse { token }))
}
