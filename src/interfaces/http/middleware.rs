//! Authentication middleware for Axum
//!
//! `auth_middleware` verifies the Bearer token and stores the caller in the
//! request extensions; `admin_middleware` must be layered inside it and
//! checks the caller's stored role.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use jsonwebtoken::errors::ErrorKind;
use tracing::{debug, warn};

use super::common::ErrorResponse;
use crate::application::ProfileService;
use crate::domain::{Capability, DomainError};
use crate::infrastructure::crypto::jwt::{verify_token, Claims, JwtConfig};
use crate::infrastructure::database::repositories::ProfileRepository;

pub type SharedProfileService = Arc<ProfileService<ProfileRepository>>;

/// Authentication state containing JWT config and profile lookup
#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
    pub profiles: SharedProfileService,
}

/// Caller identity decoded from a verified token
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub claims: Claims,
}

impl AuthenticatedUser {
    pub fn email(&self) -> Option<&str> {
        self.claims.email.as_deref()
    }
}

/// Errors that can occur during authentication
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    ExpiredToken,
    Forbidden,
}

impl AuthError {
    fn status(self) -> StatusCode {
        match self {
            Self::Forbidden => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    fn message(self) -> &'static str {
        match self {
            Self::MissingToken => "unauthorized access",
            Self::InvalidToken => "unauthorized access",
            Self::ExpiredToken => "token has expired",
            Self::Forbidden => "forbidden access",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorResponse::new(self.message()))).into_response()
    }
}

/// Extract token from Authorization header
fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// JWT authentication middleware - requires valid token
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(auth_header) = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    else {
        return AuthError::MissingToken.into_response();
    };

    let Some(token) = extract_token(auth_header) else {
        return AuthError::InvalidToken.into_response();
    };

    match verify_token(token, &auth_state.jwt_config) {
        Ok(claims) => {
            request.extensions_mut().insert(AuthenticatedUser { claims });
            next.run(request).await
        }
        Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => {
            debug!("Rejected expired token");
            AuthError::ExpiredToken.into_response()
        }
        Err(e) => {
            debug!("Rejected token: {}", e);
            AuthError::InvalidToken.into_response()
        }
    }
}

/// Admin-only middleware - must be used after auth_middleware
pub async fn admin_middleware(
    State(auth_state): State<AuthState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Some(user) = request.extensions().get::<AuthenticatedUser>() else {
        return AuthError::MissingToken.into_response();
    };

    match auth_state
        .profiles
        .authorize(user.email(), Capability::ManageProfiles)
        .await
    {
        Ok(_) => next.run(request).await,
        Err(DomainError::Forbidden(reason)) => {
            warn!(email = ?user.email(), "Admin access denied: {}", reason);
            AuthError::Forbidden.into_response()
        }
        Err(e) => super::common::ApiError::from(e).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_prefix_is_required() {
        assert_eq!(extract_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(extract_token("Basic abc"), None);
        assert_eq!(extract_token("Bearer "), None);
        assert_eq!(extract_token("abc.def"), None);
    }

    #[test]
    fn auth_errors_split_401_and_403() {
        assert_eq!(AuthError::MissingToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::ExpiredToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::Forbidden.status(), StatusCode::FORBIDDEN);
    }
}
