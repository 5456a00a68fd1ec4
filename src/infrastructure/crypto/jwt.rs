//! JWT Token handling
//!
//! Tokens carry whatever claims the client asked for (normally just an
//! `email`) plus server-controlled `iat`, `exp` and `iss`.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_ISSUER: &str = "livecolab";

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token expiration time in hours
    pub expiration_hours: i64,
    /// Issuer claim
    pub issuer: String,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expiration_hours", &self.expiration_hours)
            .field("issuer", &self.issuer)
            .finish()
    }
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, expiration_hours: i64) -> Self {
        Self {
            secret: secret.into(),
            expiration_hours,
            issuer: DEFAULT_ISSUER.to_string(),
        }
    }
}

/// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Email of the profile the token speaks for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Issuer
    pub iss: String,
    /// Any other client-supplied claims, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    /// Build claims from a client-supplied object. Reserved claims in
    /// `payload` are replaced by server values.
    pub fn from_payload(mut payload: Map<String, Value>, config: &JwtConfig) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(config.expiration_hours);

        // A non-string email cannot identify a profile; drop it.
        let email = match payload.remove("email") {
            Some(Value::String(email)) => Some(email),
            _ => None,
        };
        for reserved in ["exp", "iat", "iss"] {
            payload.remove(reserved);
        }

        Self {
            email,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: config.issuer.clone(),
            extra: payload,
        }
    }
}

/// Sign already-built claims
pub fn sign_claims(claims: &Claims, config: &JwtConfig) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Create a JWT token for an arbitrary claims object
pub fn issue_token(
    payload: Map<String, Value>,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    sign_claims(&Claims::from_payload(payload, config), config)
}

/// Verify and decode a JWT token
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.set_issuer(&[&config.issuer]);
    validation.leeway = 0;
    // `aud` is a client claim here; no audience is configured to check it against.
    validation.validate_aud = false;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> JwtConfig {
        JwtConfig::new("test-secret", 1)
    }

    fn payload(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_issue_and_verify_token() {
        let config = config();
        let token = issue_token(payload(json!({"email": "ana@example.com", "name": "Ana"})), &config).unwrap();

        let claims = verify_token(&token, &config).unwrap();
        assert_eq!(claims.email.as_deref(), Some("ana@example.com"));
        assert_eq!(claims.extra.get("name"), Some(&json!("Ana")));
        assert_eq!(claims.iss, DEFAULT_ISSUER);
        assert_eq!(claims.exp - claims.iat, 3600);
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn reserved_claims_are_server_controlled() {
        let config = config();
        let claims = Claims::from_payload(
            payload(json!({"email": "a@b.c", "exp": 9999999999i64, "iss": "someone-else"})),
            &config,
        );
        assert_eq!(claims.iss, DEFAULT_ISSUER);
        assert!(claims.exp < 9999999999);
        assert!(!claims.extra.contains_key("exp"));
    }

    #[test]
    fn audience_claim_passes_through() {
        let config = config();
        let token = issue_token(payload(json!({"email": "a@b.c", "aud": "frontend"})), &config).unwrap();

        let claims = verify_token(&token, &config).unwrap();
        assert_eq!(claims.email.as_deref(), Some("a@b.c"));
        assert_eq!(claims.extra.get("aud"), Some(&json!("frontend")));
    }

    #[test]
    fn test_invalid_token() {
        let result = verify_token("invalid-token", &config());
        assert!(result.is_err());
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let token = issue_token(payload(json!({"email": "a@b.c"})), &JwtConfig::new("other", 1)).unwrap();
        assert!(verify_token(&token, &config()).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = config();
        let mut claims = Claims::from_payload(payload(json!({"email": "a@b.c"})), &config);
        claims.iat -= 7200;
        claims.exp = claims.iat + 3600;
        let token = sign_claims(&claims, &config).unwrap();

        assert!(claims.exp < Utc::now().timestamp());
        assert!(verify_token(&token, &config).is_err());
    }
}
