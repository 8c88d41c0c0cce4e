use axum::http::{HeaderMap, header};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Claims
///
/// Payload of every identity token. Signed with HS256 using the process-wide
/// secret from `AppConfig`; nothing about it is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub role_id: i64,
    /// Issued At (seconds since the epoch).
    pub iat: i64,
    /// Expiration Time (seconds since the epoch).
    pub exp: i64,
}

/// Identity
///
/// What a verified token proves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub role_id: i64,
    pub issued_at: i64,
}

/// TokenService
///
/// Issues and verifies identity tokens. Constructed once at startup and shared
/// through `AppState`; rotating the secret invalidates every outstanding token.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // Expiry is exact: no grace window past `exp`.
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    /// Issues a token valid from now for the configured window.
    pub fn issue(&self, user_id: i64, role_id: i64) -> Result<String, jsonwebtoken::errors::Error> {
        self.issue_at(user_id, role_id, Utc::now())
    }

    /// Issues a token whose window starts at `issued_at`.
    pub fn issue_at(
        &self,
        user_id: i64,
        role_id: i64,
        issued_at: DateTime<Utc>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            user_id,
            role_id,
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }

    /// Checks signature and expiry.
    ///
    /// A bad signature is reported as `Malformed` even if the claims are also expired.
    pub fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::Malformed,
            }
        })?;

        Ok(Identity {
            user_id: data.claims.user_id,
            role_id: data.claims.role_id,
            issued_at: data.claims.iat,
        })
    }

    /// Pulls the bearer token out of the headers and verifies it, returning the user id.
    pub fn extract_identity(&self, headers: &HeaderMap) -> Result<i64, AuthError> {
        let token = bearer_token(headers)?;
        Ok(self.verify(token)?.user_id)
    }
}

/// Returns the raw token from `Authorization: Bearer <token>`.
///
/// No header at all is `Missing`; a header with another scheme or no token is `Malformed`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::Missing)?
        .to_str()
        .map_err(|_| AuthError::Malformed)?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::Malformed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use axum::http::HeaderValue;

    fn service() -> TokenService {
        TokenService::new("unit-test-secret", Duration::hours(24))
    }

    #[test]
    fn claims_carry_the_configured_window() {
        let tokens = service();
        let issued = Utc::now();
        let token = tokens.issue_at(3, Role::USER_ID, issued).unwrap();
        let identity = tokens.verify(&token).unwrap();
        assert_eq!(identity.issued_at, issued.timestamp());
    }

    #[test]
    fn basic_scheme_is_malformed() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), Err(AuthError::Malformed));
    }

    #[test]
    fn empty_bearer_is_malformed() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), Err(AuthError::Malformed));
    }
}
