use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// AuthError
///
/// Every way a request can fail to prove who it is. All variants surface as 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No `Authorization: Bearer <token>` header was presented.
    #[error("missing bearer token")]
    Missing,
    /// The token could not be parsed or its signature does not verify.
    #[error("malformed or unverifiable token")]
    Malformed,
    /// The token is past its `exp` claim.
    #[error("token expired")]
    Expired,
    /// The token predates the account's most recent password change.
    #[error("token revoked by a credential change")]
    Revoked,
    /// The token verified but names a user the store does not know.
    #[error("unknown account")]
    UnknownAccount,
}

/// StoreError
///
/// Failure of the persistence layer. Never retried; always a 500 at the boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
    /// A unique constraint rejected the write (SQLSTATE 23505).
    #[error("{0} already exists")]
    Duplicate(String),
    /// A foreign key rejected the write (SQLSTATE 23503): the row is still
    /// referenced, or it points at a row that does not exist.
    #[error("{0} violates a reference constraint")]
    InUse(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db) = err.as_database_error() {
            let constraint = db.constraint().unwrap_or("row").to_string();
            if db.is_unique_violation() {
                return Self::Duplicate(constraint);
            }
            if db.is_foreign_key_violation() {
                return Self::InUse(constraint);
            }
        }
        Self::Database(err)
    }
}

/// ErrorBody
///
/// JSON envelope returned for every rejected request.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code, e.g. "FORBIDDEN".
    pub code: String,
    pub message: String,
}

/// AppError
///
/// The single error type handlers and middleware return. Its `IntoResponse`
/// implementation is the only place status codes are chosen.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The entity addressed by the request path does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// An identifier inside the request body does not resolve.
    #[error("unknown reference: {0}")]
    UnknownReference(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Store(StoreError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Auth(_) | Self::InvalidCredentials => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::UnknownReference(_) => (StatusCode::BAD_REQUEST, "UNKNOWN_REFERENCE"),
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::Store(_) | Self::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::Store(_) | Self::Internal(_) => {
                tracing::error!(error = %self, "request failed with an internal error");
                "An internal error occurred".to_string()
            }
            Self::Auth(reason) => {
                tracing::debug!(%reason, "request rejected: unauthenticated");
                self.to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Constraint violations are the caller's conflict, not a server fault.
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(_) | StoreError::InUse(_) => Self::Conflict(err.to_string()),
            other => Self::Store(other),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Self::Internal(format!("token signing failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_errors_are_unauthorized() {
        for reason in [
            AuthError::Missing,
            AuthError::Malformed,
            AuthError::Expired,
            AuthError::Revoked,
            AuthError::UnknownAccount,
        ] {
            let (status, code) = AppError::from(reason).status_and_code();
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(code, "UNAUTHORIZED");
        }
    }

    #[test]
    fn reference_and_path_misses_map_differently() {
        let (body_status, _) = AppError::UnknownReference("order 9".into()).status_and_code();
        let (path_status, _) = AppError::NotFound("order 9".into()).status_and_code();
        assert_eq!(body_status, StatusCode::BAD_REQUEST);
        assert_eq!(path_status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn store_failures_hide_detail() {
        let err = AppError::Store(StoreError::Database(sqlx::Error::PoolClosed));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn constraint_violations_are_conflicts() {
        for err in [
            StoreError::Duplicate("users_username_key".into()),
            StoreError::InUse("transactions_order_id_fkey".into()),
        ] {
            let (status, code) = AppError::from(err).status_and_code();
            assert_eq!(status, StatusCode::CONFLICT);
            assert_eq!(code, "CONFLICT");
        }
        let (status, _) = AppError::from(StoreError::from(sqlx::Error::PoolClosed)).status_and_code();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn forbidden_is_403() {
        let (status, code) = AppError::Forbidden("role user".into()).status_and_code();
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(code, "FORBIDDEN");
    }
}
