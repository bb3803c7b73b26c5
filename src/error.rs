//! Error types and HTTP error response handling.
//!
//! This module defines the application-wide error taxonomy and how each
//! class is converted into an HTTP response with an appropriate status
//! code and JSON body.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// Every failure in the system is classified into one of these variants.
/// The classification drives two decisions:
///
/// - **HTTP mapping**: each variant maps to one status code (see
///   [`IntoResponse`] below).
/// - **Retry safety**: only `Transient` failures are safe to retry from
///   scratch; retrying `Invalid` or `Conflict` with the same input will
///   reproduce the same failure.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A referenced account, user, or record does not exist.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("{0}")]
    NotFound(String),

    /// A uniqueness or foreign-key constraint was violated.
    ///
    /// Returns HTTP 409 Conflict.
    #[error("{0}")]
    Conflict(String),

    /// A precondition failed: equal account ids, non-positive amount,
    /// expired/used/mismatched verification code, malformed fields.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("{0}")]
    Invalid(String),

    /// Connection, pool, serialization, or deadlock failure from the
    /// storage backend. The whole operation may be retried from scratch.
    ///
    /// Returns HTTP 503 Service Unavailable.
    #[error("transient storage failure: {0}")]
    Transient(String),

    /// The side-effect callback supplied to the user-creation operation
    /// failed; the user insert was rolled back. Chains the cause.
    ///
    /// Returns HTTP 500 Internal Server Error.
    #[error("side effect failed: {0}")]
    SideEffectFailed(#[source] Box<AppError>),

    /// Missing, expired, or forged token; failed ownership or role check.
    ///
    /// Returns HTTP 401 Unauthorized.
    #[error("{0}")]
    Unauthorized(String),

    /// Any other storage error. Details are hidden from clients.
    ///
    /// Returns HTTP 500 Internal Server Error.
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    /// A unit of work failed and the rollback that followed it also
    /// failed. The original failure is never silently swallowed; the
    /// rollback failure is chained as a secondary error.
    #[error("rollback failed after error: {cause} (rollback: {rollback})")]
    RollbackFailed {
        cause: Box<AppError>,
        rollback: sqlx::Error,
    },
}

impl AppError {
    /// Whether retrying the whole operation from scratch may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::Transient(_))
    }
}

/// Classify raw sqlx errors into the taxonomy, so `?` on any accessor
/// call yields a taxonomy-correct error.
///
/// # Mapping
///
/// - `RowNotFound` → `NotFound`
/// - unique / foreign-key violation → `Conflict`
/// - check violation (e.g. the `balance >= 0` constraint) → `Invalid`
/// - Postgres 40001 (serialization failure) and 40P01 (deadlock
///   detected), pool exhaustion/shutdown, and I/O errors → `Transient`
/// - everything else → `Database`
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("record not found".to_string()),
            sqlx::Error::PoolTimedOut => {
                AppError::Transient("connection pool timed out".to_string())
            }
            sqlx::Error::PoolClosed => AppError::Transient("connection pool closed".to_string()),
            sqlx::Error::Io(e) => AppError::Transient(e.to_string()),
            sqlx::Error::Database(db_err) => {
                if db_err.is_unique_violation() || db_err.is_foreign_key_violation() {
                    AppError::Conflict(db_err.message().to_string())
                } else if db_err.is_check_violation() {
                    AppError::Invalid(db_err.message().to_string())
                } else if matches!(db_err.code().as_deref(), Some("40001") | Some("40P01")) {
                    AppError::Transient(db_err.message().to_string())
                } else {
                    AppError::Database(sqlx::Error::Database(db_err))
                }
            }
            other => AppError::Database(other),
        }
    }
}

/// Convert AppError into an HTTP response.
///
/// All errors return JSON in this format:
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::NotFound(ref msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            AppError::Conflict(ref msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            AppError::Invalid(ref msg) => (StatusCode::BAD_REQUEST, "invalid_request", msg.clone()),
            AppError::Unauthorized(ref msg) => {
                (StatusCode::UNAUTHORIZED, "unauthorized", msg.clone())
            }
            AppError::Transient(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "temporarily_unavailable",
                "The service is temporarily unavailable, please retry".to_string(),
            ),
            AppError::SideEffectFailed(_)
            | AppError::Database(_)
            | AppError::RollbackFailed { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "An internal error occurred".to_string(),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transient_is_retryable() {
        assert!(AppError::Transient("pool timed out".into()).is_transient());
        assert!(!AppError::NotFound("account not found".into()).is_transient());
        assert!(!AppError::Conflict("duplicate username".into()).is_transient());
        assert!(!AppError::Invalid("amount must be positive".into()).is_transient());
        assert!(!AppError::Unauthorized("missing token".into()).is_transient());
    }

    #[test]
    fn pool_errors_classify_as_transient() {
        let err: AppError = sqlx::Error::PoolTimedOut.into();
        assert!(err.is_transient());

        let err: AppError = sqlx::Error::PoolClosed.into();
        assert!(err.is_transient());
    }

    #[test]
    fn row_not_found_classifies_as_not_found() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn status_codes_follow_the_taxonomy() {
        let cases = [
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::Conflict("x".into()), StatusCode::CONFLICT),
            (AppError::Invalid("x".into()), StatusCode::BAD_REQUEST),
            (AppError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (
                AppError::Transient("x".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                AppError::SideEffectFailed(Box::new(AppError::Transient("x".into()))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn rollback_failure_keeps_the_original_cause() {
        let err = AppError::RollbackFailed {
            cause: Box::new(AppError::Invalid("amount must be positive".into())),
            rollback: sqlx::Error::PoolClosed,
        };

        let msg = err.to_string();
        assert!(msg.contains("amount must be positive"));
        assert!(msg.contains("rollback"));
    }
}
