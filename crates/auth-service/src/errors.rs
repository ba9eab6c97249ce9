use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Cryptographic error: {0}")]
    Crypto(String),

    /// No account matches the submitted email.
    #[error("No matching account")]
    NotFound,

    /// An account exists but its stored password differs from the submitted one.
    #[error("Credential mismatch")]
    CredentialMismatch,

    /// The request body could not be parsed.
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// The account-store lookup exceeded the configured bound.
    #[error("Account lookup timed out")]
    LookupTimeout,

    /// An account with the submitted email already exists.
    #[error("Account already exists")]
    EmailTaken,

    /// The request failed field validation.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A session token failed verification.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Internal server error")]
    Internal,
}

/// Client-visible failure body.
///
/// Every failure on the wire is `{"success": false, "error": "..."}`.
#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AuthError::Database(_) | AuthError::Crypto(_) | AuthError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            ),
            // Existing clients key off these two exact strings, so the
            // not-found/mismatch distinction stays visible on the wire.
            AuthError::NotFound => (StatusCode::BAD_REQUEST, "invalid info".to_string()),
            AuthError::CredentialMismatch => {
                (StatusCode::BAD_REQUEST, "invalid information".to_string())
            }
            AuthError::MalformedRequest(_) => {
                (StatusCode::BAD_REQUEST, "bad request".to_string())
            }
            AuthError::LookupTimeout => (
                StatusCode::SERVICE_UNAVAILABLE,
                "account lookup timed out".to_string(),
            ),
            AuthError::EmailTaken => {
                (StatusCode::BAD_REQUEST, "account already exists".to_string())
            }
            AuthError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AuthError::InvalidToken(reason) => (StatusCode::UNAUTHORIZED, reason.clone()),
        };

        let body = ErrorBody {
            success: false,
            error: message,
        };

        (status, Json(body)).into_response()
    }
}
