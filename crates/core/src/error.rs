use serde::Serialize;
use thiserror::Error;

/// Application error taxonomy.
///
/// Each variant maps to an HTTP status code via [`ApiError::status_code`] and
/// to a stable machine-readable code via [`ApiError::code`]. The axum
/// [`IntoResponse`](axum::response::IntoResponse) impl produces a JSON body of
/// the form `{ "code": "...", "message": "..." }`.
#[derive(Error, Debug)]
pub enum ApiError {
    // --- 400 Bad Request ---
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Expired(String),

    #[error("{0}")]
    AlreadyAccepted(String),

    // --- 401 Unauthorized ---
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Session not found or expired")]
    SessionNotFound,

    // --- 403 Forbidden ---
    #[error("{0}")]
    EmailMismatch(String),

    #[error("{0}")]
    Forbidden(String),

    // --- 404 Not Found ---
    #[error("{0}")]
    NotFound(String),

    // --- 409 Conflict ---
    #[error("{0}")]
    Duplicate(String),

    #[error("{0}")]
    Conflict(String),

    // --- 502 Bad Gateway ---
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    Upstream(String),

    // --- 500 Internal Server Error ---
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::Expired(_) | Self::AlreadyAccepted(_) => 400,
            Self::Unauthenticated | Self::SessionNotFound => 401,
            Self::EmailMismatch(_) | Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Duplicate(_) | Self::Conflict(_) => 409,
            Self::Store(_) | Self::Upstream(_) => 502,
            Self::Config(_) | Self::Serialization(_) | Self::Internal(_) => 500,
        }
    }

    /// Stable machine-readable code carried in every error body.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Expired(_) => "expired",
            Self::AlreadyAccepted(_) => "already_accepted",
            Self::Unauthenticated | Self::SessionNotFound => "unauthenticated",
            Self::EmailMismatch(_) => "email_mismatch",
            Self::Forbidden(_) => "forbidden",
            Self::NotFound(_) => "not_found",
            Self::Duplicate(_) => "duplicate",
            Self::Conflict(_) => "conflict",
            Self::Store(_) | Self::Upstream(_) => "upstream_failure",
            Self::Config(_) | Self::Serialization(_) | Self::Internal(_) => "internal",
        }
    }

    // --- Constructors ---

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn expired(message: impl Into<String>) -> Self {
        Self::Expired(message.into())
    }

    pub fn already_accepted(message: impl Into<String>) -> Self {
        Self::AlreadyAccepted(message.into())
    }

    pub fn email_mismatch(message: impl Into<String>) -> Self {
        Self::EmailMismatch(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn duplicate(message: impl Into<String>) -> Self {
        Self::Duplicate(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

/// Error body `{ code, message }` returned for every failed request.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = axum::http::StatusCode::from_u16(self.status_code())
            .unwrap_or(axum::http::StatusCode::INTERNAL_SERVER_ERROR);

        // Internal errors use a generic message to avoid leaking details.
        let message = match self.status_code() {
            500 => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        let body = ErrorBody {
            code: self.code(),
            message,
        };

        (status, axum::Json(body)).into_response()
    }
}

/// Failures raised by a [`StoreAdapter`](crate::store::StoreAdapter)
/// implementation talking to the hosted document store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_match_taxonomy() {
        assert_eq!(ApiError::validation("bad email").status_code(), 400);
        assert_eq!(ApiError::expired("gone").status_code(), 400);
        assert_eq!(ApiError::already_accepted("done").status_code(), 400);
        assert_eq!(ApiError::Unauthenticated.status_code(), 401);
        assert_eq!(ApiError::email_mismatch("not you").status_code(), 403);
        assert_eq!(ApiError::not_found("no token").status_code(), 404);
        assert_eq!(ApiError::duplicate("pending exists").status_code(), 409);
        assert_eq!(ApiError::upstream("mail down").status_code(), 502);
        assert_eq!(ApiError::internal("oops").status_code(), 500);
    }

    #[test]
    fn test_codes_are_distinct_for_invitation_errors() {
        // Expired and already-accepted must be distinguishable by the client.
        assert_eq!(ApiError::expired("x").code(), "expired");
        assert_eq!(ApiError::already_accepted("x").code(), "already_accepted");
        assert_eq!(ApiError::email_mismatch("x").code(), "email_mismatch");
        assert_eq!(ApiError::not_found("x").code(), "not_found");
        assert_eq!(ApiError::duplicate("x").code(), "duplicate");
    }

    #[test]
    fn test_store_error_maps_to_upstream_failure() {
        let err = ApiError::from(StoreError::Query("timeout".into()));
        assert_eq!(err.status_code(), 502);
        assert_eq!(err.code(), "upstream_failure");
    }
}
