use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hrkit_auth::AuthError;
use hrkit_storage::StoreError;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::validation::Violation;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Errors a handler can answer with
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation failed")]
    Validation(Vec<Violation>),

    #[error("Malformed JSON body: {0}")]
    MalformedBody(String),

    /// Client error reported as `{ "message": ... }` (duplicates, bad credentials)
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    /// Anything unexpected; the raw message goes back to the client
    #[error("{0}")]
    Internal(String),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::MalformedBody(_) | ApiError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::Validation(errors) => (status, Json(json!({ "errors": errors }))).into_response(),
            ApiError::BadRequest(message) | ApiError::NotFound(message) => {
                (status, Json(MessageResponse { message })).into_response()
            }
            ApiError::Internal(error) => {
                tracing::error!(%error, "request failed");
                (status, Json(ErrorResponse { error })).into_response()
            }
            other => (status, Json(ErrorResponse { error: other.to_string() })).into_response(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidId(_) | StoreError::Duplicate { .. } => ApiError::BadRequest(err.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::UserExists | AuthError::InvalidPassword => ApiError::BadRequest(err.to_string()),
            AuthError::UserNotFound => ApiError::NotFound(err.to_string()),
            AuthError::TokenExpired | AuthError::InvalidToken | AuthError::TokenValidationError(_) => {
                ApiError::Unauthorized(format!("Invalid token: {err}"))
            }
            AuthError::Store(store) => store.into(),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_errors_map_to_statuses() {
        assert_eq!(ApiError::from(AuthError::UserExists).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::from(AuthError::InvalidPassword).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::from(AuthError::UserNotFound).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::from(AuthError::TokenExpired).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::from(AuthError::HashingError("boom".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_store_errors_keep_raw_message() {
        let err = ApiError::from(StoreError::Serialization("missing field `email`".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Serialization error: missing field `email`");
    }

    #[test]
    fn test_messages_match_responses() {
        assert_eq!(ApiError::from(AuthError::UserExists).to_string(), "Username already exists.");
        assert_eq!(ApiError::from(AuthError::InvalidPassword).to_string(), "Invalid credentials");
        assert_eq!(ApiError::from(AuthError::UserNotFound).to_string(), "User not found");
    }
}
