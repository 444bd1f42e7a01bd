//! API error type and HTTP status mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use remedi_auth::AuthError;
use remedi_commerce::CommerceError;
use remedi_db::DbError;
use serde_json::json;
use thiserror::Error;

/// Errors surfaced to API callers.
///
/// Every variant renders as `{ "message": ... }`; persistence detail never
/// leaves the server.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed input from the caller.
    #[error("{0}")]
    BadRequest(String),

    /// The referenced resource does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The request conflicts with existing state.
    #[error("{0}")]
    Conflict(String),

    /// Missing or invalid credentials.
    #[error("Please log in or invalid token!")]
    Unauthorized,

    /// Internal failure; detail is logged server-side only.
    #[error("something went wrong server side")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "message": self.to_string() }))).into_response()
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        tracing::error!(error = %e, "persistence failure");
        ApiError::Internal
    }
}

impl From<CommerceError> for ApiError {
    fn from(e: CommerceError) -> Self {
        match e {
            CommerceError::BadIdentifier(_)
            | CommerceError::InvalidQuantity(_)
            | CommerceError::Overflow
            | CommerceError::ValidationError(_) => ApiError::BadRequest(e.to_string()),
            CommerceError::NoMorePages { .. } => ApiError::BadRequest("No more pages!".to_string()),
            CommerceError::DrugNotFound(_)
            | CommerceError::CartNotFound(_)
            | CommerceError::ItemNotInCart(_) => ApiError::NotFound(e.to_string()),
            CommerceError::DrugAlreadyExists(_) => ApiError::Conflict(e.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        if e.is_token_rejection() {
            return ApiError::Unauthorized;
        }
        match e {
            AuthError::AccountNotFound => ApiError::NotFound("account not found".to_string()),
            AuthError::EmailExists => ApiError::Conflict("email already registered".to_string()),
            other => {
                tracing::error!(error = %other, "identity provider failure");
                ApiError::Internal
            }
        }
    }
}
