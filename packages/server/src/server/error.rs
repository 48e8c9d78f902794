//! Mapping of domain failures onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::common::AuthError;
use crate::domains::cases::CaseError;

/// Error returned by every HTTP handler. Renders as `{"error": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    Case(CaseError),
    Auth(AuthError),
}

impl From<CaseError> for ApiError {
    fn from(error: CaseError) -> Self {
        ApiError::Case(error)
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        ApiError::Auth(error)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Case(CaseError::InvalidArgument(_)) => StatusCode::BAD_REQUEST,
            ApiError::Case(CaseError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Case(CaseError::Forbidden(_)) => StatusCode::FORBIDDEN,
            ApiError::Case(CaseError::Conflict(_)) => StatusCode::CONFLICT,
            ApiError::Case(CaseError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Auth(AuthError::InsufficientRole) => StatusCode::FORBIDDEN,
            ApiError::Auth(AuthError::AuthenticationRequired | AuthError::InvalidToken) => {
                StatusCode::UNAUTHORIZED
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Case(CaseError::Storage(e)) => {
                error!(error = ?e, "storage failure while handling request");
                "Internal server error".to_string()
            }
            ApiError::Case(e) => e.to_string(),
            ApiError::Auth(e) => e.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
