use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::domain::error::DomainError;

/// json for error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

/// Domain failure on its way out of a handler
#[derive(Debug)]
pub struct ApiError(DomainError);

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, field) = match &self.0 {
            DomainError::DuplicateUsername => (StatusCode::BAD_REQUEST, "duplicate_username", None),
            DomainError::DuplicateTag(_) => (StatusCode::BAD_REQUEST, "duplicate_tag", None),
            DomainError::MultiplePrimaryTags => {
                (StatusCode::BAD_REQUEST, "multiple_primary_tags", None)
            }
            DomainError::EmptyProfileList => (StatusCode::BAD_REQUEST, "empty_profile_list", None),
            DomainError::ValidationFailure { field, .. } => {
                (StatusCode::BAD_REQUEST, "validation_failure", Some(*field))
            }
            DomainError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", None),
            DomainError::GatewayUnreachable(_) => {
                (StatusCode::BAD_GATEWAY, "gateway_unreachable", None)
            }
            DomainError::TokenGeneration(_) | DomainError::Repository(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        // internals stay in the log
        let message = match &self.0 {
            DomainError::GatewayUnreachable(detail) => {
                warn!(detail = detail.as_str(), "player directory unreachable");
                "Player directory unreachable".to_string()
            }
            other if status.is_server_error() => {
                error!(error = %other, "request failed");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorResponse {
            code: code.to_string(),
            field: field.map(str::to_string),
            message,
        };
        (status, Json(body)).into_response()
    }
}
