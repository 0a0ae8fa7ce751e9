//! API error types and response handling
//!
//! This module maps gateway failures onto HTTP responses so every endpoint
//! answers with the same error body.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;

use crate::error::{GatewayError, LlmError};

/// API error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Whether the request was successful (always false for errors)
    pub success: bool,
    /// Error message
    pub message: String,
    /// Optional error code for programmatic handling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Optional field-level validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<std::collections::HashMap<String, String>>,
}

/// API error type
#[derive(Debug)]
pub enum ApiError {
    // Validation errors
    ValidationError(std::collections::HashMap<String, String>),
    InvalidInput(String),

    // Model service errors
    UpstreamFailed(String),
    NotConfigured(String),

    // Server errors
    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::ValidationError(_) => write!(f, "Validation failed"),
            ApiError::InvalidInput(msg) => write!(f, "{}", msg),
            ApiError::UpstreamFailed(msg) => write!(f, "Model service failed: {}", msg),
            ApiError::NotConfigured(msg) => write!(f, "Service not configured: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::UpstreamFailed(_) => StatusCode::BAD_GATEWAY,
            ApiError::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::ValidationError(_) => "VALIDATION_ERROR",
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::UpstreamFailed(_) => "UPSTREAM_FAILED",
            ApiError::NotConfigured(_) => "NOT_CONFIGURED",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code().to_string();
        let message = self.to_string();

        let errors = match &self {
            ApiError::ValidationError(errs) => Some(errs.clone()),
            _ => None,
        };

        let body = ErrorResponse {
            success: false,
            message,
            code: Some(code),
            errors,
        };

        (status, Json(body)).into_response()
    }
}

// Conversion implementations for common error types

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Llm(LlmError::MissingApiKey) => {
                tracing::error!("Gateway called without an API key");
                ApiError::NotConfigured("no model API key".to_string())
            }
            GatewayError::Prompt(msg) => {
                tracing::error!("Prompt construction failed: {}", msg);
                ApiError::InternalError(msg)
            }
            other => ApiError::UpstreamFailed(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(status = %rejection.status(), "Rejected request body");
        ApiError::InvalidInput(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidInput(rejection.body_text())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut errors = std::collections::HashMap::new();

        for (field, field_errors) in err.field_errors() {
            if let Some(first_error) = field_errors.first() {
                let message = first_error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {}", field));
                errors.insert(field.to_string(), message);
            }
        }

        ApiError::ValidationError(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractionError;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            ApiError::InvalidInput("x".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::UpstreamFailed("x".to_string()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::InternalError("test".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_gateway_error_mapping() {
        let exhausted = GatewayError::RetriesExhausted {
            operation: "render_object",
            attempts: 5,
            last: Box::new(GatewayError::Extraction(ExtractionError::MissingStart('<'))),
        };
        let api: ApiError = exhausted.into();
        assert_eq!(api.error_code(), "UPSTREAM_FAILED");

        let api: ApiError = GatewayError::Llm(LlmError::MissingApiKey).into();
        assert_eq!(api.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            ApiError::InvalidInput("world_desc is required".to_string()).to_string(),
            "world_desc is required"
        );
        assert_eq!(
            ApiError::UpstreamFailed("timeout".to_string()).to_string(),
            "Model service failed: timeout"
        );
    }
}
