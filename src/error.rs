// HTTP API Error Types
use axum::{extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::api::InputError;
use crate::services::ServiceError;

/// Status used for validation failures and any other unhandled failure.
///
/// Clients of this API treat 411 as "the write did not happen".
pub const FAILURE_STATUS: u16 = 411;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 411 - malformed or missing input
    ValidationError(String),

    // 411 - duplicate email; same envelope as a validation failure
    Conflict(String),

    // 401 - missing or invalid bearer token
    Unauthorized,

    // 403 - signin with a wrong email/password pair
    InvalidCredentials,

    // 403 - ownership mismatch
    Forbidden(String),

    // 404
    NotFound(String),

    // 411 - everything else; details are logged, never returned
    Internal(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::ValidationError(_) => FAILURE_STATUS,
            ApiError::Conflict(_) => FAILURE_STATUS,
            ApiError::Unauthorized => 401,
            ApiError::InvalidCredentials => 403,
            ApiError::Forbidden(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::Internal(_) => FAILURE_STATUS,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::ValidationError(msg) => msg,
            ApiError::Conflict(msg) => msg,
            ApiError::Unauthorized => "unauthorized",
            ApiError::InvalidCredentials => "Invalid credentials",
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::Internal(msg) => msg,
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        json!({ "error": self.message() })
    }
}

// Static constructor methods
impl ApiError {
    pub fn validation_error(message: impl Into<String>) -> Self {
        ApiError::ValidationError(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }
}

impl From<InputError> for ApiError {
    fn from(err: InputError) -> Self {
        ApiError::validation_error(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(err: JsonRejection) -> Self {
        ApiError::validation_error(format!("Invalid request body: {}", err.body_text()))
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(e) => e.into(),
            ServiceError::Conflict(_) => ApiError::conflict("Email already registered"),
            ServiceError::InvalidCredentials => ApiError::InvalidCredentials,
            ServiceError::Unauthorized(_) => ApiError::Unauthorized,
            ServiceError::NotFound(msg) => ApiError::not_found(msg),
            ServiceError::Forbidden(msg) => ApiError::forbidden(msg),
            ServiceError::Token(e) => {
                tracing::error!("Token error: {}", e);
                ApiError::internal("Failed to issue token")
            }
            ServiceError::Task(msg) => {
                tracing::error!("Background task failed: {}", msg);
                ApiError::internal("An error occurred while processing your request")
            }
            ServiceError::Database(e) => {
                // Log the real error but return generic message
                tracing::error!("Database error: {}", e);
                ApiError::internal("An error occurred while processing your request")
            }
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
