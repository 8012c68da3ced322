use uuid::Uuid;

use crate::error::ApiError;

pub mod comments;
pub mod projects;

/// Project ids that cannot exist are simply not found.
fn project_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found("Project not found"))
}

/// Malformed ids on comment routes are input errors.
fn parse_id(raw: &str, what: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::validation_error(format!("Invalid {} id", what)))
}
