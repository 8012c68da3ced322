pub mod auth_service;
pub mod comment_service;
pub mod project_service;

pub use auth_service::AuthService;
pub use comment_service::CommentService;
pub use project_service::ProjectService;

use crate::api::InputError;
use crate::auth::JwtError;
use crate::database::DatabaseError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] InputError),

    #[error("{0}")]
    Conflict(String),

    /// Signin failure; deliberately says nothing about which field was wrong.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Missing, malformed, expired or forged bearer token.
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Token error: {0}")]
    Token(#[from] JwtError),

    #[error("Background task failed: {0}")]
    Task(String),

    #[error(transparent)]
    Database(DatabaseError),
}

impl From<DatabaseError> for ServiceError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(msg) => ServiceError::NotFound(msg),
            DatabaseError::Conflict(msg) => ServiceError::Conflict(msg),
            other => ServiceError::Database(other),
        }
    }
}

impl From<tokio::task::JoinError> for ServiceError {
    fn from(err: tokio::task::JoinError) -> Self {
        ServiceError::Task(err.to_string())
    }
}
