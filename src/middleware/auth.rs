use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;

/// Authenticated caller, inserted into request extensions by [`jwt_auth_middleware`]
#[derive(Clone, Copy, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
}

/// JWT authentication middleware that validates the bearer token and exposes the caller's id
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let user_id = state.auth.authenticate(header).map_err(|e| {
        tracing::debug!("rejected bearer token: {}", e);
        ApiError::from(e)
    })?;

    request.extensions_mut().insert(AuthUser { user_id });

    Ok(next.run(request).await)
}
