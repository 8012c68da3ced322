use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::api::{AuthResponse, SigninInput, SignupInput};
use crate::app::AppState;
use crate::error::ApiResult;

/// POST /api/v1/user/signup - create an account and receive a token
///
/// Input: `{ "email": string, "password": string (>= 6 chars), "name"?: string }`
///
/// Output: `{ "token": string, "user": { "id", "email", "name" } }`.
/// Malformed input and an already registered email both answer 411.
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupInput>, JsonRejection>,
) -> ApiResult<Json<AuthResponse>> {
    let Json(input) = payload?;
    Ok(Json(state.auth.signup(input).await?))
}

/// POST /api/v1/user/signin - exchange credentials for a fresh token
///
/// Wrong email and wrong password are reported identically (403).
pub async fn signin(
    State(state): State<AppState>,
    payload: Result<Json<SigninInput>, JsonRejection>,
) -> ApiResult<Json<AuthResponse>> {
    let Json(input) = payload?;
    Ok(Json(state.auth.signin(input).await?))
}
