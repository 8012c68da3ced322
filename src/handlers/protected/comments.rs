use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};

use crate::api::{CommentInput, MessageResponse};
use crate::app::AppState;
use crate::database::models::CommentDetail;
use crate::error::ApiResult;
use crate::middleware::AuthUser;

use super::parse_id;

/// POST /api/v1/projects/:id/comments
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(project_id): Path<String>,
    payload: Result<Json<CommentInput>, JsonRejection>,
) -> ApiResult<Json<CommentDetail>> {
    let project_id = parse_id(&project_id, "project")?;
    let Json(input) = payload?;
    Ok(Json(state.comments.create(user.user_id, project_id, input).await?))
}

/// GET /api/v1/projects/:id/comments
pub async fn list(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> ApiResult<Json<Vec<CommentDetail>>> {
    let project_id = parse_id(&project_id, "project")?;
    Ok(Json(state.comments.list(project_id).await?))
}

/// DELETE /api/v1/comments/:id - comment author only
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_id(&id, "comment")?;
    state.comments.delete(user.user_id, id).await?;
    Ok(Json(MessageResponse::new("Comment deleted successfully")))
}
