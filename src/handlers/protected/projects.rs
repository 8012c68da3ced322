use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};

use crate::api::{MessageResponse, ProjectInput, UpdateProjectInput};
use crate::app::AppState;
use crate::database::models::{Project, ProjectDetail};
use crate::error::ApiResult;
use crate::middleware::AuthUser;

use super::project_id;

/// POST /api/v1/projects - create a project owned by the caller
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<ProjectInput>, JsonRejection>,
) -> ApiResult<Json<Project>> {
    let Json(input) = payload?;
    Ok(Json(state.projects.create(user.user_id, input).await?))
}

/// GET /api/v1/projects - every project, newest first, with author and comments
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<ProjectDetail>>> {
    Ok(Json(state.projects.list().await?))
}

/// GET /api/v1/projects/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ProjectDetail>> {
    let id = project_id(&id)?;
    Ok(Json(state.projects.get(id).await?))
}

/// PUT /api/v1/projects/:id - partial update, author only
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateProjectInput>, JsonRejection>,
) -> ApiResult<Json<Project>> {
    let id = project_id(&id)?;
    let Json(input) = payload?;
    Ok(Json(state.projects.update(user.user_id, id, input).await?))
}

/// DELETE /api/v1/projects/:id - author only; takes the project's comments with it
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = project_id(&id)?;
    state.projects.delete(user.user_id, id).await?;
    Ok(Json(MessageResponse::new("Project deleted successfully")))
}
