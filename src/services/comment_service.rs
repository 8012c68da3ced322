use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::api::CommentInput;
use crate::database::models::CommentDetail;
use crate::database::Store;

use super::ServiceError;

#[derive(Clone)]
pub struct CommentService {
    store: Arc<dyn Store>,
}

impl CommentService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Any authenticated user may comment on an existing project.
    pub async fn create(
        &self,
        user_id: Uuid,
        project_id: Uuid,
        input: CommentInput,
    ) -> Result<CommentDetail, ServiceError> {
        input.validate()?;
        if self.store.find_project(project_id).await?.is_none() {
            return Err(ServiceError::NotFound("Project not found".into()));
        }
        let comment = self
            .store
            .insert_comment(user_id, project_id, input.content)
            .await?;
        info!(comment_id = %comment.comment.id, project_id = %project_id, "comment added");
        Ok(comment)
    }

    /// Comments on `project_id`, newest first. Unknown projects yield an empty list.
    pub async fn list(&self, project_id: Uuid) -> Result<Vec<CommentDetail>, ServiceError> {
        Ok(self.store.list_comments(project_id).await?)
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), ServiceError> {
        let comment = self
            .store
            .find_comment(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Comment not found".into()))?;
        if comment.author_id != user_id {
            warn!(comment_id = %id, user_id = %user_id, "rejected comment deletion by non-author");
            return Err(ServiceError::Forbidden("You can only delete your own comments".into()));
        }
        self.store.delete_comment(id).await?;
        info!(comment_id = %id, "comment deleted");
        Ok(())
    }
}
