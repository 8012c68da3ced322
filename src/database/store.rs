use async_trait::async_trait;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Comment, CommentDetail, NewProject, NewUser, Project, ProjectChanges, ProjectDetail, User,
};

/// Persistence seam for users, projects and comments.
///
/// Every method is a single logical store call. Listings are ordered by
/// creation time, newest first.
#[async_trait]
pub trait Store: Send + Sync {
    /// Fails with `DatabaseError::Conflict` when the email is taken.
    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    async fn insert_project(&self, author_id: Uuid, project: NewProject) -> Result<Project, DatabaseError>;

    async fn find_project(&self, id: Uuid) -> Result<Option<Project>, DatabaseError>;

    async fn project_detail(&self, id: Uuid) -> Result<Option<ProjectDetail>, DatabaseError>;

    async fn list_projects(&self) -> Result<Vec<ProjectDetail>, DatabaseError>;

    /// Fails with `DatabaseError::NotFound` when the project vanished.
    async fn update_project(&self, id: Uuid, changes: ProjectChanges) -> Result<Project, DatabaseError>;

    /// Removes the project and its comments.
    async fn delete_project(&self, id: Uuid) -> Result<(), DatabaseError>;

    async fn insert_comment(
        &self,
        author_id: Uuid,
        project_id: Uuid,
        content: String,
    ) -> Result<CommentDetail, DatabaseError>;

    async fn find_comment(&self, id: Uuid) -> Result<Option<Comment>, DatabaseError>;

    async fn list_comments(&self, project_id: Uuid) -> Result<Vec<CommentDetail>, DatabaseError>;

    async fn delete_comment(&self, id: Uuid) -> Result<(), DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;
}
