use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    AuthorSummary, Comment, CommentDetail, NewProject, NewUser, Project, ProjectChanges,
    ProjectDetail, User,
};
use crate::database::store::Store;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    projects: Vec<Project>,
    comments: Vec<Comment>,
}

impl Tables {
    fn author(&self, id: Uuid) -> Result<AuthorSummary, DatabaseError> {
        self.users
            .iter()
            .find(|u| u.id == id)
            .map(AuthorSummary::from)
            .ok_or_else(|| DatabaseError::NotFound(format!("user {id}")))
    }

    /// Comments for a project, newest first. Ties keep the later insert first.
    fn comments_for(&self, project_id: Uuid) -> Result<Vec<CommentDetail>, DatabaseError> {
        let mut comments: Vec<&Comment> = self
            .comments
            .iter()
            .rev()
            .filter(|c| c.project_id == project_id)
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        comments
            .into_iter()
            .map(|c| {
                Ok(CommentDetail {
                    author: self.author(c.author_id)?,
                    comment: c.clone(),
                })
            })
            .collect()
    }

    fn detail(&self, project: &Project) -> Result<ProjectDetail, DatabaseError> {
        Ok(ProjectDetail {
            author: self.author(project.author_id)?,
            comments: self.comments_for(project.id)?,
            project: project.clone(),
        })
    }
}

/// Process-local `Store` for development without Postgres and for tests.
///
/// Mirrors the Postgres schema's constraints: unique emails, author and
/// project references checked on insert, comments cascading with their project.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(DatabaseError::Conflict(format!("email {} already registered", user.email)));
        }
        let user = User {
            id: Uuid::new_v4(),
            email: user.email,
            password: user.password_hash,
            name: user.name,
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert_project(&self, author_id: Uuid, project: NewProject) -> Result<Project, DatabaseError> {
        let mut tables = self.tables.write().await;
        tables.author(author_id)?;
        let now = Utc::now();
        let project = Project {
            id: Uuid::new_v4(),
            title: project.title,
            content: project.content,
            published: project.published,
            tags: project.tags,
            created_at: now,
            updated_at: now,
            abandoned_at: project.abandoned_at,
            author_id,
        };
        tables.projects.push(project.clone());
        Ok(project)
    }

    async fn find_project(&self, id: Uuid) -> Result<Option<Project>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.projects.iter().find(|p| p.id == id).cloned())
    }

    async fn project_detail(&self, id: Uuid) -> Result<Option<ProjectDetail>, DatabaseError> {
        let tables = self.tables.read().await;
        tables
            .projects
            .iter()
            .find(|p| p.id == id)
            .map(|p| tables.detail(p))
            .transpose()
    }

    async fn list_projects(&self) -> Result<Vec<ProjectDetail>, DatabaseError> {
        let tables = self.tables.read().await;
        let mut projects: Vec<&Project> = tables.projects.iter().rev().collect();
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        projects.into_iter().map(|p| tables.detail(p)).collect()
    }

    async fn update_project(&self, id: Uuid, changes: ProjectChanges) -> Result<Project, DatabaseError> {
        let mut tables = self.tables.write().await;
        let project = tables
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| DatabaseError::NotFound(format!("project {id}")))?;
        changes.apply(project, Utc::now());
        Ok(project.clone())
    }

    async fn delete_project(&self, id: Uuid) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        let before = tables.projects.len();
        tables.projects.retain(|p| p.id != id);
        if tables.projects.len() == before {
            return Err(DatabaseError::NotFound(format!("project {id}")));
        }
        tables.comments.retain(|c| c.project_id != id);
        Ok(())
    }

    async fn insert_comment(
        &self,
        author_id: Uuid,
        project_id: Uuid,
        content: String,
    ) -> Result<CommentDetail, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.projects.iter().any(|p| p.id == project_id) {
            return Err(DatabaseError::NotFound(format!("project {project_id}")));
        }
        let author = tables.author(author_id)?;
        let now = Utc::now();
        let comment = Comment {
            id: Uuid::new_v4(),
            content,
            created_at: now,
            updated_at: now,
            author_id,
            project_id,
        };
        tables.comments.push(comment.clone());
        Ok(CommentDetail { comment, author })
    }

    async fn find_comment(&self, id: Uuid) -> Result<Option<Comment>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.comments.iter().find(|c| c.id == id).cloned())
    }

    async fn list_comments(&self, project_id: Uuid) -> Result<Vec<CommentDetail>, DatabaseError> {
        self.tables.read().await.comments_for(project_id)
    }

    async fn delete_comment(&self, id: Uuid) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        let before = tables.comments.len();
        tables.comments.retain(|c| c.id != id);
        if tables.comments.len() == before {
            return Err(DatabaseError::NotFound(format!("comment {id}")));
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
