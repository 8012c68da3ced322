use async_trait::async_trait;
use chrono::Utc;
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{
    AuthorSummary, Comment, CommentDetail, NewProject, NewUser, Project, ProjectChanges,
    ProjectDetail, User,
};
use crate::database::store::Store;

const PROJECT_COLUMNS: &str = "p.id, p.title, p.content, p.published, p.tags, p.created_at, \
     p.updated_at, p.abandoned_at, p.author_id, u.name AS author_name, u.email AS author_email";

const COMMENT_COLUMNS: &str = "c.id, c.content, c.created_at, c.updated_at, c.author_id, \
     c.project_id, u.name AS author_name, u.email AS author_email";

#[derive(FromRow)]
struct ProjectRow {
    #[sqlx(flatten)]
    project: Project,
    author_name: Option<String>,
    author_email: String,
}

impl ProjectRow {
    fn into_detail(self, comments: Vec<CommentDetail>) -> ProjectDetail {
        ProjectDetail {
            author: AuthorSummary {
                id: self.project.author_id,
                name: self.author_name,
                email: self.author_email,
            },
            project: self.project,
            comments,
        }
    }
}

#[derive(FromRow)]
struct CommentRow {
    #[sqlx(flatten)]
    comment: Comment,
    author_name: Option<String>,
    author_email: String,
}

impl From<CommentRow> for CommentDetail {
    fn from(row: CommentRow) -> Self {
        CommentDetail {
            author: AuthorSummary {
                id: row.comment.author_id,
                name: row.author_name,
                email: row.author_email,
            },
            comment: row.comment,
        }
    }
}

/// `Store` backed by the shared Postgres pool
pub struct PgStore {
    manager: DatabaseManager,
}

impl PgStore {
    pub fn new(manager: DatabaseManager) -> Self {
        Self { manager }
    }

    fn pool(&self) -> &PgPool {
        self.manager.pool()
    }

    async fn comments_for(&self, project_ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<CommentDetail>>, DatabaseError> {
        if project_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let sql = format!(
            "SELECT {COMMENT_COLUMNS} FROM comments c JOIN users u ON u.id = c.author_id \
             WHERE c.project_id = ANY($1) ORDER BY c.created_at DESC"
        );
        let rows = sqlx::query_as::<_, CommentRow>(&sql)
            .bind(project_ids.to_vec())
            .fetch_all(self.pool())
            .await?;

        let mut grouped: HashMap<Uuid, Vec<CommentDetail>> = HashMap::new();
        for row in rows {
            grouped
                .entry(row.comment.project_id)
                .or_default()
                .push(row.into());
        }
        Ok(grouped)
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

#[async_trait]
impl Store for PgStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, email, password, name, created_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, email, password, name, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(Utc::now())
        .fetch_one(self.pool())
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DatabaseError::Conflict(format!("email {} already registered", user.email))
            } else {
                e.into()
            }
        })
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password, name, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(self.pool())
        .await?;
        Ok(user)
    }

    async fn insert_project(&self, author_id: Uuid, project: NewProject) -> Result<Project, DatabaseError> {
        let now = Utc::now();
        let project = sqlx::query_as::<_, Project>(
            "INSERT INTO projects
                (id, title, content, published, tags, created_at, updated_at, abandoned_at, author_id)
             VALUES ($1, $2, $3, $4, $5, $6, $6, $7, $8)
             RETURNING id, title, content, published, tags, created_at, updated_at, abandoned_at, author_id",
        )
        .bind(Uuid::new_v4())
        .bind(&project.title)
        .bind(&project.content)
        .bind(project.published)
        .bind(&project.tags)
        .bind(now)
        .bind(project.abandoned_at)
        .bind(author_id)
        .fetch_one(self.pool())
        .await?;
        Ok(project)
    }

    async fn find_project(&self, id: Uuid) -> Result<Option<Project>, DatabaseError> {
        let project = sqlx::query_as::<_, Project>(
            "SELECT id, title, content, published, tags, created_at, updated_at, abandoned_at, author_id
             FROM projects WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        Ok(project)
    }

    async fn project_detail(&self, id: Uuid) -> Result<Option<ProjectDetail>, DatabaseError> {
        let sql = format!(
            "SELECT {PROJECT_COLUMNS} FROM projects p JOIN users u ON u.id = p.author_id WHERE p.id = $1"
        );
        let Some(row) = sqlx::query_as::<_, ProjectRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await?
        else {
            return Ok(None);
        };

        let mut comments = self.comments_for(&[id]).await?;
        let comments = comments.remove(&id).unwrap_or_default();
        Ok(Some(row.into_detail(comments)))
    }

    async fn list_projects(&self) -> Result<Vec<ProjectDetail>, DatabaseError> {
        let sql = format!(
            "SELECT {PROJECT_COLUMNS} FROM projects p JOIN users u ON u.id = p.author_id \
             ORDER BY p.created_at DESC"
        );
        let rows = sqlx::query_as::<_, ProjectRow>(&sql)
            .fetch_all(self.pool())
            .await?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.project.id).collect();
        let mut comments = self.comments_for(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let project_comments = comments.remove(&row.project.id).unwrap_or_default();
                row.into_detail(project_comments)
            })
            .collect())
    }

    async fn update_project(&self, id: Uuid, changes: ProjectChanges) -> Result<Project, DatabaseError> {
        let (set_abandoned, abandoned_at) = match changes.abandoned_at {
            Some(value) => (true, value),
            None => (false, None),
        };

        sqlx::query_as::<_, Project>(
            "UPDATE projects SET
                title = COALESCE($2, title),
                content = COALESCE($3, content),
                published = COALESCE($4, published),
                tags = COALESCE($5, tags),
                abandoned_at = CASE WHEN $6 THEN $7 ELSE abandoned_at END,
                updated_at = $8
             WHERE id = $1
             RETURNING id, title, content, published, tags, created_at, updated_at, abandoned_at, author_id",
        )
        .bind(id)
        .bind(changes.title)
        .bind(changes.content)
        .bind(changes.published)
        .bind(changes.tags)
        .bind(set_abandoned)
        .bind(abandoned_at)
        .bind(Utc::now())
        .fetch_optional(self.pool())
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("project {id}")))
    }

    async fn delete_project(&self, id: Uuid) -> Result<(), DatabaseError> {
        // comments go with it via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("project {id}")));
        }
        Ok(())
    }

    async fn insert_comment(
        &self,
        author_id: Uuid,
        project_id: Uuid,
        content: String,
    ) -> Result<CommentDetail, DatabaseError> {
        let now = Utc::now();
        let sql = format!(
            "WITH c AS (
                INSERT INTO comments (id, content, created_at, updated_at, author_id, project_id)
                VALUES ($1, $2, $3, $3, $4, $5)
                RETURNING id, content, created_at, updated_at, author_id, project_id
             )
             SELECT {COMMENT_COLUMNS} FROM c JOIN users u ON u.id = c.author_id"
        );
        let row = sqlx::query_as::<_, CommentRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(&content)
            .bind(now)
            .bind(author_id)
            .bind(project_id)
            .fetch_one(self.pool())
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    DatabaseError::NotFound(format!("project {project_id}"))
                } else {
                    e.into()
                }
            })?;
        Ok(row.into())
    }

    async fn find_comment(&self, id: Uuid) -> Result<Option<Comment>, DatabaseError> {
        let comment = sqlx::query_as::<_, Comment>(
            "SELECT id, content, created_at, updated_at, author_id, project_id FROM comments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        Ok(comment)
    }

    async fn list_comments(&self, project_id: Uuid) -> Result<Vec<CommentDetail>, DatabaseError> {
        let mut grouped = self.comments_for(&[project_id]).await?;
        Ok(grouped.remove(&project_id).unwrap_or_default())
    }

    async fn delete_comment(&self, id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("comment {id}")));
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.manager.health_check().await
    }
}
