use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::comment::CommentDetail;
use super::user::AuthorSummary;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub published: bool,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub abandoned_at: Option<DateTime<Utc>>,
    pub author_id: Uuid,
}

/// A project with its author and comments embedded, as served by the read routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub author: AuthorSummary,
    pub comments: Vec<CommentDetail>,
}

#[derive(Debug, Clone)]
pub struct NewProject {
    pub title: String,
    pub content: String,
    pub published: bool,
    pub tags: Vec<String>,
    pub abandoned_at: Option<DateTime<Utc>>,
}

/// Field-level changes for an update; `None` leaves the column untouched.
///
/// `abandoned_at` is doubly optional: `Some(None)` clears the timestamp.
#[derive(Debug, Clone, Default)]
pub struct ProjectChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub published: Option<bool>,
    pub tags: Option<Vec<String>>,
    pub abandoned_at: Option<Option<DateTime<Utc>>>,
}

impl ProjectChanges {
    /// Apply the changes to an in-memory record.
    pub fn apply(self, project: &mut Project, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            project.title = title;
        }
        if let Some(content) = self.content {
            project.content = content;
        }
        if let Some(published) = self.published {
            project.published = published;
        }
        if let Some(tags) = self.tags {
            project.tags = tags;
        }
        if let Some(abandoned_at) = self.abandoned_at {
            project.abandoned_at = abandoned_at;
        }
        project.updated_at = now;
    }
}
