use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::api::{ProjectInput, UpdateProjectInput};
use crate::database::models::{Project, ProjectDetail};
use crate::database::Store;

use super::ServiceError;

/// Project CRUD. Mutations are reserved to the project's author.
#[derive(Clone)]
pub struct ProjectService {
    store: Arc<dyn Store>,
}

impl ProjectService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create(&self, user_id: Uuid, input: ProjectInput) -> Result<Project, ServiceError> {
        input.validate()?;
        let project = self.store.insert_project(user_id, input.into()).await?;
        info!(project_id = %project.id, author_id = %user_id, "project created");
        Ok(project)
    }

    pub async fn list(&self) -> Result<Vec<ProjectDetail>, ServiceError> {
        Ok(self.store.list_projects().await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<ProjectDetail, ServiceError> {
        self.store
            .project_detail(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Project not found".into()))
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: UpdateProjectInput,
    ) -> Result<Project, ServiceError> {
        self.owned_by(user_id, id).await?;
        input.validate()?;
        let project = self.store.update_project(id, input.into()).await?;
        info!(project_id = %id, "project updated");
        Ok(project)
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), ServiceError> {
        self.owned_by(user_id, id).await?;
        self.store.delete_project(id).await?;
        info!(project_id = %id, "project deleted");
        Ok(())
    }

    async fn owned_by(&self, user_id: Uuid, id: Uuid) -> Result<Project, ServiceError> {
        let project = self
            .store
            .find_project(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Project not found".into()))?;
        if project.author_id != user_id {
            warn!(project_id = %id, user_id = %user_id, "rejected mutation by non-author");
            return Err(ServiceError::Forbidden("You can only modify your own projects".into()));
        }
        Ok(project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::NewUser;
    use crate::database::MemoryStore;
    use chrono::Utc;

    async fn setup() -> (ProjectService, Uuid, Uuid) {
        let store = Arc::new(MemoryStore::new());
        let mut ids = Vec::new();
        for email in ["author@localhost.dev", "other@localhost.dev"] {
            let user = store
                .insert_user(NewUser {
                    email: email.to_string(),
                    password_hash: "x".to_string(),
                    name: None,
                })
                .await
                .unwrap();
            ids.push(user.id);
        }
        (ProjectService::new(store), ids[0], ids[1])
    }

    fn input(title: &str) -> ProjectInput {
        ProjectInput {
            title: title.to_string(),
            content: "A todo app, but for abandoned todo apps".to_string(),
            published: true,
            tags: vec!["rust".to_string(), "meta".to_string()],
            abandoned_at: None,
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trips_author_fields() {
        let (projects, author, _) = setup().await;
        let created = projects.create(author, input("todo²")).await.unwrap();
        let fetched = projects.get(created.id).await.unwrap();

        assert_eq!(fetched.project.title, "todo²");
        assert_eq!(fetched.project.content, created.content);
        assert_eq!(fetched.project.tags, vec!["rust", "meta"]);
        assert!(fetched.project.published);
        assert_eq!(fetched.project.author_id, author);
        assert_eq!(fetched.author.id, author);
    }

    #[tokio::test]
    async fn non_author_cannot_update_or_delete() {
        let (projects, author, other) = setup().await;
        let created = projects.create(author, input("mine")).await.unwrap();

        let update = UpdateProjectInput {
            title: Some("stolen".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            projects.update(other, created.id, update).await,
            Err(ServiceError::Forbidden(_))
        ));
        assert!(matches!(
            projects.delete(other, created.id).await,
            Err(ServiceError::Forbidden(_))
        ));

        let unchanged = projects.get(created.id).await.unwrap().project;
        assert_eq!(unchanged, created);
    }

    #[tokio::test]
    async fn ownership_is_checked_before_the_patch() {
        let (projects, author, other) = setup().await;
        let created = projects.create(author, input("mine")).await.unwrap();
        let blank_title = || UpdateProjectInput {
            title: Some(String::new()),
            ..Default::default()
        };

        assert!(matches!(
            projects.update(other, created.id, blank_title()).await,
            Err(ServiceError::Forbidden(_))
        ));
        assert!(matches!(
            projects.update(author, Uuid::new_v4(), blank_title()).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            projects.update(author, created.id, blank_title()).await,
            Err(ServiceError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn title_update_leaves_other_fields() {
        let (projects, author, _) = setup().await;
        let mut create = input("before");
        create.abandoned_at = Some(Utc::now());
        let created = projects.create(author, create).await.unwrap();

        let updated = projects
            .update(
                author,
                created.id,
                UpdateProjectInput {
                    title: Some("after".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "after");
        assert_eq!(updated.content, created.content);
        assert_eq!(updated.tags, created.tags);
        assert_eq!(updated.published, created.published);
        assert_eq!(updated.abandoned_at, created.abandoned_at);
        assert_eq!(updated.author_id, created.author_id);
    }

    #[tokio::test]
    async fn missing_project_is_not_found() {
        let (projects, author, _) = setup().await;
        let missing = Uuid::new_v4();
        assert!(matches!(projects.get(missing).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(
            projects.update(author, missing, UpdateProjectInput::default()).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(projects.delete(author, missing).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn list_returns_every_project_newest_first() {
        let (projects, author, other) = setup().await;
        projects.create(author, input("one")).await.unwrap();
        projects.create(other, input("two")).await.unwrap();
        projects.create(author, input("three")).await.unwrap();

        let listed = projects.list().await.unwrap();
        assert_eq!(listed.len(), 3);
        assert!(listed
            .windows(2)
            .all(|w| w[0].project.created_at >= w[1].project.created_at));
        assert_eq!(listed[0].project.title, "three");
    }

    #[tokio::test]
    async fn author_can_delete() {
        let (projects, author, _) = setup().await;
        let created = projects.create(author, input("bye")).await.unwrap();
        projects.delete(author, created.id).await.unwrap();
        assert!(matches!(projects.get(created.id).await, Err(ServiceError::NotFound(_))));
    }
}
