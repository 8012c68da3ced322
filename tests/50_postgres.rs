//! PgStore against a live database. Skipped unless TEST_DATABASE_URL is set,
//! e.g. `TEST_DATABASE_URL=postgres://postgres@localhost/kil_test cargo test --test 50_postgres`.

use chrono::{TimeZone, Utc};
use uuid::Uuid;

use killedinlocalhost::config::{DatabaseConfig, StorageBackend};
use killedinlocalhost::database::models::{NewProject, NewUser, ProjectChanges, User};
use killedinlocalhost::database::{DatabaseError, DatabaseManager, PgStore, Store};

async fn store() -> Option<PgStore> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let config = DatabaseConfig {
        url: Some(url),
        storage: Some(StorageBackend::Postgres),
        max_connections: 2,
        connection_timeout: 5,
        run_migrations: true,
    };
    let manager = DatabaseManager::connect(&config).await.expect("connect");
    manager.migrate().await.expect("migrate");
    Some(PgStore::new(manager))
}

async fn user(store: &PgStore, name: Option<&str>) -> User {
    store
        .insert_user(NewUser {
            email: format!("pg-{}@localhost.dev", Uuid::new_v4()),
            password_hash: "not-a-real-hash".to_string(),
            name: name.map(str::to_string),
        })
        .await
        .expect("insert user")
}

fn new_project(title: &str) -> NewProject {
    NewProject {
        title: title.to_string(),
        content: "Segfaults on Tuesdays".to_string(),
        published: false,
        tags: vec!["c".to_string()],
        abandoned_at: None,
    }
}

#[tokio::test]
async fn duplicate_email_conflicts() {
    let Some(store) = store().await else { return };
    let first = user(&store, None).await;

    let err = store
        .insert_user(NewUser {
            email: first.email.clone(),
            password_hash: "other".to_string(),
            name: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DatabaseError::Conflict(_)));

    let found = store.find_user_by_email(&first.email).await.unwrap().unwrap();
    assert_eq!(found.id, first.id);
}

#[tokio::test]
async fn update_touches_only_given_fields() {
    let Some(store) = store().await else { return };
    let author = user(&store, None).await;
    let abandoned = Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap();
    let project = store
        .insert_project(
            author.id,
            NewProject {
                abandoned_at: Some(abandoned),
                ..new_project("Hobby OS")
            },
        )
        .await
        .unwrap();

    let updated = store
        .update_project(
            project.id,
            ProjectChanges {
                title: Some("Hobby OS v2".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "Hobby OS v2");
    assert_eq!(updated.content, project.content);
    assert_eq!(updated.tags, project.tags);
    assert_eq!(updated.abandoned_at, Some(abandoned));
    assert!(updated.updated_at >= project.updated_at);

    let revived = store
        .update_project(
            project.id,
            ProjectChanges {
                abandoned_at: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(revived.abandoned_at, None);
    assert_eq!(revived.title, "Hobby OS v2");

    let err = store
        .update_project(Uuid::new_v4(), ProjectChanges::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DatabaseError::NotFound(_)));
}

#[tokio::test]
async fn comments_embed_author_newest_first() {
    let Some(store) = store().await else { return };
    let owner = user(&store, Some("Owner")).await;
    let reader = user(&store, Some("Reader")).await;
    let project = store.insert_project(owner.id, new_project("Toy RTOS")).await.unwrap();

    let first = store
        .insert_comment(reader.id, project.id, "first!".to_string())
        .await
        .unwrap();
    assert_eq!(first.author.id, reader.id);
    assert_eq!(first.author.name.as_deref(), Some("Reader"));
    assert_eq!(first.author.email, reader.email);
    let second = store
        .insert_comment(owner.id, project.id, "thanks".to_string())
        .await
        .unwrap();

    let comments = store.list_comments(project.id).await.unwrap();
    let ids: Vec<Uuid> = comments.iter().map(|c| c.comment.id).collect();
    assert_eq!(ids, vec![second.comment.id, first.comment.id]);

    let detail = store.project_detail(project.id).await.unwrap().unwrap();
    assert_eq!(detail.author.id, owner.id);
    let ids: Vec<Uuid> = detail.comments.iter().map(|c| c.comment.id).collect();
    assert_eq!(ids, vec![second.comment.id, first.comment.id]);

    let listed = store.list_projects().await.unwrap();
    let entry = listed
        .iter()
        .find(|p| p.project.id == project.id)
        .expect("project in listing");
    assert_eq!(entry.comments.len(), 2);
}

#[tokio::test]
async fn comment_on_missing_project_is_not_found() {
    let Some(store) = store().await else { return };
    let author = user(&store, None).await;

    let err = store
        .insert_comment(author.id, Uuid::new_v4(), "hello?".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, DatabaseError::NotFound(_)));
}

#[tokio::test]
async fn deleting_a_project_removes_its_comments() {
    let Some(store) = store().await else { return };
    let author = user(&store, None).await;
    let project = store.insert_project(author.id, new_project("Doomed")).await.unwrap();
    let comment = store
        .insert_comment(author.id, project.id, "rip".to_string())
        .await
        .unwrap();

    store.delete_project(project.id).await.unwrap();
    assert!(store.find_project(project.id).await.unwrap().is_none());
    assert!(store.find_comment(comment.comment.id).await.unwrap().is_none());

    let err = store.delete_project(project.id).await.unwrap_err();
    assert!(matches!(err, DatabaseError::NotFound(_)));
    let err = store.delete_comment(comment.comment.id).await.unwrap_err();
    assert!(matches!(err, DatabaseError::NotFound(_)));
}

#[tokio::test]
async fn health_check_pings_the_pool() {
    let Some(store) = store().await else { return };
    store.health_check().await.unwrap();
}
