mod common;

use anyhow::Result;

use killedinlocalhost::api::{ProjectInput, SigninInput, SignupInput, UpdateProjectInput};
use killedinlocalhost::client::{ApiClient, ClientError};
use killedinlocalhost::present::ProjectStatus;

async fn signed_up(base_url: &str, prefix: &str) -> Result<(ApiClient, String)> {
    let email = common::unique_email(prefix);
    let mut client = ApiClient::new(base_url)?;
    client
        .signup(&SignupInput {
            email: email.clone(),
            password: "hunter22".to_string(),
            name: None,
        })
        .await?;
    Ok((client, email))
}

#[tokio::test]
async fn health_reports_ok() -> Result<()> {
    let server = common::ensure_server().await?;
    let report = ApiClient::new(&server.base_url)?.health().await?;
    assert!(report.is_ok());
    Ok(())
}

#[tokio::test]
async fn signin_after_signup_yields_working_token() -> Result<()> {
    let server = common::ensure_server().await?;
    let (_, email) = signed_up(&server.base_url, "signin").await?;

    let mut client = ApiClient::new(&server.base_url)?;
    let auth = client
        .signin(&SigninInput {
            email: email.clone(),
            password: "hunter22".to_string(),
        })
        .await?;
    assert_eq!(auth.user.email, email);
    assert_eq!(client.token(), Some(auth.token.as_str()));
    client.list_projects().await?;

    let err = ApiClient::new(&server.base_url)?
        .signin(&SigninInput {
            email,
            password: "not-the-password".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(403));
    Ok(())
}

#[tokio::test]
async fn duplicate_signup_surfaces_server_message() -> Result<()> {
    let server = common::ensure_server().await?;
    let (_, email) = signed_up(&server.base_url, "dup").await?;

    let err = ApiClient::new(&server.base_url)?
        .signup(&SignupInput {
            email,
            password: "hunter22".to_string(),
            name: None,
        })
        .await
        .unwrap_err();
    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 411);
            assert_eq!(message, "Email already registered");
        }
        other => panic!("unexpected error: {other}"),
    }
    Ok(())
}

#[tokio::test]
async fn project_lifecycle_over_http() -> Result<()> {
    let server = common::ensure_server().await?;
    let (owner, _) = signed_up(&server.base_url, "owner").await?;
    let (stranger, _) = signed_up(&server.base_url, "stranger").await?;

    let project = owner
        .create_project(&ProjectInput {
            title: "Yet another ECS".to_string(),
            content: "Archetypes all the way down.".to_string(),
            published: true,
            tags: vec!["rust".to_string(), "gamedev".to_string()],
            abandoned_at: None,
        })
        .await?;
    assert_eq!(
        ProjectStatus::classify(project.published, project.abandoned_at),
        ProjectStatus::Published
    );

    let abandon = UpdateProjectInput {
        abandoned_at: Some(Some(chrono::Utc::now())),
        ..Default::default()
    };
    let err = stranger.update_project(project.id, &abandon).await.unwrap_err();
    assert_eq!(err.status(), Some(403));

    let updated = owner.update_project(project.id, &abandon).await?;
    assert_eq!(
        ProjectStatus::classify(updated.published, updated.abandoned_at),
        ProjectStatus::Abandoned
    );

    let comment = stranger.create_comment(project.id, "Told you so").await?;
    let detail = stranger.get_project(project.id).await?;
    assert_eq!(detail.project.id, project.id);
    assert_eq!(detail.comments[0].comment.id, comment.comment.id);
    assert!(stranger.list_projects().await?.iter().any(|p| p.project.id == project.id));

    let reply = owner.delete_project(project.id).await?;
    assert_eq!(reply.message, "Project deleted successfully");

    let err = owner.get_project(project.id).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert!(stranger.list_comments(project.id).await?.is_empty());
    Ok(())
}
