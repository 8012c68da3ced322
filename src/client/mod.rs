//! Typed async client for the killedinlocalhost HTTP API.
//!
//! Used by the `kil` binary and by the end-to-end tests. Every method maps
//! one endpoint; a non-2xx reply becomes [`ClientError::Api`] carrying the
//! server's `error` message, or a per-operation fallback when the body has none.

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;
use uuid::Uuid;

use crate::api::{
    AuthResponse, CommentInput, ErrorBody, MessageResponse, ProjectInput, SigninInput,
    SignupInput, UpdateProjectInput,
};
use crate::database::models::{CommentDetail, Project, ProjectDetail};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server url: {0}")]
    Url(#[from] url::ParseError),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },

    #[error("not signed in")]
    NotAuthenticated,
}

impl ClientError {
    /// HTTP status of an API error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Body of `GET /health`, returned for both the healthy and degraded cases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub database: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl HealthReport {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(server_url: &str) -> Result<Self, ClientError> {
        let mut base_url = Url::parse(server_url)?;
        // join() drops the last path segment unless the base ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            token: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let url = self.base_url.join(path)?;
        Ok(self.http.request(method, url))
    }

    fn authed(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let token = self.token.as_deref().ok_or(ClientError::NotAuthenticated)?;
        Ok(self.request(method, path)?.bearer_auth(token))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        fallback: &str,
    ) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) if !body.error.is_empty() => body.error,
            _ => fallback.to_string(),
        };
        tracing::debug!("{} -> {}: {}", fallback, status, message);
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    pub async fn health(&self) -> Result<HealthReport, ClientError> {
        let response = self.request(Method::GET, "health")?.send().await?;
        let status = response.status();
        if status.is_success() || status == StatusCode::SERVICE_UNAVAILABLE {
            return Ok(response.json::<HealthReport>().await?);
        }
        Err(ClientError::Api {
            status: status.as_u16(),
            message: "Health check failed".to_string(),
        })
    }

    /// Register and remember the returned token.
    pub async fn signup(&mut self, input: &SignupInput) -> Result<AuthResponse, ClientError> {
        let request = self.request(Method::POST, "api/v1/user/signup")?.json(input);
        let auth: AuthResponse = self.send(request, "Failed to sign up").await?;
        self.token = Some(auth.token.clone());
        Ok(auth)
    }

    /// Sign in and remember the returned token.
    pub async fn signin(&mut self, input: &SigninInput) -> Result<AuthResponse, ClientError> {
        let request = self.request(Method::POST, "api/v1/user/signin")?.json(input);
        let auth: AuthResponse = self.send(request, "Failed to sign in").await?;
        self.token = Some(auth.token.clone());
        Ok(auth)
    }

    pub async fn list_projects(&self) -> Result<Vec<ProjectDetail>, ClientError> {
        let request = self.authed(Method::GET, "api/v1/projects")?;
        self.send(request, "Failed to fetch projects").await
    }

    pub async fn get_project(&self, id: Uuid) -> Result<ProjectDetail, ClientError> {
        let request = self.authed(Method::GET, &format!("api/v1/projects/{id}"))?;
        self.send(request, "Failed to fetch project").await
    }

    pub async fn create_project(&self, input: &ProjectInput) -> Result<Project, ClientError> {
        let request = self.authed(Method::POST, "api/v1/projects")?.json(input);
        self.send(request, "Failed to create project").await
    }

    pub async fn update_project(
        &self,
        id: Uuid,
        input: &UpdateProjectInput,
    ) -> Result<Project, ClientError> {
        let request = self
            .authed(Method::PUT, &format!("api/v1/projects/{id}"))?
            .json(input);
        self.send(request, "Failed to update project").await
    }

    pub async fn delete_project(&self, id: Uuid) -> Result<MessageResponse, ClientError> {
        let request = self.authed(Method::DELETE, &format!("api/v1/projects/{id}"))?;
        self.send(request, "Failed to delete project").await
    }

    pub async fn list_comments(&self, project_id: Uuid) -> Result<Vec<CommentDetail>, ClientError> {
        let request = self.authed(Method::GET, &format!("api/v1/projects/{project_id}/comments"))?;
        self.send(request, "Failed to fetch comments").await
    }

    pub async fn create_comment(
        &self,
        project_id: Uuid,
        content: &str,
    ) -> Result<CommentDetail, ClientError> {
        let input = CommentInput {
            content: content.to_string(),
        };
        let request = self
            .authed(Method::POST, &format!("api/v1/projects/{project_id}/comments"))?
            .json(&input);
        self.send(request, "Failed to add comment").await
    }

    pub async fn delete_comment(&self, id: Uuid) -> Result<MessageResponse, ClientError> {
        let request = self.authed(Method::DELETE, &format!("api/v1/comments/{id}"))?;
        self.send(request, "Failed to delete comment").await
    }
}
