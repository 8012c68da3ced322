//! Request payloads and the shape rules they must satisfy before any store
//! call is made. Shared by the server handlers and the HTTP client.

use chrono::{DateTime, Utc};
use email_address::EmailAddress;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::database::models::{NewProject, ProjectChanges};

pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Invalid email")]
    InvalidEmail,

    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("{0} is required")]
    Required(&'static str),

    #[error("{0} cannot be empty")]
    Empty(&'static str),
}

fn check_email(email: &str) -> Result<(), InputError> {
    if EmailAddress::is_valid(email) {
        Ok(())
    } else {
        Err(InputError::InvalidEmail)
    }
}

fn check_password(password: &str) -> Result<(), InputError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(InputError::PasswordTooShort { min: MIN_PASSWORD_LENGTH });
    }
    Ok(())
}

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupInput {
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl SignupInput {
    pub fn validate(&self) -> Result<(), InputError> {
        check_email(&self.email)?;
        check_password(&self.password)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigninInput {
    pub email: String,
    pub password: String,
}

impl SigninInput {
    pub fn validate(&self) -> Result<(), InputError> {
        check_email(&self.email)?;
        check_password(&self.password)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInput {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abandoned_at: Option<DateTime<Utc>>,
}

impl ProjectInput {
    pub fn validate(&self) -> Result<(), InputError> {
        if self.title.is_empty() {
            return Err(InputError::Required("Title"));
        }
        if self.content.is_empty() {
            return Err(InputError::Required("Content"));
        }
        Ok(())
    }
}

impl From<ProjectInput> for NewProject {
    fn from(input: ProjectInput) -> Self {
        NewProject {
            title: input.title,
            content: input.content,
            published: input.published,
            tags: input.tags,
            abandoned_at: input.abandoned_at,
        }
    }
}

/// Partial update: only the fields present in the request are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub abandoned_at: Option<Option<DateTime<Utc>>>,
}

impl UpdateProjectInput {
    pub fn validate(&self) -> Result<(), InputError> {
        if self.title.as_deref() == Some("") {
            return Err(InputError::Empty("Title"));
        }
        if self.content.as_deref() == Some("") {
            return Err(InputError::Empty("Content"));
        }
        Ok(())
    }
}

impl From<UpdateProjectInput> for ProjectChanges {
    fn from(input: UpdateProjectInput) -> Self {
        ProjectChanges {
            title: input.title,
            content: input.content,
            published: input.published,
            tags: input.tags,
            abandoned_at: input.abandoned_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentInput {
    pub content: String,
}

impl CommentInput {
    pub fn validate(&self) -> Result<(), InputError> {
        if self.content.trim().is_empty() {
            return Err(InputError::Required("Content"));
        }
        Ok(())
    }
}
