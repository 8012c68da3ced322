use once_cell::sync::Lazy;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::api::{AuthResponse, SigninInput, SignupInput};
use crate::auth::{hash_password, verify_password, TokenKeys};
use crate::database::models::NewUser;
use crate::database::Store;

use super::ServiceError;

/// Verified against when the email is unknown so both failure paths cost the same.
static DUMMY_HASH: Lazy<String> = Lazy::new(|| hash_password("killedinlocalhost-timing-pad"));

/// Account creation, credential checks and bearer-token verification.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn Store>,
    keys: TokenKeys,
}

impl AuthService {
    pub fn new(store: Arc<dyn Store>, keys: TokenKeys) -> Self {
        Self { store, keys }
    }

    pub async fn signup(&self, input: SignupInput) -> Result<AuthResponse, ServiceError> {
        input.validate()?;

        let password = input.password;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password)).await?;

        let user = self
            .store
            .insert_user(NewUser {
                email: input.email,
                password_hash,
                name: input.name,
            })
            .await?;
        info!(user_id = %user.id, "user signed up");

        let token = self.keys.issue(user.id)?;
        Ok(AuthResponse {
            token,
            user: user.into(),
        })
    }

    pub async fn signin(&self, input: SigninInput) -> Result<AuthResponse, ServiceError> {
        input.validate()?;

        let user = self.store.find_user_by_email(&input.email).await?;
        let stored = user.as_ref().map(|u| u.password.clone());
        let password = input.password;
        let matches = tokio::task::spawn_blocking(move || {
            verify_password(&password, stored.as_deref().unwrap_or(DUMMY_HASH.as_str()))
        })
        .await?;

        let user = match user {
            Some(user) if matches => user,
            _ => {
                warn!("rejected signin attempt");
                return Err(ServiceError::InvalidCredentials);
            }
        };
        info!(user_id = %user.id, "user signed in");

        let token = self.keys.issue(user.id)?;
        Ok(AuthResponse {
            token,
            user: user.into(),
        })
    }

    /// Resolve an `Authorization` header value to the caller's user id.
    pub fn authenticate(&self, header: Option<&str>) -> Result<Uuid, ServiceError> {
        let header = header.ok_or_else(|| ServiceError::Unauthorized("Missing Authorization header".into()))?;
        let token = bearer_token(header)
            .ok_or_else(|| ServiceError::Unauthorized("Authorization header must use Bearer token format".into()))?;
        let claims = self
            .keys
            .verify(token)
            .map_err(|e| ServiceError::Unauthorized(e.to_string()))?;
        Ok(claims.id)
    }
}

/// The token part of `Bearer <token>`, if present and non-empty.
pub fn bearer_token(header: &str) -> Option<&str> {
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;

    fn service() -> AuthService {
        AuthService::new(
            Arc::new(MemoryStore::new()),
            TokenKeys::new("test-secret", 1).unwrap(),
        )
    }

    fn signup_input(email: &str) -> SignupInput {
        SignupInput {
            email: email.to_string(),
            password: "graveyard".to_string(),
            name: Some("Dev".to_string()),
        }
    }

    #[tokio::test]
    async fn signup_returns_token_for_new_user() {
        let auth = service();
        let res = auth.signup(signup_input("dev@localhost.dev")).await.unwrap();
        assert_eq!(res.user.email, "dev@localhost.dev");
        assert_eq!(res.user.name.as_deref(), Some("Dev"));

        let header = format!("Bearer {}", res.token);
        assert_eq!(auth.authenticate(Some(header.as_str())).unwrap(), res.user.id);
    }

    #[tokio::test]
    async fn duplicate_signup_conflicts() {
        let auth = service();
        auth.signup(signup_input("dev@localhost.dev")).await.unwrap();
        let mut again = signup_input("dev@localhost.dev");
        again.password = "another-password".to_string();
        again.name = None;
        assert!(matches!(auth.signup(again).await, Err(ServiceError::Conflict(_))));
    }

    #[tokio::test]
    async fn signin_failures_are_indistinguishable() {
        let auth = service();
        auth.signup(signup_input("dev@localhost.dev")).await.unwrap();

        let wrong_password = auth
            .signin(SigninInput {
                email: "dev@localhost.dev".to_string(),
                password: "not-the-password".to_string(),
            })
            .await
            .unwrap_err();
        let unknown_email = auth
            .signin(SigninInput {
                email: "ghost@localhost.dev".to_string(),
                password: "graveyard".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, ServiceError::InvalidCredentials));
        assert!(matches!(unknown_email, ServiceError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn signin_with_correct_credentials() {
        let auth = service();
        let created = auth.signup(signup_input("dev@localhost.dev")).await.unwrap();
        let res = auth
            .signin(SigninInput {
                email: "dev@localhost.dev".to_string(),
                password: "graveyard".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(res.user.id, created.user.id);
    }

    #[tokio::test]
    async fn signup_validation_runs_first() {
        let auth = service();
        let mut input = signup_input("nope");
        input.password = "123".to_string();
        assert!(matches!(auth.signup(input).await, Err(ServiceError::Validation(_))));
    }

    #[test]
    fn authenticate_rejects_bad_headers() {
        let auth = service();
        for header in [None, Some("Token abc"), Some("Bearer "), Some("Bearer not-a-jwt")] {
            assert!(matches!(auth.authenticate(header), Err(ServiceError::Unauthorized(_))));
        }
    }

    #[test]
    fn bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("Bearer   "), None);
        assert_eq!(bearer_token("bearer abc"), None);
    }
}
