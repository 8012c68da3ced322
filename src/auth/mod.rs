pub mod password;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use password::{hash_password, verify_password};

/// Claims carried by every bearer token. `id` is the user identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: Uuid,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(id: Uuid, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            id,
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug)]
pub enum JwtError {
    TokenGeneration(String),
    InvalidToken(String),
    InvalidSecret,
    InvalidExpiry(u64),
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::TokenGeneration(msg) => write!(f, "JWT generation error: {}", msg),
            JwtError::InvalidToken(msg) => write!(f, "Invalid JWT token: {}", msg),
            JwtError::InvalidSecret => write!(f, "Invalid JWT secret"),
            JwtError::InvalidExpiry(hours) => write!(f, "JWT expiry of {} hours is out of range", hours),
        }
    }
}

impl std::error::Error for JwtError {}

/// HS256 signing and verification keys derived from the shared secret.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenKeys").field("ttl", &self.ttl).finish_non_exhaustive()
    }
}

impl TokenKeys {
    pub fn new(secret: &str, expiry_hours: u64) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::InvalidSecret);
        }
        // exp must stay a representable timestamp
        let ttl = i64::try_from(expiry_hours)
            .ok()
            .and_then(Duration::try_hours)
            .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
            .ok_or(JwtError::InvalidExpiry(expiry_hours))?;
        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        })
    }

    /// Sign a fresh token for `user_id`.
    pub fn issue(&self, user_id: Uuid) -> Result<String, JwtError> {
        encode(&Header::default(), &Claims::new(user_id, self.ttl), &self.encoding)
            .map_err(|e| JwtError::TokenGeneration(e.to_string()))
    }

    /// Check signature and expiry, returning the embedded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| JwtError::InvalidToken(e.to_string()))
    }
}
