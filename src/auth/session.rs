use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::SessionConfig;

/// Signed session payload carried in the session cookie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Id of the logged-in user
    pub sub: Uuid,
    /// Unique per login, used to revoke a token on logout
    pub jti: Uuid,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, lifetime: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            jti: Uuid::new_v4(),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session secret is empty")]
    EmptySecret,

    #[error("failed to sign session token: {0}")]
    Encode(#[from] jsonwebtoken::errors::Error),
}

/// Issues, resolves and revokes session tokens
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Start a session for `user_id` and return the token to hand to the client
    async fn issue(&self, user_id: Uuid) -> Result<String, SessionError>;

    /// The user id behind a token, or `None` when the token is forged,
    /// expired or revoked
    async fn resolve(&self, token: &str) -> Option<Uuid>;

    /// End the session. Unknown or invalid tokens are ignored.
    async fn revoke(&self, token: &str);
}

/// HS256 tokens with an in-process revocation list keyed by `jti`.
/// Revoked entries are dropped once the token would have expired anyway.
pub struct JwtSessionStore {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime: Duration,
    revoked: RwLock<HashMap<Uuid, i64>>,
}

impl JwtSessionStore {
    pub fn new(config: &SessionConfig) -> Result<Self, SessionError> {
        if config.secret.is_empty() {
            return Err(SessionError::EmptySecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            lifetime: Duration::hours(config.lifetime_hours),
            revoked: RwLock::new(HashMap::new()),
        })
    }

    fn decode_claims(&self, token: &str) -> Option<Claims> {
        match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                tracing::debug!("Rejected session token: {}", e);
                None
            }
        }
    }
}

#[async_trait]
impl SessionStore for JwtSessionStore {
    async fn issue(&self, user_id: Uuid) -> Result<String, SessionError> {
        let claims = Claims::new(user_id, self.lifetime);
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(token)
    }

    async fn resolve(&self, token: &str) -> Option<Uuid> {
        let claims = self.decode_claims(token)?;
        if self.revoked.read().await.contains_key(&claims.jti) {
            tracing::debug!("Session {} was revoked", claims.jti);
            return None;
        }
        Some(claims.sub)
    }

    async fn revoke(&self, token: &str) {
        let Some(claims) = self.decode_claims(token) else {
            return;
        };

        let now = Utc::now().timestamp();
        let mut revoked = self.revoked.write().await;
        revoked.retain(|_, exp| *exp > now);
        revoked.insert(claims.jti, claims.exp);
    }
}
