use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};

use crate::errors::{AppError, Result};
use crate::models::user::SessionClaims;

/// Session-token issuer collaborator. Tokens are opaque to the flows that
/// request them.
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    async fn issue(&self, identity: &str, service: &str) -> Result<String>;
}

const SESSION_TTL_SECS: i64 = 7 * 24 * 3600;

pub struct JwtTokenIssuer {
    secret: String,
}

impl JwtTokenIssuer {
    pub fn new(secret: String) -> Self {
        Self { secret }
    }
}

#[async_trait]
impl TokenIssuer for JwtTokenIssuer {
    async fn issue(&self, identity: &str, service: &str) -> Result<String> {
        let claims = SessionClaims {
            sub: identity.to_string(),
            service: service.to_string(),
            exp: (Utc::now().timestamp() + SESSION_TTL_SECS) as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::TokenSign(e.to_string()))
    }
}
