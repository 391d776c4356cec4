//! Stateless bearer tokens binding a user id

use std::time::Duration;

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::user::UserClaims,
};

#[derive(Clone)]
pub struct TokenService {
    secret: String,
    expires_in: Option<Duration>,
}

impl TokenService {
    pub fn new(secret: impl Into<String>, expires_in: Option<Duration>) -> Self {
        Self {
            secret: secret.into(),
            expires_in,
        }
    }

    /// Sign a token for the given user. Without a configured lifetime the token has no `exp`.
    pub fn issue(&self, user_id: i32) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let claims = UserClaims {
            user_id,
            iat: now,
            exp: self.expires_in.map(|ttl| now + ttl.as_secs() as i64),
        };

        claims
            .create_token(&self.secret)
            .map_err(|e| AppError::internal(format!("Failed to create token: {}", e)))
    }

    /// Verify signature (and expiry when present)
    pub fn verify(&self, token: &str) -> AppResult<UserClaims> {
        UserClaims::from_token(token, &self.secret).map_err(|e| {
            tracing::debug!("Rejected bearer token: {}", e);
            AppError::Authentication("Invalid token".to_string())
        })
    }
}
