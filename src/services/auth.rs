//! Registration, login and logout

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::user::{AuthPayload, LogoutPayload, NewUser, RegisterRequest, User},
    repository::UsersRepository,
    services::tokens::TokenService,
};

pub(crate) const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UsersRepository>,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(users: Arc<dyn UsersRepository>, tokens: TokenService) -> Self {
        Self { users, tokens }
    }

    /// Create an account and return it with a fresh token
    pub async fn register(&self, request: RegisterRequest) -> AppResult<AuthPayload> {
        request.validate().map_err(validation_message)?;

        if self.users.users_email_exists(&request.email).await? {
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        let password_hash = hash_password(request.password).await?;
        let user = self
            .users
            .users_create(&NewUser {
                email: request.email,
                password_hash,
                name: request.name,
            })
            .await?;

        tracing::info!("Registered user id={}", user.id);
        self.payload_for(user)
    }

    /// Check credentials. Unknown email and wrong password are reported identically.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthPayload> {
        let user = self
            .users
            .users_get_by_email(email)
            .await?
            .ok_or_else(|| AppError::Authentication(INVALID_CREDENTIALS.to_string()))?;

        if !verify_password(user.password.clone(), password.to_string()).await? {
            return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
        }

        self.payload_for(user)
    }

    /// Tokens are stateless: nothing is revoked server-side.
    pub async fn logout(&self, _token: Option<&str>) -> AppResult<LogoutPayload> {
        Ok(LogoutPayload { success: true })
    }

    fn payload_for(&self, user: User) -> AppResult<AuthPayload> {
        let token = self.tokens.issue(user.id)?;
        Ok(AuthPayload {
            user: user.into(),
            token,
        })
    }
}

fn validation_message(errors: validator::ValidationErrors) -> AppError {
    let mut messages: Vec<String> = errors
        .field_errors()
        .values()
        .flat_map(|list| list.iter())
        .map(|e| {
            e.message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| e.code.to_string())
        })
        .collect();
    messages.sort();
    AppError::Validation(messages.join("; "))
}

/// Hash a password using Argon2 off the async workers
async fn hash_password(password: String) -> AppResult<String> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))
    })
    .await
    .map_err(|e| AppError::internal(format!("Password hashing task failed: {}", e)))?
}

async fn verify_password(hash: String, password: String) -> AppResult<bool> {
    tokio::task::spawn_blocking(move || {
        let parsed_hash =
            PasswordHash::new(&hash).map_err(|_| AppError::internal("Invalid password hash"))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    })
    .await
    .map_err(|e| AppError::internal(format!("Password verification task failed: {}", e)))?
}
