//! Users repository for database operations

use async_trait::async_trait;

use super::{is_unique_violation, Repository, UsersRepository};
use crate::{
    error::{AppError, AppResult},
    models::user::{NewUser, User},
};

#[async_trait]
impl UsersRepository for Repository {
    /// Get user by email (authentication identifier)
    async fn users_get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password, name, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Check if email already exists
    async fn users_email_exists(&self, email: &str) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Create a new user
    async fn users_create(&self, user: &NewUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password, name)
            VALUES ($1, $2, $3)
            RETURNING id, email, password, name, created_at
            "#,
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("User already exists".to_string())
            } else {
                AppError::from(e)
            }
        })
    }
}
