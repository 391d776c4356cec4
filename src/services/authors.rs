//! Author catalog service

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::author::{Author, AuthorShort, CreateAuthor, CreatedAuthor},
    repository::AuthorsRepository,
};

#[derive(Clone)]
pub struct AuthorsService {
    repository: Arc<dyn AuthorsRepository>,
}

impl AuthorsService {
    pub fn new(repository: Arc<dyn AuthorsRepository>) -> Self {
        Self { repository }
    }

    /// Name uniqueness is enforced by the store and surfaces as `Conflict`
    pub async fn create(&self, data: CreateAuthor) -> AppResult<CreatedAuthor> {
        let name = data
            .name
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| AppError::Validation("Author name is required".to_string()))?;

        let author = self.repository.authors_create(&name, data.country).await?;
        tracing::info!("Created author id={} name={:?}", author.id, author.name);
        Ok(author)
    }

    pub async fn list(&self) -> AppResult<Vec<AuthorShort>> {
        self.repository.authors_list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Author> {
        self.repository
            .authors_get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Author not found".to_string()))
    }
}
