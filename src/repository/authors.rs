//! Author catalog queries

use async_trait::async_trait;

use super::{is_unique_violation, AuthorsRepository, Repository};
use crate::{
    error::{AppError, AppResult},
    models::author::{Author, AuthorShort, CreatedAuthor},
};

#[async_trait]
impl AuthorsRepository for Repository {
    async fn authors_create(&self, name: &str, country: Option<String>) -> AppResult<CreatedAuthor> {
        sqlx::query_as::<_, CreatedAuthor>(
            r#"
            INSERT INTO authors (name, country)
            VALUES ($1, $2)
            RETURNING id, name, country, created_at
            "#,
        )
        .bind(name)
        .bind(country)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("Author already exists".to_string())
            } else {
                AppError::from(e)
            }
        })
    }

    async fn authors_list(&self) -> AppResult<Vec<AuthorShort>> {
        let rows = sqlx::query_as::<_, AuthorShort>(
            "SELECT id, name, country FROM authors ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn authors_get_by_id(&self, id: i32) -> AppResult<Option<Author>> {
        let author = sqlx::query_as::<_, Author>(
            "SELECT id, name, country, created_at, updated_at FROM authors WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(author)
    }
}
