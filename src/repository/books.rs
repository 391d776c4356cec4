//! Personal library queries, always filtered by owner

use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;

use super::{is_unique_violation, BooksRepository, Repository};
use crate::{
    error::{AppError, AppResult},
    models::book::{BookDetails, BookNotes, BookShort, CreatedBook, Installment, NewPersonalBook, PersonalBook},
};

/// Raised when the user already saved this work
pub(crate) const DUPLICATE_BOOK: &str = "Book already exists in your library";

const BOOK_COLUMNS: &str = r#"
    id, user_id, open_library_id, title, author, publish_year, price, notes, cover_url,
    number_of_installments, installment_amount, installments, created_at, updated_at
"#;

#[async_trait]
impl BooksRepository for Repository {
    async fn books_exists(&self, user_id: i32, open_library_id: &str) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM personal_books WHERE user_id = $1 AND open_library_id = $2)",
        )
        .bind(user_id)
        .bind(open_library_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn books_create(&self, book: &NewPersonalBook) -> AppResult<CreatedBook> {
        sqlx::query_as::<_, CreatedBook>(
            r#"
            INSERT INTO personal_books (user_id, open_library_id, title, author, publish_year, price, notes, cover_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, open_library_id, title, author, publish_year, price, notes, cover_url, created_at
            "#,
        )
        .bind(book.user_id)
        .bind(&book.open_library_id)
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.publish_year)
        .bind(book.price)
        .bind(&book.notes)
        .bind(&book.cover_url)
        .fetch_one(&self.pool)
        .await
        .map_err(insert_error)
    }

    async fn books_list(&self, user_id: i32) -> AppResult<Vec<BookShort>> {
        let rows = sqlx::query_as::<_, BookShort>(
            r#"
            SELECT id, open_library_id, title, author, publish_year, cover_url, created_at
            FROM personal_books
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn books_get(&self, user_id: i32, id: i32) -> AppResult<Option<PersonalBook>> {
        let query = format!("SELECT {} FROM personal_books WHERE id = $1 AND user_id = $2", BOOK_COLUMNS);
        let book = sqlx::query_as::<_, PersonalBook>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    async fn books_get_details(&self, user_id: i32, id: i32) -> AppResult<Option<BookDetails>> {
        let book = sqlx::query_as::<_, BookDetails>(
            r#"
            SELECT id, open_library_id, title, author, publish_year, price, notes, cover_url, created_at, updated_at
            FROM personal_books
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(book)
    }

    async fn books_update_notes(&self, user_id: i32, id: i32, notes: &str) -> AppResult<Option<BookNotes>> {
        let book = sqlx::query_as::<_, BookNotes>(
            r#"
            UPDATE personal_books SET notes = $1, updated_at = $2
            WHERE id = $3 AND user_id = $4
            RETURNING id, title, notes, updated_at
            "#,
        )
        .bind(notes)
        .bind(Utc::now())
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(book)
    }

    async fn books_delete(&self, user_id: i32, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM personal_books WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn books_save_installment_plan(
        &self,
        user_id: i32,
        id: i32,
        number_of_installments: i32,
        installment_amount: f64,
        installments: Vec<Installment>,
    ) -> AppResult<Option<PersonalBook>> {
        let query = format!(
            r#"
            UPDATE personal_books
            SET number_of_installments = $1, installment_amount = $2, installments = $3, updated_at = $4
            WHERE id = $5 AND user_id = $6
            RETURNING {}
            "#,
            BOOK_COLUMNS
        );
        let book = sqlx::query_as::<_, PersonalBook>(&query)
            .bind(number_of_installments)
            .bind(installment_amount)
            .bind(Json(installments))
            .bind(Utc::now())
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }
}

/// A concurrent insert of the same (user, work) pair reports like the
/// pre-check does
fn insert_error(e: sqlx::Error) -> AppError {
    if is_unique_violation(&e) {
        AppError::Validation(DUPLICATE_BOOK.to_string())
    } else {
        AppError::from(e)
    }
}
