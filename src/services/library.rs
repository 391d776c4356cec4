//! Per-user personal library

use std::sync::Arc;

use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::book::{AddBookRequest, BookDetails, BookNotes, BookShort, CreatedBook, NewPersonalBook},
    repository::{books::DUPLICATE_BOOK, BooksRepository},
    services::{catalog::BookCatalog, installments::BOOK_NOT_FOUND},
};

const INVALID_NOTES: &str = "Notes are required and must be a string";

#[derive(Clone)]
pub struct LibraryService {
    books: Arc<dyn BooksRepository>,
    catalog: Arc<dyn BookCatalog>,
}

impl LibraryService {
    pub fn new(books: Arc<dyn BooksRepository>, catalog: Arc<dyn BookCatalog>) -> Self {
        Self { books, catalog }
    }

    /// Add a catalog work to the user's library.
    ///
    /// Checks run in order: identifier, duplicate, price. Title, author,
    /// year and cover come from the catalog; a failed metadata fetch aborts
    /// the add without writing anything.
    pub async fn add_book(&self, user_id: i32, request: AddBookRequest) -> AppResult<CreatedBook> {
        let open_library_id = request
            .open_library_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::Validation("openLibraryId is required".to_string()))?;

        if self.books.books_exists(user_id, &open_library_id).await? {
            return Err(AppError::Validation(DUPLICATE_BOOK.to_string()));
        }

        // A zero price counts as missing
        let price = request
            .price
            .filter(|price| *price != 0.0)
            .ok_or_else(|| AppError::Validation("Price is required".to_string()))?;
        if price <= 0.0 {
            return Err(AppError::Validation("Price must be greater than 0".to_string()));
        }

        let metadata = self.catalog.get_metadata(&open_library_id).await?;

        let book = self
            .books
            .books_create(&NewPersonalBook {
                user_id,
                open_library_id,
                title: metadata.title,
                author: Some(metadata.authors),
                publish_year: metadata.publish_year,
                price,
                notes: request.notes,
                cover_url: metadata.cover_url,
            })
            .await?;

        tracing::info!(
            "Added book id={} ({}) to library of user id={}",
            book.id,
            book.open_library_id,
            user_id
        );
        Ok(book)
    }

    pub async fn list(&self, user_id: i32) -> AppResult<Vec<BookShort>> {
        self.books.books_list(user_id).await
    }

    pub async fn get_details(&self, user_id: i32, book_id: i32) -> AppResult<BookDetails> {
        self.books
            .books_get_details(user_id, book_id)
            .await?
            .ok_or_else(|| AppError::NotFound(BOOK_NOT_FOUND.to_string()))
    }

    /// Replace the notes of a book. `notes` must be a non-empty JSON string.
    pub async fn update_notes(&self, user_id: i32, book_id: i32, notes: Option<Value>) -> AppResult<BookNotes> {
        let notes = match notes {
            Some(Value::String(text)) if !text.is_empty() => text,
            _ => return Err(AppError::Validation(INVALID_NOTES.to_string())),
        };

        self.books
            .books_update_notes(user_id, book_id, &notes)
            .await?
            .ok_or_else(|| AppError::NotFound(BOOK_NOT_FOUND.to_string()))
    }

    pub async fn delete(&self, user_id: i32, book_id: i32) -> AppResult<()> {
        if !self.books.books_delete(user_id, book_id).await? {
            return Err(AppError::NotFound(BOOK_NOT_FOUND.to_string()));
        }

        tracing::info!("Removed book id={} from library of user id={}", book_id, user_id);
        Ok(())
    }
}
