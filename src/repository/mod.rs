//! Repository layer for database operations
//!
//! Each record kind is exposed through a trait so services can be handed
//! either the pooled [`Repository`] or a test double.

pub mod authors;
pub mod books;
pub mod users;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{
        author::{Author, AuthorShort, CreatedAuthor},
        book::{BookDetails, BookNotes, BookShort, CreatedBook, Installment, NewPersonalBook, PersonalBook},
        user::{NewUser, User},
    },
};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// True when the store rejected a write because of a unique constraint
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait UsersRepository: Send + Sync {
    async fn users_get_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn users_email_exists(&self, email: &str) -> AppResult<bool>;

    /// Fails with `Conflict` when the email is already taken
    async fn users_create(&self, user: &NewUser) -> AppResult<User>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait AuthorsRepository: Send + Sync {
    /// Fails with `Conflict` when an author with that name exists
    async fn authors_create(&self, name: &str, country: Option<String>) -> AppResult<CreatedAuthor>;

    /// All authors ordered by name ascending
    async fn authors_list(&self) -> AppResult<Vec<AuthorShort>>;

    async fn authors_get_by_id(&self, id: i32) -> AppResult<Option<Author>>;
}

/// Personal books. Every lookup is scoped by owner as well as by id.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait BooksRepository: Send + Sync {
    async fn books_exists(&self, user_id: i32, open_library_id: &str) -> AppResult<bool>;

    /// Fails with `Validation` when the (user, work) pair is already stored
    async fn books_create(&self, book: &NewPersonalBook) -> AppResult<CreatedBook>;

    /// The user's books, newest first
    async fn books_list(&self, user_id: i32) -> AppResult<Vec<BookShort>>;

    async fn books_get(&self, user_id: i32, id: i32) -> AppResult<Option<PersonalBook>>;

    async fn books_get_details(&self, user_id: i32, id: i32) -> AppResult<Option<BookDetails>>;

    async fn books_update_notes(&self, user_id: i32, id: i32, notes: &str) -> AppResult<Option<BookNotes>>;

    /// Returns false when nothing matched
    async fn books_delete(&self, user_id: i32, id: i32) -> AppResult<bool>;

    async fn books_save_installment_plan(
        &self,
        user_id: i32,
        id: i32,
        number_of_installments: i32,
        installment_amount: f64,
        installments: Vec<Installment>,
    ) -> AppResult<Option<PersonalBook>>;
}
