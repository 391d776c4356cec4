//! Business logic services

pub mod auth;
pub mod authors;
pub mod catalog;
pub mod installments;
pub mod library;
pub mod tokens;

use std::sync::Arc;

use crate::{
    config::AppConfig,
    error::{AppError, AppResult},
    repository::{AuthorsRepository, BooksRepository, Repository, UsersRepository},
};

use catalog::{BookCatalog, OpenLibraryClient};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub tokens: tokens::TokenService,
    pub auth: auth::AuthService,
    pub authors: authors::AuthorsService,
    pub catalog: Arc<dyn BookCatalog>,
    pub library: library::LibraryService,
    pub installments: installments::InstallmentsService,
}

impl Services {
    /// Create all services on top of the database repository and the Open Library client
    pub fn new(repository: Repository, config: &AppConfig) -> AppResult<Self> {
        let catalog: Arc<dyn BookCatalog> = Arc::new(OpenLibraryClient::new(&config.open_library)?);
        let repository = Arc::new(repository);

        Self::with_parts(repository.clone(), repository.clone(), repository, catalog, config)
    }

    /// Wire services from arbitrary store and catalog implementations
    pub fn with_parts(
        users: Arc<dyn UsersRepository>,
        authors: Arc<dyn AuthorsRepository>,
        books: Arc<dyn BooksRepository>,
        catalog: Arc<dyn BookCatalog>,
        config: &AppConfig,
    ) -> AppResult<Self> {
        let expires_in = config
            .auth
            .expires_in()
            .map_err(|e| AppError::internal(e.to_string()))?;
        let tokens = tokens::TokenService::new(config.auth.jwt_secret.clone(), expires_in);

        Ok(Self {
            auth: auth::AuthService::new(users, tokens.clone()),
            authors: authors::AuthorsService::new(authors),
            library: library::LibraryService::new(books.clone(), catalog.clone()),
            installments: installments::InstallmentsService::new(books),
            catalog,
            tokens,
        })
    }
}
