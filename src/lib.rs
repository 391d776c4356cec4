//! Personal library server
//!
//! REST JSON API for a personal book library: accounts with bearer tokens,
//! a shared author catalog, Open Library search, per-user saved books and
//! installment payment plans.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
