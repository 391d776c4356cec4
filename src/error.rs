//! Error types for the personal library server

use std::panic::Location;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Authentication(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    /// The external catalog was unreachable or answered with a failure status
    #[error("{message}")]
    Upstream {
        message: String,
        location: &'static Location<'static>,
    },

    #[error("{source}")]
    Database {
        source: sqlx::Error,
        location: &'static Location<'static>,
    },

    #[error("{message}")]
    Internal {
        message: String,
        location: &'static Location<'static>,
    },
}

impl AppError {
    /// Build an internal error remembering where it was raised
    #[track_caller]
    pub fn internal(message: impl Into<String>) -> Self {
        AppError::Internal {
            message: message.into(),
            location: Location::caller(),
        }
    }

    /// Build an upstream failure remembering where it was raised
    #[track_caller]
    pub fn upstream(message: impl Into<String>) -> Self {
        AppError::Upstream {
            message: message.into(),
            location: Location::caller(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Upstream { .. } | AppError::Database { .. } | AppError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Source location for errors that reach the centralized responder
    pub fn location(&self) -> Option<&'static Location<'static>> {
        match self {
            AppError::Upstream { location, .. }
            | AppError::Database { location, .. }
            | AppError::Internal { location, .. } => Some(location),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for AppError {
    #[track_caller]
    fn from(source: sqlx::Error) -> Self {
        AppError::Database {
            source,
            location: Location::caller(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            details: None,
            location: None,
        }
    }
}

/// Attached to every 500 response so the error responder can report it
#[derive(Debug, Clone)]
pub struct ErrorDiagnostics {
    pub message: String,
    pub location: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if let AppError::Database { source, .. } = &self {
            tracing::error!("Database error: {:?}", source);
        }

        let message = self.to_string();
        let diagnostics = status.is_server_error().then(|| ErrorDiagnostics {
            message: message.clone(),
            location: self
                .location()
                .map(|l| format!("Error at {}:{}:{}", l.file(), l.line(), l.column()))
                .unwrap_or_else(|| "No location available".to_string()),
        });

        let mut response = (status, Json(ErrorResponse::new(message))).into_response();
        if let Some(diagnostics) = diagnostics {
            response.extensions_mut().insert(diagnostics);
        }
        response
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
