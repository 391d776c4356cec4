//! API handlers for the personal library REST endpoints

pub mod auth;
pub mod authors;
pub mod books;
pub mod health;
pub mod installments;
pub mod library;
pub mod openapi;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::ToSchema;

use crate::{
    error::{AppError, ErrorDiagnostics, ErrorResponse},
    models::user::UserClaims,
    AppState,
};

/// Extractor for the authenticated user behind a bearer token
pub struct AuthenticatedUser(pub UserClaims);

impl AuthenticatedUser {
    pub fn user_id(&self) -> i32 {
        self.0.user_id
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|header| header.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::Authentication("No token provided".to_string()))?;

        let claims = state.services.tokens.verify(token)?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Success envelope
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub fn new(data: T) -> Json<Self> {
        Json(Self { success: true, data })
    }
}

/// Success envelope for collections
#[derive(Serialize, ToSchema)]
pub struct ListResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub success: bool,
    /// Number of entries in `data`
    pub count: usize,
    pub data: Vec<T>,
}

impl<T> ListResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub fn new(data: Vec<T>) -> Json<Self> {
        Json(Self {
            success: true,
            count: data.len(),
            data,
        })
    }
}

/// Parse a numeric path identifier, reporting `message` when it is not one
pub(crate) fn parse_id(raw: &str, message: &str) -> Result<i32, AppError> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| AppError::Validation(message.to_string()))
}

/// Report server errors raised anywhere below and, in development mode,
/// expose their message and source location in the response body.
pub async fn error_responder(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let response = next.run(request).await;

    let Some(diagnostics) = response.extensions().get::<ErrorDiagnostics>().cloned() else {
        return response;
    };

    tracing::error!("===== ERROR DETECTED =====");
    tracing::error!("Message: {}", diagnostics.message);
    tracing::error!("Location: {}", diagnostics.location);
    tracing::error!("==========================");

    if !state.config.is_development() {
        return response;
    }

    let body = ErrorResponse {
        details: Some(diagnostics.message.clone()),
        location: Some(diagnostics.location),
        ..ErrorResponse::new(diagnostics.message)
    };
    (response.status(), Json(body)).into_response()
}

/// Build the application router with all routes
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/health", get(health::health_check))
        // Authentication
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        // Authors
        .route("/authors", get(authors::list_authors).post(authors::create_author))
        .route("/authors/:id", get(authors::get_author))
        // Open Library search
        .route("/books/search/:query", get(books::search_books))
        // Personal library
        .route("/my-library/books", get(library::list_books).post(library::add_book))
        .route(
            "/my-library/books/:id",
            get(library::get_book)
                .put(library::update_notes)
                .delete(library::delete_book),
        )
        .route(
            "/my-library/books/:id/installments",
            get(installments::get_plan).post(installments::create_plan),
        )
        .layer(middleware::from_fn_with_state(state.clone(), error_responder))
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
