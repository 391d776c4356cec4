//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, authors, books, health, installments, library};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Personal Library API",
        version = "0.1.0",
        description = "Personal book library with Open Library search and installment plans"
    ),
    servers(
        (url = "/api", description = "API root")
    ),
    paths(
        // Health
        health::health_check,
        // Auth
        auth::register,
        auth::login,
        auth::logout,
        // Authors
        authors::create_author,
        authors::list_authors,
        authors::get_author,
        // Open Library
        books::search_books,
        // Personal library
        library::add_book,
        library::list_books,
        library::get_book,
        library::update_notes,
        library::delete_book,
        // Installments
        installments::create_plan,
        installments::get_plan,
    ),
    components(
        schemas(
            // Auth
            crate::models::user::RegisterRequest,
            crate::models::user::LoginRequest,
            crate::models::user::UserInfo,
            crate::models::user::AuthPayload,
            crate::models::user::LogoutPayload,
            // Authors
            crate::models::author::Author,
            crate::models::author::AuthorShort,
            crate::models::author::CreatedAuthor,
            crate::models::author::CreateAuthor,
            // Open Library
            crate::models::catalog::CatalogBook,
            // Personal library
            crate::models::book::AddBookRequest,
            crate::models::book::UpdateNotesRequest,
            crate::models::book::CreatedBook,
            crate::models::book::BookShort,
            crate::models::book::BookDetails,
            crate::models::book::BookNotes,
            // Installments
            crate::models::book::CreateInstallmentsRequest,
            crate::models::book::InstallmentPlan,
            crate::models::book::Installment,
            crate::models::book::InstallmentStatus,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check"),
        (name = "auth", description = "Registration, login and logout"),
        (name = "authors", description = "Shared author catalog"),
        (name = "books", description = "Open Library search"),
        (name = "library", description = "Personal book library"),
        (name = "installments", description = "Installment payment plans")
    )
)]
pub struct ApiDoc;

/// Declares the `bearer_auth` scheme referenced by protected paths
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_routes_and_security() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/my-library/books/{id}/installments"));
        assert!(doc.paths.paths.contains_key("/books/search/{query}"));
        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
