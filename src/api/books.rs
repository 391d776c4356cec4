//! Open Library search endpoint

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{error::AppResult, models::catalog::CatalogBook, AppState};

use super::{AuthenticatedUser, ListResponse};

/// Free-text search in Open Library
#[utoipa::path(
    get,
    path = "/books/search/{query}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("query" = String, Path, description = "Search terms")
    ),
    responses(
        (status = 200, description = "Matching works", body = ListResponse<CatalogBook>),
        (status = 401, description = "Not authenticated"),
        (status = 500, description = "Failed to fetch books from Open Library", body = crate::error::ErrorResponse)
    )
)]
pub async fn search_books(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(query): Path<String>,
) -> AppResult<Json<ListResponse<CatalogBook>>> {
    let books = state.services.catalog.search(&query).await?;
    Ok(ListResponse::new(books))
}
