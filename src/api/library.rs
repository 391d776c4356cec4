//! Personal library endpoints. Every route is scoped to the caller's books.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;

use crate::{
    error::{AppError, AppResult},
    models::book::{AddBookRequest, BookDetails, BookNotes, BookShort, CreatedBook, UpdateNotesRequest},
    AppState,
};

use super::{parse_id, ApiResponse, AuthenticatedUser, ListResponse};

const INVALID_BOOK_ID: &str = "Invalid book ID format";

/// Add an Open Library work to the caller's library
#[utoipa::path(
    post,
    path = "/my-library/books",
    tag = "library",
    security(("bearer_auth" = [])),
    request_body = AddBookRequest,
    responses(
        (status = 201, description = "Book added", body = ApiResponse<CreatedBook>),
        (status = 400, description = "Missing identifier, duplicate book or invalid price", body = crate::error::ErrorResponse)
    )
)]
pub async fn add_book(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    WithRejection(Json(request), _): WithRejection<Json<AddBookRequest>, AppError>,
) -> AppResult<(StatusCode, Json<ApiResponse<CreatedBook>>)> {
    let book = state.services.library.add_book(user.user_id(), request).await?;
    Ok((StatusCode::CREATED, ApiResponse::new(book)))
}

/// List the caller's books, newest first
#[utoipa::path(
    get,
    path = "/my-library/books",
    tag = "library",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Saved books", body = ListResponse<BookShort>)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<Json<ListResponse<BookShort>>> {
    let books = state.services.library.list(user.user_id()).await?;
    Ok(ListResponse::new(books))
}

#[utoipa::path(
    get,
    path = "/my-library/books/{id}",
    tag = "library",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = ApiResponse<BookDetails>),
        (status = 400, description = "Invalid book ID format", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found in your library", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<BookDetails>>> {
    let id = parse_id(&id, INVALID_BOOK_ID)?;
    let book = state.services.library.get_details(user.user_id(), id).await?;
    Ok(ApiResponse::new(book))
}

/// Replace the notes of a saved book
#[utoipa::path(
    put,
    path = "/my-library/books/{id}",
    tag = "library",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    request_body = UpdateNotesRequest,
    responses(
        (status = 200, description = "Notes updated", body = ApiResponse<BookNotes>),
        (status = 400, description = "Notes are required and must be a string", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found in your library", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_notes(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    WithRejection(Json(request), _): WithRejection<Json<UpdateNotesRequest>, AppError>,
) -> AppResult<Json<ApiResponse<BookNotes>>> {
    let id = parse_id(&id, INVALID_BOOK_ID)?;
    let updated = state
        .services
        .library
        .update_notes(user.user_id(), id, request.notes)
        .await?;
    Ok(ApiResponse::new(updated))
}

#[utoipa::path(
    delete,
    path = "/my-library/books/{id}",
    tag = "library",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book removed"),
        (status = 404, description = "Book not found in your library", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_id(&id, INVALID_BOOK_ID)?;
    state.services.library.delete(user.user_id(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
