//! Author catalog endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;

use crate::{
    error::{AppError, AppResult},
    models::author::{Author, AuthorShort, CreateAuthor, CreatedAuthor},
    AppState,
};

use super::{parse_id, ApiResponse, AuthenticatedUser, ListResponse};

/// Add an author
#[utoipa::path(
    post,
    path = "/authors",
    tag = "authors",
    security(("bearer_auth" = [])),
    request_body = CreateAuthor,
    responses(
        (status = 201, description = "Author created", body = ApiResponse<CreatedAuthor>),
        (status = 400, description = "Author name is required", body = crate::error::ErrorResponse),
        (status = 401, description = "Not authenticated"),
        (status = 409, description = "Author already exists", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    WithRejection(Json(author), _): WithRejection<Json<CreateAuthor>, AppError>,
) -> AppResult<(StatusCode, Json<ApiResponse<CreatedAuthor>>)> {
    let created = state.services.authors.create(author).await?;
    Ok((StatusCode::CREATED, ApiResponse::new(created)))
}

/// List every author ordered by name
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All authors", body = ListResponse<AuthorShort>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_authors(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> AppResult<Json<ListResponse<AuthorShort>>> {
    let authors = state.services.authors.list().await?;
    Ok(ListResponse::new(authors))
}

/// Get one author
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Author details", body = ApiResponse<Author>),
        (status = 400, description = "Invalid author ID format", body = crate::error::ErrorResponse),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Author>>> {
    let id = parse_id(&id, "Invalid author ID format")?;
    let author = state.services.authors.get_by_id(id).await?;
    Ok(ApiResponse::new(author))
}
