//! Installment plan endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;

use crate::{
    error::{AppError, AppResult},
    models::book::{CreateInstallmentsRequest, InstallmentPlan},
    services::installments::MIN_INSTALLMENTS,
    AppState,
};

use super::{parse_id, ApiResponse, AuthenticatedUser};

const INVALID_BOOK_ID: &str = "Invalid book ID format";

/// Split the price of a saved book into installments, replacing any previous plan
#[utoipa::path(
    post,
    path = "/my-library/books/{id}/installments",
    tag = "installments",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    request_body = CreateInstallmentsRequest,
    responses(
        (status = 201, description = "Plan created", body = ApiResponse<InstallmentPlan>),
        (status = 400, description = "Invalid count or book price not set", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found in your library", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_plan(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    WithRejection(Json(request), _): WithRejection<Json<CreateInstallmentsRequest>, AppError>,
) -> AppResult<(StatusCode, Json<ApiResponse<InstallmentPlan>>)> {
    let id = parse_id(&id, INVALID_BOOK_ID)?;
    let count = request
        .number_of_installments
        .filter(|count| *count >= 1)
        .ok_or_else(|| AppError::Validation(MIN_INSTALLMENTS.to_string()))?;

    let plan = state
        .services
        .installments
        .create_plan(id, user.user_id(), count)
        .await?;
    Ok((StatusCode::CREATED, ApiResponse::new(plan)))
}

#[utoipa::path(
    get,
    path = "/my-library/books/{id}/installments",
    tag = "installments",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Current plan", body = ApiResponse<InstallmentPlan>),
        (status = 400, description = "Installment plan not created for this book", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found in your library", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_plan(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<InstallmentPlan>>> {
    let id = parse_id(&id, INVALID_BOOK_ID)?;
    let plan = state.services.installments.get_plan(id, user.user_id()).await?;
    Ok(ApiResponse::new(plan))
}
