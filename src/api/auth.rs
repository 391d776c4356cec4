//! Authentication endpoints

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use axum_extra::{
    extract::WithRejection,
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::{
    error::{AppError, AppResult},
    models::user::{AuthPayload, LoginRequest, LogoutPayload, RegisterRequest},
    services::auth::INVALID_CREDENTIALS,
    AppState,
};

use super::ApiResponse;

/// Register a new account
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<AuthPayload>),
        (status = 400, description = "Invalid input or email already registered", body = crate::error::ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<RegisterRequest>, AppError>,
) -> AppResult<(StatusCode, Json<ApiResponse<AuthPayload>>)> {
    // Every registration failure is reported as a bad request
    let payload = state.services.auth.register(request).await.map_err(|e| {
        if e.status().is_server_error() {
            tracing::error!("Registration failed: {}", e);
        }
        AppError::Validation(e.to_string())
    })?;

    Ok((StatusCode::CREATED, ApiResponse::new(payload)))
}

/// Exchange credentials for a bearer token
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<AuthPayload>),
        (status = 401, description = "Invalid email or password", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    request: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<AuthPayload>>> {
    let invalid = || AppError::Authentication(INVALID_CREDENTIALS.to_string());

    let Json(request) = request.map_err(|_| invalid())?;
    let (Some(email), Some(password)) = (request.email, request.password) else {
        return Err(invalid());
    };

    // Login only ever answers 401
    let payload = state.services.auth.login(&email, &password).await.map_err(|e| match e {
        AppError::Authentication(_) => e,
        other => {
            tracing::error!("Login failed: {}", other);
            AppError::Authentication(other.to_string())
        }
    })?;
    Ok(ApiResponse::new(payload))
}

/// Acknowledge a logout. Tokens stay valid until they expire.
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Logged out", body = ApiResponse<LogoutPayload>)
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
) -> AppResult<Json<ApiResponse<LogoutPayload>>> {
    let token = bearer.as_ref().map(|TypedHeader(Authorization(credentials))| credentials.token());
    let payload = state.services.auth.logout(token).await?;
    Ok(ApiResponse::new(payload))
}
