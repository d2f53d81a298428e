//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use userdir_types::{
    AccountStore, AppError, CreateUserRequest, PaymentRequest, UpdateUserRequest, UserId,
    UserResponse,
};

use crate::DirectoryService;

/// Application state shared across handlers.
pub struct AppState<S: AccountStore> {
    pub service: DirectoryService<S>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::InsufficientFunds {
                available,
                requested,
            } => (
                StatusCode::BAD_REQUEST,
                format!(
                    "Insufficient funds: available {}, requested {}",
                    available, requested
                ),
            ),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = serde_json::json!({
            "error": message,
            "code": status.as_u16()
        });

        (status, Json(body)).into_response()
    }
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Create a new user.
#[tracing::instrument(skip(state, req))]
pub async fn create_user<S: AccountStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.service.create_user(req).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// List all users.
#[tracing::instrument(skip(state))]
pub async fn list_users<S: AccountStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<impl IntoResponse, ApiError> {
    let users = state.service.list_users().await?;
    let response: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(response))
}

/// Get user by ID.
#[tracing::instrument(skip(state), fields(user_id = id))]
pub async fn get_user<S: AccountStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.service.get_user(UserId::new(id)).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Update a user's profile fields.
#[tracing::instrument(skip(state, req), fields(user_id = id))]
pub async fn update_user<S: AccountStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state.service.update_user(UserId::new(id), req).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a user.
#[tracing::instrument(skip(state), fields(user_id = id))]
pub async fn delete_user<S: AccountStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state.service.delete_user(UserId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Transfer funds between two users.
#[tracing::instrument(
    skip(state),
    fields(taker = %req.taker_id, giver = %req.giver_id, amount = req.amount)
)]
pub async fn transfer<S: AccountStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<PaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let receipt = state.service.transfer(req).await?;
    Ok(Json(receipt))
}
