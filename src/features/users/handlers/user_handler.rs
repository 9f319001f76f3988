use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::users::dtos::{UpdateUserRequestDto, UserResponseDto};
use crate::features::users::services::UserService;
use crate::shared::types::ApiResponse;

/// Delete a user account and every row that references it
#[utoipa::path(
    delete,
    path = "/api/user/deleteAccount/{id}",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User and dependent records deleted"),
        (status = 500, description = "Unknown user or database failure")
    ),
    tag = "users"
)]
pub async fn delete_account(
    State(service): State<Arc<UserService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete_account(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some(format!("User {} deleted", id)),
        None,
    )))
}

/// Update account fields
#[utoipa::path(
    put,
    path = "/api/user/deleteAccount/{id}",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = UpdateUserRequestDto,
    responses(
        (status = 200, description = "Account updated", body = ApiResponse<UserResponseDto>),
        (status = 400, description = "Validation error or empty patch"),
        (status = 409, description = "Email already registered"),
        (status = 500, description = "Unknown user or database failure")
    ),
    tag = "users"
)]
pub async fn update_account(
    State(service): State<Arc<UserService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateUserRequestDto>,
) -> Result<Json<ApiResponse<UserResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = service.update_account(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(user),
        Some("Account updated".to_string()),
        None,
    )))
}

/// Get the current user's profile
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserResponseDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "users",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_profile(
    user: AuthenticatedUser,
    State(service): State<Arc<UserService>>,
) -> Result<Json<ApiResponse<UserResponseDto>>> {
    let profile = service.get_profile(user.user_id).await?;
    Ok(Json(ApiResponse::success(Some(profile), None, None)))
}
