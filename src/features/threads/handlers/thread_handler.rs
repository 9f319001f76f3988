use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::threads::dtos::{
    CreateMessageRequestDto, CreateThreadRequestDto, LikeRequestDto, LikeStatusResponseDto,
    MessageResponseDto, ThreadResponseDto, UpdateThreadRequestDto,
};
use crate::features::threads::services::ThreadService;
use crate::shared::types::{ApiResponse, Meta};

/// Start a discussion thread on a homework task
#[utoipa::path(
    post,
    path = "/api/homework/{taskId}/thread",
    params(
        ("taskId" = Uuid, Path, description = "Homework task ID")
    ),
    request_body = CreateThreadRequestDto,
    responses(
        (status = 201, description = "Thread created", body = ApiResponse<ThreadResponseDto>),
        (status = 400, description = "Validation error or unknown user"),
        (status = 404, description = "Task not found"),
        (status = 409, description = "Task already has a thread")
    ),
    tag = "threads"
)]
pub async fn create_task_thread(
    State(service): State<Arc<ThreadService>>,
    Path(task_id): Path<Uuid>,
    AppJson(dto): AppJson<CreateThreadRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<ThreadResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let thread = service.create_thread(task_id, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(thread), None, None)),
    ))
}

/// Get the discussion thread for a homework task
#[utoipa::path(
    get,
    path = "/api/homework/{taskId}/thread",
    params(
        ("taskId" = Uuid, Path, description = "Homework task ID")
    ),
    responses(
        (status = 200, description = "Thread with messages", body = ApiResponse<ThreadResponseDto>),
        (status = 404, description = "Thread not found")
    ),
    tag = "threads"
)]
pub async fn get_task_thread(
    State(service): State<Arc<ThreadService>>,
    Path(task_id): Path<Uuid>,
) -> Result<Json<ApiResponse<ThreadResponseDto>>> {
    let thread = service.get_task_thread(task_id).await?;
    Ok(Json(ApiResponse::success(Some(thread), None, None)))
}

/// List all discussion threads
#[utoipa::path(
    get,
    path = "/api/thread",
    responses(
        (status = 200, description = "All threads, newest first", body = ApiResponse<Vec<ThreadResponseDto>>)
    ),
    tag = "threads"
)]
pub async fn list_threads(
    State(service): State<Arc<ThreadService>>,
) -> Result<Json<ApiResponse<Vec<ThreadResponseDto>>>> {
    let threads = service.list_threads().await?;
    let total = threads.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(threads),
        None,
        Some(Meta { total }),
    )))
}

/// Update a thread's title and content
#[utoipa::path(
    put,
    path = "/api/thread/{id}",
    params(
        ("id" = Uuid, Path, description = "Thread ID")
    ),
    request_body = UpdateThreadRequestDto,
    responses(
        (status = 200, description = "Updated thread", body = ApiResponse<ThreadResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Thread not found")
    ),
    tag = "threads"
)]
pub async fn update_thread(
    State(service): State<Arc<ThreadService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateThreadRequestDto>,
) -> Result<Json<ApiResponse<ThreadResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let thread = service.update_thread(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(thread), None, None)))
}

/// Delete a thread with its messages and likes
#[utoipa::path(
    delete,
    path = "/api/thread/{id}",
    params(
        ("id" = Uuid, Path, description = "Thread ID")
    ),
    responses(
        (status = 200, description = "Thread deleted"),
        (status = 404, description = "Thread not found")
    ),
    tag = "threads"
)]
pub async fn delete_thread(
    State(service): State<Arc<ThreadService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete_thread(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Thread deleted".to_string()),
        None,
    )))
}

/// Post a message to a thread
#[utoipa::path(
    post,
    path = "/api/thread/{id}/message",
    params(
        ("id" = Uuid, Path, description = "Thread ID")
    ),
    request_body = CreateMessageRequestDto,
    responses(
        (status = 201, description = "Message created", body = ApiResponse<MessageResponseDto>),
        (status = 400, description = "Blank content or unknown user"),
        (status = 404, description = "Thread not found")
    ),
    tag = "threads"
)]
pub async fn create_message(
    State(service): State<Arc<ThreadService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<CreateMessageRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<MessageResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let message = service.create_message(id, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(message), None, None)),
    ))
}

/// Like a thread (idempotent)
#[utoipa::path(
    post,
    path = "/api/thread/{id}/like",
    params(
        ("id" = Uuid, Path, description = "Thread ID")
    ),
    request_body = LikeRequestDto,
    responses(
        (status = 200, description = "Like state after the operation", body = ApiResponse<LikeStatusResponseDto>),
        (status = 400, description = "Unknown user"),
        (status = 404, description = "Thread not found")
    ),
    tag = "threads"
)]
pub async fn like_thread(
    State(service): State<Arc<ThreadService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<LikeRequestDto>,
) -> Result<Json<ApiResponse<LikeStatusResponseDto>>> {
    let status = service.like_thread(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(status), None, None)))
}

/// Remove a like from a thread (idempotent)
#[utoipa::path(
    delete,
    path = "/api/thread/{id}/like",
    params(
        ("id" = Uuid, Path, description = "Thread ID")
    ),
    request_body = LikeRequestDto,
    responses(
        (status = 200, description = "Like state after the operation", body = ApiResponse<LikeStatusResponseDto>),
        (status = 404, description = "Thread not found")
    ),
    tag = "threads"
)]
pub async fn unlike_thread(
    State(service): State<Arc<ThreadService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<LikeRequestDto>,
) -> Result<Json<ApiResponse<LikeStatusResponseDto>>> {
    let status = service.unlike_thread(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(status), None, None)))
}
