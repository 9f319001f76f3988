use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::homework::dtos::{AskAiRequestDto, HomeworkTaskResponseDto, ListTasksQuery};
use crate::features::homework::services::HomeworkService;
use crate::shared::types::{ApiResponse, Meta};

/// Generate an AI explanation for a homework problem
#[utoipa::path(
    post,
    path = "/api/ask-ai",
    request_body = AskAiRequestDto,
    responses(
        (status = 200, description = "Explanation generated and task saved", body = ApiResponse<HomeworkTaskResponseDto>),
        (status = 400, description = "Missing userId, unknown user, or no problem text"),
        (status = 500, description = "Generation failed")
    ),
    tag = "homework"
)]
pub async fn ask_ai(
    State(service): State<Arc<HomeworkService>>,
    AppJson(dto): AppJson<AskAiRequestDto>,
) -> Result<Json<ApiResponse<HomeworkTaskResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let task = service.ask_ai(dto).await?;
    Ok(Json(ApiResponse::success(Some(task), None, None)))
}

/// List the current user's homework tasks
#[utoipa::path(
    get,
    path = "/api/homework",
    params(ListTasksQuery),
    responses(
        (status = 200, description = "List of homework tasks", body = ApiResponse<Vec<HomeworkTaskResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "homework",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_tasks(
    user: AuthenticatedUser,
    State(service): State<Arc<HomeworkService>>,
    Query(query): Query<ListTasksQuery>,
) -> Result<Json<ApiResponse<Vec<HomeworkTaskResponseDto>>>> {
    let (tasks, total) = service.list_tasks(user.user_id, &query).await?;

    Ok(Json(ApiResponse::success(
        Some(tasks),
        None,
        Some(Meta { total }),
    )))
}

/// Get one homework task
#[utoipa::path(
    get,
    path = "/api/homework/{id}",
    params(
        ("id" = Uuid, Path, description = "Homework task ID")
    ),
    responses(
        (status = 200, description = "Homework task", body = ApiResponse<HomeworkTaskResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Task not found")
    ),
    tag = "homework",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_task(
    user: AuthenticatedUser,
    State(service): State<Arc<HomeworkService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<HomeworkTaskResponseDto>>> {
    let task = service.get_task(user.user_id, id).await?;
    Ok(Json(ApiResponse::success(Some(task), None, None)))
}
