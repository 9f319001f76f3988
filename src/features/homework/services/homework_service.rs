use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::homework::dtos::{AskAiRequestDto, HomeworkTaskResponseDto, ListTasksQuery};
use crate::features::homework::models::HomeworkTask;
use crate::modules::gemini::GeminiClient;
use crate::shared::constants::FALLBACK_EXPLANATION;
use crate::shared::prompts::render_homework_explain_prompt;

/// Service for homework tasks and AI explanations
pub struct HomeworkService {
    pool: PgPool,
    gemini: Arc<GeminiClient>,
}

impl HomeworkService {
    pub fn new(pool: PgPool, gemini: Arc<GeminiClient>) -> Self {
        Self { pool, gemini }
    }

    /// Generate an explanation for a homework problem and persist the task.
    /// The task row is only written after generation succeeds.
    pub async fn ask_ai(&self, dto: AskAiRequestDto) -> Result<HomeworkTaskResponseDto> {
        let extracted = dto
            .extracted_text
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let reason = dto.reason.as_deref().map(str::trim).filter(|s| !s.is_empty());

        // The reason alone is enough to ask about; having neither is not
        let Some(problem_text) = extracted.or(reason) else {
            return Err(AppError::Validation(
                "Either extractedText or reason is required".to_string(),
            ));
        };

        // Public endpoint, but the task row references a real account
        let user_exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE id = $1")
            .bind(dto.user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to look up user: {:?}", e);
                AppError::Database(e)
            })?;

        if user_exists.is_none() {
            return Err(AppError::BadRequest("Unknown user".to_string()));
        }

        let prompt = render_homework_explain_prompt(problem_text, reason)
            .map_err(|e| AppError::Internal(format!("Failed to render prompt: {}", e)))?;

        let generated = self.gemini.generate_text(&prompt).await?;
        let explanation = if generated.trim().is_empty() {
            tracing::warn!("Model returned no text, falling back to default explanation");
            FALLBACK_EXPLANATION.to_string()
        } else {
            generated
        };

        let task = sqlx::query_as::<_, HomeworkTask>(
            r#"
            INSERT INTO homework_tasks (id, user_id, extracted_text, explanation, ai_used_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, extracted_text, explanation, ai_used_at, thread_id,
                      created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(dto.user_id)
        .bind(problem_text)
        .bind(&explanation)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create homework task: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "Homework task created: id={}, user={}",
            task.id,
            task.user_id
        );

        Ok(task.into())
    }

    /// List the user's homework tasks, newest first
    pub async fn list_tasks(
        &self,
        user_id: Uuid,
        query: &ListTasksQuery,
    ) -> Result<(Vec<HomeworkTaskResponseDto>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM homework_tasks WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count homework tasks: {:?}", e);
                AppError::Database(e)
            })?;

        let tasks = sqlx::query_as::<_, HomeworkTask>(
            r#"
            SELECT id, user_id, extracted_text, explanation, ai_used_at, thread_id,
                   created_at, updated_at
            FROM homework_tasks
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(query.limit())
        .bind(query.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list homework tasks: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((tasks.into_iter().map(Into::into).collect(), total))
    }

    /// Get one of the user's tasks by ID
    pub async fn get_task(&self, user_id: Uuid, task_id: Uuid) -> Result<HomeworkTaskResponseDto> {
        let task = sqlx::query_as::<_, HomeworkTask>(
            r#"
            SELECT id, user_id, extracted_text, explanation, ai_used_at, thread_id,
                   created_at, updated_at
            FROM homework_tasks
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(task_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get homework task: {:?}", e);
            AppError::Database(e)
        })?;

        task.map(Into::into)
            .ok_or_else(|| AppError::NotFound(format!("Task '{}' not found", task_id)))
    }
}
