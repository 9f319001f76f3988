use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::threads::dtos::{
    AuthorDto, CreateMessageRequestDto, CreateThreadRequestDto, LikeRequestDto,
    LikeStatusResponseDto, MessageResponseDto, ThreadResponseDto, UpdateThreadRequestDto,
};
use crate::features::threads::models::Thread;

/// Service for discussion threads, their messages and likes
pub struct ThreadService {
    pool: PgPool,
}

impl ThreadService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Start a discussion thread on a homework task. The thread row and the
    /// task's back-reference are written in one transaction; each task can
    /// have at most one thread.
    pub async fn create_thread(
        &self,
        task_id: Uuid,
        dto: CreateThreadRequestDto,
    ) -> Result<ThreadResponseDto> {
        let title = dto.title.trim();
        let content = dto.content.trim();
        if title.is_empty() || content.is_empty() {
            return Err(AppError::Validation(
                "Title and content are required".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Lock the task row so concurrent creates serialize on it
        let task: Option<(Uuid, Option<Uuid>)> =
            sqlx::query_as("SELECT id, thread_id FROM homework_tasks WHERE id = $1 FOR UPDATE")
                .bind(task_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to look up task: {:?}", e);
                    AppError::Database(e)
                })?;

        let Some((_, existing_thread)) = task else {
            return Err(AppError::NotFound(format!("Task '{}' not found", task_id)));
        };

        if existing_thread.is_some() {
            return Err(AppError::Conflict(
                "Task already has a thread".to_string(),
            ));
        }

        let author = self
            .fetch_author(dto.user_id)
            .await?
            .ok_or_else(|| AppError::BadRequest("Unknown user".to_string()))?;

        let thread = sqlx::query_as::<_, Thread>(
            r#"
            INSERT INTO threads (id, task_id, author_id, title, content)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, task_id, author_id, title, content, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(task_id)
        .bind(dto.user_id)
        .bind(title)
        .bind(content)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create thread: {:?}", e);
            AppError::Database(e)
        })?;

        sqlx::query("UPDATE homework_tasks SET thread_id = $2, updated_at = now() WHERE id = $1")
            .bind(task_id)
            .bind(thread.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to attach thread to task: {:?}", e);
                AppError::Database(e)
            })?;

        tx.commit().await.map_err(AppError::Database)?;

        tracing::info!(
            "Thread created: id={}, task={}, author={}",
            thread.id,
            task_id,
            dto.user_id
        );

        Ok(ThreadResponseDto {
            id: thread.id,
            task_id: thread.task_id,
            title: thread.title,
            content: thread.content,
            author,
            messages: Vec::new(),
            like_count: 0,
            created_at: thread.created_at,
            updated_at: thread.updated_at,
        })
    }

    /// Get the thread attached to a homework task, with messages oldest-first
    pub async fn get_task_thread(&self, task_id: Uuid) -> Result<ThreadResponseDto> {
        let row = sqlx::query_as::<_, ThreadWithAuthorRow>(&format!(
            "{} WHERE t.task_id = $1",
            THREAD_WITH_AUTHOR_SQL
        ))
        .bind(task_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get task thread: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound("Thread not found".to_string()))?;

        let messages = self.fetch_thread_messages(row.id).await?;
        Ok(to_thread_dto(row, messages))
    }

    /// List all threads, newest first, each with author, messages and likes
    pub async fn list_threads(&self) -> Result<Vec<ThreadResponseDto>> {
        let rows = sqlx::query_as::<_, ThreadWithAuthorRow>(&format!(
            "{} ORDER BY t.created_at DESC",
            THREAD_WITH_AUTHOR_SQL
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list threads: {:?}", e);
            AppError::Database(e)
        })?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let thread_ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let message_rows = sqlx::query_as::<_, MessageWithAuthorRow>(
            r#"
            SELECT m.id, m.thread_id, m.content, m.created_at,
                   u.id AS author_id, u.name AS author_name, u.image AS author_image
            FROM messages m
            JOIN users u ON u.id = m.user_id
            WHERE m.thread_id = ANY($1)
            ORDER BY m.created_at ASC
            "#,
        )
        .bind(&thread_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list thread messages: {:?}", e);
            AppError::Database(e)
        })?;

        let mut by_thread: HashMap<Uuid, Vec<MessageResponseDto>> = HashMap::new();
        for row in message_rows {
            by_thread
                .entry(row.thread_id)
                .or_default()
                .push(to_message_dto(row));
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let messages = by_thread.remove(&row.id).unwrap_or_default();
                to_thread_dto(row, messages)
            })
            .collect())
    }

    /// Update a thread's title and content
    pub async fn update_thread(
        &self,
        thread_id: Uuid,
        dto: UpdateThreadRequestDto,
    ) -> Result<ThreadResponseDto> {
        let title = dto.title.trim();
        let content = dto.content.trim();
        if title.is_empty() || content.is_empty() {
            return Err(AppError::Validation(
                "Title and content are required".to_string(),
            ));
        }

        let updated = sqlx::query(
            "UPDATE threads SET title = $2, content = $3, updated_at = now() WHERE id = $1",
        )
        .bind(thread_id)
        .bind(title)
        .bind(content)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update thread: {:?}", e);
            AppError::Database(e)
        })?;

        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound("Thread not found".to_string()));
        }

        tracing::info!("Thread updated: id={}", thread_id);

        self.get_thread(thread_id).await
    }

    /// Delete a thread, its messages and likes, and detach it from its task
    pub async fn delete_thread(&self, thread_id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM threads WHERE id = $1")
            .bind(thread_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to look up thread: {:?}", e);
                AppError::Database(e)
            })?;

        if exists.is_none() {
            return Err(AppError::NotFound("Thread not found".to_string()));
        }

        sqlx::query("DELETE FROM messages WHERE thread_id = $1")
            .bind(thread_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete thread messages: {:?}", e);
                AppError::Database(e)
            })?;

        sqlx::query("DELETE FROM thread_likes WHERE thread_id = $1")
            .bind(thread_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete thread likes: {:?}", e);
                AppError::Database(e)
            })?;

        sqlx::query("UPDATE homework_tasks SET thread_id = NULL WHERE thread_id = $1")
            .bind(thread_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to detach thread from task: {:?}", e);
                AppError::Database(e)
            })?;

        sqlx::query("DELETE FROM threads WHERE id = $1")
            .bind(thread_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete thread: {:?}", e);
                AppError::Database(e)
            })?;

        tx.commit().await.map_err(AppError::Database)?;

        tracing::info!("Thread deleted: id={}", thread_id);
        Ok(())
    }

    /// Post a message to a thread
    pub async fn create_message(
        &self,
        thread_id: Uuid,
        dto: CreateMessageRequestDto,
    ) -> Result<MessageResponseDto> {
        let content = dto.content.trim();
        if content.is_empty() {
            return Err(AppError::Validation(
                "Message content is required".to_string(),
            ));
        }

        self.ensure_thread_exists(thread_id).await?;

        let author = self
            .fetch_author(dto.user_id)
            .await?
            .ok_or_else(|| AppError::BadRequest("Unknown user".to_string()))?;

        let row = sqlx::query_as::<_, MessageRow>(
            r#"
            INSERT INTO messages (id, thread_id, user_id, content)
            VALUES ($1, $2, $3, $4)
            RETURNING id, thread_id, content, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(thread_id)
        .bind(dto.user_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create message: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "Message created: id={}, thread={}, author={}",
            row.id,
            thread_id,
            dto.user_id
        );

        Ok(MessageResponseDto {
            id: row.id,
            thread_id: row.thread_id,
            content: row.content,
            author,
            created_at: row.created_at,
        })
    }

    /// Like a thread. Liking twice is a no-op.
    pub async fn like_thread(
        &self,
        thread_id: Uuid,
        dto: LikeRequestDto,
    ) -> Result<LikeStatusResponseDto> {
        self.ensure_thread_exists(thread_id).await?;

        if self.fetch_author(dto.user_id).await?.is_none() {
            return Err(AppError::BadRequest("Unknown user".to_string()));
        }

        sqlx::query(
            r#"
            INSERT INTO thread_likes (id, thread_id, user_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (thread_id, user_id) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(thread_id)
        .bind(dto.user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to like thread: {:?}", e);
            AppError::Database(e)
        })?;

        let like_count = self.count_likes(thread_id).await?;

        Ok(LikeStatusResponseDto {
            thread_id,
            user_id: dto.user_id,
            liked: true,
            like_count,
        })
    }

    /// Remove a like. Unliking an un-liked thread is a no-op.
    pub async fn unlike_thread(
        &self,
        thread_id: Uuid,
        dto: LikeRequestDto,
    ) -> Result<LikeStatusResponseDto> {
        self.ensure_thread_exists(thread_id).await?;

        sqlx::query("DELETE FROM thread_likes WHERE thread_id = $1 AND user_id = $2")
            .bind(thread_id)
            .bind(dto.user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to unlike thread: {:?}", e);
                AppError::Database(e)
            })?;

        let like_count = self.count_likes(thread_id).await?;

        Ok(LikeStatusResponseDto {
            thread_id,
            user_id: dto.user_id,
            liked: false,
            like_count,
        })
    }

    /// Get a thread by its own ID, with messages
    async fn get_thread(&self, thread_id: Uuid) -> Result<ThreadResponseDto> {
        let row = sqlx::query_as::<_, ThreadWithAuthorRow>(&format!(
            "{} WHERE t.id = $1",
            THREAD_WITH_AUTHOR_SQL
        ))
        .bind(thread_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get thread: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound("Thread not found".to_string()))?;

        let messages = self.fetch_thread_messages(row.id).await?;
        Ok(to_thread_dto(row, messages))
    }

    async fn fetch_thread_messages(&self, thread_id: Uuid) -> Result<Vec<MessageResponseDto>> {
        let rows = sqlx::query_as::<_, MessageWithAuthorRow>(
            r#"
            SELECT m.id, m.thread_id, m.content, m.created_at,
                   u.id AS author_id, u.name AS author_name, u.image AS author_image
            FROM messages m
            JOIN users u ON u.id = m.user_id
            WHERE m.thread_id = $1
            ORDER BY m.created_at ASC
            "#,
        )
        .bind(thread_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch thread messages: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(rows.into_iter().map(to_message_dto).collect())
    }

    async fn fetch_author(&self, user_id: Uuid) -> Result<Option<AuthorDto>> {
        let row: Option<(Uuid, String, Option<String>)> =
            sqlx::query_as("SELECT id, name, image FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to look up user: {:?}", e);
                    AppError::Database(e)
                })?;

        Ok(row.map(|(id, name, image)| AuthorDto { id, name, image }))
    }

    async fn ensure_thread_exists(&self, thread_id: Uuid) -> Result<()> {
        let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM threads WHERE id = $1")
            .bind(thread_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to look up thread: {:?}", e);
                AppError::Database(e)
            })?;

        exists
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound("Thread not found".to_string()))
    }

    async fn count_likes(&self, thread_id: Uuid) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM thread_likes WHERE thread_id = $1")
            .bind(thread_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count likes: {:?}", e);
                AppError::Database(e)
            })
    }
}

const THREAD_WITH_AUTHOR_SQL: &str = r#"
SELECT t.id, t.task_id, t.title, t.content, t.created_at, t.updated_at,
       u.id AS author_id, u.name AS author_name, u.image AS author_image,
       (SELECT COUNT(*) FROM thread_likes l WHERE l.thread_id = t.id) AS like_count
FROM threads t
JOIN users u ON u.id = t.author_id
"#;

#[derive(Debug, sqlx::FromRow)]
struct ThreadWithAuthorRow {
    id: Uuid,
    task_id: Uuid,
    title: String,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    author_id: Uuid,
    author_name: String,
    author_image: Option<String>,
    like_count: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct MessageWithAuthorRow {
    id: Uuid,
    thread_id: Uuid,
    content: String,
    created_at: DateTime<Utc>,
    author_id: Uuid,
    author_name: String,
    author_image: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct MessageRow {
    id: Uuid,
    thread_id: Uuid,
    content: String,
    created_at: DateTime<Utc>,
}

fn to_thread_dto(row: ThreadWithAuthorRow, messages: Vec<MessageResponseDto>) -> ThreadResponseDto {
    ThreadResponseDto {
        id: row.id,
        task_id: row.task_id,
        title: row.title,
        content: row.content,
        author: AuthorDto {
            id: row.author_id,
            name: row.author_name,
            image: row.author_image,
        },
        messages,
        like_count: row.like_count,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

fn to_message_dto(row: MessageWithAuthorRow) -> MessageResponseDto {
    MessageResponseDto {
        id: row.id,
        thread_id: row.thread_id,
        content: row.content,
        author: AuthorDto {
            id: row.author_id,
            name: row.author_name,
            image: row.author_image,
        },
        created_at: row.created_at,
    }
}
