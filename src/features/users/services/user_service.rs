use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::User;
use crate::features::users::dtos::{UpdateUserRequestDto, UserResponseDto};

const USER_BY_ID_SQL: &str = "SELECT id, name, email, email_verified, image, created_at, updated_at FROM users WHERE id = $1";

/// Service for account maintenance: patching profile fields and removing an
/// account together with every row that references it.
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Delete a user and all dependent rows in one transaction. A thread is
    /// removed when the user authored it or when it hangs off one of the
    /// user's tasks. A missing user surfaces as the underlying row-not-found
    /// database error, not a 404.
    pub async fn delete_account(&self, id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let user = sqlx::query_as::<_, User>(USER_BY_ID_SQL)
            .bind(id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to load user {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        let doomed_threads: Vec<Uuid> = sqlx::query_scalar(
            r#"
            SELECT id FROM threads
            WHERE author_id = $1
               OR task_id IN (SELECT id FROM homework_tasks WHERE user_id = $1)
            "#,
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to collect user threads: {:?}", e);
            AppError::Database(e)
        })?;

        sqlx::query("DELETE FROM thread_likes WHERE user_id = $1 OR thread_id = ANY($2)")
            .bind(id)
            .bind(&doomed_threads)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete user likes: {:?}", e);
                AppError::Database(e)
            })?;

        sqlx::query("DELETE FROM messages WHERE user_id = $1 OR thread_id = ANY($2)")
            .bind(id)
            .bind(&doomed_threads)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete user messages: {:?}", e);
                AppError::Database(e)
            })?;

        // Tasks point at threads and threads point back at tasks; break the
        // cycle before deleting either side.
        sqlx::query("UPDATE homework_tasks SET thread_id = NULL WHERE thread_id = ANY($1)")
            .bind(&doomed_threads)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to detach threads from tasks: {:?}", e);
                AppError::Database(e)
            })?;

        sqlx::query("DELETE FROM threads WHERE id = ANY($1)")
            .bind(&doomed_threads)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete user threads: {:?}", e);
                AppError::Database(e)
            })?;

        sqlx::query("DELETE FROM homework_tasks WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete homework tasks: {:?}", e);
                AppError::Database(e)
            })?;

        sqlx::query("DELETE FROM sessions WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete sessions: {:?}", e);
                AppError::Database(e)
            })?;

        sqlx::query("DELETE FROM accounts WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete accounts: {:?}", e);
                AppError::Database(e)
            })?;

        // Verification rows are keyed by email, not user id
        sqlx::query("DELETE FROM verifications WHERE identifier = $1")
            .bind(&user.email)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete verifications: {:?}", e);
                AppError::Database(e)
            })?;

        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete user: {:?}", e);
                AppError::Database(e)
            })?;

        tx.commit().await.map_err(AppError::Database)?;

        tracing::info!("User deleted: id={}, threads={}", id, doomed_threads.len());
        Ok(())
    }

    /// Patch name and/or email. Supplying neither is a 400; a missing user
    /// surfaces as a database error like in `delete_account`.
    pub async fn update_account(
        &self,
        id: Uuid,
        dto: UpdateUserRequestDto,
    ) -> Result<UserResponseDto> {
        let name = dto.name.as_deref().map(str::trim).filter(|n| !n.is_empty());
        let email = dto
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty());

        if name.is_none() && email.is_none() {
            return Err(AppError::BadRequest("Nothing to update".to_string()));
        }

        let current = sqlx::query_as::<_, User>(USER_BY_ID_SQL)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to load user {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        if let Some(new_email) = email {
            if new_email != current.email {
                let taken: Option<(Uuid,)> =
                    sqlx::query_as("SELECT id FROM users WHERE email = $1 AND id != $2")
                        .bind(new_email)
                        .bind(id)
                        .fetch_optional(&self.pool)
                        .await
                        .map_err(|e| {
                            tracing::error!("Failed to check email availability: {:?}", e);
                            AppError::Database(e)
                        })?;

                if taken.is_some() {
                    return Err(AppError::Conflict("Email already registered".to_string()));
                }
            }
        }

        let updated = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name), email = COALESCE($3, email), updated_at = now()
            WHERE id = $1
            RETURNING id, name, email, email_verified, image, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update user {}: {:?}", id, e);
            AppError::Database(e)
        })?;

        tracing::info!("User updated: id={}", id);

        Ok(updated.into())
    }

    /// Current user's profile, read fresh from the database
    pub async fn get_profile(&self, user_id: Uuid) -> Result<UserResponseDto> {
        let user = sqlx::query_as::<_, User>(USER_BY_ID_SQL)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to load user {}: {:?}", user_id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(user.into())
    }
}
