use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::homework::dtos::HomeworkTaskResponseDto;

/// Database model for a homework task
#[derive(Debug, Clone, FromRow)]
pub struct HomeworkTask {
    pub id: Uuid,
    pub user_id: Uuid,
    pub extracted_text: String,
    pub explanation: String,
    pub ai_used_at: DateTime<Utc>,
    pub thread_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<HomeworkTask> for HomeworkTaskResponseDto {
    fn from(t: HomeworkTask) -> Self {
        Self {
            id: t.id,
            user_id: t.user_id,
            extracted_text: t.extracted_text,
            explanation: t.explanation,
            ai_used_at: t.ai_used_at,
            thread_id: t.thread_id,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}
