use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::shared::constants::{DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};

/// Request DTO for the ask-AI endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AskAiRequestDto {
    /// ID of the user the task belongs to
    pub user_id: Uuid,

    /// Problem text, typically OCR output from a photographed exercise
    #[validate(length(max = 8000, message = "Extracted text must not exceed 8000 characters"))]
    pub extracted_text: Option<String>,

    /// Why the student is stuck; used as the problem text when no extracted
    /// text is supplied
    #[validate(length(max = 2000, message = "Reason must not exceed 2000 characters"))]
    pub reason: Option<String>,
}

/// Response DTO for a homework task
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HomeworkTaskResponseDto {
    pub id: Uuid,
    pub user_id: Uuid,
    /// The problem text the explanation was generated for
    pub extracted_text: String,
    pub explanation: String,
    /// When the AI generation ran
    pub ai_used_at: DateTime<Utc>,
    /// Discussion thread attached to this task, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Query parameters for listing homework tasks
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ListTasksQuery {
    /// Maximum number of tasks to return (default: 20, max: 100)
    #[param(minimum = 1, maximum = 100)]
    pub limit: Option<i64>,

    /// Number of tasks to skip (default: 0)
    #[param(minimum = 0)]
    pub offset: Option<i64>,
}

impl ListTasksQuery {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ask_ai_dto_requires_user_id() {
        let result = serde_json::from_str::<AskAiRequestDto>(r#"{"extractedText":"2+2"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn ask_ai_dto_accepts_camel_case_fields() {
        let dto: AskAiRequestDto = serde_json::from_str(
            r#"{"userId":"0191c2a8-7b6c-7d3a-9e4f-5a6b7c8d9e0f","extractedText":"2+2","reason":"stuck"}"#,
        )
        .unwrap();
        assert_eq!(dto.extracted_text.as_deref(), Some("2+2"));
        assert_eq!(dto.reason.as_deref(), Some("stuck"));
    }

    #[test]
    fn list_query_clamps_limit() {
        let query = ListTasksQuery {
            limit: Some(1000),
            offset: Some(-5),
        };
        assert_eq!(query.limit(), 100);
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn list_query_defaults() {
        let query = ListTasksQuery {
            limit: None,
            offset: None,
        };
        assert_eq!(query.limit(), 20);
        assert_eq!(query.offset(), 0);
    }
}
