use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Request DTO for starting a discussion thread on a homework task
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateThreadRequestDto {
    /// ID of the thread author
    pub user_id: Uuid,

    #[validate(length(min = 1, max = 300, message = "Title must be 1-300 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 10000, message = "Content must be 1-10000 characters"))]
    pub content: String,
}

/// Request DTO for updating a thread
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateThreadRequestDto {
    #[validate(length(min = 1, max = 300, message = "Title must be 1-300 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 10000, message = "Content must be 1-10000 characters"))]
    pub content: String,
}

/// Request DTO for posting a message to a thread
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMessageRequestDto {
    /// ID of the message author
    pub user_id: Uuid,

    #[validate(length(min = 1, max = 10000, message = "Content must be 1-10000 characters"))]
    pub content: String,
}

/// Request DTO for liking or unliking a thread
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LikeRequestDto {
    pub user_id: Uuid,
}

/// Author summary embedded in thread and message responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorDto {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Response DTO for a thread message
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponseDto {
    pub id: Uuid,
    pub thread_id: Uuid,
    pub content: String,
    pub author: AuthorDto,
    pub created_at: DateTime<Utc>,
}

/// Response DTO for a discussion thread with its messages
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ThreadResponseDto {
    pub id: Uuid,
    /// Homework task this thread discusses
    pub task_id: Uuid,
    pub title: String,
    pub content: String,
    pub author: AuthorDto,
    /// Messages oldest-first
    pub messages: Vec<MessageResponseDto>,
    pub like_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Response DTO for like/unlike operations
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LikeStatusResponseDto {
    pub thread_id: Uuid,
    pub user_id: Uuid,
    /// Whether the user likes the thread after this operation
    pub liked: bool,
    pub like_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_thread_dto_rejects_blank_title() {
        let dto = CreateThreadRequestDto {
            user_id: Uuid::new_v4(),
            title: "".to_string(),
            content: "Some content".to_string(),
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn message_dto_rejects_blank_content() {
        let dto = CreateMessageRequestDto {
            user_id: Uuid::new_v4(),
            content: "".to_string(),
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn author_image_is_omitted_when_absent() {
        let author = AuthorDto {
            id: Uuid::new_v4(),
            name: "Ana".to_string(),
            image: None,
        };
        let json = serde_json::to_string(&author).unwrap();
        assert!(!json.contains("image"));
    }
}
