use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::auth::model::User;

/// Request DTO for patching account fields. Omitted fields keep their
/// current value.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequestDto {
    /// New display name
    #[validate(
        length(min = 1, max = 128, message = "Name must be 1-128 characters"),
        regex(
            path = "*crate::shared::validation::DISPLAY_NAME_REGEX",
            message = "Name contains unsupported characters"
        )
    )]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// New email address
    #[validate(email(message = "Invalid email format"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Account details returned by the user endpoints
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponseDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Whether the email address has been verified
    pub email_verified: bool,
    /// Avatar URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponseDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            email_verified: u.email_verified,
            image: u.image,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_dto_accepts_name_only_patch() {
        let dto = UpdateUserRequestDto {
            name: Some("Ana Maria".to_string()),
            email: None,
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn update_dto_rejects_bad_email() {
        let dto = UpdateUserRequestDto {
            name: None,
            email: Some("not-an-email".to_string()),
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn update_dto_with_no_fields_passes_validation() {
        // Field-level validation has nothing to check; the service decides
        // whether an empty patch is acceptable.
        let dto = UpdateUserRequestDto {
            name: None,
            email: None,
        };
        assert!(dto.validate().is_ok());
    }
}
