use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Request DTO for user registration
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequestDto {
    /// Display name shown on threads and messages
    #[validate(
        length(min = 1, max = 128, message = "Name must be 1-128 characters"),
        regex(
            path = "*crate::shared::validation::DISPLAY_NAME_REGEX",
            message = "Name contains unsupported characters"
        )
    )]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Request DTO for email/password login
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequestDto {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request DTO for Google sign-in. Clients send either an ID token obtained
/// on-device or an authorization code (with the redirect URI it was issued
/// for) to exchange server-side.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GoogleSignInRequestDto {
    /// Google ID token (JWT) from a client-side sign-in flow
    pub id_token: Option<String>,

    /// Authorization code from a redirect flow
    pub code: Option<String>,

    /// Redirect URI the authorization code was issued for
    pub redirect_uri: Option<String>,
}

/// Response DTO for authentication (register/login/google)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponseDto {
    /// Opaque session token to send as a Bearer credential
    pub token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    /// When the session expires
    pub expires_at: DateTime<Utc>,
    /// Authenticated user info
    pub user: AuthUserDto,
}

/// User info included in auth responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthUserDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Whether the email address has been verified
    pub email_verified: bool,
    /// Avatar URL (present for Google accounts with a profile photo)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_dto_accepts_valid_input() {
        let dto = RegisterRequestDto {
            name: "Ana Maria".to_string(),
            email: "ana@example.com".to_string(),
            password: "long enough".to_string(),
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn register_dto_rejects_short_password() {
        let dto = RegisterRequestDto {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            password: "short".to_string(),
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn register_dto_rejects_name_with_control_characters() {
        let dto = RegisterRequestDto {
            name: "Ana\u{0007}".to_string(),
            email: "ana@example.com".to_string(),
            password: "long enough".to_string(),
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn login_dto_rejects_bad_email() {
        let dto = LoginRequestDto {
            email: "not-an-email".to_string(),
            password: "whatever".to_string(),
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn google_dto_deserializes_camel_case() {
        let dto: GoogleSignInRequestDto =
            serde_json::from_str(r#"{"idToken":"abc"}"#).unwrap();
        assert_eq!(dto.id_token.as_deref(), Some("abc"));
        assert!(dto.code.is_none());
    }
}
