use crate::core::config::GoogleAuthConfig;
use crate::core::error::{AppError, Result};
use serde::Deserialize;

/// Response from Google's token endpoint for an authorization-code exchange.
#[derive(Debug, Deserialize)]
pub struct GoogleTokenResponse {
    pub id_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// Client for Google's OAuth token endpoint. Only the authorization-code
/// grant is used; sign-in identity comes from the ID token it returns.
pub struct GoogleOauthClient {
    config: GoogleAuthConfig,
    http_client: reqwest::Client,
}

impl GoogleOauthClient {
    pub fn new(config: GoogleAuthConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    /// Exchange an authorization code for an ID token.
    ///
    /// A rejected code maps to `Unauthorized`; transport and upstream
    /// failures map to `ExternalServiceError`.
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<GoogleTokenResponse> {
        let form_body = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
            ("client_id", &self.config.client_id),
            ("client_secret", &self.config.client_secret),
        ];

        tracing::debug!("Exchanging authorization code at Google token endpoint");

        let response = self
            .http_client
            .post(&self.config.token_url)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .form(&form_body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to exchange authorization code: {}", e);
                AppError::ExternalServiceError(format!("Failed to exchange code: {}", e))
            })?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Code exchange failed: HTTP {} - {}", status, body);

            if status.as_u16() == 400 || status.as_u16() == 401 {
                // Invalid, expired or already-used code
                return Err(AppError::Unauthorized(
                    "Invalid authorization code".to_string(),
                ));
            }

            return Err(AppError::ExternalServiceError(format!(
                "Code exchange failed: HTTP {}",
                status
            )));
        }

        let token_response: GoogleTokenResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse token response: {}", e);
            AppError::ExternalServiceError(format!("Failed to parse token response: {}", e))
        })?;

        tracing::debug!(
            "Code exchange successful, ID token expires in {:?} seconds",
            token_response.expires_in
        );

        Ok(token_response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_token_response() {
        let json = r#"{
            "access_token": "ya29.a0Af",
            "expires_in": 3599,
            "id_token": "eyJhbGciOiJSUzI1NiJ9.e30.sig",
            "scope": "openid email profile",
            "token_type": "Bearer"
        }"#;
        let parsed: GoogleTokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.id_token, "eyJhbGciOiJSUzI1NiJ9.e30.sig");
        assert_eq!(parsed.expires_in, Some(3599));
    }

    #[test]
    fn deserializes_token_response_without_expiry() {
        let json = r#"{"id_token": "abc"}"#;
        let parsed: GoogleTokenResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.expires_in.is_none());
    }
}
