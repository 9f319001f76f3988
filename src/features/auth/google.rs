use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use serde::Deserialize;
use std::sync::Arc;

use crate::core::error::AppError;
use crate::features::auth::jwks::JwksClient;

/// Claims carried by a Google ID token that the service cares about.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleClaims {
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

/// Verifies Google ID tokens against Google's published signing keys.
pub struct GoogleIdTokenVerifier {
    jwks_client: Arc<JwksClient>,
    client_id: String,
    leeway: u64,
}

impl GoogleIdTokenVerifier {
    pub fn new(jwks_client: Arc<JwksClient>, client_id: String, leeway: u64) -> Self {
        Self {
            jwks_client,
            client_id,
            leeway,
        }
    }

    /// Validates an ID token's signature and standard claims, returning the
    /// Google identity it asserts. Any failure maps to `Unauthorized`; the
    /// detailed cause only goes to the logs.
    pub async fn validate_id_token(&self, token: &str) -> Result<GoogleClaims, AppError> {
        let header = decode_header(token).map_err(|e| {
            tracing::debug!("Failed to decode ID token header: {}", e);
            AppError::Unauthorized("Invalid ID token".to_string())
        })?;

        if header.alg != Algorithm::RS256 {
            tracing::debug!("Unsupported ID token algorithm: {:?}", header.alg);
            return Err(AppError::Unauthorized("Invalid ID token".to_string()));
        }

        let kid = header.kid.ok_or_else(|| {
            tracing::debug!("ID token header missing kid");
            AppError::Unauthorized("Invalid ID token".to_string())
        })?;

        let decoding_key = self.jwks_client.get_key(&kid).await.map_err(|e| {
            tracing::warn!("Failed to resolve signing key {}: {}", kid, e);
            AppError::Unauthorized("Invalid ID token".to_string())
        })?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&["https://accounts.google.com", "accounts.google.com"]);
        validation.set_audience(&[&self.client_id]);
        validation.leeway = self.leeway;

        let token_data = decode::<GoogleClaims>(token, &decoding_key, &validation).map_err(|e| {
            tracing::debug!("ID token validation failed: {}", e);
            AppError::Unauthorized("Invalid ID token".to_string())
        })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_claims_with_optional_fields_absent() {
        let json = r#"{"sub":"108417","email":"x@example.com"}"#;
        let claims: GoogleClaims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.sub, "108417");
        assert_eq!(claims.email, "x@example.com");
        assert!(!claims.email_verified);
        assert!(claims.name.is_none());
        assert!(claims.picture.is_none());
    }

    #[test]
    fn deserializes_full_claims() {
        let json = r#"{
            "sub": "1084171234567890",
            "email": "student@gmail.com",
            "email_verified": true,
            "name": "A Student",
            "picture": "https://lh3.googleusercontent.com/a/photo"
        }"#;
        let claims: GoogleClaims = serde_json::from_str(json).unwrap();
        assert!(claims.email_verified);
        assert_eq!(claims.name.as_deref(), Some("A Student"));
    }

    #[test]
    fn rejects_a_token_that_is_not_a_jwt() {
        let jwks = Arc::new(JwksClient::new(
            "http://127.0.0.1:9/certs",
            std::time::Duration::from_secs(300),
        ));
        let verifier = GoogleIdTokenVerifier::new(jwks, "test-client".to_string(), 30);

        let result = tokio_test::block_on(verifier.validate_id_token("garbage"));

        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }
}
