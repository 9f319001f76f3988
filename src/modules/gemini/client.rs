//! Google Gemini generateContent client
//!
//! Thin REST wrapper over `POST /v1beta/models/{model}:generateContent`.
//! Request/response bodies use the API's camelCase wire format.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::config::GeminiConfig;
use crate::core::error::AppError;

/// Gemini generateContent request body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

/// A conversation turn; role is "user" or "model"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Content,
    /// "STOP", "MAX_TOKENS", "SAFETY", ...
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    pub prompt_token_count: u32,
    pub candidates_token_count: Option<u32>,
    pub total_token_count: Option<u32>,
}

/// Error body returned by the API on non-2xx responses
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
    /// e.g. "INVALID_ARGUMENT", "RESOURCE_EXHAUSTED"
    status: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate; empty when the
    /// response carries no candidates
    pub fn first_candidate_text(&self) -> String {
        self.candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

/// Client for the Google Generative Language API
pub struct GeminiClient {
    http: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Send a single-turn user prompt and return the generated text.
    ///
    /// Returns an empty string when the response carries no candidate text;
    /// callers decide how to handle that.
    pub async fn generate_text(&self, prompt: &str) -> Result<String, AppError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: Some(GenerationConfig {
                max_output_tokens: self.config.max_output_tokens,
                temperature: self.config.temperature,
                top_p: self.config.top_p,
            }),
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );

        debug!(model = %self.config.model, "Sending generateContent request");

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.config.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Gemini request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(parsed) => match parsed.error.status {
                    Some(api_status) => format!("{} ({})", parsed.error.message, api_status),
                    None => parsed.error.message,
                },
                Err(_) => body,
            };
            return Err(AppError::ExternalServiceError(format!(
                "Gemini returned {}: {}",
                status, message
            )));
        }

        let payload: GenerateContentResponse = response.json().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Failed to decode Gemini response: {}", e))
        })?;

        if let Some(usage) = &payload.usage_metadata {
            debug!(
                prompt_tokens = usage.prompt_token_count,
                candidate_tokens = ?usage.candidates_token_count,
                total_tokens = ?usage.total_token_count,
                "Gemini token usage"
            );
        }

        if let Some(candidate) = payload.candidates.first() {
            if let Some(reason) = &candidate.finish_reason {
                if reason != "STOP" {
                    warn!(finish_reason = %reason, "Gemini generation finished abnormally");
                }
            }
        }

        Ok(payload.first_candidate_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> GeminiConfig {
        GeminiConfig {
            api_key: "test-key".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-2.5-flash".to_string(),
            temperature: 0.7,
            top_p: 0.9,
            max_output_tokens: 1024,
        }
    }

    #[test]
    fn test_request_serialization_uses_camel_case() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: "Explain this homework problem".to_string(),
                }],
            }],
            generation_config: Some(GenerationConfig {
                max_output_tokens: 1024,
                temperature: 0.7,
                top_p: 0.9,
            }),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(
            json["contents"][0]["parts"][0]["text"],
            "Explain this homework problem"
        );
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 1024);
        assert_eq!(json["generationConfig"]["topP"], 0.9);
        assert!(json["generationConfig"]["temperature"].is_number());
    }

    #[test]
    fn test_deserialize_generate_content_response() {
        let raw = r#"{
            "candidates": [
                {
                    "content": {
                        "role": "model",
                        "parts": [
                            {"text": "Step 1: add the numbers. "},
                            {"text": "Step 2: check your work."}
                        ]
                    },
                    "finishReason": "STOP"
                }
            ],
            "usageMetadata": {
                "promptTokenCount": 21,
                "candidatesTokenCount": 13,
                "totalTokenCount": 34
            }
        }"#;

        let response: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(
            response.first_candidate_text(),
            "Step 1: add the numbers. Step 2: check your work."
        );
        assert_eq!(
            response.candidates[0].finish_reason.as_deref(),
            Some("STOP")
        );
        let usage = response.usage_metadata.unwrap();
        assert_eq!(usage.prompt_token_count, 21);
        assert_eq!(usage.total_token_count, Some(34));
    }

    #[test]
    fn test_empty_response_has_no_candidate_text() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(response.candidates.is_empty());
        assert_eq!(response.first_candidate_text(), "");
    }

    #[test]
    fn test_deserialize_api_error_body() {
        let raw = r#"{
            "error": {
                "code": 429,
                "message": "Resource has been exhausted",
                "status": "RESOURCE_EXHAUSTED"
            }
        }"#;

        let parsed: ApiErrorResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.error.message, "Resource has been exhausted");
        assert_eq!(parsed.error.status.as_deref(), Some("RESOURCE_EXHAUSTED"));
    }

    #[test]
    fn test_client_exposes_configured_model() {
        let client = GeminiClient::new(test_config());
        assert_eq!(client.model(), "gemini-2.5-flash");
    }
}
