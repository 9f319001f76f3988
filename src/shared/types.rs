use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Envelope for every JSON response the API returns.
///
/// `success` mirrors the HTTP status class; `data` carries the payload,
/// `message` a human-readable note, `meta` list totals and `errors` the
/// per-field validation failures. Absent fields serialize as `null` rather
/// than being omitted.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub meta: Option<Meta>,
    pub errors: Option<Vec<String>>,
}

/// List metadata. `total` is the full row count, not the page size.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Meta {
    pub total: i64,
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: Option<String>, meta: Option<Meta>) -> Self {
        Self {
            success: true,
            data,
            message,
            meta,
            errors: None,
        }
    }

    pub fn error(message: Option<String>, errors: Option<Vec<String>>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message,
            meta: None,
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_envelope_keeps_null_fields() {
        let response = ApiResponse::success(Some(json!({"id": 1})), None, None);
        let encoded = serde_json::to_value(&response).unwrap();

        assert_eq!(encoded["success"], true);
        assert_eq!(encoded["data"]["id"], 1);
        assert!(encoded["message"].is_null());
        assert!(encoded["meta"].is_null());
        assert!(encoded["errors"].is_null());
    }

    #[test]
    fn list_envelope_carries_total() {
        let response = ApiResponse::success(
            Some(json!([])),
            None,
            Some(Meta { total: 42 }),
        );
        let encoded = serde_json::to_value(&response).unwrap();

        assert_eq!(encoded["meta"]["total"], 42);
    }

    #[test]
    fn error_envelope_has_no_data() {
        let response = ApiResponse::<()>::error(
            Some("Validation error".to_string()),
            Some(vec!["Title must be 1-300 characters".to_string()]),
        );
        let encoded = serde_json::to_value(&response).unwrap();

        assert_eq!(encoded["success"], false);
        assert!(encoded["data"].is_null());
        assert_eq!(encoded["errors"][0], "Title must be 1-300 characters");
    }
}
