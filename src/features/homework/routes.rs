use crate::features::homework::handlers;
use crate::features::homework::services::HomeworkService;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Public homework routes. Ask-AI identifies the user by the request body,
/// not by a session.
pub fn public_routes(service: Arc<HomeworkService>) -> Router {
    Router::new()
        .route("/api/ask-ai", post(handlers::ask_ai))
        .with_state(service)
}

/// Protected homework routes (require session authentication)
pub fn protected_routes(service: Arc<HomeworkService>) -> Router {
    Router::new()
        .route("/api/homework", get(handlers::list_tasks))
        .route("/api/homework/{id}", get(handlers::get_task))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use uuid::Uuid;

    use crate::core::config::GeminiConfig;
    use crate::core::middleware::auth_middleware;
    use crate::features::auth::services::SessionService;
    use crate::modules::gemini::GeminiClient;
    use crate::shared::test_helpers::lazy_test_pool;

    fn homework_service() -> Arc<HomeworkService> {
        let gemini = Arc::new(GeminiClient::new(GeminiConfig {
            api_key: "test-key".to_string(),
            base_url: "http://127.0.0.1:9".to_string(),
            model: "gemini-2.5-flash".to_string(),
            temperature: 0.7,
            top_p: 0.9,
            max_output_tokens: 1024,
        }));
        Arc::new(HomeworkService::new(lazy_test_pool(), gemini))
    }

    #[tokio::test]
    async fn ask_ai_requires_text_or_reason() {
        let server = TestServer::new(public_routes(homework_service())).unwrap();

        let response = server
            .post("/api/ask-ai")
            .json(&json!({ "userId": Uuid::new_v4() }))
            .await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["errors"][0], "Either extractedText or reason is required");
    }

    #[tokio::test]
    async fn ask_ai_rejects_missing_user_id() {
        let server = TestServer::new(public_routes(homework_service())).unwrap();

        let response = server
            .post("/api/ask-ai")
            .json(&json!({ "extractedText": "What is 2 + 2?" }))
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn task_routes_require_a_session_token() {
        let sessions = Arc::new(SessionService::new(lazy_test_pool(), 3600));
        let router = protected_routes(homework_service()).route_layer(
            axum::middleware::from_fn_with_state(sessions, auth_middleware),
        );
        let server = TestServer::new(router).unwrap();

        let response = server.get("/api/homework").await;

        response.assert_status_unauthorized();
    }
}
