use crate::features::threads::handlers;
use crate::features::threads::services::ThreadService;
use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

/// Thread routes. Like ask-AI, these identify the acting user by the
/// request body rather than a session.
pub fn routes(service: Arc<ThreadService>) -> Router {
    Router::new()
        .route(
            "/api/homework/{taskId}/thread",
            post(handlers::create_task_thread).get(handlers::get_task_thread),
        )
        .route("/api/thread", get(handlers::list_threads))
        .route(
            "/api/thread/{id}",
            put(handlers::update_thread).delete(handlers::delete_thread),
        )
        .route("/api/thread/{id}/message", post(handlers::create_message))
        .route(
            "/api/thread/{id}/like",
            post(handlers::like_thread).delete(handlers::unlike_thread),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use uuid::Uuid;

    use crate::shared::test_helpers::lazy_test_pool;

    fn test_server() -> TestServer {
        let service = Arc::new(ThreadService::new(lazy_test_pool()));
        TestServer::new(routes(service)).unwrap()
    }

    #[tokio::test]
    async fn create_thread_rejects_blank_title() {
        let server = test_server();

        let response = server
            .post(&format!("/api/homework/{}/thread", Uuid::new_v4()))
            .json(&json!({
                "userId": Uuid::new_v4(),
                "title": "",
                "content": "How do I factor this?"
            }))
            .await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn update_thread_rejects_oversized_title() {
        let server = test_server();

        let response = server
            .put(&format!("/api/thread/{}", Uuid::new_v4()))
            .json(&json!({
                "title": "x".repeat(301),
                "content": "Still fine"
            }))
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn message_route_rejects_malformed_thread_id() {
        let server = test_server();

        let response = server
            .post("/api/thread/not-a-uuid/message")
            .json(&json!({ "userId": Uuid::new_v4(), "content": "hello" }))
            .await;

        response.assert_status_bad_request();
    }
}
