use crate::features::users::handlers;
use crate::features::users::services::UserService;
use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;

/// Account maintenance routes. Update shares the deleteAccount path and
/// both address the user by id.
pub fn public_routes(service: Arc<UserService>) -> Router {
    Router::new()
        .route(
            "/api/user/deleteAccount/{id}",
            put(handlers::update_account).delete(handlers::delete_account),
        )
        .with_state(service)
}

/// Profile routes that require a session
pub fn protected_routes(service: Arc<UserService>) -> Router {
    Router::new()
        .route("/api/users/me", get(handlers::get_profile))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use uuid::Uuid;

    use crate::shared::test_helpers::lazy_test_pool;

    fn user_service() -> Arc<UserService> {
        Arc::new(UserService::new(lazy_test_pool()))
    }

    #[tokio::test]
    async fn update_account_rejects_empty_patch() {
        let server = TestServer::new(public_routes(user_service())).unwrap();

        let response = server
            .put(&format!("/api/user/deleteAccount/{}", Uuid::new_v4()))
            .json(&json!({}))
            .await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["message"], "Nothing to update");
    }

    #[tokio::test]
    async fn update_account_rejects_invalid_email() {
        let server = TestServer::new(public_routes(user_service())).unwrap();

        let response = server
            .put(&format!("/api/user/deleteAccount/{}", Uuid::new_v4()))
            .json(&json!({ "email": "not-an-email" }))
            .await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn delete_account_rejects_non_uuid_id() {
        let server = TestServer::new(public_routes(user_service())).unwrap();

        let response = server.delete("/api/user/deleteAccount/42").await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn profile_requires_a_session() {
        // Mounted without the session middleware the extractor finds no
        // authenticated user and refuses the request.
        let server = TestServer::new(protected_routes(user_service())).unwrap();

        let response = server.get("/api/users/me").await;

        response.assert_status_unauthorized();
    }
}
