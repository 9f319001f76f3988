use crate::core::middleware::log_post_body_middleware;
use crate::features::auth::handlers;
use crate::features::auth::services::AuthService;
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Public auth routes (no authentication required)
pub fn public_routes(service: Arc<AuthService>) -> Router {
    Router::new()
        .route("/api/auth/register", post(handlers::register))
        .route("/api/auth/login", post(handlers::login))
        .route("/api/auth/google", post(handlers::google_sign_in))
        .route_layer(from_fn(log_post_body_middleware))
        .with_state(service)
}

/// Protected auth routes (require session authentication)
pub fn protected_routes(service: Arc<AuthService>) -> Router {
    Router::new()
        .route("/api/auth/logout", post(handlers::logout))
        .route("/api/auth/me", get(handlers::get_me))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum_test::TestServer;
    use fake::faker::internet::en::SafeEmail;
    use fake::faker::name::en::Name;
    use fake::Fake;
    use serde_json::{json, Value};

    use crate::core::config::GoogleAuthConfig;
    use crate::features::auth::clients::GoogleOauthClient;
    use crate::features::auth::services::SessionService;
    use crate::features::auth::{GoogleIdTokenVerifier, JwksClient};
    use crate::shared::test_helpers::lazy_test_pool;

    fn auth_service() -> Arc<AuthService> {
        let google = GoogleAuthConfig {
            client_id: "test-client".to_string(),
            client_secret: "test-secret".to_string(),
            token_url: "http://127.0.0.1:9/token".to_string(),
            jwks_url: "http://127.0.0.1:9/certs".to_string(),
            jwks_cache_ttl: Duration::from_secs(300),
            jwt_leeway: Duration::from_secs(30),
        };

        let pool = lazy_test_pool();
        let sessions = Arc::new(SessionService::new(pool.clone(), 3600));
        let jwks = Arc::new(JwksClient::new(&google.jwks_url, google.jwks_cache_ttl));
        let verifier = Arc::new(GoogleIdTokenVerifier::new(
            jwks,
            google.client_id.clone(),
            google.jwt_leeway.as_secs(),
        ));
        let oauth = Arc::new(GoogleOauthClient::new(google));

        Arc::new(AuthService::new(pool, sessions, verifier, oauth))
    }

    #[tokio::test]
    async fn register_rejects_short_password() {
        let server = TestServer::new(public_routes(auth_service())).unwrap();
        let name: String = Name().fake();
        let email: String = SafeEmail().fake();

        let response = server
            .post("/api/auth/register")
            .json(&json!({ "name": name, "email": email, "password": "short" }))
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn login_rejects_malformed_email() {
        let server = TestServer::new(public_routes(auth_service())).unwrap();

        let response = server
            .post("/api/auth/login")
            .json(&json!({ "email": "not-an-email", "password": "hunter2hunter2" }))
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn google_sign_in_needs_a_token_or_a_code() {
        let server = TestServer::new(public_routes(auth_service())).unwrap();

        let response = server.post("/api/auth/google").json(&json!({})).await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["message"], "Either idToken or code is required");
    }

    #[tokio::test]
    async fn session_routes_reject_anonymous_requests() {
        let server = TestServer::new(protected_routes(auth_service())).unwrap();

        let logout = server.post("/api/auth/logout").await;
        logout.assert_status_unauthorized();

        let me = server.get("/api/auth/me").await;
        me.assert_status_unauthorized();
    }
}
