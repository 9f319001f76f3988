use chrono::{Duration, Utc};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::core::extractor::ClientInfo;
use crate::features::auth::model::{AuthenticatedUser, Session};

/// Service for issuing and resolving opaque session tokens.
pub struct SessionService {
    pool: PgPool,
    session_ttl: Duration,
}

/// A freshly issued session. Carries the plaintext token, which exists only
/// here and in the response to the client.
pub struct IssuedSession {
    pub token: String,
    pub session: Session,
}

impl SessionService {
    pub fn new(pool: PgPool, session_ttl_secs: i64) -> Self {
        Self {
            pool,
            session_ttl: Duration::seconds(session_ttl_secs),
        }
    }

    /// Generate an opaque session token: 64 hex characters from two random
    /// UUIDs.
    fn generate_token() -> String {
        format!(
            "{}{}",
            Uuid::new_v4().simple(),
            Uuid::new_v4().simple()
        )
    }

    fn hash_token(token: &str) -> String {
        let digest = Sha256::digest(token.as_bytes());
        hex::encode(digest)
    }

    /// Create a session for the user and return the plaintext token.
    pub async fn create_session(
        &self,
        user_id: Uuid,
        client: &ClientInfo,
    ) -> Result<IssuedSession> {
        let token = Self::generate_token();
        let token_hash = Self::hash_token(&token);
        let expires_at = Utc::now() + self.session_ttl;

        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (id, user_id, token_hash, expires_at, ip_address, user_agent)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, token_hash, expires_at, ip_address, user_agent, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&token_hash)
        .bind(expires_at)
        .bind(client.ip_address.as_deref())
        .bind(client.user_agent.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create session: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!("Session created: id={}, user={}", session.id, user_id);

        Ok(IssuedSession { token, session })
    }

    /// Resolve a bearer token to its user. Expired sessions are deleted on
    /// sight.
    pub async fn authenticate(&self, token: &str) -> Result<AuthenticatedUser> {
        let token_hash = Self::hash_token(token);

        let row = sqlx::query_as::<_, SessionWithUser>(
            r#"
            SELECT s.id AS session_id, s.user_id, s.expires_at, u.email, u.name
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.token_hash = $1
            "#,
        )
        .bind(&token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to look up session: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::Unauthorized("Invalid session token".to_string()))?;

        if row.expires_at <= Utc::now() {
            sqlx::query("DELETE FROM sessions WHERE id = $1")
                .bind(row.session_id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to delete expired session: {:?}", e);
                    AppError::Database(e)
                })?;
            return Err(AppError::Unauthorized("Session expired".to_string()));
        }

        Ok(AuthenticatedUser {
            user_id: row.user_id,
            session_id: row.session_id,
            email: row.email,
            name: row.name,
        })
    }

    /// Delete a session. Missing rows are fine; logout is idempotent.
    pub async fn revoke(&self, session_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to revoke session: {:?}", e);
                AppError::Database(e)
            })?;

        tracing::info!("Session revoked: id={}", session_id);
        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SessionWithUser {
    session_id: Uuid,
    user_id: Uuid,
    expires_at: chrono::DateTime<Utc>,
    email: String,
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_64_hex_chars() {
        let token = SessionService::generate_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn tokens_are_unique() {
        assert_ne!(
            SessionService::generate_token(),
            SessionService::generate_token()
        );
    }

    #[test]
    fn token_hash_is_stable_sha256_hex() {
        let hash = SessionService::hash_token("fixed-token");
        assert_eq!(hash, SessionService::hash_token("fixed-token"));
        assert_eq!(hash.len(), 64);
        assert_ne!(hash, SessionService::hash_token("other-token"));
    }
}
