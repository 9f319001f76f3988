use chrono::{Duration, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::core::extractor::ClientInfo;
use crate::features::auth::clients::GoogleOauthClient;
use crate::features::auth::dtos::{
    AuthResponseDto, AuthUserDto, GoogleSignInRequestDto, LoginRequestDto, RegisterRequestDto,
};
use crate::features::auth::google::{GoogleClaims, GoogleIdTokenVerifier};
use crate::features::auth::model::{AuthenticatedUser, User};
use crate::features::auth::password;
use crate::features::auth::services::session_service::{IssuedSession, SessionService};
use crate::shared::constants::{PROVIDER_CREDENTIAL, PROVIDER_GOOGLE, VERIFICATION_TTL_HOURS};

/// Service for authentication operations (register, login, Google sign-in)
pub struct AuthService {
    pool: PgPool,
    sessions: Arc<SessionService>,
    google_verifier: Arc<GoogleIdTokenVerifier>,
    google_client: Arc<GoogleOauthClient>,
}

impl AuthService {
    pub fn new(
        pool: PgPool,
        sessions: Arc<SessionService>,
        google_verifier: Arc<GoogleIdTokenVerifier>,
        google_client: Arc<GoogleOauthClient>,
    ) -> Self {
        Self {
            pool,
            sessions,
            google_verifier,
            google_client,
        }
    }

    /// Register a new user with email and password
    pub async fn register(
        &self,
        dto: RegisterRequestDto,
        client: &ClientInfo,
    ) -> Result<AuthResponseDto> {
        let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
            .bind(&dto.email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to check existing email: {:?}", e);
                AppError::Database(e)
            })?;

        if existing.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let password_hash = password::hash_password(&dto.password)?;

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, email_verified)
            VALUES ($1, $2, $3, FALSE)
            RETURNING id, name, email, email_verified, image, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(dto.name.trim())
        .bind(&dto.email)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create user: {:?}", e);
            AppError::Database(e)
        })?;

        sqlx::query(
            r#"
            INSERT INTO accounts (id, user_id, provider_id, account_id, password_hash)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user.id)
        .bind(PROVIDER_CREDENTIAL)
        .bind(user.id.to_string())
        .bind(&password_hash)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create credential account: {:?}", e);
            AppError::Database(e)
        })?;

        // Pending email verification challenge. Delivery is out of scope here;
        // the row is what a mailer job would consume.
        sqlx::query(
            r#"
            INSERT INTO verifications (id, identifier, value, expires_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.email)
        .bind(Uuid::new_v4().simple().to_string())
        .bind(Utc::now() + Duration::hours(VERIFICATION_TTL_HOURS))
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create verification: {:?}", e);
            AppError::Database(e)
        })?;

        tx.commit().await.map_err(AppError::Database)?;

        tracing::info!("User registered: id={}, email={}", user.id, user.email);

        let issued = self.sessions.create_session(user.id, client).await?;
        Ok(auth_response(user, issued))
    }

    /// Login with email and password. Unknown email and wrong password
    /// produce the same `Unauthorized` error.
    pub async fn login(&self, dto: LoginRequestDto, client: &ClientInfo) -> Result<AuthResponseDto> {
        let row = sqlx::query_as::<_, UserWithPassword>(
            r#"
            SELECT u.id, u.name, u.email, u.email_verified, u.image,
                   u.created_at, u.updated_at, a.password_hash
            FROM users u
            JOIN accounts a ON a.user_id = u.id AND a.provider_id = $1
            WHERE u.email = $2
            "#,
        )
        .bind(PROVIDER_CREDENTIAL)
        .bind(&dto.email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to look up credentials: {:?}", e);
            AppError::Database(e)
        })?;

        let Some(row) = row else {
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        };

        let valid = row
            .password_hash
            .as_deref()
            .map(|hash| password::verify_password(&dto.password, hash))
            .unwrap_or(false);

        if !valid {
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        }

        let user = row.into_user();
        let issued = self.sessions.create_session(user.id, client).await?;

        tracing::info!("User logged in: id={}", user.id);

        Ok(auth_response(user, issued))
    }

    /// Sign in with Google. Accepts an ID token directly or exchanges an
    /// authorization code for one, then verifies it and resolves the user:
    /// an existing Google account wins, otherwise the Google identity is
    /// linked to the user with the same email, otherwise a new user is
    /// created.
    pub async fn google_sign_in(
        &self,
        dto: GoogleSignInRequestDto,
        client: &ClientInfo,
    ) -> Result<AuthResponseDto> {
        let id_token = self.resolve_id_token(dto).await?;
        let claims = self.google_verifier.validate_id_token(&id_token).await?;

        let user = self.find_or_create_google_user(&claims).await?;
        let issued = self.sessions.create_session(user.id, client).await?;

        tracing::info!("Google sign-in: id={}, sub={}", user.id, claims.sub);

        Ok(auth_response(user, issued))
    }

    /// End the caller's session
    pub async fn logout(&self, user: &AuthenticatedUser) -> Result<()> {
        self.sessions.revoke(user.session_id).await
    }

    /// Get the current user's profile (for /me)
    pub async fn get_current_user(&self, user: &AuthenticatedUser) -> Result<AuthUserDto> {
        let row = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, email_verified, image, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user.user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load user profile: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(row.into())
    }

    async fn resolve_id_token(&self, dto: GoogleSignInRequestDto) -> Result<String> {
        if let Some(id_token) = dto.id_token.filter(|t| !t.trim().is_empty()) {
            return Ok(id_token);
        }

        if let Some(code) = dto.code.filter(|c| !c.trim().is_empty()) {
            let redirect_uri = dto
                .redirect_uri
                .filter(|u| !u.trim().is_empty())
                .ok_or_else(|| {
                    AppError::BadRequest("redirectUri is required with code".to_string())
                })?;
            let token_response = self.google_client.exchange_code(&code, &redirect_uri).await?;
            return Ok(token_response.id_token);
        }

        Err(AppError::BadRequest(
            "Either idToken or code is required".to_string(),
        ))
    }

    async fn find_or_create_google_user(&self, claims: &GoogleClaims) -> Result<User> {
        // Existing Google account: done
        let linked = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.name, u.email, u.email_verified, u.image, u.created_at, u.updated_at
            FROM users u
            JOIN accounts a ON a.user_id = u.id
            WHERE a.provider_id = $1 AND a.account_id = $2
            "#,
        )
        .bind(PROVIDER_GOOGLE)
        .bind(&claims.sub)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to look up Google account: {:?}", e);
            AppError::Database(e)
        })?;

        if let Some(user) = linked {
            return Ok(user);
        }

        // Same email registered another way: link the Google identity to it
        let by_email = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, email_verified, image, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(&claims.email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to look up user by email: {:?}", e);
            AppError::Database(e)
        })?;

        if let Some(user) = by_email {
            return self.link_google_account(user, claims).await;
        }

        self.create_google_user(claims).await
    }

    async fn link_google_account(&self, user: User, claims: &GoogleClaims) -> Result<User> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        sqlx::query(
            r#"
            INSERT INTO accounts (id, user_id, provider_id, account_id)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user.id)
        .bind(PROVIDER_GOOGLE)
        .bind(&claims.sub)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to link Google account: {:?}", e);
            AppError::Database(e)
        })?;

        // Google vouches for the address; adopt its verification and photo
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET email_verified = email_verified OR $2,
                image = COALESCE(image, $3),
                updated_at = now()
            WHERE id = $1
            RETURNING id, name, email, email_verified, image, created_at, updated_at
            "#,
        )
        .bind(user.id)
        .bind(claims.email_verified)
        .bind(claims.picture.as_deref())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update linked user: {:?}", e);
            AppError::Database(e)
        })?;

        tx.commit().await.map_err(AppError::Database)?;

        tracing::info!("Google account linked: user={}", user.id);
        Ok(user)
    }

    async fn create_google_user(&self, claims: &GoogleClaims) -> Result<User> {
        let name = claims
            .name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| {
                claims
                    .email
                    .split('@')
                    .next()
                    .unwrap_or("user")
                    .to_string()
            });

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, email_verified, image)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, email_verified, image, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&name)
        .bind(&claims.email)
        .bind(claims.email_verified)
        .bind(claims.picture.as_deref())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create Google user: {:?}", e);
            AppError::Database(e)
        })?;

        sqlx::query(
            r#"
            INSERT INTO accounts (id, user_id, provider_id, account_id)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user.id)
        .bind(PROVIDER_GOOGLE)
        .bind(&claims.sub)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create Google account: {:?}", e);
            AppError::Database(e)
        })?;

        tx.commit().await.map_err(AppError::Database)?;

        tracing::info!("User created via Google: id={}", user.id);
        Ok(user)
    }
}

fn auth_response(user: User, issued: IssuedSession) -> AuthResponseDto {
    AuthResponseDto {
        token: issued.token,
        token_type: "Bearer".to_string(),
        expires_at: issued.session.expires_at,
        user: user.into(),
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserWithPassword {
    id: Uuid,
    name: String,
    email: String,
    email_verified: bool,
    image: Option<String>,
    created_at: chrono::DateTime<Utc>,
    updated_at: chrono::DateTime<Utc>,
    password_hash: Option<String>,
}

impl UserWithPassword {
    fn into_user(self) -> User {
        User {
            id: self.id,
            name: self.name,
            email: self.email,
            email_verified: self.email_verified,
            image: self.image,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
