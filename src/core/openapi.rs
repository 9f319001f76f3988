use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth;
use crate::features::homework::{dtos as homework_dtos, handlers as homework_handlers};
use crate::features::threads::{dtos as threads_dtos, handlers as threads_handlers};
use crate::features::users::{dtos as users_dtos, handlers as users_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::register,
        auth::handlers::login,
        auth::handlers::google_sign_in,
        auth::handlers::logout,
        auth::handlers::get_me,
        // Homework
        homework_handlers::ask_ai,
        homework_handlers::list_tasks,
        homework_handlers::get_task,
        // Threads
        threads_handlers::create_task_thread,
        threads_handlers::get_task_thread,
        threads_handlers::list_threads,
        threads_handlers::update_thread,
        threads_handlers::delete_thread,
        threads_handlers::create_message,
        threads_handlers::like_thread,
        threads_handlers::unlike_thread,
        // Users
        users_handlers::delete_account,
        users_handlers::update_account,
        users_handlers::get_profile,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Auth
            auth::model::AuthenticatedUser,
            auth::dtos::RegisterRequestDto,
            auth::dtos::LoginRequestDto,
            auth::dtos::GoogleSignInRequestDto,
            auth::dtos::AuthResponseDto,
            auth::dtos::AuthUserDto,
            ApiResponse<auth::dtos::AuthResponseDto>,
            ApiResponse<auth::dtos::AuthUserDto>,
            // Homework
            homework_dtos::AskAiRequestDto,
            homework_dtos::HomeworkTaskResponseDto,
            ApiResponse<homework_dtos::HomeworkTaskResponseDto>,
            ApiResponse<Vec<homework_dtos::HomeworkTaskResponseDto>>,
            // Threads
            threads_dtos::CreateThreadRequestDto,
            threads_dtos::UpdateThreadRequestDto,
            threads_dtos::CreateMessageRequestDto,
            threads_dtos::LikeRequestDto,
            threads_dtos::AuthorDto,
            threads_dtos::MessageResponseDto,
            threads_dtos::ThreadResponseDto,
            threads_dtos::LikeStatusResponseDto,
            ApiResponse<threads_dtos::ThreadResponseDto>,
            ApiResponse<Vec<threads_dtos::ThreadResponseDto>>,
            ApiResponse<threads_dtos::MessageResponseDto>,
            ApiResponse<threads_dtos::LikeStatusResponseDto>,
            // Users
            users_dtos::UpdateUserRequestDto,
            users_dtos::UserResponseDto,
            ApiResponse<users_dtos::UserResponseDto>,
        )
    ),
    tags(
        (name = "auth", description = "Registration, login, Google sign-in and sessions"),
        (name = "homework", description = "Homework tasks and AI explanations"),
        (name = "threads", description = "Discussion threads, messages and likes"),
        (name = "users", description = "Account maintenance"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Askelo API",
        version = "0.1.0",
        description = "API documentation for Askelo",
    )
)]
pub struct ApiDoc;

/// Adds the Bearer security scheme to the OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
