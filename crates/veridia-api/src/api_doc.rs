//! OpenAPI documentation.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::handlers;
use crate::services;
use veridia_core::models;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Veridia API",
        version = "0.1.0",
        description = "Identity and eKYC backend: account registration, password login, face photo enrollment, and face login. All endpoints are versioned under /api/v1/."
    ),
    paths(
        handlers::health::health_check,
        handlers::users::register,
        handlers::users::login,
        handlers::users::get_by_email,
        handlers::ekyc::upload_photos,
        handlers::ekyc::login,
    ),
    components(
        schemas(
            models::User,
            models::FacePose,
            handlers::users::RegisterRequest,
            handlers::users::LoginRequest,
            handlers::users::GetByEmailRequest,
            handlers::ekyc::SessionResponse,
            services::users::LoginResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Service health checks"),
        (name = "user", description = "Account registration and password login"),
        (name = "ekyc", description = "Face photo enrollment and face login")
    )
)]
pub struct ApiDoc;
