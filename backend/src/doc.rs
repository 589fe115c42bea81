//! OpenAPI documentation.
//!
//! [`ApiDoc`] registers every REST path, the request/response schemas and
//! the bearer token security scheme. Swagger UI serves it in debug builds.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::profiles::{AvatarRequest, NicknameRequest, ProfileResponse};
use crate::inbound::http::users::{LoginRequest, RegisterRequest, TokenResponse};

/// Adds the `bearer` HS256 token scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token issued by POST /api/v1/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Profile service API",
        description = "Account registration, bearer login and owner-only profile editing."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::profiles::get_profile,
        crate::inbound::http::profiles::update_nickname,
        crate::inbound::http::profiles::update_avatar,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        ProfileResponse,
        RegisterRequest,
        LoginRequest,
        TokenResponse,
        NicknameRequest,
        AvatarRequest,
    )),
    tags(
        (name = "users", description = "Registration and login"),
        (name = "profiles", description = "Owner-only profile access"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
