//! Account endpoints.
//!
//! ```text
//! POST /api/v1/register {"username":"alice","password":"s1","nickname":"Al"}
//! POST /api/v1/login    {"username":"alice","password":"s1"}
//! ```

use actix_web::http::header::LOCATION;
use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{Error, LoginCredentials, Registration};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::issue_token;
use crate::inbound::http::profiles::ProfileResponse;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::credential_error;

/// Request body for `POST /api/v1/register`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub nickname: Option<String>,
}

impl TryFrom<&RegisterRequest> for Registration {
    type Error = Error;

    fn try_from(value: &RegisterRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password, value.nickname.as_deref())
            .map_err(|err| credential_error(&err))
    }
}

/// Request body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl TryFrom<&LoginRequest> for LoginCredentials {
    type Error = Error;

    fn try_from(value: &LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password).map_err(|err| credential_error(&err))
    }
}

/// Bearer token returned by a successful login.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = ProfileResponse,
            headers(("Location" = String, description = "Profile URL"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Username taken", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = Registration::try_from(&payload.into_inner())?;
    let ctx = state.operation();
    let _cancel = ctx.cancel_on_drop();
    let profile = state.accounts.register(&ctx, &registration).await?;
    info!(user_id = %profile.id, "registered user");
    Ok(HttpResponse::Created()
        .insert_header((LOCATION, format!("/api/v1/profiles/{}", profile.id)))
        .json(ProfileResponse::from(profile)))
}

/// Exchange credentials for a bearer token.
///
/// Unknown usernames and wrong passwords both yield 401 with the same body.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = TokenResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<TokenResponse>> {
    let credentials = LoginCredentials::try_from(&payload.into_inner())?;
    let ctx = state.operation();
    let _cancel = ctx.cancel_on_drop();
    let user_id = state.accounts.authenticate(&ctx, &credentials).await?;
    let token = issue_token(&state.gate, user_id)?;
    Ok(web::Json(TokenResponse { token }))
}
