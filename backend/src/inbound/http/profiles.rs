//! Owner-only profile endpoints.
//!
//! ```text
//! GET /api/v1/profiles/7
//! PUT /api/v1/profiles/7/nickname {"nickname":"Al"}
//! PUT /api/v1/profiles/7/avatar   {"avatarRef":"img/7.png"}
//! ```
//!
//! The `{id}` segment is taken as a raw string so token checks run before
//! id parsing.

use actix_web::{HttpRequest, get, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::{AvatarRef, Nickname, ProfileField, UserProfile};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::require_owner;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::field_error;

/// Public profile representation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    #[schema(example = 7)]
    pub id: i64,
    #[schema(example = "alice")]
    pub username: String,
    pub nickname: Option<String>,
    pub avatar_ref: Option<String>,
}

impl From<UserProfile> for ProfileResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.id.get(),
            username: profile.username.as_ref().to_owned(),
            nickname: profile.nickname.map(|n| n.as_ref().to_owned()),
            avatar_ref: profile.avatar_ref.map(|a| a.as_ref().to_owned()),
        }
    }
}

/// Body for `PUT /api/v1/profiles/{id}/nickname`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NicknameRequest {
    pub nickname: String,
}

/// Body for `PUT /api/v1/profiles/{id}/avatar`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvatarRequest {
    pub avatar_ref: String,
}

/// Fetch the caller's own profile.
#[utoipa::path(
    get,
    path = "/api/v1/profiles/{id}",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 400, description = "Malformed id", body = crate::domain::Error),
        (status = 401, description = "Missing or invalid token", body = crate::domain::Error),
        (status = 403, description = "Token belongs to another user", body = crate::domain::Error),
        (status = 404, description = "Unknown user", body = crate::domain::Error)
    ),
    tags = ["profiles"],
    operation_id = "getProfile",
    security(("bearer" = []))
)]
#[get("/profiles/{id}")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> ApiResult<web::Json<ProfileResponse>> {
    let id = require_owner(&state.gate, &req, &path)?;
    let ctx = state.operation();
    let _cancel = ctx.cancel_on_drop();
    let profile = state.profiles.profile(&ctx, id).await?;
    Ok(web::Json(profile.into()))
}

async fn update(
    state: &HttpState,
    req: &HttpRequest,
    raw_id: &str,
    field: impl FnOnce() -> ApiResult<ProfileField>,
) -> ApiResult<web::Json<ProfileResponse>> {
    let id = require_owner(&state.gate, req, raw_id)?;
    let field = field()?;
    let ctx = state.operation();
    let _cancel = ctx.cancel_on_drop();
    let profile = state.profiles.update_profile(&ctx, id, field).await?;
    Ok(web::Json(profile.into()))
}

/// Replace the caller's nickname.
#[utoipa::path(
    put,
    path = "/api/v1/profiles/{id}/nickname",
    params(("id" = i64, Path, description = "User id")),
    request_body = NicknameRequest,
    responses(
        (status = 200, description = "Updated profile", body = ProfileResponse),
        (status = 400, description = "Invalid nickname or id", body = crate::domain::Error),
        (status = 401, description = "Missing or invalid token", body = crate::domain::Error),
        (status = 403, description = "Token belongs to another user", body = crate::domain::Error),
        (status = 404, description = "Unknown user", body = crate::domain::Error)
    ),
    tags = ["profiles"],
    operation_id = "updateNickname",
    security(("bearer" = []))
)]
#[put("/profiles/{id}/nickname")]
pub async fn update_nickname(
    state: web::Data<HttpState>,
    req: HttpRequest,
    path: web::Path<String>,
    payload: web::Json<NicknameRequest>,
) -> ApiResult<web::Json<ProfileResponse>> {
    update(&state, &req, &path, || {
        Nickname::new(&payload.nickname)
            .map(ProfileField::Nickname)
            .map_err(|err| field_error(&err))
    })
    .await
}

/// Record a new avatar file reference for the caller.
#[utoipa::path(
    put,
    path = "/api/v1/profiles/{id}/avatar",
    params(("id" = i64, Path, description = "User id")),
    request_body = AvatarRequest,
    responses(
        (status = 200, description = "Updated profile", body = ProfileResponse),
        (status = 400, description = "Invalid reference or id", body = crate::domain::Error),
        (status = 401, description = "Missing or invalid token", body = crate::domain::Error),
        (status = 403, description = "Token belongs to another user", body = crate::domain::Error),
        (status = 404, description = "Unknown user", body = crate::domain::Error)
    ),
    tags = ["profiles"],
    operation_id = "updateAvatar",
    security(("bearer" = []))
)]
#[put("/profiles/{id}/avatar")]
pub async fn update_avatar(
    state: web::Data<HttpState>,
    req: HttpRequest,
    path: web::Path<String>,
    payload: web::Json<AvatarRequest>,
) -> ApiResult<web::Json<ProfileResponse>> {
    update(&state, &req, &path, || {
        AvatarRef::new(&payload.avatar_ref)
            .map(ProfileField::AvatarRef)
            .map_err(|err| field_error(&err))
    })
    .await
}
