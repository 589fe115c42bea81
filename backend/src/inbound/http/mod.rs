//! HTTP inbound adapter exposing the REST endpoints.

pub mod auth;
pub mod error;
pub mod health;
pub mod profiles;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register the versioned API under `/api/v1`.
///
/// Callers provide [`state::HttpState`] as app data.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .app_data(error::json_config())
            .app_data(error::path_config())
            .service(users::register)
            .service(users::login)
            .service(profiles::get_profile)
            .service(profiles::update_nickname)
            .service(profiles::update_avatar),
    );
}

/// Register the liveness and readiness probes.
///
/// Callers provide [`health::HealthState`] as app data.
pub fn configure_health(cfg: &mut web::ServiceConfig) {
    cfg.service(health::ready).service(health::live);
}
