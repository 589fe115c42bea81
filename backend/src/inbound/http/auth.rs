//! Bearer token helpers used by HTTP handlers.
//!
//! Check order for owner-only routes: token first (401), then the path id
//! (400), then ownership (403).

use actix_web::HttpRequest;
use actix_web::http::header::AUTHORIZATION;
use tracing::debug;

use crate::domain::{AuthError, CredentialGate, Error, UserId};

use super::ApiResult;

const BEARER_PREFIX: &str = "Bearer ";

/// Raw bearer token from the `Authorization` header, if present.
pub fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn map_auth_error(err: AuthError) -> Error {
    debug!(error = %err, "request refused by credential gate");
    match err {
        AuthError::Signing { message } => Error::internal(message),
        err if err.is_forbidden() => Error::forbidden("access to this profile is denied"),
        AuthError::MissingToken => Error::unauthorized("authorization token required"),
        _ => Error::unauthorized("authorization token rejected"),
    }
}

/// Require the bearer token's subject to own the profile named by `raw_id`.
pub fn require_owner(gate: &CredentialGate, req: &HttpRequest, raw_id: &str) -> ApiResult<UserId> {
    let token = bearer_token(req).ok_or(AuthError::MissingToken).map_err(map_auth_error)?;
    let subject = gate
        .validate_and_extract_subject(token)
        .map_err(map_auth_error)?;
    let resource: UserId = raw_id
        .parse()
        .map_err(|_| Error::invalid_request(format!("invalid user id: {raw_id}")))?;
    if subject != resource {
        return Err(map_auth_error(AuthError::SubjectMismatch {
            subject: subject.get(),
            resource: resource.get(),
        }));
    }
    Ok(subject)
}

/// Sign a fresh token for `subject`.
pub fn issue_token(gate: &CredentialGate, subject: UserId) -> ApiResult<String> {
    gate.issue_token(subject).map_err(map_auth_error)
}
