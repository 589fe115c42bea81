//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::{App, web};
use mockable::DefaultClock;

use super::state::HttpState;
use crate::domain::ports::{MockAccountService, MockProfileService};
use crate::domain::{CredentialGate, TokenSecret, UserId};

/// Gate with a fixed secret, so tests can mint tokens independently.
pub fn test_gate() -> CredentialGate {
    let secret = TokenSecret::new(b"inbound-http-test-secret".to_vec()).expect("secret");
    CredentialGate::new(&secret, Arc::new(DefaultClock))
}

/// `Authorization` header value for `id`.
pub fn bearer_for(id: i64) -> String {
    let id = UserId::new(id).expect("valid id");
    let token = test_gate().issue_token(id).expect("token");
    format!("Bearer {token}")
}

/// State backed by the given mocks.
pub fn mock_state(accounts: MockAccountService, profiles: MockProfileService) -> HttpState {
    HttpState::new(Arc::new(accounts), Arc::new(profiles), test_gate())
}

/// App wired with the versioned API and `state`.
pub fn api_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<actix_web::body::BoxBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .configure(super::configure_api)
}
