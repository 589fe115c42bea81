//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data` and depend only on the
//! driving ports plus the credential gate, so they stay testable without I/O.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::ports::{AccountService, ProfileService};
use crate::domain::{CredentialGate, OperationContext};

/// Default per-request deadline applied to service calls.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountService>,
    pub profiles: Arc<dyn ProfileService>,
    pub gate: CredentialGate,
    pub request_timeout: Duration,
}

impl HttpState {
    /// Construct state with the default request timeout.
    pub fn new(
        accounts: Arc<dyn AccountService>,
        profiles: Arc<dyn ProfileService>,
        gate: CredentialGate,
    ) -> Self {
        Self {
            accounts,
            profiles,
            gate,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Replace the per-request deadline.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Fresh operation context bounded by the request timeout.
    pub fn operation(&self) -> OperationContext {
        OperationContext::with_timeout(self.request_timeout)
    }
}
