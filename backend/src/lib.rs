//! Profile service library: domain rules, adapters and the HTTP surface.
//!
//! - [`domain`]: users, store/cache consistency and the credential gate.
//! - [`outbound`]: PostgreSQL, Redis, in-memory and Argon2 adapters.
//! - [`inbound`]: actix-web handlers.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
