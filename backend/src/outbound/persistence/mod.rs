//! PostgreSQL persistence through Diesel.
//!
//! Row structs and table definitions stay private to this module; only the
//! store adapter and the pool are exported.
//!
//! ```ignore
//! use profile_backend::outbound::persistence::{DbPool, DieselUserStore, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/profiles")).await?;
//! let store = DieselUserStore::new(pool);
//! ```

mod diesel_error_mapping;
mod diesel_user_store;
mod models;
mod pool;
mod schema;

pub use diesel_user_store::DieselUserStore;
pub use pool::{DbPool, PoolConfig, PoolError};
