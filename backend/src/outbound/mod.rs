//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL user store using Diesel
//! - **cache**: Redis user cache and a disabled fallback
//! - **memory**: in-process store and cache
//! - **hashing**: Argon2id secret hasher
//!
//! Adapters translate between domain types and infrastructure
//! representations. They hold no business rules.

pub mod cache;
pub mod hashing;
pub mod memory;
pub mod persistence;
