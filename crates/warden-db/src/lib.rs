//! WARDEN Database — SurrealDB connection management and repository
//! implementations.
//!
//! This crate provides:
//! - Connection management ([`DbManager`], [`DbConfig`])
//! - Schema initialization and migrations ([`run_migrations`])
//! - Repository implementations for the `warden-core` traits
//! - Default role seeding ([`seed::seed_default_roles`])
//! - Error types ([`DbError`])

mod connection;
mod error;
mod schema;

pub mod repository;
pub mod seed;

pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use repository::verify_password;
pub use schema::{run_migrations, schema_v1};
