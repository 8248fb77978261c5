//! SurrealDB repository implementations.

mod role;
mod session;
mod user;

pub use role::SurrealRoleRepository;
pub use session::SurrealSessionRepository;
pub use user::{SurrealUserRepository, verify_password};
