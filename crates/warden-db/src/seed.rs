//! Default role seeding.
//!
//! Ensures the built-in roles exist before the application starts
//! serving. Safe to run on every startup: `ensure` is get-or-create
//! and the unique index on `role.name` backstops concurrent seeders.

use tracing::info;
use warden_core::error::WardenResult;
use warden_core::models::role::DEFAULT_ROLES;
use warden_core::repository::RoleRepository;

/// Create the `admin` and `user` roles if they do not exist yet.
pub async fn seed_default_roles<R: RoleRepository>(roles: &R) -> WardenResult<()> {
    for name in DEFAULT_ROLES {
        let role = roles.ensure(name).await?;
        info!(role = %role.name, id = %role.id, "Default role present");
    }
    Ok(())
}
