//! WARDEN Server — application entry point.
//!
//! Initializes logging, connects to the database, applies migrations,
//! seeds the default roles, and (optionally) bootstraps an admin
//! account from the environment so a fresh deployment is reachable.

use tracing_subscriber::EnvFilter;
use warden_core::error::WardenError;
use warden_core::models::role::ADMIN_ROLE;
use warden_core::models::user::CreateUser;
use warden_core::repository::{RoleRepository, UserRepository};
use warden_db::repository::{SurrealRoleRepository, SurrealUserRepository};
use warden_db::{DbConfig, DbManager};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("warden=info".parse().unwrap()),
        )
        .json()
        .init();

    tracing::info!("Starting WARDEN server...");

    let db_config = DbConfig::from_env();
    let db = DbManager::connect(&db_config).await?;
    warden_db::run_migrations(db.client()).await?;

    let users = match std::env::var("WARDEN_PEPPER") {
        Ok(pepper) => SurrealUserRepository::with_pepper(db.client().clone(), pepper),
        Err(_) => SurrealUserRepository::new(db.client().clone()),
    };
    let roles = SurrealRoleRepository::new(db.client().clone());

    warden_db::seed::seed_default_roles(&roles).await?;
    bootstrap_admin(&users, &roles).await?;

    // TODO: mount the HTTP surface (registration, login, admin pages)
    // TODO: schedule periodic session cleanup

    tracing::info!("WARDEN server stopped.");
    Ok(())
}

/// Ensure the account named by `WARDEN_ADMIN_EMAIL` /
/// `WARDEN_ADMIN_PASSWORD` exists and holds the admin role.
///
/// This is the recovery path for a locked-out deployment as well as
/// the first-run bootstrap; both variables unset means skip.
async fn bootstrap_admin<U: UserRepository, R: RoleRepository>(
    users: &U,
    roles: &R,
) -> anyhow::Result<()> {
    let (Ok(email), Ok(password)) = (
        std::env::var("WARDEN_ADMIN_EMAIL"),
        std::env::var("WARDEN_ADMIN_PASSWORD"),
    ) else {
        tracing::debug!("Admin bootstrap not configured, skipping");
        return Ok(());
    };

    let username =
        std::env::var("WARDEN_ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());

    let user = match users.get_by_email(&email).await {
        Ok(user) => {
            tracing::info!(email = %user.email, "Bootstrap admin already exists");
            user
        }
        Err(WardenError::NotFound { .. }) => {
            let user = users
                .create(CreateUser {
                    email,
                    username,
                    password,
                    first_name: None,
                    last_name: None,
                })
                .await?;
            tracing::info!(email = %user.email, "Bootstrap admin created");
            user
        }
        Err(e) => return Err(e.into()),
    };

    let admin_role = roles.ensure(ADMIN_ROLE).await?;
    roles.grant_to_user(user.id, admin_role.id).await?;
    tracing::info!(user_id = %user.id, "Bootstrap admin holds the admin role");

    Ok(())
}
