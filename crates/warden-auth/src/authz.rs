//! Role-based authorization checks.
//!
//! Authorization state is carried in an explicit [`RequestContext`]
//! handed to every check — there is no ambient "current user". Each
//! check queries the membership relation fresh: a role revoked between
//! two requests is gone on the second one.

use tracing::warn;
use uuid::Uuid;
use warden_core::error::{WardenError, WardenResult};
use warden_core::models::user::User;
use warden_core::repository::RoleRepository;

/// The authenticated subject of one request.
///
/// Constructed by `AuthService::authenticate` from a validated,
/// unexpired session belonging to an active user.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub user: User,
    pub session_id: Uuid,
}

impl RequestContext {
    pub fn user_id(&self) -> Uuid {
        self.user.id
    }
}

/// Whether the context's user currently holds the named role.
pub async fn has_role<R: RoleRepository>(
    roles: &R,
    ctx: &RequestContext,
    role_name: &str,
) -> WardenResult<bool> {
    roles.user_has_role(ctx.user.id, role_name).await
}

/// Deny with `Forbidden` unless the context's user holds the named
/// role.
pub async fn require_role<R: RoleRepository>(
    roles: &R,
    ctx: &RequestContext,
    role_name: &str,
) -> WardenResult<()> {
    if has_role(roles, ctx, role_name).await? {
        return Ok(());
    }

    warn!(
        user_id = %ctx.user.id,
        email = %ctx.user.email,
        role = role_name,
        "Access denied: missing required role"
    );

    Err(WardenError::Forbidden {
        reason: format!("requires role '{role_name}'"),
    })
}
