//! Admin operations composed over the user and role repositories.

use tracing::info;
use uuid::Uuid;
use warden_auth::authz::{self, RequestContext};
use warden_core::error::{WardenError, WardenResult};
use warden_core::models::role::{ADMIN_ROLE, CreateRole, Role};
use warden_core::models::user::{UpdateUser, User};
use warden_core::repository::{PaginatedResult, Pagination, RoleRepository, UserRepository};
use warden_core::validation::validate_role_name;

/// How many recent registrations the dashboard shows.
const RECENT_USERS: u64 = 5;

/// A user together with the roles they hold, for the admin user list.
#[derive(Debug, Clone)]
pub struct UserWithRoles {
    pub user: User,
    pub roles: Vec<Role>,
}

/// Dashboard statistics.
#[derive(Debug, Clone)]
pub struct AdminStats {
    pub total_users: u64,
    pub admin_users: u64,
    pub recent_users: Vec<User>,
}

/// Admin service.
///
/// Generic over repository implementations, like the auth service, so
/// it carries no database dependency.
pub struct AdminService<U: UserRepository, R: RoleRepository> {
    users: U,
    roles: R,
}

impl<U: UserRepository, R: RoleRepository> AdminService<U, R> {
    pub fn new(users: U, roles: R) -> Self {
        Self { users, roles }
    }

    /// List users, newest first, each with their current roles.
    pub async fn list_users(
        &self,
        ctx: &RequestContext,
        pagination: Pagination,
    ) -> WardenResult<PaginatedResult<UserWithRoles>> {
        authz::require_role(&self.roles, ctx, ADMIN_ROLE).await?;

        let page = self.users.list(pagination).await?;

        let mut items = Vec::with_capacity(page.items.len());
        for user in page.items {
            let roles = self.roles.roles_of_user(user.id).await?;
            items.push(UserWithRoles { user, roles });
        }

        Ok(PaginatedResult {
            items,
            total: page.total,
            offset: page.offset,
            limit: page.limit,
        })
    }

    /// Dashboard statistics: user counts and the latest registrations.
    pub async fn stats(&self, ctx: &RequestContext) -> WardenResult<AdminStats> {
        authz::require_role(&self.roles, ctx, ADMIN_ROLE).await?;

        let recent = self
            .users
            .list(Pagination {
                offset: 0,
                limit: RECENT_USERS,
            })
            .await?;

        // Zero admins is possible before bootstrap has run.
        let admin_users = match self.roles.get_by_name(ADMIN_ROLE).await {
            Ok(role) => {
                self.roles
                    .members(role.id, Pagination { offset: 0, limit: 1 })
                    .await?
                    .total
            }
            Err(WardenError::NotFound { .. }) => 0,
            Err(e) => return Err(e),
        };

        Ok(AdminStats {
            total_users: recent.total,
            admin_users,
            recent_users: recent.items,
        })
    }

    /// Grant a role to a user. The role must already exist; granting a
    /// role the user already holds is a no-op.
    pub async fn grant_role(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        role_name: &str,
    ) -> WardenResult<()> {
        authz::require_role(&self.roles, ctx, ADMIN_ROLE).await?;

        let role = self.roles.get_by_name(role_name).await?;
        self.roles.grant_to_user(user_id, role.id).await?;

        info!(
            admin = %ctx.user.email,
            user_id = %user_id,
            role = %role.name,
            "Role granted"
        );
        Ok(())
    }

    /// Revoke a role from a user. Revoking a role the user does not
    /// hold — including a role name that does not exist — is a no-op.
    pub async fn revoke_role(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        role_name: &str,
    ) -> WardenResult<()> {
        authz::require_role(&self.roles, ctx, ADMIN_ROLE).await?;

        // Target user must exist; the role may not.
        self.users.get_by_id(user_id).await?;

        let role = match self.roles.get_by_name(role_name).await {
            Ok(role) => role,
            Err(WardenError::NotFound { .. }) => return Ok(()),
            Err(e) => return Err(e),
        };

        self.roles.revoke_from_user(user_id, role.id).await?;

        info!(
            admin = %ctx.user.email,
            user_id = %user_id,
            role = %role.name,
            "Role revoked"
        );
        Ok(())
    }

    /// Flip a user's active flag, returning the new value.
    ///
    /// Deactivating your own account is not special-cased: an admin
    /// who deactivates the sole admin account locks the admin area
    /// until access is restored out-of-band (e.g. the bootstrap path).
    pub async fn toggle_active(&self, ctx: &RequestContext, user_id: Uuid) -> WardenResult<bool> {
        authz::require_role(&self.roles, ctx, ADMIN_ROLE).await?;

        let user = self.users.get_by_id(user_id).await?;
        let now_active = !user.is_active;

        self.users
            .update(
                user_id,
                UpdateUser {
                    is_active: Some(now_active),
                    ..Default::default()
                },
            )
            .await?;

        info!(
            admin = %ctx.user.email,
            user_id = %user_id,
            active = now_active,
            "Active flag toggled"
        );
        Ok(now_active)
    }

    /// Create a new role.
    pub async fn create_role(&self, ctx: &RequestContext, name: &str) -> WardenResult<Role> {
        authz::require_role(&self.roles, ctx, ADMIN_ROLE).await?;

        let name = validate_role_name(name).map_err(|e| WardenError::Validation {
            message: e.message,
        })?;

        let role = self.roles.create(CreateRole { name }).await?;
        info!(admin = %ctx.user.email, role = %role.name, "Role created");
        Ok(role)
    }

    /// Delete a role and every membership referencing it.
    pub async fn delete_role(&self, ctx: &RequestContext, name: &str) -> WardenResult<()> {
        authz::require_role(&self.roles, ctx, ADMIN_ROLE).await?;

        let role = self.roles.get_by_name(name).await?;
        self.roles.delete(role.id).await?;

        info!(admin = %ctx.user.email, role = %role.name, "Role deleted");
        Ok(())
    }

    /// List all roles.
    pub async fn list_roles(
        &self,
        ctx: &RequestContext,
        pagination: Pagination,
    ) -> WardenResult<PaginatedResult<Role>> {
        authz::require_role(&self.roles, ctx, ADMIN_ROLE).await?;
        self.roles.list(pagination).await
    }

    /// Hard-delete a user along with their memberships and sessions.
    /// Deactivation is the normal path; deletion exists for erasure
    /// requests. Deleting your own account is refused.
    pub async fn delete_user(&self, ctx: &RequestContext, user_id: Uuid) -> WardenResult<()> {
        authz::require_role(&self.roles, ctx, ADMIN_ROLE).await?;

        if ctx.user.id == user_id {
            return Err(WardenError::Forbidden {
                reason: "cannot delete your own account".into(),
            });
        }

        let user = self.users.get_by_id(user_id).await?;
        self.users.delete(user_id).await?;

        info!(
            admin = %ctx.user.email,
            user_id = %user_id,
            email = %user.email,
            "User deleted"
        );
        Ok(())
    }
}
