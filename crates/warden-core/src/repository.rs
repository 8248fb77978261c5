//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async and atomic: each call is a
//! single transaction from the caller's point of view. Cascades
//! (deleting a user or a role) are the repository's responsibility, so
//! callers never observe orphaned memberships or sessions.

use uuid::Uuid;

use crate::error::WardenResult;
use crate::models::{
    role::{CreateRole, Role},
    session::{CreateSession, Session},
    user::{CreateUser, UpdateUser, User},
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

pub trait UserRepository: Send + Sync {
    /// Create a user. Fails with `DuplicateEmail` / `DuplicateUsername`
    /// when the normalized email or username is already taken; both are
    /// also enforced by unique indexes at the store level.
    fn create(&self, input: CreateUser) -> impl Future<Output = WardenResult<User>> + Send;

    fn get_by_id(&self, id: Uuid) -> impl Future<Output = WardenResult<User>> + Send;

    /// Lookup by email, normalized to lowercase before querying.
    fn get_by_email(&self, email: &str) -> impl Future<Output = WardenResult<User>> + Send;

    /// Lookup by username, normalized to lowercase before querying.
    fn get_by_username(&self, username: &str)
    -> impl Future<Output = WardenResult<User>> + Send;

    fn update(
        &self,
        id: Uuid,
        input: UpdateUser,
    ) -> impl Future<Output = WardenResult<User>> + Send;

    /// Re-hash and store a new password for the user.
    fn set_password(
        &self,
        id: Uuid,
        new_password: &str,
    ) -> impl Future<Output = WardenResult<()>> + Send;

    /// Hard delete. Removes the user's role memberships and sessions in
    /// the same operation; soft-deactivation via `UpdateUser.is_active`
    /// is the documented path for normal operation.
    fn delete(&self, id: Uuid) -> impl Future<Output = WardenResult<()>> + Send;

    /// List users, newest first.
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = WardenResult<PaginatedResult<User>>> + Send;
}

pub trait RoleRepository: Send + Sync {
    /// Create a role. Fails with `DuplicateRoleName` when the name is
    /// taken; the store-level unique index backstops races.
    fn create(&self, input: CreateRole) -> impl Future<Output = WardenResult<Role>> + Send;

    /// Get the role by name, creating it when absent. Used by seeding
    /// and bootstrap; admin-facing creation goes through [`create`]
    /// so duplicates are reported.
    ///
    /// [`create`]: RoleRepository::create
    fn ensure(&self, name: &str) -> impl Future<Output = WardenResult<Role>> + Send;

    fn get_by_id(&self, id: Uuid) -> impl Future<Output = WardenResult<Role>> + Send;

    fn get_by_name(&self, name: &str) -> impl Future<Output = WardenResult<Role>> + Send;

    /// Delete the role and cascade-remove every membership that
    /// references it.
    fn delete(&self, id: Uuid) -> impl Future<Output = WardenResult<()>> + Send;

    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = WardenResult<PaginatedResult<Role>>> + Send;

    /// Record that the user holds the role. Granting an already-held
    /// role is a no-op; both endpoints must exist (`NotFound`
    /// otherwise), and a unique index keeps each (user, role) pair to
    /// at most one membership row.
    fn grant_to_user(
        &self,
        user_id: Uuid,
        role_id: Uuid,
    ) -> impl Future<Output = WardenResult<()>> + Send;

    /// Remove the membership if present. Revoking an unheld role is a
    /// no-op.
    fn revoke_from_user(
        &self,
        user_id: Uuid,
        role_id: Uuid,
    ) -> impl Future<Output = WardenResult<()>> + Send;

    /// All roles the user currently holds.
    fn roles_of_user(&self, user_id: Uuid) -> impl Future<Output = WardenResult<Vec<Role>>> + Send;

    /// Membership check by role name — the authorization primitive.
    /// Always hits the store; results must not be cached across
    /// requests, since a revocation has to take effect on the next one.
    fn user_has_role(
        &self,
        user_id: Uuid,
        role_name: &str,
    ) -> impl Future<Output = WardenResult<bool>> + Send;

    /// All users holding the role.
    fn members(
        &self,
        role_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = WardenResult<PaginatedResult<User>>> + Send;
}

pub trait SessionRepository: Send + Sync {
    fn create(&self, input: CreateSession) -> impl Future<Output = WardenResult<Session>> + Send;

    fn get_by_id(&self, id: Uuid) -> impl Future<Output = WardenResult<Session>> + Send;

    fn get_by_token_hash(
        &self,
        token_hash: &str,
    ) -> impl Future<Output = WardenResult<Session>> + Send;

    /// Invalidate a single session (logout).
    fn invalidate(&self, id: Uuid) -> impl Future<Output = WardenResult<()>> + Send;

    /// Invalidate all sessions for a user (e.g. on password change).
    fn invalidate_user_sessions(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = WardenResult<()>> + Send;

    /// Remove all expired sessions, returning how many were deleted.
    fn cleanup_expired(&self) -> impl Future<Output = WardenResult<u64>> + Send;
}
