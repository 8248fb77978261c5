//! Role domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name of the role that grants access to the admin area.
pub const ADMIN_ROLE: &str = "admin";

/// Name of the default role for ordinary accounts.
pub const USER_ROLE: &str = "user";

/// Roles created at initialization.
pub const DEFAULT_ROLES: &[&str] = &[ADMIN_ROLE, USER_ROLE];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: Uuid,
    /// Unique, lowercase, at most 50 characters.
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRole {
    pub name: String,
}
