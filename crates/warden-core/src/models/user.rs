//! User domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    /// Stored lowercase; lookups normalize before querying.
    pub email: String,
    /// Stored lowercase, at most 13 characters.
    pub username: String,
    /// Argon2id PHC string, never the plaintext.
    pub password_hash: String,
    /// Gates authentication. Deactivated accounts keep their data and
    /// role memberships but cannot log in.
    pub is_active: bool,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Display name for rendering: "First Last", falling back to the
    /// username when no profile names are set.
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(f), Some(l)) => format!("{f} {l}"),
            (Some(f), None) => f.clone(),
            (None, Some(l)) => l.clone(),
            (None, None) => self.username.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub username: String,
    /// Raw password (hashed with Argon2id before storage).
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub username: Option<String>,
    pub is_active: Option<bool>,
    /// `Some(Some(val))` = set, `Some(None)` = clear, `None` = no change.
    pub first_name: Option<Option<String>>,
    /// `Some(Some(val))` = set, `Some(None)` = clear, `None` = no change.
    pub last_name: Option<Option<String>>,
}
