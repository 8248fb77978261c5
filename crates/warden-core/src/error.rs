//! Error types for the WARDEN system.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WardenError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    /// Surfaced at registration time only, never during login.
    #[error("Email is already registered: {email}")]
    DuplicateEmail { email: String },

    #[error("Username is already taken: {username}")]
    DuplicateUsername { username: String },

    #[error("Role already exists: {name}")]
    DuplicateRoleName { name: String },

    /// Covers both "no such account" and "wrong password" so the
    /// response cannot be used for account enumeration.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account has been deactivated")]
    AccountInactive,

    #[error("Forbidden: {reason}")]
    Forbidden { reason: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type WardenResult<T> = Result<T, WardenError>;
