//! Authentication error types.

use thiserror::Error;
use warden_core::error::WardenError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("account is inactive")]
    AccountInactive,

    #[error("session has expired")]
    SessionExpired,

    #[error("invalid session: {0}")]
    SessionInvalid(String),

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for WardenError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => WardenError::InvalidCredentials,
            AuthError::AccountInactive => WardenError::AccountInactive,
            AuthError::SessionExpired | AuthError::SessionInvalid(_) => {
                // Stale or forged sessions read as a failed login at
                // the request boundary.
                WardenError::InvalidCredentials
            }
            AuthError::Crypto(msg) => WardenError::Internal(msg),
        }
    }
}
