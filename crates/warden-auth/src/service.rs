//! Authentication service — registration, login, session resolution,
//! password change, and logout orchestration.

use chrono::{Duration, Utc};
use tracing::info;
use uuid::Uuid;
use warden_core::error::{WardenError, WardenResult};
use warden_core::models::session::CreateSession;
use warden_core::models::user::User;
use warden_core::repository::{SessionRepository, UserRepository};
use warden_core::validation::{
    MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH, RegistrationForm,
};

use crate::authz::RequestContext;
use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password;
use crate::token;

/// Input for the login flow.
#[derive(Debug)]
pub struct LoginInput {
    /// Email address or username; either identifies the account.
    pub identifier: String,
    pub password: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Successful login result.
#[derive(Debug)]
pub struct LoginOutput {
    /// Raw opaque session token (goes into the client cookie, not
    /// stored anywhere server-side).
    pub session_token: String,
    /// Session ID (can be used for logout).
    pub session_id: Uuid,
    /// When the session stops being accepted.
    pub expires_at: chrono::DateTime<Utc>,
    pub user: User,
}

/// Authentication service.
///
/// Generic over repository implementations so that the auth layer
/// has no dependency on the database crate.
pub struct AuthService<U: UserRepository, S: SessionRepository> {
    users: U,
    sessions: S,
    config: AuthConfig,
}

impl<U: UserRepository, S: SessionRepository> AuthService<U, S> {
    pub fn new(users: U, sessions: S, config: AuthConfig) -> Self {
        Self {
            users,
            sessions,
            config,
        }
    }

    /// Register a new account from a submitted form.
    ///
    /// Field-level failures surface as a single `Validation` error
    /// here; callers that render forms use
    /// [`RegistrationForm::validate`] directly to get per-field
    /// errors.
    pub async fn register(&self, form: RegistrationForm) -> WardenResult<User> {
        let input = form.validate().map_err(|errors| {
            let message = errors
                .iter()
                .map(|e| format!("{}: {}", e.field, e.message))
                .collect::<Vec<_>>()
                .join("; ");
            WardenError::Validation { message }
        })?;

        let user = self.users.create(input).await?;
        info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Authenticate with email-or-username + password and establish a
    /// session.
    ///
    /// A missing account and a wrong password both report
    /// `InvalidCredentials`; a deactivated account reports
    /// `AccountInactive` even when the credentials are correct.
    pub async fn login(&self, input: LoginInput) -> WardenResult<LoginOutput> {
        // 1. Look up the account — email first, then username.
        let user = match self.users.get_by_email(&input.identifier).await {
            Ok(u) => u,
            Err(WardenError::NotFound { .. }) => self
                .users
                .get_by_username(&input.identifier)
                .await
                .map_err(|_| AuthError::InvalidCredentials)?,
            Err(e) => return Err(e),
        };

        // 2. Gate on the active flag before touching the password, so
        //    a deactivated account reports inactive rather than a
        //    credential failure.
        if !user.is_active {
            return Err(AuthError::AccountInactive.into());
        }

        // 3. Verify the password.
        let valid = password::verify_password(
            &input.password,
            &user.password_hash,
            self.config.pepper.as_deref(),
        )?;

        if !valid {
            return Err(AuthError::InvalidCredentials.into());
        }

        // 4. Generate the opaque token and create the session.
        let raw_token = token::generate_session_token();
        let token_hash = token::hash_session_token(&raw_token);
        let expires_at = Utc::now() + Duration::seconds(self.config.session_lifetime_secs as i64);

        let session = self
            .sessions
            .create(CreateSession {
                user_id: user.id,
                token_hash,
                ip_address: input.ip_address,
                user_agent: input.user_agent,
                expires_at,
            })
            .await?;

        info!(user_id = %user.id, session_id = %session.id, "Login succeeded");

        Ok(LoginOutput {
            session_token: raw_token,
            session_id: session.id,
            expires_at: session.expires_at,
            user,
        })
    }

    /// Resolve a raw session token into a per-request context.
    ///
    /// Expired sessions are removed on sight. The active flag is
    /// re-checked on every call, so deactivating an account cuts off
    /// its live sessions at the next request.
    pub async fn authenticate(&self, raw_token: &str) -> WardenResult<RequestContext> {
        let token_hash = token::hash_session_token(raw_token);

        let session = self
            .sessions
            .get_by_token_hash(&token_hash)
            .await
            .map_err(|e| match e {
                WardenError::NotFound { .. } => {
                    AuthError::SessionInvalid("unknown session token".into()).into()
                }
                other => other,
            })?;

        if session.is_expired(Utc::now()) {
            let _ = self.sessions.invalidate(session.id).await;
            return Err(AuthError::SessionExpired.into());
        }

        let user = self.users.get_by_id(session.user_id).await?;
        if !user.is_active {
            return Err(AuthError::AccountInactive.into());
        }

        Ok(RequestContext {
            user,
            session_id: session.id,
        })
    }

    /// Change a user's password after re-verifying the current one,
    /// then revoke every session so stolen cookies die with the old
    /// password.
    pub async fn change_password(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> WardenResult<()> {
        let user = self.users.get_by_id(user_id).await?;

        let valid = password::verify_password(
            current_password,
            &user.password_hash,
            self.config.pepper.as_deref(),
        )?;
        if !valid {
            return Err(AuthError::InvalidCredentials.into());
        }

        if new_password.len() < MIN_PASSWORD_LENGTH || new_password.len() > MAX_PASSWORD_LENGTH {
            return Err(WardenError::Validation {
                message: format!(
                    "Password must be {MIN_PASSWORD_LENGTH} to \
                     {MAX_PASSWORD_LENGTH} characters"
                ),
            });
        }

        self.users.set_password(user_id, new_password).await?;
        self.sessions.invalidate_user_sessions(user_id).await?;

        info!(user_id = %user_id, "Password changed, sessions revoked");
        Ok(())
    }

    /// Invalidate a single session (logout).
    pub async fn logout(&self, session_id: Uuid) -> WardenResult<()> {
        self.sessions.invalidate(session_id).await
    }

    /// Revoke all sessions for a user.
    pub async fn logout_all(&self, user_id: Uuid) -> WardenResult<()> {
        self.sessions.invalidate_user_sessions(user_id).await
    }
}
