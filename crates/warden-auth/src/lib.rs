//! WARDEN Auth — password authentication, opaque session tokens, and
//! the per-request authorization check.

pub mod authz;
pub mod config;
pub mod error;
pub mod password;
pub mod service;
pub mod token;

pub use authz::{RequestContext, has_role, require_role};
pub use config::AuthConfig;
pub use error::AuthError;
pub use service::{AuthService, LoginInput, LoginOutput};
