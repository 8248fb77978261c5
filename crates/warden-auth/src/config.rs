//! Authentication configuration.

/// Configuration for the authentication service.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Session lifetime in seconds (default: 86_400 = 24 hours).
    pub session_lifetime_secs: u64,
    /// Optional pepper prepended to passwords before Argon2id
    /// verification. Must match the pepper the user repository hashes
    /// with.
    pub pepper: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_lifetime_secs: 86_400,
            pepper: None,
        }
    }
}
