//! Typed form validation.
//!
//! Validation is independent of any presentation concern: a form either
//! produces a validated value or a list of per-field errors the caller
//! can render next to the offending inputs.

use email_address::EmailAddress;

use crate::models::user::CreateUser;

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;
pub const MAX_EMAIL_LENGTH: usize = 255;
pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MAX_USERNAME_LENGTH: usize = 13;
pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_ROLE_NAME_LENGTH: usize = 50;

/// A single validation failure, tied to the field that caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Raw registration input as submitted.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub email: String,
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl RegistrationForm {
    /// Validate the form, producing normalized registration input
    /// (email and username lowercased) or every field error at once.
    pub fn validate(self) -> Result<CreateUser, Vec<FieldError>> {
        let mut errors = Vec::new();

        let email = self.email.trim().to_lowercase();
        if email.is_empty() {
            errors.push(FieldError::new("email", "Email is required"));
        } else if email.len() > MAX_EMAIL_LENGTH {
            errors.push(FieldError::new(
                "email",
                format!("Email must be at most {MAX_EMAIL_LENGTH} characters"),
            ));
        } else if !EmailAddress::is_valid(&email) {
            errors.push(FieldError::new("email", "Invalid email address"));
        }

        let username = self.username.trim().to_lowercase();
        if username.len() < MIN_USERNAME_LENGTH || username.len() > MAX_USERNAME_LENGTH {
            errors.push(FieldError::new(
                "username",
                format!(
                    "Username must be {MIN_USERNAME_LENGTH} to \
                     {MAX_USERNAME_LENGTH} characters"
                ),
            ));
        } else if !username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            errors.push(FieldError::new(
                "username",
                "Username may only contain letters, digits, and underscores",
            ));
        }

        if self.password.len() < MIN_PASSWORD_LENGTH || self.password.len() > MAX_PASSWORD_LENGTH {
            errors.push(FieldError::new(
                "password",
                format!(
                    "Password must be {MIN_PASSWORD_LENGTH} to \
                     {MAX_PASSWORD_LENGTH} characters"
                ),
            ));
        }
        if self.confirm_password != self.password {
            errors.push(FieldError::new("confirm_password", "Passwords must match"));
        }

        let first_name = validate_name("first_name", self.first_name, &mut errors);
        let last_name = validate_name("last_name", self.last_name, &mut errors);

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(CreateUser {
            email,
            username,
            password: self.password,
            first_name,
            last_name,
        })
    }
}

fn validate_name(
    field: &'static str,
    value: Option<String>,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    let trimmed = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
    if let Some(ref name) = trimmed
        && name.len() > MAX_NAME_LENGTH
    {
        errors.push(FieldError::new(
            field,
            format!("Must be at most {MAX_NAME_LENGTH} characters"),
        ));
    }
    trimmed
}

/// Validate an admin-supplied role name: non-empty, lowercase, at most
/// 50 characters, same character set as usernames.
pub fn validate_role_name(name: &str) -> Result<String, FieldError> {
    let normalized = name.trim().to_lowercase();
    if normalized.is_empty() || normalized.len() > MAX_ROLE_NAME_LENGTH {
        return Err(FieldError::new(
            "name",
            format!("Role name must be 1 to {MAX_ROLE_NAME_LENGTH} characters"),
        ));
    }
    if !normalized
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(FieldError::new(
            "name",
            "Role name may only contain letters, digits, and underscores",
        ));
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> RegistrationForm {
        RegistrationForm {
            email: "Alice@Example.com".into(),
            username: "Alice".into(),
            password: "Secret123!".into(),
            confirm_password: "Secret123!".into(),
            first_name: Some("Alice".into()),
            last_name: None,
        }
    }

    #[test]
    fn valid_form_normalizes_email_and_username() {
        let input = valid_form().validate().unwrap();
        assert_eq!(input.email, "alice@example.com");
        assert_eq!(input.username, "alice");
        assert_eq!(input.first_name.as_deref(), Some("Alice"));
    }

    #[test]
    fn rejects_malformed_email() {
        let errors = RegistrationForm {
            email: "not-an-email".into(),
            ..valid_form()
        }
        .validate()
        .unwrap_err();
        assert!(errors.iter().any(|e| e.field == "email"));
    }

    #[test]
    fn rejects_short_password() {
        let errors = RegistrationForm {
            password: "short".into(),
            confirm_password: "short".into(),
            ..valid_form()
        }
        .validate()
        .unwrap_err();
        assert!(errors.iter().any(|e| e.field == "password"));
    }

    #[test]
    fn rejects_password_mismatch() {
        let errors = RegistrationForm {
            confirm_password: "Different1!".into(),
            ..valid_form()
        }
        .validate()
        .unwrap_err();
        assert!(errors.iter().any(|e| e.field == "confirm_password"));
    }

    #[test]
    fn rejects_long_username() {
        let errors = RegistrationForm {
            username: "much_too_long_username".into(),
            ..valid_form()
        }
        .validate()
        .unwrap_err();
        assert!(errors.iter().any(|e| e.field == "username"));
    }

    #[test]
    fn collects_all_errors_at_once() {
        let errors = RegistrationForm {
            email: "bad".into(),
            username: "x".into(),
            password: "p".into(),
            confirm_password: "q".into(),
            first_name: None,
            last_name: None,
        }
        .validate()
        .unwrap_err();
        assert!(errors.len() >= 4);
    }

    #[test]
    fn role_name_is_normalized() {
        assert_eq!(validate_role_name(" Moderator ").unwrap(), "moderator");
        assert!(validate_role_name("").is_err());
        assert!(validate_role_name("has spaces").is_err());
    }
}
