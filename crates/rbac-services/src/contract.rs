//! Validation rules for user attributes

use rbac_core::error::ValidationErrors;
use rbac_models::{NewUser, UserPatch};
use regex::Regex;
use std::sync::LazyLock;

/// Valid email pattern
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap()
});

/// Valid username pattern
static USERNAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_@.\-]+$").unwrap());

/// Field rules shared by create and update
#[derive(Debug, Clone)]
pub struct UserContract {
    password_min_length: usize,
}

impl Default for UserContract {
    fn default() -> Self {
        Self::new(8)
    }
}

impl UserContract {
    pub fn new(password_min_length: usize) -> Self {
        Self {
            password_min_length,
        }
    }

    pub fn validate_username(&self, username: &str, errors: &mut ValidationErrors) {
        let username = username.trim();
        let length = username.chars().count();

        if username.is_empty() {
            errors.add("username", "can't be blank");
            return;
        }

        if length < 2 {
            errors.add("username", "is too short (minimum is 2 characters)");
            return;
        }

        if length > 255 {
            errors.add("username", "is too long (maximum is 255 characters)");
            return;
        }

        if !USERNAME_PATTERN.is_match(username) {
            errors.add(
                "username",
                "is invalid. Only letters, numbers, underscores, @, periods and dashes allowed",
            );
        }
    }

    pub fn validate_password(&self, password: &str, errors: &mut ValidationErrors) {
        if password.chars().count() < self.password_min_length {
            errors.add(
                "password",
                format!(
                    "is too short (minimum is {} characters)",
                    self.password_min_length
                ),
            );
        }
    }

    /// Empty means "no email"
    pub fn validate_email(&self, email: &str, errors: &mut ValidationErrors) {
        let email = email.trim();
        if !email.is_empty() && !EMAIL_PATTERN.is_match(email) {
            errors.add("email", "is not a valid email address");
        }
    }

    pub fn validate_website(&self, website: &str, errors: &mut ValidationErrors) {
        if !website.is_empty() && website.trim().is_empty() {
            errors.add("website", "can't be blank");
        }
    }

    pub fn validate_new(&self, user: &NewUser) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        self.validate_username(&user.username, &mut errors);
        self.validate_password(&user.password, &mut errors);
        self.validate_email(&user.email, &mut errors);
        self.validate_website(&user.website, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Only the fields present in the patch are checked
    pub fn validate_patch(&self, patch: &UserPatch) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(ref username) = patch.username {
            self.validate_username(username, &mut errors);
        }
        if let Some(ref password) = patch.password {
            self.validate_password(password, &mut errors);
        }
        if let Some(ref email) = patch.email {
            self.validate_email(email, &mut errors);
        }
        if let Some(ref website) = patch.website {
            self.validate_website(website, &mut errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contract() -> UserContract {
        UserContract::new(8)
    }

    #[test]
    fn test_valid_user() {
        let user = NewUser::new("john.doe", "securepassword123").with_email("john@example.com");
        assert!(contract().validate_new(&user).is_ok());
    }

    #[test]
    fn test_invalid_email() {
        let user = NewUser::new("john.doe", "securepassword123").with_email("not-an-email");
        let errors = contract().validate_new(&user).unwrap_err();
        assert!(errors.has_error("email"));
    }

    #[test]
    fn test_empty_email_is_allowed() {
        let user = NewUser::new("john.doe", "securepassword123");
        assert!(contract().validate_new(&user).is_ok());
    }

    #[test]
    fn test_username_rules() {
        let mut errors = ValidationErrors::new();
        contract().validate_username("a", &mut errors);
        assert!(errors.has_error("username"));

        let mut errors = ValidationErrors::new();
        contract().validate_username("john doe", &mut errors);
        assert!(errors.has_error("username"));

        let mut errors = ValidationErrors::new();
        contract().validate_username(&"x".repeat(256), &mut errors);
        assert_eq!(
            errors.get("username").unwrap()[0],
            "is too long (maximum is 255 characters)"
        );

        let mut errors = ValidationErrors::new();
        contract().validate_username("  admin@corp.io  ", &mut errors);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_short_password() {
        let user = NewUser::new("jane", "short");
        let errors = contract().validate_new(&user).unwrap_err();
        assert_eq!(
            errors.full_messages(),
            vec!["password is too short (minimum is 8 characters)".to_string()]
        );
    }

    #[test]
    fn test_blank_website() {
        let mut user = NewUser::new("jane", "password123");
        user.website = "   ".to_string();
        assert!(contract().validate_new(&user).unwrap_err().has_error("website"));
    }

    #[test]
    fn test_patch_checks_present_fields_only() {
        let patch = UserPatch {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(contract().validate_patch(&patch).is_ok());

        let patch = UserPatch {
            username: Some("x".to_string()),
            password: Some("123".to_string()),
            ..Default::default()
        };
        let errors = contract().validate_patch(&patch).unwrap_err();
        assert!(errors.has_error("username"));
        assert!(errors.has_error("password"));
    }
}
