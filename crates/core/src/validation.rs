//! Field-level validation rules for the user form.

use serde::Serialize;

use crate::types::{Email, EmailError, UserFormData};

/// Minimum length (in characters) of first and last names.
pub const MIN_NAME_LENGTH: usize = 2;

/// Per-field validation messages. `None` means the field is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl FieldErrors {
    /// Whether every field passed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.email.is_none()
    }
}

fn validate_name(value: &str, label: &str) -> Option<String> {
    if value.trim().is_empty() {
        return Some(format!("{label} is required"));
    }
    if value.chars().count() < MIN_NAME_LENGTH {
        return Some(format!(
            "{label} must be at least {MIN_NAME_LENGTH} characters"
        ));
    }
    None
}

fn validate_email(value: &str) -> Option<String> {
    match Email::parse(value) {
        Ok(_) => None,
        Err(EmailError::Empty) => Some("Email is required".to_string()),
        Err(EmailError::InvalidFormat) => Some("Invalid email format".to_string()),
    }
}

/// Validate the required fields of a form payload.
///
/// Skills carry no rules; blank entries are filtered at submit time.
#[must_use]
pub fn validate(data: &UserFormData) -> FieldErrors {
    FieldErrors {
        first_name: validate_name(&data.first_name, "First name"),
        last_name: validate_name(&data.last_name, "Last name"),
        email: validate_email(&data.email),
    }
}
