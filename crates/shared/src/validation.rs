//! Form rules checked before every create or update submission.
//!
//! Every rule is evaluated and every violation is reported, in rule order.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::domain::{FormField, FormValues, User};

/// Upper bound, in characters, for the first name and department fields.
pub const MAX_FIELD_CHARS: usize = 50;

pub const FIRST_NAME_REQUIRED: &str = "First Name is required.";
pub const EMAIL_REQUIRED: &str = "Email is required.";
pub const EMAIL_INVALID: &str = "Invalid email format.";
pub const FIELD_TOO_LONG: &str = "First Name and Department cannot exceed 50 characters.";
pub const EMAIL_DUPLICATE: &str = "A user with this email already exists.";

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}: {message}", field.id())]
pub struct FieldError {
    pub field: FormField,
    pub message: &'static str,
}

impl FieldError {
    fn new(field: FormField, message: &'static str) -> Self {
        Self { field, message }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Checks `values` against the form rules and the cached records.
///
/// `editing` is the cache index of the record being edited; that record is
/// excluded from the duplicate email check.
pub fn validate_form(
    values: &FormValues,
    existing: &[User],
    editing: Option<usize>,
) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    if values.first_name.is_empty() {
        errors.push(FieldError::new(FormField::FirstName, FIRST_NAME_REQUIRED));
    }

    if values.email.is_empty() {
        errors.push(FieldError::new(FormField::Email, EMAIL_REQUIRED));
    } else if !is_valid_email(&values.email) {
        errors.push(FieldError::new(FormField::Email, EMAIL_INVALID));
    }

    if values.first_name.chars().count() > MAX_FIELD_CHARS
        || values.department.chars().count() > MAX_FIELD_CHARS
    {
        errors.push(FieldError::new(FormField::FirstName, FIELD_TOO_LONG));
    }

    if !values.email.is_empty() && is_duplicate_email(&values.email, existing, editing) {
        errors.push(FieldError::new(FormField::Email, EMAIL_DUPLICATE));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_duplicate_email(email: &str, existing: &[User], editing: Option<usize>) -> bool {
    existing
        .iter()
        .enumerate()
        .any(|(index, user)| Some(index) != editing && user.email == email)
}
