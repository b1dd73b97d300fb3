//! Field checks shared by the form controllers. Failures are collected per
//! field so every problem can be shown at once; the first failure on a field
//! wins.

use regex::Regex;
use std::fmt;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MIN_NAME_LEN: usize = 2;

pub const INVALID_EMAIL: &str = "Invalid email address";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 8 characters";
pub const PASSWORDS_DO_NOT_MATCH: &str = "Passwords don't match";
pub const NAME_TOO_SHORT: &str = "Must be at least 2 characters";
pub const TERMS_REQUIRED: &str = "You must accept the terms and conditions";
pub const ROLE_REQUIRED: &str = "Please select an account type";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `message` for `field` unless the field already failed.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        if self.get(field).is_none() {
            self.errors.push(FieldError {
                field,
                message: message.into(),
            });
        }
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// # Errors
    /// Returns `self` when any field failed.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, error) in self.errors.iter().enumerate() {
            if index > 0 {
                formatter.write_str("; ")?;
            }
            write!(formatter, "{}: {}", error.field, error.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Basic email format check.
#[must_use]
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email))
}

pub fn check_email(errors: &mut ValidationErrors, field: &'static str, value: &str) {
    if !valid_email(value.trim()) {
        errors.add(field, INVALID_EMAIL);
    }
}

pub fn check_min_chars(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
    min: usize,
    message: &str,
) {
    if value.chars().count() < min {
        errors.add(field, message);
    }
}

pub fn check_password(errors: &mut ValidationErrors, field: &'static str, value: &str) {
    check_min_chars(errors, field, value, MIN_PASSWORD_LEN, PASSWORD_TOO_SHORT);
}

/// Confirmation must itself be long enough and equal the password.
pub fn check_confirmation(
    errors: &mut ValidationErrors,
    field: &'static str,
    password: &str,
    confirmation: &str,
) {
    check_password(errors, field, confirmation);
    if password != confirmation {
        errors.add(field, PASSWORDS_DO_NOT_MATCH);
    }
}

pub fn check_name(errors: &mut ValidationErrors, field: &'static str, value: &str) {
    check_min_chars(errors, field, value.trim(), MIN_NAME_LEN, NAME_TOO_SHORT);
}
