// src/utils/validation.rs

//! Field checks shared by every form.
//!
//! The `is_*` helpers are plain predicates. The `*_field` functions wrap them as
//! `validator` custom validators carrying the exact message shown next to the field.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::config::{QUICK_SIGNUP_MIN_PASSWORD_LEN, SIGNUP_MIN_PASSWORD_LEN};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Non-empty after trimming whitespace.
pub fn is_present(value: &str) -> bool {
    !value.trim().is_empty()
}

pub fn meets_min_len(password: &str, min: usize) -> bool {
    password.chars().count() >= min
}

pub fn passwords_match(password: &str, confirmation: &str) -> bool {
    password == confirmation
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StrengthLevel {
    Weak,
    Medium,
    Strong,
}

/// What the strength meter under the password field shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasswordStrength {
    pub strength: StrengthLevel,
    /// Meter fill, in percent.
    pub width: u8,
    pub color: &'static str,
}

/// Buckets a password by length and character-class mix.
/// Returns `None` for an empty password, in which case the meter is hidden.
pub fn password_strength(password: &str) -> Option<PasswordStrength> {
    if password.is_empty() {
        return None;
    }

    let checks = [
        meets_min_len(password, SIGNUP_MIN_PASSWORD_LEN),
        password.chars().any(|c| c.is_lowercase()),
        password.chars().any(|c| c.is_uppercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| !c.is_alphanumeric()),
    ];
    let score = checks.iter().filter(|passed| **passed).count();

    let meter = match score {
        0..=2 => PasswordStrength {
            strength: StrengthLevel::Weak,
            width: 33,
            color: "#dc3545",
        },
        3..=4 => PasswordStrength {
            strength: StrengthLevel::Medium,
            width: 66,
            color: "#ffc107",
        },
        _ => PasswordStrength {
            strength: StrengthLevel::Strong,
            width: 100,
            color: "#28a745",
        },
    };
    Some(meter)
}

fn failure(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

pub fn email_field(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        Err(failure("required", "Email is required"))
    } else if !is_valid_email(value) {
        Err(failure("email", "Please enter a valid email address"))
    } else {
        Ok(())
    }
}

/// Login only checks that something was typed; the password is not trimmed.
pub fn login_password_field(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        Err(failure("required", "Password is required"))
    } else {
        Ok(())
    }
}

pub fn signup_password_field(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        Err(failure("required", "Password is required"))
    } else if !meets_min_len(value, SIGNUP_MIN_PASSWORD_LEN) {
        Err(failure("length", "Password must be at least 8 characters long"))
    } else {
        Ok(())
    }
}

pub fn quick_signup_password_field(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        Err(failure("required", "Password is required"))
    } else if !meets_min_len(value, QUICK_SIGNUP_MIN_PASSWORD_LEN) {
        Err(failure("length", "Password must be at least 6 characters long!"))
    } else {
        Ok(())
    }
}

pub fn full_name_field(value: &str) -> Result<(), ValidationError> {
    if value.trim().chars().count() < 2 {
        Err(failure(
            "length",
            "Please enter your full name (at least 2 characters)",
        ))
    } else {
        Ok(())
    }
}

pub fn institution_field(value: &str) -> Result<(), ValidationError> {
    if value.trim().chars().count() < 2 {
        Err(failure("length", "Please enter your institution name"))
    } else {
        Ok(())
    }
}

pub fn role_field(value: &str) -> Result<(), ValidationError> {
    if is_present(value) {
        Ok(())
    } else {
        Err(failure("required", "Please select your role"))
    }
}

pub fn terms_field(accepted: &bool) -> Result<(), ValidationError> {
    if *accepted {
        Ok(())
    } else {
        Err(failure(
            "terms",
            "You must agree to the terms and conditions",
        ))
    }
}

/// Generic "this field is required" check used by the contact form.
pub fn required_field(value: &str) -> Result<(), ValidationError> {
    if is_present(value) {
        Ok(())
    } else {
        Err(failure("required", "This field is required"))
    }
}

/// Re-checked whenever either password field changes.
pub fn confirmation_field(password: &str, confirmation: &str) -> Result<(), ValidationError> {
    if confirmation.is_empty() {
        Err(failure("required", "Please confirm your password"))
    } else if !passwords_match(password, confirmation) {
        Err(failure("mismatch", "Passwords do not match"))
    } else {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Per-field verdicts in the form's declared field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    /// Orders `errors` by `order`, keeping the first message reported per field.
    /// `order` pairs each struct field with the element id the page uses for it.
    pub fn from_validation(
        errors: &ValidationErrors,
        order: &[(&'static str, &'static str)],
    ) -> Self {
        let by_field = errors.field_errors();
        let list = order
            .iter()
            .filter_map(|(field, element_id)| {
                let reported = by_field.get(*field).or_else(|| by_field.get(*element_id))?;
                let first = reported.first()?;
                let message = first
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| first.code.to_string());
                Some(FieldError {
                    field: *element_id,
                    message,
                })
            })
            .collect();
        Self(list)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The field the form should focus.
    pub fn first_invalid(&self) -> Option<&'static str> {
        self.0.first().map(|e| e.field)
    }

    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }
}

/// A form whose fields are all checked together before anything is sent.
pub trait FormSnapshot: Validate {
    /// `(struct field, element id)` in page order; decides which field receives focus.
    const FIELD_ORDER: &'static [(&'static str, &'static str)];

    /// Checks spanning more than one field.
    fn cross_field(&self, _errors: &mut ValidationErrors) {}

    /// Runs every check. Never stops at the first failure.
    fn verdict(&self) -> Result<(), FieldErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };
        self.cross_field(&mut errors);

        let fields = FieldErrors::from_validation(&errors, Self::FIELD_ORDER);
        if fields.is_empty() { Ok(()) } else { Err(fields) }
    }
}
