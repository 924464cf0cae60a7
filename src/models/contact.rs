// src/models/contact.rs

use serde::Deserialize;
use validator::Validate;

use crate::utils::validation::{FormSnapshot, email_field, required_field};

/// DTO for the contact form.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    #[validate(custom(function = required_field))]
    pub first_name: String,
    #[validate(custom(function = required_field))]
    pub last_name: String,
    #[validate(custom(function = email_field))]
    pub email: String,
    /// Optional; formatting is left to the page.
    #[serde(default)]
    pub phone: Option<String>,
    #[validate(custom(function = required_field))]
    pub subject: String,
    #[validate(custom(function = required_field))]
    pub message: String,
}

impl FormSnapshot for ContactRequest {
    const FIELD_ORDER: &'static [(&'static str, &'static str)] = &[
        ("first_name", "firstName"),
        ("last_name", "lastName"),
        ("email", "email"),
        ("subject", "subject"),
        ("message", "message"),
    ];
}
