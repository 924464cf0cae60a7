// src/models/user.rs

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use validator::{Validate, ValidationErrors};

use crate::utils::validation::{
    FormSnapshot, confirmation_field, email_field, full_name_field, institution_field,
    login_password_field, quick_signup_password_field, role_field, signup_password_field,
    terms_field,
};

/// Role picked at signup. Unknown values are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Role {
    #[default]
    Student,
    Teacher,
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Student => "student",
            Role::Teacher => "teacher",
            Role::Other(other) => other,
        }
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        match value.trim() {
            "student" => Role::Student,
            "teacher" => Role::Teacher,
            other => Role::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Role::from(raw.as_str()))
    }
}

/// The signed-in user, as kept in the session store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    #[serde(default)]
    pub eco_points: u32,
    #[serde(default)]
    pub tasks_completed: u32,
    #[serde(default)]
    pub streak: u32,
    /// Earned badge ids. Rewritten from the badge engine together with the counters.
    #[serde(default)]
    pub badges: BTreeSet<String>,
    pub join_date: DateTime<Utc>,
    #[serde(default = "verified_by_default")]
    pub email_verified: bool,
}

fn verified_by_default() -> bool {
    true
}

impl User {
    pub fn new(id: i64, name: &str, email: &str, role: Role) -> Self {
        Self {
            id,
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            role,
            institution: None,
            eco_points: 0,
            tasks_completed: 0,
            streak: 0,
            badges: BTreeSet::new(),
            join_date: Utc::now(),
            email_verified: true,
        }
    }
}

/// DTO for user login.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(custom(function = email_field))]
    pub email: String,
    #[validate(custom(function = login_password_field))]
    pub password: String,
    /// Keep the session across restarts instead of only for this run.
    #[serde(default)]
    pub remember_me: bool,
}

impl FormSnapshot for LoginRequest {
    const FIELD_ORDER: &'static [(&'static str, &'static str)] =
        &[("email", "email"), ("password", "password")];
}

/// DTO for the full signup page.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(custom(function = full_name_field))]
    pub full_name: String,
    #[validate(custom(function = email_field))]
    pub email: String,
    #[validate(custom(function = signup_password_field))]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
    #[validate(custom(function = role_field))]
    #[serde(default)]
    pub user_type: String,
    #[validate(custom(function = institution_field))]
    #[serde(default)]
    pub institution: String,
    #[validate(custom(function = terms_field))]
    #[serde(default)]
    pub agree_terms: bool,
    #[serde(default)]
    pub email_updates: bool,
}

impl FormSnapshot for SignupRequest {
    const FIELD_ORDER: &'static [(&'static str, &'static str)] = &[
        ("full_name", "fullName"),
        ("email", "email"),
        ("password", "password"),
        ("confirm_password", "confirmPassword"),
        ("user_type", "userType"),
        ("institution", "institution"),
        ("agree_terms", "agreeTerms"),
    ];

    fn cross_field(&self, errors: &mut ValidationErrors) {
        if let Err(e) = confirmation_field(&self.password, &self.confirm_password) {
            errors.add("confirm_password", e);
        }
    }
}

/// DTO for the quick signup dialog on the landing page.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuickSignupRequest {
    #[validate(custom(function = full_name_field))]
    pub name: String,
    #[validate(custom(function = email_field))]
    pub email: String,
    #[validate(custom(function = role_field))]
    #[serde(default)]
    pub role: String,
    #[validate(custom(function = quick_signup_password_field))]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

impl FormSnapshot for QuickSignupRequest {
    const FIELD_ORDER: &'static [(&'static str, &'static str)] = &[
        ("name", "signupName"),
        ("email", "signupEmail"),
        ("role", "signupRole"),
        ("password", "signupPassword"),
        ("confirm_password", "signupConfirmPassword"),
    ];

    fn cross_field(&self, errors: &mut ValidationErrors) {
        if let Err(e) = confirmation_field(&self.password, &self.confirm_password) {
            errors.add("confirm_password", e);
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordStrengthRequest {
    pub password: String,
}
