// src/handlers/mod.rs

use serde::Serialize;

use crate::{
    models::{badge::Badge, user::User},
    services::forms::Redirect,
};

pub mod auth;
pub mod contact;
pub mod dashboard;
pub mod forms;
pub mod pages;
pub mod quiz;
pub mod tasks;

/// Body returned by every successful submission: the toast text plus whatever the
/// page should do next.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<Redirect>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    /// Badges to announce, one notification each.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub new_badges: Vec<Badge>,
}

impl Notice {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            redirect: None,
            user: None,
            new_badges: Vec::new(),
        }
    }

    pub fn redirect(mut self, to: &'static str, after_ms: u64) -> Self {
        self.redirect = Some(Redirect { to, after_ms });
        self
    }

    pub fn user(mut self, user: User) -> Self {
        self.user = Some(user);
        self
    }

    pub fn badges(mut self, badges: Vec<Badge>) -> Self {
        self.new_badges = badges;
        self
    }
}
