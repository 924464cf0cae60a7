// src/handlers/pages.rs

use axum::{
    extract::State,
    response::{Html, IntoResponse},
};

use crate::{error::AppError, services::dashboard::render_navbar, state::AppState};

fn shell(title: &str, navbar: &str, main_id: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html><html lang="en"><head><meta charset="utf-8"><title>{title} | EcoLearn</title><link rel="stylesheet" href="/static/styles.css"></head><body><nav class="navbar">{navbar}</nav><main id="{main_id}"></main><script src="/static/{main_id}.js"></script></body></html>"#
    ))
}

/// Landing page with the quiz and the quick signup dialog.
pub async fn landing() -> impl IntoResponse {
    shell("Home", &render_navbar(None), "landing")
}

pub async fn login_page() -> impl IntoResponse {
    shell("Login", &render_navbar(None), "login")
}

pub async fn signup_page() -> impl IntoResponse {
    shell("Sign Up", &render_navbar(None), "signup")
}

pub async fn contact_page(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let user = state.session.current()?;
    Ok(shell("Contact", &render_navbar(user.as_ref()), "contact"))
}
