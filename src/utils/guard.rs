// src/utils/guard.rs

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    config::{DASHBOARD_PATH, ENTRY_PATH},
    error::AppError,
    services::session::SessionStore,
};

/// Axum Middleware: protected pages.
///
/// Without a signed-in user, redirects to the entry page.
pub async fn require_user(
    State(session): State<SessionStore>,
    req: Request<Body>,
    next: Next,
) -> Response {
    match session.current() {
        Ok(Some(_)) => next.run(req).await,
        Ok(None) => {
            tracing::debug!(path = %req.uri().path(), "No session, redirecting to entry page");
            Redirect::to(ENTRY_PATH).into_response()
        }
        Err(e) => AppError::from(e).into_response(),
    }
}

/// Axum Middleware: login and signup pages.
///
/// With a signed-in user, forwards to the dashboard.
pub async fn redirect_signed_in(
    State(session): State<SessionStore>,
    req: Request<Body>,
    next: Next,
) -> Response {
    match session.current() {
        Ok(Some(_)) => Redirect::to(DASHBOARD_PATH).into_response(),
        Ok(None) => next.run(req).await,
        Err(e) => AppError::from(e).into_response(),
    }
}
