// src/handlers/auth.rs

use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;

use crate::{
    config::{
        DASHBOARD_PATH, ENTRY_PATH, LOGIN_PATH, LOGIN_REDIRECT_DELAY_MS,
        SIGNUP_REDIRECT_DELAY_MS,
    },
    error::AppError,
    handlers::Notice,
    models::user::{
        ForgotPasswordRequest, LoginRequest, PasswordStrengthRequest, QuickSignupRequest,
        SignupRequest,
    },
    services::session::Persistence,
    state::AppState,
    utils::validation::{FormSnapshot, is_valid_email, password_strength},
};

/// Signs a user in.
///
/// Every field is validated before the remote call. On success the user is stored
/// durably when `rememberMe` is set, for this run only otherwise.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.verdict().map_err(AppError::Validation)?;

    let persistence = if payload.remember_me {
        Persistence::Durable
    } else {
        Persistence::Tab
    };

    let task_state = state.clone();
    let user = state
        .forms
        .login
        .submit(async move {
            let user = task_state.remote.login(payload).await?;
            task_state.session.set(&user, persistence)?;
            // Badges are not announced at sign-in.
            let (user, _) = task_state.record_progress(|_| {}).await?;
            Ok::<_, AppError>(user)
        })
        .await
        .inspect_err(|e| tracing::info!("Login rejected: {}", e))?;

    tracing::info!(user = user.id, ?persistence, "User signed in");

    Ok(Json(
        Notice::new("Login successful! Redirecting...")
            .redirect(DASHBOARD_PATH, LOGIN_REDIRECT_DELAY_MS)
            .user(user),
    ))
}

/// Creates an account from the full signup page.
///
/// The new account is unverified; it is staged and the user is sent to log in.
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.verdict().map_err(AppError::Validation)?;

    let task_state = state.clone();
    let user = state
        .forms
        .signup
        .submit(async move {
            let user = task_state.remote.signup(payload).await?;
            task_state.session.stage_pending(&user)?;
            Ok::<_, AppError>(user)
        })
        .await?;

    tracing::info!(user = user.id, "Account created, awaiting verification");

    Ok(Json(
        Notice::new("Account created successfully! Please check your email for verification.")
            .redirect(LOGIN_PATH, SIGNUP_REDIRECT_DELAY_MS),
    ))
}

/// Creates an account from the landing page dialog and signs it in.
pub async fn quick_signup(
    State(state): State<AppState>,
    Json(payload): Json<QuickSignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.verdict().map_err(AppError::Validation)?;

    let task_state = state.clone();
    let user = state
        .forms
        .quick_signup
        .submit(async move {
            let user = task_state.remote.quick_signup(payload).await?;
            task_state.session.set(&user, Persistence::Tab)?;
            // Badges are not announced at sign-in.
            let (user, _) = task_state.record_progress(|_| {}).await?;
            Ok::<_, AppError>(user)
        })
        .await?;

    tracing::info!(user = user.id, "Account created and signed in");

    Ok(Json(
        Notice::new("Account created successfully! Welcome to EcoLearn!")
            .redirect(DASHBOARD_PATH, LOGIN_REDIRECT_DELAY_MS)
            .user(user),
    ))
}

pub async fn logout(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    state.session.clear()?;
    tracing::info!("User signed out");
    Ok(Json(Notice::new("You have been logged out.").redirect(ENTRY_PATH, 0)))
}

/// The signed-in user.
pub async fn me(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let user = state.current_user()?;
    let persistence = state.session.persistence()?;
    Ok(Json(json!({ "user": user, "persistence": persistence })))
}

/// Checks a signup form snapshot without submitting it.
/// Used on blur and on every keystroke of either password field.
pub async fn validate_signup(Json(payload): Json<SignupRequest>) -> impl IntoResponse {
    match payload.verdict() {
        Ok(()) => Json(json!({ "valid": true, "fields": [], "focus": null })),
        Err(fields) => Json(json!({
            "valid": false,
            "focus": fields.first_invalid(),
            "fields": fields,
        })),
    }
}

/// Strength meter for the password field. `null` hides the meter.
pub async fn strength(Json(payload): Json<PasswordStrengthRequest>) -> impl IntoResponse {
    Json(password_strength(&payload.password))
}

pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    let email = payload.email.trim().to_string();
    if !is_valid_email(&email) {
        return Err(AppError::BadRequest(
            "Please enter a valid email address.".to_string(),
        ));
    }

    state.remote.request_password_reset(email).await?;

    Ok(Json(Notice::new(
        "Password reset instructions have been sent to your email.",
    )))
}
