// src/handlers/contact.rs

use axum::{Json, extract::State, response::IntoResponse};

use crate::{
    error::AppError, handlers::Notice, models::contact::ContactRequest, state::AppState,
    utils::validation::FormSnapshot,
};

/// Sends the contact form. All fields are checked first; the response names the
/// first invalid one so the page can focus it.
pub async fn send_message(
    State(state): State<AppState>,
    Json(payload): Json<ContactRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.verdict().map_err(AppError::Validation)?;

    let task_state = state.clone();
    state
        .forms
        .contact
        .submit(async move {
            task_state.remote.send_contact(payload).await?;
            Ok::<_, AppError>(())
        })
        .await?;

    Ok(Json(Notice::new(
        "Thank you! Your message has been sent successfully.",
    )))
}
