// src/handlers/forms.rs

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::{error::AppError, services::forms::FormKind, state::AppState};

/// Submit-button state of a form: enabled or busy, with its label.
pub async fn form_control(
    State(state): State<AppState>,
    Path(form): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let kind = FormKind::parse(&form)
        .ok_or_else(|| AppError::NotFound(format!("Unknown form '{}'", form)))?;
    Ok(Json(state.forms.get(kind).control()))
}
