// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{
    services::{quiz::QuizError, remote::RemoteError, session::StorageError},
    utils::validation::FieldErrors,
};

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
/// Every message is a literal string meant for direct display in a toast.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // 500 Internal Server Error
    #[error("internal server error: {0}")]
    InternalServerError(String),

    // 400 Bad Request (missing preconditions, malformed input)
    #[error("{0}")]
    BadRequest(String),

    // 400 Bad Request with per-field verdicts
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(FieldErrors),

    // 401 Unauthorized
    #[error("{0}")]
    AuthError(String),

    // 404 Not Found
    #[error("{0}")]
    NotFound(String),

    // 409 Conflict (duplicate account, submission already in flight, quiz finished)
    #[error("{0}")]
    Conflict(String),
}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Something went wrong. Please try again." }),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::Validation(fields) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "Please correct the highlighted fields",
                    "focus": fields.first_invalid(),
                    "fields": fields,
                }),
            ),
            AppError::AuthError(msg) => (StatusCode::UNAUTHORIZED, json!({ "error": msg })),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, json!({ "error": msg })),
        };

        (status, Json(body)).into_response()
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}

impl From<RemoteError> for AppError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::InvalidCredentials => AppError::AuthError(err.to_string()),
            RemoteError::EmailTaken => AppError::Conflict(err.to_string()),
            RemoteError::Rejected(msg) => AppError::BadRequest(msg),
            RemoteError::Unavailable(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl From<QuizError> for AppError {
    fn from(err: QuizError) -> Self {
        match err {
            QuizError::AlreadySubmitted => AppError::Conflict(err.to_string()),
            QuizError::Empty => AppError::InternalServerError(err.to_string()),
            QuizError::QuestionOutOfRange(_) | QuizError::OptionOutOfRange { .. } => {
                AppError::BadRequest(err.to_string())
            }
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}
