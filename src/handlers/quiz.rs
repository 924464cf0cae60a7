// src/handlers/quiz.rs

use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;

use crate::{
    config::QUIZ_COMPLETION_POINTS,
    error::AppError,
    models::question::{DisplayQuestionRequest, SelectOptionRequest},
    services::quiz::QuizSession,
    state::AppState,
};

/// Current question, selection and navigation controls.
pub async fn get_quiz(State(state): State<AppState>) -> impl IntoResponse {
    let quiz = state.quiz.lock().await;
    Json(quiz.view())
}

pub async fn display_question(
    State(state): State<AppState>,
    Json(req): Json<DisplayQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut quiz = state.quiz.lock().await;
    quiz.display_question(req.index)?;
    Ok(Json(quiz.view()))
}

pub async fn select_option(
    State(state): State<AppState>,
    Json(req): Json<SelectOptionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut quiz = state.quiz.lock().await;
    quiz.select_option(req.question_index, req.option_index)?;
    Ok(Json(quiz.view()))
}

pub async fn previous_question(State(state): State<AppState>) -> impl IntoResponse {
    let mut quiz = state.quiz.lock().await;
    quiz.previous();
    Json(quiz.view())
}

pub async fn next_question(State(state): State<AppState>) -> impl IntoResponse {
    let mut quiz = state.quiz.lock().await;
    quiz.next();
    Json(quiz.view())
}

/// Scores the quiz.
///
/// * Unanswered questions count as wrong.
/// * A signed-in user earns a fixed number of eco points, which may unlock badges.
/// * The session accepts nothing further until it is restarted.
pub async fn submit_quiz(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let (score, total) = {
        let mut quiz = state.quiz.lock().await;
        (quiz.submit()?, quiz.len())
    };

    tracing::info!(score, total, "Quiz submitted");

    if state.session.current()?.is_none() {
        return Ok(Json(json!({
            "score": score,
            "total": total,
            "pointsAwarded": 0,
            "message": "Quiz completed!",
        })));
    }

    let (user, new_badges) = state
        .record_progress(|u| u.eco_points += QUIZ_COMPLETION_POINTS)
        .await?;

    Ok(Json(json!({
        "score": score,
        "total": total,
        "pointsAwarded": QUIZ_COMPLETION_POINTS,
        "message": format!("Quiz completed! You earned {} Eco Points!", QUIZ_COMPLETION_POINTS),
        "user": user,
        "newBadges": new_badges,
    })))
}

/// Starts over with a fresh session, as a page reload would.
pub async fn restart_quiz(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let fresh = QuizSession::new(state.questions.clone())?;
    let mut quiz = state.quiz.lock().await;
    *quiz = fresh;
    Ok(Json(quiz.view()))
}
