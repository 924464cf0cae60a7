// src/handlers/tasks.rs

use axum::{Json, extract::State, response::IntoResponse};

use crate::{
    error::AppError,
    handlers::Notice,
    models::task::{TaskInfo, TaskKind, TaskSubmission},
    state::AppState,
};

/// The tasks a user can pick from.
pub async fn list_tasks() -> impl IntoResponse {
    let catalog: Vec<TaskInfo> = TaskKind::ALL.into_iter().map(TaskInfo::from).collect();
    Json(catalog)
}

/// Submits proof of a completed task.
///
/// * Requires a signed-in user.
/// * Proof and notes are checked first; nothing changes if either is missing.
/// * On acceptance, points and the task count go up and badges are recomputed.
pub async fn submit_task(
    State(state): State<AppState>,
    Json(submission): Json<TaskSubmission>,
) -> Result<impl IntoResponse, AppError> {
    state.current_user()?;

    if let Some(message) = submission.missing_precondition() {
        return Err(AppError::BadRequest(message.to_string()));
    }

    let task_state = state.clone();
    let (user, new_badges, points) = state
        .forms
        .task
        .submit(async move {
            let receipt = task_state.remote.submit_task(submission).await?;
            let points = receipt.points_awarded;
            let (user, new_badges) = task_state
                .record_progress(|u| {
                    u.eco_points += points;
                    u.tasks_completed += 1;
                })
                .await?;
            Ok::<_, AppError>((user, new_badges, points))
        })
        .await?;

    tracing::info!(user = user.id, points, "Task accepted");

    Ok(Json(
        Notice::new(format!(
            "Task submitted successfully! You earned {} Eco Points!",
            points
        ))
        .user(user)
        .badges(new_badges),
    ))
}
