// src/handlers/dashboard.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    response::{Html, IntoResponse},
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    error::AppError,
    models::{
        badge::BadgeCategory,
        leaderboard::{BadgeParams, LeaderboardParams},
    },
    services::dashboard::{
        OverviewStats, RenderContext, Section, SectionQuery, ranked_leaderboard, render_navbar,
    },
    state::AppState,
};

/// Query string accepted by the dashboard page.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardParams {
    pub filter: Option<String>,
    pub search: Option<String>,
    pub category: Option<String>,
}

fn parse_category(raw: Option<&str>) -> Result<Option<BadgeCategory>, AppError> {
    match raw {
        None | Some("all") | Some("") => Ok(None),
        Some(other) => BadgeCategory::parse(other)
            .map(Some)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown badge category '{}'", other))),
    }
}

async fn show_section(
    state: &AppState,
    section: Section,
    params: DashboardParams,
) -> Result<Html<String>, AppError> {
    let query = SectionQuery {
        search: params.search,
        category: parse_category(params.category.as_deref())?,
    };
    if let Some(filter) = params.filter.as_deref() {
        tracing::debug!(filter, "Leaderboard filter requested");
    }

    let (user, _) = state.record_progress(|_| {}).await?;
    let badges = state.badges.lock().await.badges().to_vec();

    let mut view = state.dashboard.lock().await;
    view.show(
        section,
        &RenderContext {
            user: &user,
            provider: state.provider.as_ref(),
            badges: &badges,
        },
        &query,
    );

    Ok(Html(format!(
        r#"<nav id="userNav">{}</nav><main class="dashboard">{}</main>"#,
        render_navbar(Some(&user)),
        view.render()
    )))
}

/// Dashboard landing: the overview section.
pub async fn overview(
    State(state): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> Result<impl IntoResponse, AppError> {
    show_section(&state, Section::Overview, params).await
}

/// Shows one dashboard section; only that section is refreshed.
pub async fn section(
    State(state): State<AppState>,
    Path(section): Path<String>,
    Query(params): Query<DashboardParams>,
) -> Result<impl IntoResponse, AppError> {
    let section = Section::parse(&section)
        .ok_or_else(|| AppError::NotFound(format!("Unknown section '{}'", section)))?;
    show_section(&state, section, params).await
}

/// Overview numbers plus a progress report for the signed-in user.
pub async fn stats(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let user = state.current_user()?;
    let stats = OverviewStats::collect(&user, state.provider.as_ref());
    Ok(Json(json!({
        "stats": stats,
        "report": {
            "totalTasks": user.tasks_completed,
            "totalPoints": user.eco_points,
            "badges": user.badges,
            "streak": user.streak,
            "joinDate": user.join_date,
        },
    })))
}

pub async fn leaderboard(
    State(state): State<AppState>,
    Query(params): Query<LeaderboardParams>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.current_user()?;
    let entries = ranked_leaderboard(state.provider.leaderboard(), params.search.as_deref());
    Ok(Json(json!({
        "filter": params.filter.unwrap_or_else(|| "all".to_string()),
        "entries": entries,
        "currentUserRank": state.provider.rank(&user),
    })))
}

pub async fn badges(
    State(state): State<AppState>,
    Query(params): Query<BadgeParams>,
) -> Result<impl IntoResponse, AppError> {
    let category = parse_category(params.category.as_deref())?;

    let (_, new_badges) = state.record_progress(|_| {}).await?;
    let engine = state.badges.lock().await;
    Ok(Json(json!({
        "badges": engine.by_category(category),
        "newBadges": new_badges,
    })))
}
