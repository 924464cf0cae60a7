// src/services/dashboard.rs

//! Dashboard sections and the data they are drawn from.
//!
//! Exactly one section is visible. Showing a section re-renders that section only;
//! the others keep whatever they last rendered until shown again.

use std::collections::HashMap;
use std::fmt::Write;

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    models::{
        badge::Badge,
        leaderboard::LeaderboardEntry,
        task::{RecentTask, TaskStatus},
        user::User,
    },
    utils::html::escape,
};

pub const MODULES_TOTAL: u32 = 10;
pub const TASKS_TOTAL: u32 = 20;
pub const QUIZZES_TOTAL: u32 = 15;

/// Source of everything on the dashboard that is not the user record itself.
pub trait DashboardProvider: Send + Sync {
    fn leaderboard(&self) -> Vec<LeaderboardEntry>;
    fn recent_tasks(&self, user: &User) -> Vec<RecentTask>;
    /// 1-based position of `user` among all learners.
    fn rank(&self, user: &User) -> u32;
    fn modules_completed(&self, user: &User) -> u32;
    fn quizzes_completed(&self, user: &User) -> u32;
}

/// Fixed sample data.
#[derive(Debug, Clone, Default)]
pub struct SampleProvider;

impl DashboardProvider for SampleProvider {
    fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        vec![
            LeaderboardEntry::new("Alex Chen", "Green Valley High", 1250),
            LeaderboardEntry::new("Sarah Johnson", "Eco Academy", 1180),
            LeaderboardEntry::new("Mike Rodriguez", "Nature's Edge School", 1150),
            LeaderboardEntry::new("Emma Thompson", "Sustainable Studies", 1100),
            LeaderboardEntry::new("David Kim", "Environmental High", 1050),
        ]
    }

    fn recent_tasks(&self, _user: &User) -> Vec<RecentTask> {
        let day = |m, d| NaiveDate::from_ymd_opt(2024, m, d).unwrap_or_default();
        vec![
            RecentTask {
                name: "Plant a Tree".into(),
                date: day(1, 15),
                status: TaskStatus::Approved,
                points: 50,
            },
            RecentTask {
                name: "Waste Segregation".into(),
                date: day(1, 10),
                status: TaskStatus::Pending,
                points: 30,
            },
            RecentTask {
                name: "Energy Conservation".into(),
                date: day(1, 8),
                status: TaskStatus::Approved,
                points: 40,
            },
        ]
    }

    fn rank(&self, user: &User) -> u32 {
        let ahead = self
            .leaderboard()
            .iter()
            .filter(|entry| entry.points > user.eco_points)
            .count();
        ahead as u32 + 1
    }

    fn modules_completed(&self, _user: &User) -> u32 {
        0
    }

    fn quizzes_completed(&self, _user: &User) -> u32 {
        0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Overview,
    Leaderboard,
    Achievements,
    Tasks,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Overview,
        Section::Leaderboard,
        Section::Achievements,
        Section::Tasks,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "overview" | "dashboard" => Some(Self::Overview),
            "leaderboard" => Some(Self::Leaderboard),
            "achievements" => Some(Self::Achievements),
            "tasks" => Some(Self::Tasks),
            _ => None,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Section::Overview => "overview",
            Section::Leaderboard => "leaderboard",
            Section::Achievements => "achievements",
            Section::Tasks => "tasks",
        }
    }
}

/// Counter-based progress values shown on the overview.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewStats {
    pub name: String,
    pub eco_points: u32,
    pub tasks_completed: u32,
    pub badges_earned: usize,
    pub rank: u32,
    pub streak: u32,
    pub modules_completed: u32,
    pub modules_percent: u32,
    pub tasks_percent: u32,
    pub quizzes_completed: u32,
    pub quizzes_percent: u32,
}

/// Share of `total`, in percent, capped at 100.
pub fn percent(done: u32, total: u32) -> u32 {
    if total == 0 {
        return 100;
    }
    (done.saturating_mul(100) / total).min(100)
}

impl OverviewStats {
    pub fn collect(user: &User, provider: &dyn DashboardProvider) -> Self {
        let modules = provider.modules_completed(user);
        let quizzes = provider.quizzes_completed(user);
        Self {
            name: user.name.clone(),
            eco_points: user.eco_points,
            tasks_completed: user.tasks_completed,
            badges_earned: user.badges.len(),
            rank: provider.rank(user),
            streak: user.streak,
            modules_completed: modules,
            modules_percent: percent(modules, MODULES_TOTAL),
            tasks_percent: percent(user.tasks_completed, TASKS_TOTAL),
            quizzes_completed: quizzes,
            quizzes_percent: percent(quizzes, QUIZZES_TOTAL),
        }
    }
}

/// Sorted by points, highest first, then narrowed by `search`.
pub fn ranked_leaderboard(mut entries: Vec<LeaderboardEntry>, search: Option<&str>) -> Vec<LeaderboardEntry> {
    entries.sort_by(|a, b| b.points.cmp(&a.points));
    match search.map(str::trim).filter(|q| !q.is_empty()) {
        Some(query) => entries.into_iter().filter(|e| e.matches(query)).collect(),
        None => entries,
    }
}

pub fn render_navbar(user: Option<&User>) -> String {
    match user {
        Some(user) => format!(
            r#"<div class="dropdown"><button class="btn btn-success dropdown-toggle" type="button" data-bs-toggle="dropdown">{} ({} pts)</button><ul class="dropdown-menu"><li><a class="dropdown-item" href="/dashboard">Dashboard</a></li><li><a class="dropdown-item" href="/api/auth/logout" data-method="post">Logout</a></li></ul></div>"#,
            escape(&user.name),
            user.eco_points
        ),
        None => r#"<a class="btn btn-outline-success" href="/login">Login</a> <a class="btn btn-success" href="/signup">Sign Up</a>"#.to_string(),
    }
}

pub fn render_overview(stats: &OverviewStats) -> String {
    format!(
        r#"<div class="welcome"><h2>Welcome back, <span id="userName">{name}</span>!</h2></div>
<div class="stats"><span id="userPoints">{points}</span><span id="tasksCompleted">{tasks}</span><span id="userBadges">{badges}</span><span id="userRank">#{rank}</span><span id="currentStreak">{streak}</span></div>
<div class="progress-list">
<div class="progress-item"><span id="modulesCompleted">{modules}</span>/{modules_total}<div class="progress-bar" id="modulesProgress" style="width: {modules_pct}%"></div></div>
<div class="progress-item"><span id="tasksProgressCount">{tasks}</span>/{tasks_total}<div class="progress-bar" id="tasksProgress" style="width: {tasks_pct}%"></div></div>
<div class="progress-item"><span id="quizzesCompleted">{quizzes}</span>/{quizzes_total}<div class="progress-bar" id="quizzesProgress" style="width: {quizzes_pct}%"></div></div>
</div>"#,
        name = escape(&stats.name),
        points = stats.eco_points,
        tasks = stats.tasks_completed,
        badges = stats.badges_earned,
        rank = stats.rank,
        streak = stats.streak,
        modules = stats.modules_completed,
        modules_total = MODULES_TOTAL,
        modules_pct = stats.modules_percent,
        tasks_total = TASKS_TOTAL,
        tasks_pct = stats.tasks_percent,
        quizzes = stats.quizzes_completed,
        quizzes_total = QUIZZES_TOTAL,
        quizzes_pct = stats.quizzes_percent,
    )
}

pub fn render_leaderboard(entries: &[LeaderboardEntry], user: &User, rank: u32) -> String {
    let mut html = format!(
        r#"<div class="leaderboard-me">Your rank: <span id="currentUserRank">{rank}</span> &middot; <span id="leaderboardPoints">{}</span> pts</div><div id="leaderboardList">"#,
        user.eco_points
    );
    if entries.is_empty() {
        html.push_str(r#"<div class="text-center text-muted p-4">No users found matching your search.</div>"#);
    }
    for (index, entry) in entries.iter().enumerate() {
        let _ = write!(
            html,
            r#"<div class="leaderboard-item"><div class="leaderboard-rank">#{}</div><div class="leaderboard-avatar">{}</div><div class="leaderboard-info"><div class="leaderboard-name">{}</div><div class="leaderboard-school">{}</div></div><div class="leaderboard-points">{}</div></div>"#,
            index + 1,
            escape(&entry.avatar),
            escape(&entry.name),
            escape(&entry.school),
            entry.points
        );
    }
    html.push_str("</div>");
    html
}

pub fn render_badges(badges: &[Badge]) -> String {
    let mut html = String::from(r#"<div class="row" id="badgesContainer">"#);
    for badge in badges {
        let state = if badge.earned { "earned" } else { "locked" };
        let _ = write!(
            html,
            r#"<div class="col-lg-4 col-md-6 mb-4"><div class="badge-card {state}" data-badge="{id}"><div class="badge-icon {state}"><i class="{icon}"></i></div><div class="badge-title">{title}</div><div class="badge-description">{description}</div><div class="badge-progress"><div class="badge-progress-bar" style="width: {pct}%"></div></div><div class="badge-requirement">{requirement}</div></div></div>"#,
            id = badge.id,
            icon = badge.icon,
            title = escape(badge.title),
            description = escape(badge.description),
            pct = badge.percent(),
            requirement = escape(badge.requirement),
        );
    }
    html.push_str("</div>");
    html
}

pub fn render_recent_tasks(tasks: &[RecentTask]) -> String {
    let mut html = String::from(r#"<table class="table"><tbody id="recentTasks">"#);
    if tasks.is_empty() {
        html.push_str(r#"<tr><td colspan="4" class="text-center text-muted">No tasks submitted yet</td></tr>"#);
    }
    for task in tasks {
        let points = match task.status {
            TaskStatus::Approved => format!("+{}", task.points),
            _ => "-".to_string(),
        };
        let _ = write!(
            html,
            r#"<tr><td>{}</td><td>{}</td><td><span class="status-badge {}">{}</span></td><td>{}</td></tr>"#,
            escape(&task.name),
            task.date.format("%-m/%-d/%Y"),
            task.status.css_class(),
            task.status.label(),
            points
        );
    }
    html.push_str("</tbody></table>");
    html
}

/// Per-request inputs for refreshing a section.
#[derive(Debug, Default, Clone)]
pub struct SectionQuery {
    pub search: Option<String>,
    pub category: Option<crate::models::badge::BadgeCategory>,
}

/// Everything a section refresh reads.
pub struct RenderContext<'a> {
    pub user: &'a User,
    pub provider: &'a dyn DashboardProvider,
    pub badges: &'a [Badge],
}

/// The dashboard as currently displayed.
#[derive(Debug, Default)]
pub struct DashboardView {
    visible: Option<Section>,
    fragments: HashMap<Section, String>,
}

impl DashboardView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visible(&self) -> Section {
        self.visible.unwrap_or(Section::Overview)
    }

    pub fn fragment(&self, section: Section) -> Option<&str> {
        self.fragments.get(&section).map(String::as_str)
    }

    /// Makes `section` the visible one and refreshes its content only.
    pub fn show(&mut self, section: Section, ctx: &RenderContext<'_>, query: &SectionQuery) {
        let html = match section {
            Section::Overview => {
                render_overview(&OverviewStats::collect(ctx.user, ctx.provider))
            }
            Section::Leaderboard => {
                let entries = ranked_leaderboard(ctx.provider.leaderboard(), query.search.as_deref());
                render_leaderboard(&entries, ctx.user, ctx.provider.rank(ctx.user))
            }
            Section::Achievements => {
                let shown: Vec<Badge> = ctx
                    .badges
                    .iter()
                    .filter(|b| query.category.is_none_or(|c| b.category == c))
                    .cloned()
                    .collect();
                render_badges(&shown)
            }
            Section::Tasks => render_recent_tasks(&ctx.provider.recent_tasks(ctx.user)),
        };
        tracing::debug!(section = section.id(), "Dashboard section refreshed");
        self.fragments.insert(section, html);
        self.visible = Some(section);
    }

    /// Drops all rendered content, e.g. after the user changes.
    pub fn invalidate(&mut self) {
        self.visible = None;
        self.fragments.clear();
    }

    /// All four sections; hidden ones keep their last content.
    pub fn render(&self) -> String {
        let visible = self.visible();
        let mut html = String::new();
        for section in Section::ALL {
            let style = if section == visible {
                "display: block"
            } else {
                "display: none"
            };
            let _ = write!(
                html,
                r#"<section id="{}" class="dashboard-section" style="{}">{}</section>"#,
                section.id(),
                style,
                self.fragment(section).unwrap_or_default()
            );
        }
        html
    }
}
