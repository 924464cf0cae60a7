// src/state.rs

use std::sync::Arc;

use axum::extract::FromRef;
use tokio::{sync::Mutex, task::JoinHandle};

use crate::{
    config::Config,
    error::AppError,
    models::{
        badge::Badge,
        question::{QuizQuestion, default_questions},
        user::User,
    },
    services::{
        badges::BadgeEngine,
        dashboard::{DashboardProvider, DashboardView, SampleProvider},
        forms::FormControllers,
        quiz::QuizSession,
        remote::{RemoteService, SimulatedRemote},
        session::{FileStorage, MemoryStorage, SessionStore},
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub session: SessionStore,
    pub remote: Arc<dyn RemoteService>,
    pub provider: Arc<dyn DashboardProvider>,
    pub questions: Arc<[QuizQuestion]>,
    pub quiz: Arc<Mutex<QuizSession>>,
    pub badges: Arc<Mutex<BadgeEngine>>,
    pub dashboard: Arc<Mutex<DashboardView>>,
    pub forms: FormControllers,
}

impl AppState {
    pub fn new(
        config: Config,
        session: SessionStore,
        remote: Arc<dyn RemoteService>,
        provider: Arc<dyn DashboardProvider>,
        questions: Vec<QuizQuestion>,
    ) -> Result<Self, AppError> {
        let questions: Arc<[QuizQuestion]> = questions.into();
        let quiz = QuizSession::new(questions.clone())?;

        Ok(Self {
            config,
            session,
            remote,
            provider,
            questions,
            quiz: Arc::new(Mutex::new(quiz)),
            badges: Arc::new(Mutex::new(BadgeEngine::new())),
            dashboard: Arc::new(Mutex::new(DashboardView::new())),
            forms: FormControllers::new(),
        })
    }

    /// Durable sessions on disk, simulated remote calls, sample dashboard data.
    pub fn from_config(config: Config) -> Result<Self, AppError> {
        let durable = Arc::new(FileStorage::open(&config.data_dir)?);
        let session = SessionStore::new(durable, Arc::new(MemoryStorage::new()));
        let remote = Arc::new(SimulatedRemote::new(config.latency.clone()));
        Self::new(
            config,
            session,
            remote,
            Arc::new(SampleProvider),
            default_questions(),
        )
    }

    /// The signed-in user, or 401.
    pub fn current_user(&self) -> Result<User, AppError> {
        self.session
            .current()?
            .ok_or_else(|| AppError::AuthError("Please log in to continue".to_string()))
    }

    /// Applies `change` to the signed-in user's record and re-derives badges from
    /// the result, writing counters and badge ids back together.
    ///
    /// The read, the change and the write all happen under the badge lock, so
    /// concurrent submissions never lose each other's increments. Returns the
    /// badges earned by this change.
    pub async fn record_progress(
        &self,
        change: impl FnOnce(&mut User),
    ) -> Result<(User, Vec<Badge>), AppError> {
        let mut engine = self.badges.lock().await;
        let mut user = self.current_user()?;
        change(&mut user);
        let earned = engine.recompute(&user);
        user.badges = engine.earned_ids();
        self.session.update(&user)?;
        Ok((user, earned))
    }

    /// Drops per-user caches whenever a different user (or nobody) is signed in.
    pub fn spawn_session_listener(&self) -> JoinHandle<()> {
        let mut changes = self.session.subscribe();
        let session = self.session.clone();
        let badges = self.badges.clone();
        let dashboard = self.dashboard.clone();

        tokio::spawn(async move {
            let mut last_user = changes.borrow_and_update().as_ref().map(|u| u.id);
            while changes.changed().await.is_ok() {
                let current = changes.borrow_and_update().as_ref().map(|u| u.id);
                if current == last_user {
                    continue;
                }
                tracing::info!(from = ?last_user, to = ?current, "Session user changed");
                last_user = current;

                dashboard.lock().await.invalidate();

                // The session may have moved on while waiting for the lock.
                let mut engine = badges.lock().await;
                match session.current() {
                    Ok(user) => engine.release(user.map(|u| u.id)),
                    Err(e) => tracing::warn!("Could not read session: {}", e),
                }
            }
        })
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for SessionStore {
    fn from_ref(state: &AppState) -> Self {
        state.session.clone()
    }
}
