// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{
    handlers::{auth, contact, dashboard, forms, pages, quiz, tasks},
    state::AppState,
    utils::guard::{redirect_signed_in, require_user},
};

/// Assembles the main application router.
///
/// * Pages: landing, login and signup (bounced to the dashboard when signed in),
///   contact, and the guarded dashboard.
/// * JSON API under `/api`.
/// * Static assets under `/static`.
pub fn create_router(state: AppState) -> Router {
    let origins = [
        HeaderValue::from_static("http://localhost:3000"),
        HeaderValue::from_static("http://127.0.0.1:3000"),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/signup", post(auth::signup))
        .route("/signup/validate", post(auth::validate_signup))
        .route("/quick-signup", post(auth::quick_signup))
        .route("/password-strength", post(auth::strength))
        .route("/forgot-password", post(auth::forgot_password))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me));

    let quiz_routes = Router::new()
        .route("/", get(quiz::get_quiz))
        .route("/display", post(quiz::display_question))
        .route("/select", post(quiz::select_option))
        .route("/previous", post(quiz::previous_question))
        .route("/next", post(quiz::next_question))
        .route("/submit", post(quiz::submit_quiz))
        .route("/restart", post(quiz::restart_quiz));

    let task_routes = Router::new()
        .route("/", get(tasks::list_tasks))
        .route("/submit", post(tasks::submit_task));

    let dashboard_api = Router::new()
        .route("/stats", get(dashboard::stats))
        .route("/leaderboard", get(dashboard::leaderboard))
        .route("/badges", get(dashboard::badges));

    let api = Router::new()
        .nest("/auth", auth_routes)
        .nest("/quiz", quiz_routes)
        .nest("/tasks", task_routes)
        .nest("/dashboard", dashboard_api)
        .route("/forms/{kind}", get(forms::form_control))
        .route("/contact", post(contact::send_message));

    let guest_pages = Router::new()
        .route("/", get(pages::landing))
        .route("/login", get(pages::login_page))
        .route("/signup", get(pages::signup_page))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            redirect_signed_in,
        ));

    let member_pages = Router::new()
        .route("/dashboard", get(dashboard::overview))
        .route("/dashboard/{section}", get(dashboard::section))
        .layer(middleware::from_fn_with_state(state.clone(), require_user));

    let static_dir = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/contact", get(pages::contact_page))
        .merge(guest_pages)
        .merge(member_pages)
        .nest("/api", api)
        .nest_service("/static", static_dir)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
