// src/main.rs

use dotenvy::dotenv;
use ecolearn::config::Config;
use ecolearn::routes;
use ecolearn::state::AppState;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file (if present)
    dotenv().ok();

    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    tracing::info!(
        data_dir = %config.data_dir.display(),
        static_dir = %config.static_dir.display(),
        "Starting EcoLearn"
    );

    let addr = config.addr;
    let state = AppState::from_config(config)?;

    match state.session.current() {
        Ok(Some(user)) => tracing::info!(user = user.id, "Restored saved session"),
        Ok(None) => tracing::info!("No saved session"),
        Err(e) => tracing::warn!("Could not read saved session: {}", e),
    }

    let _listener_task = state.spawn_session_listener();

    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
