mod catalog;
mod config;
mod error;
mod game;
mod grading;
mod models;
mod routes;
mod utils;
mod websocket;

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::Result;
use axum::{routing::get, Router};
use catalog::Catalog;
use config::Config;
use dashmap::DashMap;
use game::PlaySession;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

/// How often the background task looks for idle sessions
pub const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Application state shared across all handlers
pub struct AppState {
    pub config: Config,
    pub catalog: Catalog,
    /// Live play sessions keyed by session id
    pub sessions: DashMap<Uuid, PlaySession>,
}

impl AppState {
    pub fn new(config: Config, catalog: Catalog) -> Self {
        Self {
            config,
            catalog,
            sessions: DashMap::new(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "study_tutor_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting study tutor backend server...");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Load sample catalog
    let catalog = match &config.game.catalog_path {
        Some(path) => match Catalog::load(path).await {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::warn!(
                    "Failed to load catalog from {}: {}. Using built-in samples.",
                    path,
                    e
                );
                Catalog::builtin()
            }
        },
        None => Catalog::builtin(),
    };
    if catalog.is_empty() {
        tracing::warn!("Catalog has no sample sets; /api/catalog will return an empty list");
    } else {
        tracing::info!("Catalog ready with {} sample sets", catalog.len());
    }

    let state = Arc::new(AppState::new(config.clone(), catalog));

    // Spawn background task to evict idle sessions
    let cleanup_state = state.clone();
    tokio::spawn(async move {
        session_cleanup_task(cleanup_state).await;
    });

    let app = build_router(state);

    // Start server
    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("WebSocket endpoint: ws://{}/ws", addr);
    tracing::info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the full application router
pub fn build_router(state: Arc<AppState>) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new()
        // WebSocket endpoint
        .route("/ws", get(websocket::handle_websocket))
        // API routes
        .merge(routes::create_routes());

    // Serve a built front end at the root when configured
    if let Some(dir) = &state.config.server.static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Remove sessions idle for longer than the timeout, returning how many went
fn sweep_idle_sessions(state: &AppState, now: Instant) -> usize {
    let timeout = state.config.session.idle_timeout();
    let before = state.sessions.len();
    state
        .sessions
        .retain(|id, session| {
            let idle = session.is_idle(now, timeout);
            if idle {
                tracing::info!("Removed idle {} session {}", session.state.kind(), id);
            }
            !idle
        });
    before.saturating_sub(state.sessions.len())
}

/// Background task that periodically evicts idle play sessions
async fn session_cleanup_task(state: Arc<AppState>) {
    let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);

    loop {
        interval.tick().await;

        let removed = sweep_idle_sessions(&state, Instant::now());
        if removed > 0 {
            tracing::debug!(
                "Session sweep removed {} idle sessions, {} remain",
                removed,
                state.sessions.len()
            );
        }
    }
}
