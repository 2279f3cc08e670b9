pub mod games;
pub mod health;
pub mod practice;
pub mod sessions;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api_routes())
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/catalog", get(games::catalog))
        .route("/games/word-search", post(games::word_search))
        .route("/games/crossword", post(games::crossword))
        .route("/games/word-connect", post(games::word_connect))
        .route("/practice/grade", post(practice::grade_practice))
        .route("/practice/explain", post(practice::explain))
        .route("/sessions", post(sessions::create_session))
        .route(
            "/sessions/{id}",
            get(sessions::get_session).delete(sessions::delete_session),
        )
        .route("/sessions/{id}/selection", post(sessions::submit_selection))
        .route("/sessions/{id}/letters", post(sessions::enter_letter))
        .route("/sessions/{id}/connect", post(sessions::connect_nodes))
}
