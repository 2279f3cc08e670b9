use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::{
    catalog::SampleSet,
    error::ApiError,
    game::{
        session::{generate_crossword, generate_word_search},
        CrosswordPuzzle, LetterGraph, RadialLayout, WordSearchPuzzle,
    },
    models::CrosswordWord,
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct WordSearchRequest {
    pub words: Vec<String>,
    pub size: Option<usize>,
    /// Fixed seed for a reproducible grid
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct CrosswordRequest {
    pub words: Vec<CrosswordWord>,
    pub size: Option<usize>,
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct WordConnectRequest {
    pub words: Vec<String>,
    pub layout: Option<RadialLayout>,
}

/// Bundled sample word lists
pub async fn catalog(State(state): State<Arc<AppState>>) -> Json<Vec<SampleSet>> {
    Json(state.catalog.samples().to_vec())
}

pub async fn word_search(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<WordSearchRequest>,
) -> Result<Json<WordSearchPuzzle>, ApiError> {
    let game = &state.config.game;
    let size = game.resolve_size(payload.words.len(), payload.size, game.word_search_size)?;

    let puzzle = generate_word_search(game, &payload.words, size, payload.seed);
    tracing::info!(
        "Generated {}x{} word search: {}/{} words placed",
        size,
        size,
        puzzle.placements.len(),
        payload.words.len()
    );

    Ok(Json(puzzle))
}

pub async fn crossword(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CrosswordRequest>,
) -> Result<Json<CrosswordPuzzle>, ApiError> {
    let game = &state.config.game;
    let size = game.resolve_size(payload.words.len(), payload.size, game.crossword_size)?;

    let puzzle = generate_crossword(game, &payload.words, size, payload.seed);
    tracing::info!(
        "Generated {}x{} crossword: {}/{} words placed",
        size,
        size,
        puzzle.placements.len(),
        payload.words.len()
    );

    Ok(Json(puzzle))
}

pub async fn word_connect(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<WordConnectRequest>,
) -> Result<Json<LetterGraph>, ApiError> {
    let game = &state.config.game;
    game.resolve_size(payload.words.len(), None, game.word_search_size)?;

    let graph = LetterGraph::build(&payload.words, payload.layout.unwrap_or_default());
    tracing::info!(
        "Built letter wheel with {} nodes for {} words",
        graph.nodes.len(),
        graph.words.len()
    );

    Ok(Json(graph))
}
