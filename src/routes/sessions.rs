use std::{ops::DerefMut, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::ApiError,
    game::{
        word_search::DragSelection, GameSetup, PlaySession, SelectionValidator, SessionSnapshot,
    },
    models::{Position, WordPlacement},
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub game: GameSetup,
}

/// A word search selection: either the exact cells, or a drag from one
/// cell toward another
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SelectionRequest {
    Cells { cells: Vec<Position> },
    Drag { start: Position, end: Position },
}

#[derive(Debug, Deserialize)]
pub struct LetterRequest {
    pub row: usize,
    pub col: usize,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct ConnectRequest {
    pub nodes: Vec<usize>,
}

#[derive(Debug, Serialize)]
pub struct SelectionOutcome {
    pub cells: Vec<Position>,
    pub found: Option<WordPlacement>,
    pub found_words: Vec<String>,
    pub complete: bool,
}

#[derive(Debug, Serialize)]
pub struct LetterOutcome {
    pub letter: Option<char>,
    pub completed: Vec<u32>,
    pub complete: bool,
}

#[derive(Debug, Serialize)]
pub struct ConnectOutcome {
    pub found: Option<String>,
    pub found_words: Vec<String>,
    pub complete: bool,
}

fn session_mut(
    state: &AppState,
    id: Uuid,
) -> Result<impl DerefMut<Target = PlaySession> + '_, ApiError> {
    let mut session = state
        .sessions
        .get_mut(&id)
        .ok_or_else(|| ApiError::NotFound(format!("session {}", id)))?;
    session.touch();
    Ok(session)
}

pub async fn create_session(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionSnapshot>), ApiError> {
    let play = payload.game.build(&state.config.game)?;
    let session = PlaySession::new(play);
    let snapshot = session.snapshot();

    tracing::info!("Created {} session {}", session.state.kind(), session.id);
    state.sessions.insert(session.id, session);

    Ok((StatusCode::CREATED, Json(snapshot)))
}

pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let session = session_mut(&state, id)?;
    Ok(Json(session.snapshot()))
}

pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state
        .sessions
        .remove(&id)
        .ok_or_else(|| ApiError::NotFound(format!("session {}", id)))?;
    tracing::info!("Deleted session {}", id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn submit_selection(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SelectionRequest>,
) -> Result<Json<SelectionOutcome>, ApiError> {
    let mut session = session_mut(&state, id)?;
    let play = session.state.word_search_mut()?;
    let size = play.puzzle().size;

    let cells = match payload {
        SelectionRequest::Cells { cells } => cells,
        SelectionRequest::Drag { start, end } => {
            SelectionValidator::cells_in_bounds(size, &[start])?;
            let mut drag = DragSelection::begin(start, size);
            drag.extend(end);
            drag.into_cells()
        }
    };
    SelectionValidator::cells_in_bounds(size, &cells)?;
    SelectionValidator::straight_line(&cells)?;

    let found = play
        .submit(&cells)
        .and_then(|idx| play.puzzle().placements.get(idx).cloned());
    if let Some(placement) = &found {
        tracing::debug!("Session {}: found '{}'", id, placement.word);
    }

    Ok(Json(SelectionOutcome {
        cells,
        found,
        found_words: play.found_words(),
        complete: play.is_complete(),
    }))
}

pub async fn enter_letter(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<LetterRequest>,
) -> Result<Json<LetterOutcome>, ApiError> {
    let mut session = session_mut(&state, id)?;
    let play = session.state.crossword_mut()?;

    let letter = play.enter(Position::new(payload.row, payload.col), &payload.value)?;

    Ok(Json(LetterOutcome {
        letter,
        completed: play.completed_ids().to_vec(),
        complete: play.is_complete(),
    }))
}

pub async fn connect_nodes(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ConnectRequest>,
) -> Result<Json<ConnectOutcome>, ApiError> {
    let mut session = session_mut(&state, id)?;
    let play = session.state.word_connect_mut()?;

    let found = play.trace(&payload.nodes)?;
    if let Some(word) = &found {
        tracing::debug!("Session {}: connected '{}'", id, word);
    }

    Ok(Json(ConnectOutcome {
        found,
        found_words: play.found().to_vec(),
        complete: play.is_complete(),
    }))
}
