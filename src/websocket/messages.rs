use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    game::{GameSetup, SessionSnapshot},
    models::Position,
};

/// What a drag event points at: a grid cell (word search) or a wheel node
/// (word connect)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DragTarget {
    Node { node: usize },
    Cell { row: usize, col: usize },
}

/// Messages sent from client to server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    StartGame {
        game: GameSetup,
    },
    ResumeGame {
        session_id: Uuid,
    },
    DragBegin {
        target: DragTarget,
    },
    DragExtend {
        target: DragTarget,
    },
    DragRelease,
    EnterLetter {
        row: usize,
        col: usize,
        value: String,
    },
    LeaveGame,
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    GameStarted {
        session: SessionSnapshot,
    },
    /// Word search cells currently under the drag
    Selection {
        cells: Vec<Position>,
    },
    /// Word connect nodes currently under the drag
    Trace {
        nodes: Vec<usize>,
        letters: String,
    },
    WordFound {
        word: String,
    },
    WordMissed {
        attempt: String,
    },
    CrosswordProgress {
        letter: Option<char>,
        completed: Vec<u32>,
    },
    GameComplete,
    GameLeft,
    Error {
        message: String,
    },
}
