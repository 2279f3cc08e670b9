use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::GameConfig,
    error::ApiError,
    game::{
        puzzle_rng, CrosswordGenerator, CrosswordPlay, CrosswordPuzzle, LetterGraph, PlayError,
        RadialLayout, WordConnectPlay, WordSearchGenerator, WordSearchPlay, WordSearchPuzzle,
    },
    models::CrosswordWord,
};

/// What a client asks for when starting a game
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameSetup {
    WordSearch {
        words: Vec<String>,
        size: Option<usize>,
        seed: Option<u64>,
    },
    Crossword {
        words: Vec<CrosswordWord>,
        size: Option<usize>,
        seed: Option<u64>,
    },
    WordConnect {
        words: Vec<String>,
    },
}

impl GameSetup {
    /// Validate against the configured limits and generate the board
    pub fn build(&self, config: &GameConfig) -> Result<PlayState, ApiError> {
        let state = match self {
            GameSetup::WordSearch { words, size, seed } => {
                let size = config.resolve_size(words.len(), *size, config.word_search_size)?;
                let puzzle = generate_word_search(config, words, size, *seed);
                PlayState::WordSearch(WordSearchPlay::new(puzzle))
            }
            GameSetup::Crossword { words, size, seed } => {
                let size = config.resolve_size(words.len(), *size, config.crossword_size)?;
                let puzzle = generate_crossword(config, words, size, *seed);
                PlayState::Crossword(CrosswordPlay::new(puzzle))
            }
            GameSetup::WordConnect { words } => {
                // The wheel has no grid; only the word limit applies
                config.resolve_size(words.len(), None, config.word_search_size)?;
                PlayState::WordConnect(WordConnectPlay::new(LetterGraph::build(
                    words,
                    RadialLayout::default(),
                )))
            }
        };
        Ok(state)
    }
}

pub fn generate_word_search(
    config: &GameConfig,
    words: &[String],
    size: usize,
    seed: Option<u64>,
) -> WordSearchPuzzle {
    let mut rng = puzzle_rng(seed);
    WordSearchGenerator::new(config.word_search_attempts).generate(words, size, &mut rng)
}

pub fn generate_crossword(
    config: &GameConfig,
    words: &[CrosswordWord],
    size: usize,
    seed: Option<u64>,
) -> CrosswordPuzzle {
    let mut rng = puzzle_rng(seed);
    CrosswordGenerator::new(
        config.crossword_intersect_attempts,
        config.crossword_random_attempts,
    )
    .generate(words, size, &mut rng)
}

#[derive(Debug, Clone)]
pub enum PlayState {
    WordSearch(WordSearchPlay),
    Crossword(CrosswordPlay),
    WordConnect(WordConnectPlay),
}

impl PlayState {
    pub fn kind(&self) -> &'static str {
        match self {
            PlayState::WordSearch(_) => "word_search",
            PlayState::Crossword(_) => "crossword",
            PlayState::WordConnect(_) => "word_connect",
        }
    }

    pub fn is_complete(&self) -> bool {
        match self {
            PlayState::WordSearch(play) => play.is_complete(),
            PlayState::Crossword(play) => play.is_complete(),
            PlayState::WordConnect(play) => play.is_complete(),
        }
    }

    pub fn board(&self) -> BoardSnapshot {
        match self {
            PlayState::WordSearch(play) => BoardSnapshot::WordSearch {
                puzzle: play.puzzle().clone(),
                found: play.found().iter().copied().collect(),
            },
            PlayState::Crossword(play) => BoardSnapshot::Crossword {
                puzzle: play.puzzle().clone(),
                inputs: play.inputs().to_vec(),
                completed: play.completed_ids().to_vec(),
            },
            PlayState::WordConnect(play) => BoardSnapshot::WordConnect {
                graph: play.graph().clone(),
                found: play.found().to_vec(),
            },
        }
    }

    pub fn word_search_mut(&mut self) -> Result<&mut WordSearchPlay, PlayError> {
        match self {
            PlayState::WordSearch(play) => Ok(play),
            other => Err(PlayError::WrongGame(other.kind())),
        }
    }

    pub fn crossword_mut(&mut self) -> Result<&mut CrosswordPlay, PlayError> {
        match self {
            PlayState::Crossword(play) => Ok(play),
            other => Err(PlayError::WrongGame(other.kind())),
        }
    }

    pub fn word_connect_mut(&mut self) -> Result<&mut WordConnectPlay, PlayError> {
        match self {
            PlayState::WordConnect(play) => Ok(play),
            other => Err(PlayError::WrongGame(other.kind())),
        }
    }
}

/// Serializable view of a board and its progress
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BoardSnapshot {
    WordSearch {
        puzzle: WordSearchPuzzle,
        found: Vec<usize>,
    },
    Crossword {
        puzzle: CrosswordPuzzle,
        inputs: Vec<Vec<Option<char>>>,
        completed: Vec<u32>,
    },
    WordConnect {
        graph: LetterGraph,
        found: Vec<String>,
    },
}

/// In-memory play session, discarded when idle for too long
#[derive(Debug)]
pub struct PlaySession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub last_active: Instant,
    pub state: PlayState,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub complete: bool,
    #[serde(flatten)]
    pub board: BoardSnapshot,
}

impl PlaySession {
    pub fn new(state: PlayState) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            last_active: Instant::now(),
            state,
        }
    }

    pub fn touch(&mut self) {
        self.last_active = Instant::now();
    }

    pub fn is_idle(&self, now: Instant, timeout: Duration) -> bool {
        now.duration_since(self.last_active) > timeout
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            created_at: self.created_at,
            complete: self.state.is_complete(),
            board: self.state.board(),
        }
    }
}
