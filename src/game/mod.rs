// Puzzle engines and live play state

pub mod crossword;
pub mod error;
pub mod session;
pub mod validator;
pub mod word_connect;
pub mod word_search;

use rand::{rngs::StdRng, SeedableRng};

pub use crossword::{CrosswordGenerator, CrosswordPlay, CrosswordPuzzle};
pub use error::PlayError;
pub use session::{GameSetup, PlaySession, PlayState, SessionSnapshot};
pub use validator::SelectionValidator;
pub use word_connect::{LetterGraph, RadialLayout, WordConnectPlay};
pub use word_search::{WordSearchGenerator, WordSearchPlay, WordSearchPuzzle};

/// Randomness for one puzzle: reproducible when seeded, fresh entropy otherwise
pub fn puzzle_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}
