use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Word search grid: every cell holds exactly one letter after generation
pub type LetterGrid = Vec<Vec<char>>;

/// Crossword grid: `None` marks a blocked cell
pub type CrosswordGrid = Vec<Vec<Option<char>>>;

/// The exact cells a word search word occupies, in reading order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WordPlacement {
    pub word: String,
    pub cells: Vec<Position>,
}

/// A clue-carrying crossword entry as supplied by the generation API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CrosswordWord {
    pub id: u32,
    pub word: String,
    #[serde(default)]
    pub clue: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Across,
    Down,
}

impl Orientation {
    /// Row/column step for one letter along this orientation
    pub fn step(self) -> (usize, usize) {
        match self {
            Orientation::Across => (0, 1),
            Orientation::Down => (1, 0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CrosswordPlacement {
    pub id: u32,
    pub word: String,
    pub row: usize,
    pub col: usize,
    pub direction: Orientation,
}

impl CrosswordPlacement {
    /// Cells covered by this placement, first letter first
    pub fn cells(&self) -> Vec<Position> {
        let (dr, dc) = self.direction.step();
        (0..self.word.chars().count())
            .map(|i| Position::new(self.row + dr * i, self.col + dc * i))
            .collect()
    }

    pub fn end(&self) -> Position {
        let len = self.word.chars().count();
        let (dr, dc) = self.direction.step();
        Position::new(
            self.row + dr * len.saturating_sub(1),
            self.col + dc * len.saturating_sub(1),
        )
    }
}

/// Border cue for the last cell of a placed crossword word
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EndMarker {
    pub row: usize,
    pub col: usize,
    /// An across word ends here
    pub right: bool,
    /// A down word ends here
    pub bottom: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct NodePosition {
    pub x: f64,
    pub y: f64,
}

/// One radial letter token of the word-connect wheel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LetterNode {
    pub index: usize,
    pub letter: char,
    pub position: NodePosition,
}
