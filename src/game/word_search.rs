use std::{collections::BTreeSet, ops::RangeInclusive};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    models::{LetterGrid, Position, WordPlacement},
    utils::letters::{puzzle_word, random_letter},
};

/// Placement trials per word before it is dropped
pub const DEFAULT_PLACEMENT_ATTEMPTS: usize = 300;

/// The eight compass steps as (row, col) deltas
pub const DIRECTIONS: [(isize, isize); 8] = [
    (0, 1),   // E
    (0, -1),  // W
    (1, 0),   // S
    (-1, 0),  // N
    (1, 1),   // SE
    (1, -1),  // SW
    (-1, 1),  // NE
    (-1, -1), // NW
];

/// A filled word search grid and where each placed word lives in it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordSearchPuzzle {
    pub size: usize,
    pub grid: LetterGrid,
    pub placements: Vec<WordPlacement>,
}

impl WordSearchPuzzle {
    pub fn letter_at(&self, pos: Position) -> Option<char> {
        self.grid.get(pos.row)?.get(pos.col).copied()
    }

    /// Read the letters under a path of cells
    pub fn read_path(&self, cells: &[Position]) -> String {
        cells.iter().filter_map(|pos| self.letter_at(*pos)).collect()
    }
}

pub struct WordSearchGenerator {
    attempts: usize,
}

impl Default for WordSearchGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_PLACEMENT_ATTEMPTS)
    }
}

impl WordSearchGenerator {
    pub fn new(attempts: usize) -> Self {
        Self { attempts }
    }

    /// Generate a `size` x `size` grid with the given words embedded.
    ///
    /// Words are tried in input order. A word that finds no legal spot within
    /// the attempt budget is left out of the puzzle. Remaining cells are filled
    /// with uniformly random letters.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        words: &[String],
        size: usize,
        rng: &mut R,
    ) -> WordSearchPuzzle {
        let mut cells: Vec<Vec<Option<char>>> = vec![vec![None; size]; size];
        let mut placements = Vec::new();

        for raw in words {
            let word = puzzle_word(raw);
            if word.is_empty() {
                continue;
            }

            match self.try_place(&mut cells, size, &word, rng) {
                Some(path) => placements.push(WordPlacement {
                    word: word.iter().collect(),
                    cells: path,
                }),
                None => tracing::debug!(
                    "Dropping word '{}' after {} placement attempts",
                    raw.trim(),
                    self.attempts
                ),
            }
        }

        let mut grid: LetterGrid = Vec::with_capacity(size);
        for row in cells {
            let mut filled = Vec::with_capacity(size);
            for cell in row {
                filled.push(match cell {
                    Some(letter) => letter,
                    None => random_letter(rng),
                });
            }
            grid.push(filled);
        }

        WordSearchPuzzle {
            size,
            grid,
            placements,
        }
    }

    fn try_place<R: Rng + ?Sized>(
        &self,
        grid: &mut [Vec<Option<char>>],
        size: usize,
        word: &[char],
        rng: &mut R,
    ) -> Option<Vec<Position>> {
        let len = word.len();

        for _ in 0..self.attempts {
            let (dr, dc) = DIRECTIONS[rng.random_range(0..DIRECTIONS.len())];
            let (Some(rows), Some(cols)) =
                (start_range(dr, len, size), start_range(dc, len, size))
            else {
                continue;
            };

            let start = Position::new(rng.random_range(rows), rng.random_range(cols));
            let Some(path) = walk(start, (dr, dc), len, size) else {
                continue;
            };

            let fits = path
                .iter()
                .zip(word)
                .all(|(pos, letter)| grid[pos.row][pos.col].map_or(true, |c| c == *letter));
            if !fits {
                continue;
            }

            for (pos, letter) in path.iter().zip(word) {
                grid[pos.row][pos.col] = Some(*letter);
            }
            return Some(path);
        }

        None
    }
}

/// Legal start coordinates on one axis for a word of `len` letters
fn start_range(step: isize, len: usize, size: usize) -> Option<RangeInclusive<usize>> {
    if size == 0 {
        return None;
    }
    match step {
        0 => Some(0..=size - 1),
        _ if len > size => None,
        1 => Some(0..=size - len),
        _ => Some(len - 1..=size - 1),
    }
}

/// Cells from `start` stepping `len` times, or `None` if it leaves the grid
fn walk(start: Position, (dr, dc): (isize, isize), len: usize, size: usize) -> Option<Vec<Position>> {
    (0..len as isize)
        .map(|i| {
            let row = start.row as isize + dr * i;
            let col = start.col as isize + dc * i;
            in_grid(row, col, size).then(|| Position::new(row as usize, col as usize))
        })
        .collect()
}

fn in_grid(row: isize, col: isize, size: usize) -> bool {
    row >= 0 && col >= 0 && (row as usize) < size && (col as usize) < size
}

/// A straight-line drag across the grid.
///
/// The first move away from the start cell fixes the direction; later moves
/// are projected onto that line and the path stops at the grid edge.
#[derive(Debug, Clone)]
pub struct DragSelection {
    start: Position,
    size: usize,
    direction: Option<(isize, isize)>,
    cells: Vec<Position>,
}

impl DragSelection {
    pub fn begin(start: Position, size: usize) -> Self {
        Self {
            start,
            size,
            direction: None,
            cells: vec![start],
        }
    }

    pub fn extend(&mut self, to: Position) -> &[Position] {
        // Anything past the edge reads as the edge itself; the sign of each
        // delta is unchanged and the walk below stops at the edge anyway
        let size = self.size;
        let clamp = |coord: usize| coord.min(size) as isize;
        let (start_row, start_col) = (clamp(self.start.row), clamp(self.start.col));
        let delta_row = clamp(to.row) - start_row;
        let delta_col = clamp(to.col) - start_col;

        let (dr, dc) = match self.direction {
            Some(direction) => direction,
            None => {
                let direction = (delta_row.signum(), delta_col.signum());
                if direction == (0, 0) {
                    self.cells = vec![self.start];
                    return &self.cells;
                }
                self.direction = Some(direction);
                direction
            }
        };

        let steps = delta_row.abs().max(delta_col.abs()).min(size as isize);
        let mut cells = Vec::new();
        for i in 0..=steps {
            let row = start_row + dr * i;
            let col = start_col + dc * i;
            if !in_grid(row, col, self.size) {
                break;
            }
            cells.push(Position::new(row as usize, col as usize));
        }
        self.cells = cells;
        &self.cells
    }

    pub fn cells(&self) -> &[Position] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<Position> {
        self.cells
    }
}

/// Live word search game: the puzzle plus which placements were found
#[derive(Debug, Clone)]
pub struct WordSearchPlay {
    puzzle: WordSearchPuzzle,
    found: BTreeSet<usize>,
    drag: Option<DragSelection>,
}

impl WordSearchPlay {
    pub fn new(puzzle: WordSearchPuzzle) -> Self {
        Self {
            puzzle,
            found: BTreeSet::new(),
            drag: None,
        }
    }

    pub fn puzzle(&self) -> &WordSearchPuzzle {
        &self.puzzle
    }

    pub fn found(&self) -> &BTreeSet<usize> {
        &self.found
    }

    pub fn found_words(&self) -> Vec<String> {
        self.found
            .iter()
            .filter_map(|idx| self.puzzle.placements.get(*idx))
            .map(|placement| placement.word.clone())
            .collect()
    }

    /// Match a finished selection against the un-found placements.
    /// Either reading direction counts. Returns the placement index marked found.
    pub fn submit(&mut self, selection: &[Position]) -> Option<usize> {
        if selection.is_empty() {
            return None;
        }

        let hit = self
            .puzzle
            .placements
            .iter()
            .enumerate()
            .filter(|(idx, _)| !self.found.contains(idx))
            .find(|(_, placement)| same_path_either_way(selection, &placement.cells))
            .map(|(idx, _)| idx)?;

        self.found.insert(hit);
        Some(hit)
    }

    pub fn begin_drag(&mut self, at: Position) -> &[Position] {
        self.drag.insert(DragSelection::begin(at, self.puzzle.size)).cells()
    }

    /// Extend the drag in progress, or `None` when no drag was started
    pub fn extend_drag(&mut self, to: Position) -> Option<&[Position]> {
        self.drag.as_mut().map(|drag| drag.extend(to))
    }

    /// Finish the drag in progress and submit it
    pub fn release_drag(&mut self) -> Option<(Vec<Position>, Option<usize>)> {
        let cells = self.drag.take()?.into_cells();
        let hit = self.submit(&cells);
        Some((cells, hit))
    }

    pub fn is_complete(&self) -> bool {
        !self.puzzle.placements.is_empty() && self.found.len() == self.puzzle.placements.len()
    }
}

fn same_path_either_way(selection: &[Position], path: &[Position]) -> bool {
    selection.len() == path.len()
        && (selection == path || selection.iter().eq(path.iter().rev()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    fn generate(list: &[&str], size: usize, seed: u64) -> WordSearchPuzzle {
        let mut rng = StdRng::seed_from_u64(seed);
        WordSearchGenerator::default().generate(&words(list), size, &mut rng)
    }

    #[test]
    fn test_every_cell_is_uppercase_letter() {
        for seed in 0..20 {
            let puzzle = generate(&["SOL", "LUNA", "marte", "tierra"], 10, seed);
            assert_eq!(puzzle.grid.len(), 10);
            assert!(puzzle.grid.iter().all(|row| row.len() == 10));
            assert!(puzzle
                .grid
                .iter()
                .flatten()
                .all(|c| c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn test_placed_words_read_back_along_their_path() {
        for seed in 0..50 {
            let puzzle = generate(&["SOL", "LUNA", "ORBITA", "ESTRELLA"], 10, seed);
            for placement in &puzzle.placements {
                assert_eq!(puzzle.read_path(&placement.cells), placement.word);
            }
        }
    }

    #[test]
    fn test_sol_luna_scenario_places_both_consistently() {
        for seed in 0..50 {
            let puzzle = generate(&["SOL", "LUNA"], 10, seed);
            // Two short words on an empty 10x10 grid always fit within 300 tries
            assert_eq!(puzzle.placements.len(), 2);

            let mut letters = std::collections::HashMap::new();
            for placement in &puzzle.placements {
                for (pos, letter) in placement.cells.iter().zip(placement.word.chars()) {
                    let previous = letters.insert(*pos, letter);
                    assert!(previous.map_or(true, |p| p == letter));
                }
            }
        }
    }

    #[test]
    fn test_paths_are_straight_and_contiguous() {
        let puzzle = generate(&["PLANETA", "COMETA", "SATURNO"], 12, 3);
        for placement in &puzzle.placements {
            let cells = &placement.cells;
            let step = (
                cells[1].row as isize - cells[0].row as isize,
                cells[1].col as isize - cells[0].col as isize,
            );
            assert!(DIRECTIONS.contains(&step));
            for pair in cells.windows(2) {
                let next = (
                    pair[1].row as isize - pair[0].row as isize,
                    pair[1].col as isize - pair[0].col as isize,
                );
                assert_eq!(next, step);
            }
        }
    }

    #[test]
    fn test_word_longer_than_grid_is_dropped() {
        let puzzle = generate(&["ELEFANTE", "OSO"], 5, 11);
        assert_eq!(puzzle.placements.len(), 1);
        assert_eq!(puzzle.placements[0].word, "OSO");
    }

    #[test]
    fn test_word_filling_a_full_row_can_be_placed() {
        let puzzle = generate(&["ABCDE"], 5, 1);
        assert_eq!(puzzle.placements.len(), 1);
        assert_eq!(puzzle.placements[0].cells.len(), 5);
    }

    #[test]
    fn test_lowercase_input_is_uppercased() {
        let puzzle = generate(&["luna"], 8, 2);
        assert_eq!(puzzle.placements[0].word, "LUNA");
    }

    #[test]
    fn test_blank_words_are_ignored() {
        let puzzle = generate(&["  ", "SOL"], 6, 2);
        assert_eq!(puzzle.placements.len(), 1);
    }

    #[test]
    fn test_start_ranges() {
        assert_eq!(start_range(1, 3, 10), Some(0..=7));
        assert_eq!(start_range(-1, 3, 10), Some(2..=9));
        assert_eq!(start_range(0, 30, 10), Some(0..=9));
        assert_eq!(start_range(1, 11, 10), None);
        assert_eq!(start_range(0, 1, 0), None);
    }

    #[test]
    fn test_drag_locks_direction_and_clips_at_edge() {
        let mut drag = DragSelection::begin(Position::new(2, 2), 5);
        drag.extend(Position::new(3, 3));
        assert_eq!(
            drag.cells(),
            &[Position::new(2, 2), Position::new(3, 3)]
        );

        // Direction stays diagonal even if the pointer drifts horizontally
        drag.extend(Position::new(2, 4));
        assert_eq!(
            drag.cells(),
            &[Position::new(2, 2), Position::new(3, 3), Position::new(4, 4)]
        );

        // Projection past the edge is cut at the border
        drag.extend(Position::new(4, 0));
        assert_eq!(drag.cells().len(), 3);
    }

    #[test]
    fn test_drag_toward_far_target_stops_at_edge() {
        let mut drag = DragSelection::begin(Position::new(0, 0), 10);
        let cells = drag.extend(Position::new(0, usize::MAX / 4)).to_vec();
        assert_eq!(cells.len(), 10);
        assert_eq!(cells[9], Position::new(0, 9));

        let mut drag = DragSelection::begin(Position::new(9, 9), 10);
        let cells = drag.extend(Position::new(usize::MAX, usize::MAX)).to_vec();
        assert_eq!(cells, vec![Position::new(9, 9)]);

        let mut drag = DragSelection::begin(Position::new(4, 4), 10);
        let cells = drag
            .extend(Position::new(100_000_000_000, 100_000_000_000))
            .to_vec();
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[5], Position::new(9, 9));
    }

    #[test]
    fn test_drag_on_start_cell_selects_only_start() {
        let mut drag = DragSelection::begin(Position::new(1, 1), 4);
        drag.extend(Position::new(1, 1));
        assert_eq!(drag.into_cells(), vec![Position::new(1, 1)]);
    }

    fn fixed_puzzle() -> WordSearchPuzzle {
        WordSearchPuzzle {
            size: 3,
            grid: vec![
                vec!['S', 'O', 'L'],
                vec!['X', 'Y', 'Z'],
                vec!['Q', 'R', 'T'],
            ],
            placements: vec![WordPlacement {
                word: "SOL".to_string(),
                cells: vec![Position::new(0, 0), Position::new(0, 1), Position::new(0, 2)],
            }],
        }
    }

    #[test]
    fn test_submit_accepts_forward_and_reversed_once() {
        let mut play = WordSearchPlay::new(fixed_puzzle());
        let reversed = vec![Position::new(0, 2), Position::new(0, 1), Position::new(0, 0)];

        assert_eq!(play.submit(&reversed), Some(0));
        assert!(play.is_complete());
        assert_eq!(play.found_words(), vec!["SOL".to_string()]);

        // Already found
        let forward = vec![Position::new(0, 0), Position::new(0, 1), Position::new(0, 2)];
        assert_eq!(play.submit(&forward), None);
    }

    #[test]
    fn test_submit_rejects_partial_and_scrambled_paths() {
        let mut play = WordSearchPlay::new(fixed_puzzle());
        assert_eq!(play.submit(&[Position::new(0, 0), Position::new(0, 1)]), None);
        assert_eq!(
            play.submit(&[Position::new(0, 1), Position::new(0, 0), Position::new(0, 2)]),
            None
        );
        assert_eq!(play.submit(&[]), None);
        assert!(!play.is_complete());
    }

    #[test]
    fn test_drag_release_submits_selection() {
        let mut play = WordSearchPlay::new(fixed_puzzle());
        assert!(play.extend_drag(Position::new(0, 1)).is_none());

        play.begin_drag(Position::new(0, 0));
        play.extend_drag(Position::new(0, 2));
        let (cells, hit) = play.release_drag().unwrap();
        assert_eq!(cells.len(), 3);
        assert_eq!(hit, Some(0));
        assert!(play.release_drag().is_none());
    }

    #[test]
    fn test_empty_puzzle_is_never_complete() {
        let play = WordSearchPlay::new(generate(&[], 4, 0));
        assert!(!play.is_complete());
    }
}
