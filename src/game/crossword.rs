use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    game::PlayError,
    models::{
        CrosswordGrid, CrosswordPlacement, CrosswordWord, EndMarker, Orientation, Position,
    },
    utils::letters::puzzle_word,
};

/// Trials that require crossing an existing letter
pub const DEFAULT_INTERSECT_ATTEMPTS: usize = 200;
/// Fallback trials at a random cell
pub const DEFAULT_RANDOM_ATTEMPTS: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClueEntry {
    pub id: u32,
    pub direction: Orientation,
    pub clue: String,
    pub length: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrosswordPuzzle {
    pub size: usize,
    pub grid: CrosswordGrid,
    pub placements: Vec<CrosswordPlacement>,
    pub end_markers: Vec<EndMarker>,
    pub clues: Vec<ClueEntry>,
}

pub struct CrosswordGenerator {
    intersect_attempts: usize,
    random_attempts: usize,
}

impl Default for CrosswordGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_INTERSECT_ATTEMPTS, DEFAULT_RANDOM_ATTEMPTS)
    }
}

impl CrosswordGenerator {
    pub fn new(intersect_attempts: usize, random_attempts: usize) -> Self {
        Self {
            intersect_attempts,
            random_attempts,
        }
    }

    /// Lay out the words longest-first, crossing placed letters where possible.
    ///
    /// The first word that fits is centred across the middle row. Every later
    /// word tries crossing spots first, then random spots. Words that fit
    /// nowhere are left out.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        words: &[CrosswordWord],
        size: usize,
        rng: &mut R,
    ) -> CrosswordPuzzle {
        let mut grid: CrosswordGrid = vec![vec![None; size]; size];
        let mut placements: Vec<CrosswordPlacement> = Vec::new();
        let mut clues = Vec::new();

        let mut entries: Vec<(&CrosswordWord, Vec<char>)> = words
            .iter()
            .map(|entry| (entry, puzzle_word(&entry.word)))
            .filter(|(_, letters)| !letters.is_empty())
            .collect();
        // Stable, so equal lengths keep their input order
        entries.sort_by(|a, b| b.1.len().cmp(&a.1.len()));

        for (entry, letters) in &entries {
            if letters.len() > size {
                tracing::debug!("Dropping crossword word '{}': longer than grid", entry.word);
                continue;
            }

            let spot = if placements.is_empty() {
                Some((
                    Position::new(size / 2, (size - letters.len()) / 2),
                    Orientation::Across,
                ))
            } else {
                match self.crossing_spot(&grid, letters, rng) {
                    Some(spot) => Some(spot),
                    None => self.random_spot(&grid, letters, rng),
                }
            };

            let Some((start, direction)) = spot else {
                tracing::debug!(
                    "Dropping crossword word '{}' after {} crossing and {} random attempts",
                    entry.word,
                    self.intersect_attempts,
                    self.random_attempts
                );
                continue;
            };

            write_word(&mut grid, letters, start, direction);
            placements.push(CrosswordPlacement {
                id: entry.id,
                word: letters.iter().collect(),
                row: start.row,
                col: start.col,
                direction,
            });
            clues.push(ClueEntry {
                id: entry.id,
                direction,
                clue: entry.clue.clone(),
                length: letters.len(),
            });
        }

        let end_markers = end_markers(&placements);

        CrosswordPuzzle {
            size,
            grid,
            placements,
            end_markers,
            clues,
        }
    }

    fn crossing_spot<R: Rng + ?Sized>(
        &self,
        grid: &CrosswordGrid,
        letters: &[char],
        rng: &mut R,
    ) -> Option<(Position, Orientation)> {
        // The grid does not change between trials
        let across = find_intersections(grid, letters, Orientation::Across);
        let down = find_intersections(grid, letters, Orientation::Down);
        if across.is_empty() && down.is_empty() {
            return None;
        }

        for _ in 0..self.intersect_attempts {
            let direction = random_orientation(rng);
            let candidates = match direction {
                Orientation::Across => &across,
                Orientation::Down => &down,
            };
            if candidates.is_empty() {
                continue;
            }

            let start = candidates[rng.random_range(0..candidates.len())];
            if can_place(grid, letters, start, direction) {
                return Some((start, direction));
            }
        }
        None
    }

    fn random_spot<R: Rng + ?Sized>(
        &self,
        grid: &CrosswordGrid,
        letters: &[char],
        rng: &mut R,
    ) -> Option<(Position, Orientation)> {
        let size = grid.len();
        if size == 0 {
            return None;
        }
        for _ in 0..self.random_attempts {
            let direction = random_orientation(rng);
            let start = Position::new(rng.random_range(0..size), rng.random_range(0..size));
            if can_place(grid, letters, start, direction) {
                return Some((start, direction));
            }
        }
        None
    }
}

fn random_orientation<R: Rng + ?Sized>(rng: &mut R) -> Orientation {
    if rng.random_bool(0.5) {
        Orientation::Across
    } else {
        Orientation::Down
    }
}

/// Start cells from which `letters` would share at least one letter with the grid.
/// A start appears once per matching letter, so multi-cross spots weigh more.
pub fn find_intersections(
    grid: &CrosswordGrid,
    letters: &[char],
    direction: Orientation,
) -> Vec<Position> {
    let size = grid.len();
    let (dr, dc) = direction.step();
    let mut found = Vec::new();

    for row in 0..size {
        for col in 0..size {
            for (i, letter) in letters.iter().enumerate() {
                let (r, c) = (row + dr * i, col + dc * i);
                if r >= size || c >= size {
                    continue;
                }
                if grid[r][c] == Some(*letter) {
                    found.push(Position::new(row, col));
                }
            }
        }
    }

    found
}

/// True when the whole word stays on the grid and agrees with every filled cell
pub fn can_place(
    grid: &CrosswordGrid,
    letters: &[char],
    start: Position,
    direction: Orientation,
) -> bool {
    let size = grid.len();
    let (dr, dc) = direction.step();
    let len = letters.len();

    if start.row >= size || start.col >= size {
        return false;
    }
    if start.row + dr * len.saturating_sub(1) >= size
        || start.col + dc * len.saturating_sub(1) >= size
    {
        return false;
    }

    letters.iter().enumerate().all(|(i, letter)| {
        grid[start.row + dr * i][start.col + dc * i].map_or(true, |c| c == *letter)
    })
}

fn write_word(grid: &mut CrosswordGrid, letters: &[char], start: Position, direction: Orientation) {
    let (dr, dc) = direction.step();
    for (i, letter) in letters.iter().enumerate() {
        grid[start.row + dr * i][start.col + dc * i] = Some(*letter);
    }
}

/// Collapse per-word end cells into one marker per cell
pub fn end_markers(placements: &[CrosswordPlacement]) -> Vec<EndMarker> {
    let mut ends: BTreeMap<Position, (bool, bool)> = BTreeMap::new();
    for placement in placements {
        let flags = ends.entry(placement.end()).or_default();
        match placement.direction {
            Orientation::Across => flags.0 = true,
            Orientation::Down => flags.1 = true,
        }
    }

    ends.into_iter()
        .map(|(pos, (right, bottom))| EndMarker {
            row: pos.row,
            col: pos.col,
            right,
            bottom,
        })
        .collect()
}

/// Live crossword: the solution grid plus whatever the player typed
#[derive(Debug, Clone)]
pub struct CrosswordPlay {
    puzzle: CrosswordPuzzle,
    inputs: Vec<Vec<Option<char>>>,
    completed: Vec<u32>,
}

impl CrosswordPlay {
    pub fn new(puzzle: CrosswordPuzzle) -> Self {
        let inputs = vec![vec![None; puzzle.size]; puzzle.size];
        Self {
            puzzle,
            inputs,
            completed: Vec::new(),
        }
    }

    pub fn puzzle(&self) -> &CrosswordPuzzle {
        &self.puzzle
    }

    pub fn inputs(&self) -> &[Vec<Option<char>>] {
        &self.inputs
    }

    /// Ids of the placements whose cells all hold the right letter
    pub fn completed_ids(&self) -> &[u32] {
        &self.completed
    }

    /// Type into one cell. Only the last character of `value` is kept,
    /// uppercased; an empty value clears the cell.
    pub fn enter(&mut self, pos: Position, value: &str) -> Result<Option<char>, PlayError> {
        let cell = self
            .puzzle
            .grid
            .get(pos.row)
            .and_then(|row| row.get(pos.col))
            .ok_or(PlayError::OutOfBounds(pos))?;
        if cell.is_none() {
            return Err(PlayError::BlockedCell(pos));
        }

        let letter = value
            .chars()
            .last()
            .and_then(|c| c.to_uppercase().next());
        self.inputs[pos.row][pos.col] = letter;
        self.refresh_completed();
        Ok(letter)
    }

    fn refresh_completed(&mut self) {
        self.completed = self
            .puzzle
            .placements
            .iter()
            .filter(|placement| {
                placement
                    .cells()
                    .iter()
                    .zip(placement.word.chars())
                    .all(|(pos, letter)| self.inputs[pos.row][pos.col] == Some(letter))
            })
            .map(|placement| placement.id)
            .collect();
    }

    pub fn is_complete(&self) -> bool {
        !self.puzzle.placements.is_empty()
            && self.completed.len() == self.puzzle.placements.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::HashMap;

    fn word(id: u32, text: &str) -> CrosswordWord {
        CrosswordWord {
            id,
            word: text.to_string(),
            clue: format!("clue {}", id),
        }
    }

    fn solar_system() -> Vec<CrosswordWord> {
        vec![
            word(1, "SOL"),
            word(2, "TIERRA"),
            word(3, "MARTE"),
            word(4, "LUNA"),
            word(5, "ORBITA"),
        ]
    }

    #[test]
    fn test_single_word_is_centred_across() {
        for size in [5, 10, 12, 15] {
            let mut rng = StdRng::seed_from_u64(size as u64);
            let puzzle =
                CrosswordGenerator::default().generate(&[word(7, "luna")], size, &mut rng);
            assert_eq!(puzzle.placements.len(), 1);
            let placement = &puzzle.placements[0];
            assert_eq!(placement.row, size / 2);
            assert_eq!(placement.col, (size - 4) / 2);
            assert_eq!(placement.direction, Orientation::Across);
            assert_eq!(placement.word, "LUNA");
        }
    }

    #[test]
    fn test_longest_word_anchors_the_grid() {
        let mut rng = StdRng::seed_from_u64(5);
        let puzzle = CrosswordGenerator::default().generate(&solar_system(), 10, &mut rng);
        // TIERRA and ORBITA tie for longest; input order wins
        let anchor = &puzzle.placements[0];
        assert_eq!(anchor.word, "TIERRA");
        assert_eq!((anchor.row, anchor.col), (5, 2));
    }

    #[test]
    fn test_crossing_cells_agree() {
        for seed in 0..40 {
            let mut rng = StdRng::seed_from_u64(seed);
            let puzzle = CrosswordGenerator::default().generate(&solar_system(), 10, &mut rng);

            let mut seen: HashMap<Position, char> = HashMap::new();
            for placement in &puzzle.placements {
                for (pos, letter) in placement.cells().into_iter().zip(placement.word.chars()) {
                    if let Some(existing) = seen.insert(pos, letter) {
                        assert_eq!(existing, letter, "conflict at {:?}", pos);
                    }
                    assert_eq!(puzzle.grid[pos.row][pos.col], Some(letter));
                }
            }
        }
    }

    fn shared_cells(a: &CrosswordPlacement, b: &CrosswordPlacement) -> usize {
        let cells = a.cells();
        b.cells().iter().filter(|pos| cells.contains(pos)).count()
    }

    #[test]
    fn test_later_word_crosses_when_it_can() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let puzzle = CrosswordGenerator::default().generate(
                &[word(1, "SOLAR"), word(2, "LOS")],
                12,
                &mut rng,
            );
            assert_eq!(puzzle.placements.len(), 2, "seed {}", seed);
            assert!(
                shared_cells(&puzzle.placements[0], &puzzle.placements[1]) >= 1,
                "seed {}: LOS does not cross SOLAR",
                seed
            );
        }
    }

    #[test]
    fn test_word_without_shared_letters_falls_back_to_random_spot() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let puzzle = CrosswordGenerator::default().generate(
                &[word(1, "SOL"), word(2, "PEZ")],
                8,
                &mut rng,
            );
            assert_eq!(puzzle.placements.len(), 2, "seed {}", seed);
            let pez = &puzzle.placements[1];
            assert_eq!(pez.word, "PEZ");
            assert_eq!(shared_cells(&puzzle.placements[0], pez), 0);
            for (pos, letter) in pez.cells().into_iter().zip("PEZ".chars()) {
                assert_eq!(puzzle.grid[pos.row][pos.col], Some(letter));
            }
        }
    }

    #[test]
    fn test_grid_only_holds_placed_letters() {
        let mut rng = StdRng::seed_from_u64(9);
        let puzzle = CrosswordGenerator::default().generate(&solar_system(), 12, &mut rng);
        let covered: usize = puzzle
            .placements
            .iter()
            .flat_map(|p| p.cells())
            .collect::<std::collections::HashSet<_>>()
            .len();
        let filled = puzzle.grid.iter().flatten().filter(|c| c.is_some()).count();
        assert_eq!(covered, filled);
    }

    #[test]
    fn test_oversized_word_is_dropped() {
        let mut rng = StdRng::seed_from_u64(1);
        let puzzle = CrosswordGenerator::default().generate(
            &[word(1, "DIVISIONES"), word(2, "SUMA")],
            6,
            &mut rng,
        );
        assert_eq!(puzzle.placements.len(), 1);
        assert_eq!(puzzle.placements[0].word, "SUMA");
        assert_eq!(puzzle.placements[0].row, 3);
    }

    #[test]
    fn test_find_intersections_reports_start_cells() {
        let mut grid: CrosswordGrid = vec![vec![None; 5]; 5];
        grid[2][1] = Some('S');
        grid[2][2] = Some('O');
        grid[2][3] = Some('L');

        let letters: Vec<char> = "LUZ".chars().collect();
        let down = find_intersections(&grid, &letters, Orientation::Down);
        // 'L' at offset 0 lines up with the L at (2,3)
        assert_eq!(down, vec![Position::new(2, 3)]);
        assert!(can_place(&grid, &letters, Position::new(2, 3), Orientation::Down));
        assert!(!can_place(&grid, &letters, Position::new(2, 3), Orientation::Across));
    }

    #[test]
    fn test_can_place_rejects_contradictions_and_overflow() {
        let mut grid: CrosswordGrid = vec![vec![None; 4]; 4];
        grid[0][1] = Some('X');
        let letters: Vec<char> = "SOL".chars().collect();
        assert!(!can_place(&grid, &letters, Position::new(0, 0), Orientation::Across));
        assert!(can_place(&grid, &letters, Position::new(1, 0), Orientation::Across));
        assert!(!can_place(&grid, &letters, Position::new(2, 0), Orientation::Down));
        assert!(!can_place(&grid, &letters, Position::new(0, 4), Orientation::Down));
    }

    #[test]
    fn test_end_markers_merge_across_and_down() {
        let placements = vec![
            CrosswordPlacement {
                id: 1,
                word: "SOL".to_string(),
                row: 2,
                col: 0,
                direction: Orientation::Across,
            },
            CrosswordPlacement {
                id: 2,
                word: "ALL".to_string(),
                row: 0,
                col: 2,
                direction: Orientation::Down,
            },
        ];
        let markers = end_markers(&placements);
        assert_eq!(
            markers,
            vec![EndMarker {
                row: 2,
                col: 2,
                right: true,
                bottom: true
            }]
        );
    }

    fn small_play() -> CrosswordPlay {
        let mut rng = StdRng::seed_from_u64(3);
        let puzzle = CrosswordGenerator::default().generate(&[word(4, "sol")], 5, &mut rng);
        CrosswordPlay::new(puzzle)
    }

    #[test]
    fn test_completion_requires_exact_order() {
        let mut play = small_play();
        // SOL sits at row 2, cols 1..=3
        play.enter(Position::new(2, 1), "l").unwrap();
        play.enter(Position::new(2, 2), "o").unwrap();
        play.enter(Position::new(2, 3), "s").unwrap();
        assert!(play.completed_ids().is_empty());

        play.enter(Position::new(2, 1), "xs").unwrap();
        play.enter(Position::new(2, 3), "L").unwrap();
        assert_eq!(play.completed_ids(), &[4]);
        assert!(play.is_complete());

        assert_eq!(play.enter(Position::new(2, 3), ""), Ok(None));
        assert!(!play.is_complete());
    }

    #[test]
    fn test_enter_rejects_blocked_and_outside_cells() {
        let mut play = small_play();
        assert_eq!(
            play.enter(Position::new(0, 0), "A"),
            Err(PlayError::BlockedCell(Position::new(0, 0)))
        );
        assert_eq!(
            play.enter(Position::new(9, 0), "A"),
            Err(PlayError::OutOfBounds(Position::new(9, 0)))
        );
    }
}
