use crate::{game::PlayError, models::Position};

pub struct SelectionValidator;

impl SelectionValidator {
    /// Reject the first cell that falls outside a `size` x `size` grid
    pub fn cells_in_bounds(size: usize, cells: &[Position]) -> Result<(), PlayError> {
        match cells.iter().find(|pos| pos.row >= size || pos.col >= size) {
            Some(pos) => Err(PlayError::OutOfBounds(*pos)),
            None => Ok(()),
        }
    }

    /// Cells form one straight run: each step moves to a neighbour
    /// (diagonals included) and every step goes the same way
    pub fn is_straight_line(cells: &[Position]) -> bool {
        if cells.is_empty() {
            return false;
        }

        let steps: Vec<(isize, isize)> = cells
            .windows(2)
            .map(|pair| Self::step(&pair[0], &pair[1]))
            .collect();

        steps.iter().all(|step| Self::is_unit_step(*step))
            && steps.windows(2).all(|pair| pair[0] == pair[1])
    }

    /// Reject a selection that is not one straight run
    pub fn straight_line(cells: &[Position]) -> Result<(), PlayError> {
        if Self::is_straight_line(cells) {
            Ok(())
        } else {
            Err(PlayError::NotStraight)
        }
    }

    pub fn node_in_range(count: usize, index: usize) -> Result<(), PlayError> {
        if index < count {
            Ok(())
        } else {
            Err(PlayError::NodeOutOfRange { index, count })
        }
    }

    fn step(from: &Position, to: &Position) -> (isize, isize) {
        (
            to.row as isize - from.row as isize,
            to.col as isize - from.col as isize,
        )
    }

    /// Check if a step lands on an adjacent cell (including diagonals)
    fn is_unit_step((dr, dc): (isize, isize)) -> bool {
        dr.abs() <= 1 && dc.abs() <= 1 && (dr, dc) != (0, 0)
    }
}
