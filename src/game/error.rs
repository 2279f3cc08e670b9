use thiserror::Error;

use crate::models::Position;

/// Rejected player input. Generation and grading never fail; only moves
/// against a live session can.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlayError {
    #[error("cell ({}, {}) is outside the grid", .0.row, .0.col)]
    OutOfBounds(Position),

    #[error("cell ({}, {}) is not part of any word", .0.row, .0.col)]
    BlockedCell(Position),

    #[error("letter node {index} does not exist (wheel has {count} nodes)")]
    NodeOutOfRange { index: usize, count: usize },

    #[error("this move is not valid for a {0} session")]
    WrongGame(&'static str),

    #[error("selected cells do not form a straight line")]
    NotStraight,

    #[error("no drag in progress")]
    NotDragging,
}
