//! Error type for move validation.

use crate::Cell;

/// Why a move was rejected.
///
/// The reasons are distinct for diagnostics, but every variant means the
/// same thing to the protocol layer: reject the move. A peer that sends
/// one commits a protocol violation; a local human just gets re-prompted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    /// The raw choice is not a board position.
    #[error("move {0} is out of range, must be 1-9")]
    OutOfRange(u8),

    /// The chosen cell already holds a mark.
    #[error("cell {0} is already taken")]
    Occupied(Cell),

    /// The game has already been decided.
    #[error("the game is already over")]
    AlreadyDecided,
}
