//! The seam between the session machinery and whoever picks the moves.

use crate::{Cell, Game, Mark};

/// Where the local side's moves come from.
///
/// The host and challenger loops are the same protocol machine; the only
/// difference between an automated opponent and a human player is the
/// implementation plugged in here. [`Oracle`](crate::Oracle) searches;
/// the challenger binary supplies a prompting implementation.
///
/// Implementations must return a cell that is legal on the current
/// board, or `None` when no legal move exists. A human-backed source
/// re-prompts locally until the input is legal — bad keyboard input
/// never reaches the wire.
pub trait MoveSource {
    /// Picks the next move for `mark` in `game`.
    fn choose(&mut self, game: &Game, mark: Mark) -> Option<Cell>;
}
