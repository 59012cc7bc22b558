//! A game in progress: the board plus its decided-winner field.

use crate::{Board, Cell, Mark, MoveError, Winner};

/// One game's full local state.
///
/// The `winner` field caches what [`Board::status`] derives so that move
/// validation can reject play into a finished game without re-scanning
/// the lines, and so "the winner was already decided" survives the final
/// board print.
#[derive(Debug, Clone, Copy, Default)]
pub struct Game {
    board: Board,
    winner: Winner,
}

impl Game {
    /// A fresh game: empty board, winner undetermined.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a game from a received board (the resume path).
    /// The winner is re-derived, not trusted from the peer.
    pub fn from_board(board: Board) -> Self {
        let mut game = Self {
            board,
            winner: Winner::Undetermined,
        };
        game.check_over();
        game
    }

    /// Read-only view of the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The decided state as of the last [`check_over`](Self::check_over).
    pub fn winner(&self) -> Winner {
        self.winner
    }

    /// Validates a raw cell choice against the current game.
    ///
    /// Checks, in order: the choice is a board position, the cell is
    /// free, and the game is still undecided. Each failure carries its
    /// own [`MoveError`] reason.
    pub fn validate(&self, choice: u8) -> Result<Cell, MoveError> {
        let cell = Cell::new(choice).ok_or(MoveError::OutOfRange(choice))?;
        if !self.board.is_empty(cell) {
            return Err(MoveError::Occupied(cell));
        }
        if self.winner.is_decided() {
            return Err(MoveError::AlreadyDecided);
        }
        Ok(cell)
    }

    /// Places `mark` at `cell`. Requires a prior [`validate`](Self::validate).
    pub fn apply(&mut self, cell: Cell, mark: Mark) {
        self.board.set(cell, mark);
    }

    /// Re-derives the winner from the board and returns it.
    ///
    /// Idempotent: on an already-terminal board this returns the same
    /// result every time and changes nothing else.
    pub fn check_over(&mut self) -> Winner {
        self.winner = self.board.status();
        self.winner
    }

    /// Returns the game to its initial state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(n: u8) -> Cell {
        Cell::new(n).unwrap()
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let game = Game::new();
        assert_eq!(game.validate(0), Err(MoveError::OutOfRange(0)));
        assert_eq!(game.validate(10), Err(MoveError::OutOfRange(10)));
    }

    #[test]
    fn test_validate_rejects_occupied() {
        let mut game = Game::new();
        game.apply(cell(5), Mark::X);
        assert_eq!(game.validate(5), Err(MoveError::Occupied(cell(5))));
    }

    #[test]
    fn test_validate_rejects_decided_game() {
        let mut game = Game::new();
        for n in [1, 2, 3] {
            game.apply(cell(n), Mark::X);
        }
        game.check_over();
        assert_eq!(game.validate(9), Err(MoveError::AlreadyDecided));
    }

    #[test]
    fn test_validate_accepts_legal_move() {
        let game = Game::new();
        assert_eq!(game.validate(7), Ok(cell(7)));
    }

    #[test]
    fn test_check_over_sets_winner() {
        let mut game = Game::new();
        assert_eq!(game.check_over(), Winner::Undetermined);
        for n in [1, 5, 9] {
            game.apply(cell(n), Mark::O);
        }
        assert_eq!(game.check_over(), Winner::Won(Mark::O));
        assert_eq!(game.winner(), Winner::Won(Mark::O));
        // Idempotent.
        assert_eq!(game.check_over(), Winner::Won(Mark::O));
    }

    #[test]
    fn test_from_board_rederives_winner() {
        let mut board = Board::new();
        for n in [3u8, 5, 7] {
            board.set(cell(n), Mark::X);
        }
        let game = Game::from_board(board);
        assert_eq!(game.winner(), Winner::Won(Mark::X));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut game = Game::new();
        for n in [1, 2, 3] {
            game.apply(cell(n), Mark::X);
        }
        game.check_over();
        game.reset();
        assert_eq!(game.winner(), Winner::Undetermined);
        assert!(game.board().is_empty(cell(1)));
    }
}
