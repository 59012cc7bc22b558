//! Exhaustive minimax search over the at-most-9-ply game tree.
//!
//! The search is deliberately unpruned: the state space is tiny and an
//! unpruned tree makes the tie-break rule trivially auditable. Leaf
//! scores fold the depth in (`±(10 - depth)`) so the maximizer prefers
//! the fastest win and the slowest loss among equally decided lines.

use crate::{Board, Cell, Game, Mark, MoveSource};

/// Score magnitude for a decided board at depth 0 (board size + 1).
const WIN_SCORE: i32 = Board::SIZE as i32 + 1;

/// Returns the best move for `mark` on `board`, or `None` when the board
/// is full or already decided.
///
/// Candidate cells are tried in ascending position order and a candidate
/// replaces the incumbent only on a strictly greater score, so ties keep
/// the lowest-index cell. That tie-break is part of the contract
/// (reproducible openings), not an accident of iteration order.
pub fn best_move(board: &Board, mark: Mark) -> Option<Cell> {
    if board.status().is_decided() {
        return None;
    }

    let mut scratch = *board;
    let mut best: Option<(Cell, i32)> = None;
    let candidates: Vec<Cell> = scratch.empty_cells().collect();

    for cell in candidates {
        scratch.set(cell, mark);
        let score = minimax(&mut scratch, mark, 0, false);
        scratch.clear(cell);

        match best {
            Some((_, incumbent)) if score <= incumbent => {}
            _ => best = Some((cell, score)),
        }
    }

    best.map(|(cell, _)| cell)
}

/// Plain depth-first minimax. `maximizing` is `true` when it is `mark`'s
/// turn to place.
fn minimax(board: &mut Board, mark: Mark, depth: i32, maximizing: bool) -> i32 {
    match board.winning_mark() {
        Some(winner) if winner == mark => return WIN_SCORE - depth,
        Some(_) => return depth - WIN_SCORE,
        None => {}
    }
    if board.is_full() {
        return 0;
    }

    let to_place = if maximizing { mark } else { mark.other() };
    let candidates: Vec<Cell> = board.empty_cells().collect();
    let mut best = if maximizing { i32::MIN } else { i32::MAX };

    for cell in candidates {
        board.set(cell, to_place);
        let value = minimax(board, mark, depth + 1, !maximizing);
        board.clear(cell);

        if maximizing {
            best = best.max(value);
        } else {
            best = best.min(value);
        }
    }
    best
}

/// The automated player: a [`MoveSource`] backed by [`best_move`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Oracle;

impl MoveSource for Oracle {
    fn choose(&mut self, game: &Game, mark: Mark) -> Option<Cell> {
        best_move(game.board(), mark)
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Winner;

    fn cell(n: u8) -> Cell {
        Cell::new(n).unwrap()
    }

    fn board_from(layout: &[(u8, Mark)]) -> Board {
        let mut board = Board::new();
        for (n, mark) in layout {
            board.set(cell(*n), *mark);
        }
        board
    }

    #[test]
    fn test_empty_board_opens_at_cell_1() {
        // Every opening scores a draw against perfect play, so the
        // lowest-index tie-break must pick cell 1. Pinned as the
        // reference opening.
        assert_eq!(best_move(&Board::new(), Mark::X), Some(cell(1)));
    }

    #[test]
    fn test_takes_immediate_win_over_block() {
        // X X _ / O O _ / _ _ _  with O to move: completing 4-5-6 wins
        // outright and must beat merely blocking at cell 3.
        let board = board_from(&[
            (1, Mark::X),
            (2, Mark::X),
            (4, Mark::O),
            (5, Mark::O),
        ]);
        assert_eq!(best_move(&board, Mark::O), Some(cell(6)));
    }

    #[test]
    fn test_blocks_opponent_threat() {
        // X X _ over an otherwise quiet board: O has no win anywhere, so
        // it must deny 1-2-3.
        let board = board_from(&[(1, Mark::X), (2, Mark::X), (5, Mark::O)]);
        assert_eq!(best_move(&board, Mark::O), Some(cell(3)));
    }

    #[test]
    fn test_returns_only_empty_cells() {
        let mut board = Board::new();
        let mut mark = Mark::X;
        // Walk an arbitrary game forward, asking the oracle each turn.
        for _ in 0..Board::SIZE {
            if board.status().is_decided() {
                break;
            }
            let chosen = best_move(&board, mark).expect("board not full");
            assert!(board.is_empty(chosen), "oracle chose occupied {chosen}");
            board.set(chosen, mark);
            mark = mark.other();
        }
    }

    #[test]
    fn test_deterministic() {
        let board = board_from(&[(5, Mark::X), (1, Mark::O)]);
        let first = best_move(&board, Mark::X);
        for _ in 0..10 {
            assert_eq!(best_move(&board, Mark::X), first);
        }
    }

    #[test]
    fn test_decided_board_yields_no_move() {
        let board = board_from(&[(1, Mark::X), (2, Mark::X), (3, Mark::X)]);
        assert_eq!(best_move(&board, Mark::O), None);
    }

    #[test]
    fn test_self_play_always_draws() {
        // Two perfect players never produce a winner.
        let mut board = Board::new();
        let mut mark = Mark::X;
        while board.status() == Winner::Undetermined {
            let chosen = best_move(&board, mark).expect("undecided board");
            board.set(chosen, mark);
            mark = mark.other();
        }
        assert_eq!(board.status(), Winner::Draw);
    }

    #[test]
    fn test_prefers_faster_win() {
        // O _ O / _ X _ / X _ X  with X to move: cells 2, 4, 6 and 8 are
        // free; 8 wins immediately (7-8-9), everything else lets the
        // game drag on. Fast wins must outscore slow ones.
        let board = board_from(&[
            (1, Mark::O),
            (3, Mark::O),
            (5, Mark::X),
            (7, Mark::X),
            (9, Mark::X),
        ]);
        assert_eq!(best_move(&board, Mark::X), Some(cell(8)));
    }
}
