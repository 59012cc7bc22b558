//! The board and its building blocks.
//!
//! A board is an ordered sequence of 9 cells. Cells are addressed by their
//! 1-based position (the same number a player types and the same number
//! that travels on the wire as an ASCII digit). An unoccupied cell is
//! `None`; the classic "a free square still shows its own digit" rendering
//! is handled by the `Display` impl, not by storing sentinel bytes.

use std::fmt;

// ---------------------------------------------------------------------------
// Mark
// ---------------------------------------------------------------------------

/// One of the two symbols a side places on the board.
///
/// The host (automated) side plays `X` and moves first; the challenger
/// plays `O`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    /// The opposing mark.
    pub fn other(self) -> Self {
        match self {
            Self::X => Self::O,
            Self::O => Self::X,
        }
    }

    /// The wire byte for this mark (used in resume snapshots).
    pub fn as_byte(self) -> u8 {
        match self {
            Self::X => b'X',
            Self::O => b'O',
        }
    }

    /// Parses a snapshot byte into a mark. `b'X'` and `b'O'` only.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'X' => Some(Self::X),
            b'O' => Some(Self::O),
            _ => None,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", char::from(self.as_byte()))
    }
}

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

/// A validated board position, 1 through 9.
///
/// Constructing a `Cell` is the only range check the rest of the crate
/// needs — a `Cell` in hand is always on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell(u8);

impl Cell {
    /// Creates a cell from a 1-based position, rejecting anything
    /// outside 1-9.
    pub fn new(position: u8) -> Option<Self> {
        (1..=9).contains(&position).then_some(Self(position))
    }

    /// The 1-based position.
    pub fn position(self) -> u8 {
        self.0
    }

    /// The 0-based index into the board array.
    pub fn index(self) -> usize {
        usize::from(self.0) - 1
    }

    /// The ASCII digit for this cell (the MOVE wire encoding).
    pub fn as_digit(self) -> u8 {
        self.0 + b'0'
    }

    /// Parses an ASCII digit `b'1'..=b'9'` (the inverse of
    /// [`as_digit`](Self::as_digit)).
    pub fn from_digit(digit: u8) -> Option<Self> {
        Self::new(digit.wrapping_sub(b'0'))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Winner
// ---------------------------------------------------------------------------

/// The decided state of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winner {
    /// The game is still in progress.
    Undetermined,
    /// The board filled with no winning line.
    Draw,
    /// The given mark completed a line.
    Won(Mark),
}

impl Winner {
    /// Returns `true` once the game has ended (win or draw).
    pub fn is_decided(self) -> bool {
        !matches!(self, Self::Undetermined)
    }
}

impl Default for Winner {
    fn default() -> Self {
        Self::Undetermined
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undetermined => write!(f, "undetermined"),
            Self::Draw => write!(f, "draw"),
            Self::Won(mark) => write!(f, "{mark} wins"),
        }
    }
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// The 8 winning lines: rows, columns, diagonals (0-based indices).
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// The shared game state: 9 cells, each empty or holding a mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Board([Option<Mark>; 9]);

impl Board {
    /// Number of cells on the board.
    pub const SIZE: usize = 9;

    /// An empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// The mark at `cell`, if any.
    pub fn get(&self, cell: Cell) -> Option<Mark> {
        self.0[cell.index()]
    }

    /// Returns `true` if `cell` has not been played.
    pub fn is_empty(&self, cell: Cell) -> bool {
        self.get(cell).is_none()
    }

    /// Places `mark` at `cell` unconditionally. Callers validate first;
    /// see [`Game::validate`](crate::Game::validate).
    pub fn set(&mut self, cell: Cell, mark: Mark) {
        self.0[cell.index()] = Some(mark);
    }

    /// Clears `cell` (used by the oracle to undo trial moves).
    pub(crate) fn clear(&mut self, cell: Cell) {
        self.0[cell.index()] = None;
    }

    /// Iterates the currently-empty cells in ascending position order.
    ///
    /// The order is load-bearing: the oracle's tie-break among equally
    /// scored moves keeps the first cell this iterator yields.
    pub fn empty_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_none())
            .map(|(i, _)| Cell(i as u8 + 1))
    }

    /// Counts the cells holding `mark`.
    pub fn count(&self, mark: Mark) -> usize {
        self.0.iter().filter(|slot| **slot == Some(mark)).count()
    }

    /// Returns `true` when no empty cell remains.
    pub fn is_full(&self) -> bool {
        self.0.iter().all(Option::is_some)
    }

    /// The mark that completed a line, if any.
    pub fn winning_mark(&self) -> Option<Mark> {
        LINES.iter().find_map(|line| {
            let first = self.0[line[0]]?;
            (self.0[line[1]] == Some(first) && self.0[line[2]] == Some(first))
                .then_some(first)
        })
    }

    /// Terminal detection over the 8 fixed lines plus fullness.
    ///
    /// Pure and idempotent: calling it on an already-terminal board
    /// returns the same answer and mutates nothing.
    pub fn status(&self) -> Winner {
        if let Some(mark) = self.winning_mark() {
            Winner::Won(mark)
        } else if self.is_full() {
            Winner::Draw
        } else {
            Winner::Undetermined
        }
    }
}

/// Renders the board the way the terminal clients print it: occupied
/// cells show their mark, free cells show their own digit.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let glyph = |i: usize| -> char {
            match self.0[i] {
                Some(mark) => char::from(mark.as_byte()),
                None => char::from(b'1' + i as u8),
            }
        };
        for row in 0..3 {
            writeln!(f, "     |     |     ")?;
            writeln!(
                f,
                "  {}  |  {}  |  {} ",
                glyph(row * 3),
                glyph(row * 3 + 1),
                glyph(row * 3 + 2),
            )?;
            if row < 2 {
                writeln!(f, "_____|_____|_____")?;
            } else {
                writeln!(f, "     |     |     ")?;
            }
        }
        Ok(())
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(n: u8) -> Cell {
        Cell::new(n).unwrap()
    }

    #[test]
    fn test_cell_rejects_out_of_range() {
        assert!(Cell::new(0).is_none());
        assert!(Cell::new(10).is_none());
        assert!(Cell::new(1).is_some());
        assert!(Cell::new(9).is_some());
    }

    #[test]
    fn test_cell_digit_round_trip() {
        for n in 1..=9 {
            let c = cell(n);
            assert_eq!(Cell::from_digit(c.as_digit()), Some(c));
        }
        assert!(Cell::from_digit(b'0').is_none());
        assert!(Cell::from_digit(b'a').is_none());
    }

    #[test]
    fn test_mark_byte_round_trip() {
        assert_eq!(Mark::from_byte(Mark::X.as_byte()), Some(Mark::X));
        assert_eq!(Mark::from_byte(Mark::O.as_byte()), Some(Mark::O));
        assert_eq!(Mark::from_byte(0), None);
        assert_eq!(Mark::from_byte(b'Z'), None);
    }

    #[test]
    fn test_empty_board_status_undetermined() {
        assert_eq!(Board::new().status(), Winner::Undetermined);
    }

    #[test]
    fn test_status_detects_every_line() {
        for line in LINES {
            let mut board = Board::new();
            for idx in line {
                board.set(cell(idx as u8 + 1), Mark::O);
            }
            assert_eq!(board.status(), Winner::Won(Mark::O), "line {line:?}");
        }
    }

    #[test]
    fn test_status_detects_draw() {
        // X O X / X O O / O X X — full, no line.
        let mut board = Board::new();
        let marks = [
            Mark::X,
            Mark::O,
            Mark::X,
            Mark::X,
            Mark::O,
            Mark::O,
            Mark::O,
            Mark::X,
            Mark::X,
        ];
        for (i, mark) in marks.into_iter().enumerate() {
            board.set(cell(i as u8 + 1), mark);
        }
        assert_eq!(board.status(), Winner::Draw);
    }

    #[test]
    fn test_status_is_idempotent_and_pure() {
        let mut board = Board::new();
        board.set(cell(1), Mark::X);
        board.set(cell(2), Mark::X);
        board.set(cell(3), Mark::X);

        let before = board;
        let first = board.status();
        let second = board.status();
        assert_eq!(first, Winner::Won(Mark::X));
        assert_eq!(first, second);
        assert_eq!(board, before);
    }

    #[test]
    fn test_empty_cells_ascending() {
        let mut board = Board::new();
        board.set(cell(2), Mark::X);
        board.set(cell(5), Mark::O);
        let free: Vec<u8> =
            board.empty_cells().map(Cell::position).collect();
        assert_eq!(free, vec![1, 3, 4, 6, 7, 8, 9]);
    }

    #[test]
    fn test_count_marks() {
        let mut board = Board::new();
        board.set(cell(1), Mark::X);
        board.set(cell(5), Mark::X);
        board.set(cell(9), Mark::O);
        assert_eq!(board.count(Mark::X), 2);
        assert_eq!(board.count(Mark::O), 1);
    }

    #[test]
    fn test_display_shows_digits_for_free_cells() {
        let mut board = Board::new();
        board.set(cell(5), Mark::X);
        let rendered = board.to_string();
        assert!(rendered.contains('X'));
        assert!(rendered.contains('1'));
        assert!(rendered.contains('9'));
        assert!(!rendered.contains('5'));
    }
}
