//! Resume-snapshot encoding.
//!
//! A snapshot is the full board in 9 bytes, one per cell in position
//! order: `0` for an empty cell, otherwise the mark byte (`b'X'` /
//! `b'O'`). It travels immediately after a RESUME_GAME message and
//! nowhere else.

use trigrid_game::{Board, Cell, Mark};

use crate::ProtocolError;

/// Size of a resume snapshot: one byte per board cell.
pub const SNAPSHOT_LEN: usize = Board::SIZE;

/// Byte marking an empty cell in a snapshot.
const EMPTY: u8 = 0;

/// Serializes a board into the 9-byte snapshot form.
pub fn encode_snapshot(board: &Board) -> [u8; SNAPSHOT_LEN] {
    let mut bytes = [EMPTY; SNAPSHOT_LEN];
    for (index, byte) in bytes.iter_mut().enumerate() {
        let cell = Cell::new(index as u8 + 1).expect("index in range");
        if let Some(mark) = board.get(cell) {
            *byte = mark.as_byte();
        }
    }
    bytes
}

/// Parses a 9-byte snapshot back into a board.
///
/// Validates every byte; whether the resulting board is *playable*
/// (alternation, terminal status) is the session layer's call, not the
/// codec's.
pub fn decode_snapshot(
    bytes: &[u8; SNAPSHOT_LEN],
) -> Result<Board, ProtocolError> {
    let mut board = Board::new();
    for (index, &byte) in bytes.iter().enumerate() {
        if byte == EMPTY {
            continue;
        }
        let mark = Mark::from_byte(byte).ok_or(
            ProtocolError::InvalidSnapshotByte { index, value: byte },
        )?;
        let cell = Cell::new(index as u8 + 1).expect("index in range");
        board.set(cell, mark);
    }
    Ok(board)
}

// =========================================================================
// Tests
// =========================================================================
