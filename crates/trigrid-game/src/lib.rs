//! Game model for trigrid: the 9-cell board, move legality, terminal
//! detection, and the exhaustive minimax move oracle.
//!
//! This crate is pure — no sockets, no async, no side effects beyond the
//! board a caller hands in. Everything network-facing builds on top of it.
//!
//! # Key types
//!
//! - [`Board`] / [`Cell`] / [`Mark`] — the shared game state
//! - [`Game`] — a board plus its decided-winner field
//! - [`Winner`] — undetermined / draw / a side won
//! - [`MoveSource`] — where the local side's moves come from
//! - [`Oracle`] — the minimax search, one [`MoveSource`] among others

mod board;
mod error;
mod game;
mod oracle;
mod source;

pub use board::{Board, Cell, Mark, Winner};
pub use error::MoveError;
pub use game::Game;
pub use oracle::{best_move, Oracle};
pub use source::MoveSource;
