//! trigrid: a networked tic-tac-toe session service.
//!
//! A host seats up to ten challengers at once, answering every game
//! with an exhaustive-search opponent, all multiplexed on one task.
//! Challengers find hosts over UDP multicast, play over a fixed 4-byte
//! TCP message format, and can carry an interrupted board to a
//! replacement host.
//!
//! The layers live in their own crates; this one ties them together:
//!
//! - [`trigrid_game`] — board, rules, and the move search
//! - [`trigrid_protocol`] — the wire format
//! - [`trigrid_registry`] — the host's slot pool
//! - [`trigrid_discovery`] — the multicast rendezvous
//!
//! and contributes the two endpoints built on top of them:
//!
//! - [`SessionHost`] — the accepting, multiplexing side
//! - [`Challenger`] — the connecting side
//! - [`session::step`] — the host's per-slot state machine, pure

pub mod challenger;
pub mod error;
pub mod host;
pub mod input;
pub mod session;

pub use challenger::Challenger;
pub use error::TrigridError;
pub use host::SessionHost;
pub use input::HumanPrompt;
