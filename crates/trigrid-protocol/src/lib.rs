//! Wire protocol for trigrid.
//!
//! Everything on the wire is fixed-size binary:
//!
//! - **Session messages** ([`SessionMessage`]) — exactly 4 bytes over the
//!   stream transport: `[version, command, data, slot]`.
//! - **Discovery datagrams** ([`DiscoveryMessage`]) — 2 bytes for
//!   REQUEST_GAME, 4 bytes for GAME_AVAILABLE (version, command, and a
//!   network-order port).
//! - **Resume snapshots** — exactly 9 bytes, one per board cell
//!   ([`encode_snapshot`] / [`decode_snapshot`]).
//!
//! Decoding validates the protocol version and the command range before
//! anything is dispatched; a bad byte is a [`ProtocolError`], never a
//! panic. The protocol layer knows nothing about sockets or slots beyond
//! the bytes themselves.

mod codec;
mod error;
mod types;

pub use codec::{decode_snapshot, encode_snapshot, SNAPSHOT_LEN};
pub use error::ProtocolError;
pub use types::{
    DiscoveryMessage, SessionCommand, SessionMessage, DISCOVERY_REPLY_LEN,
    DISCOVERY_REQUEST_LEN, PROTOCOL_VERSION, SESSION_MESSAGE_LEN,
};
