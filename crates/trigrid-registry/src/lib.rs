//! The session registry: a fixed pool of game slots for the trigrid host.
//!
//! Slots are created once at startup and recycled forever after — an
//! arena indexed by a small 1-based id, never a growable collection.
//! Capacity is a design parameter (10 in the reference deployment), so
//! running out of slots is an expected condition, not a failure of the
//! pool.
//!
//! The pool is generic over the peer handle `P` so the event loop can
//! store live streams while tests store plain values.
//!
//! # Key types
//!
//! - [`SlotId`] — stable 1-based slot identity
//! - [`Phase`] — the per-slot protocol state machine position
//! - [`GameSlot`] — one slot: peer handle + game + phase
//! - [`Registry`] — the pool, first-free-ascending assignment

mod error;
mod registry;
mod slot;

pub use error::RegistryError;
pub use registry::{Registry, DEFAULT_CAPACITY};
pub use slot::{GameSlot, Phase, SlotId};
