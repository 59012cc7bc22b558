//! Error types for the registry layer.

use crate::SlotId;

/// Errors that can occur during slot pool operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Every slot already holds a peer. The caller refuses the new
    /// connection; nothing in the pool changes.
    #[error("registry full: all {capacity} slots occupied")]
    Full { capacity: usize },

    /// The slot id does not name a slot in this pool.
    #[error("no such slot {0}")]
    UnknownSlot(SlotId),
}
