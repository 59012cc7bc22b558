//! The crate-wide error type.

use trigrid_discovery::DiscoveryError;
use trigrid_game::MoveError;
use trigrid_protocol::ProtocolError;
use trigrid_registry::RegistryError;

/// Anything that can go wrong across the trigrid layers.
///
/// A transparent aggregation: each layer keeps its own error type and
/// this enum just lets `?` flow them up through the binaries.
#[derive(Debug, thiserror::Error)]
pub enum TrigridError {
    #[error(transparent)]
    Game(#[from] MoveError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The peer vanished mid-game and no rendezvous is configured to
    /// find a replacement host.
    #[error("connection lost with no way to resume")]
    ConnectionLost,
}
