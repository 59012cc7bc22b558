//! Error types for the discovery layer.

use trigrid_protocol::ProtocolError;

/// Errors that can occur while locating or reaching a host.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    /// No host answered the multicast probe within the deadline.
    #[error("no host replied within {0:?}")]
    Timeout(std::time::Duration),

    /// Hosts replied, but every connection attempt failed.
    #[error("gave up after {0} failed connection attempts")]
    AttemptsExhausted(u32),

    /// A reply arrived but could not be decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Socket-level failure sending or receiving probes.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
