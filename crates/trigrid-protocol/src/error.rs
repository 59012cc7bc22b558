//! Error type for the protocol layer.

/// Errors raised while decoding wire bytes.
///
/// Every variant is a peer problem, not a local one: the session layer
/// answers each with a slot reset (host) or session abort (challenger),
/// never by terminating the host process.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// The version byte is not the single supported version.
    #[error("unsupported protocol version {0}")]
    UnsupportedVersion(u8),

    /// The command byte is outside the defined range.
    #[error("unknown command byte {0:#04x}")]
    UnknownCommand(u8),

    /// A command that requires a slot id carried slot 0.
    #[error("missing slot id for {0}")]
    MissingSlot(crate::SessionCommand),

    /// A datagram was shorter than its command requires.
    #[error("truncated datagram: expected {expected} bytes, got {got}")]
    Truncated { expected: usize, got: usize },

    /// A resume snapshot byte is neither empty nor a valid mark.
    #[error("invalid snapshot byte {value:#04x} at cell {index}")]
    InvalidSnapshotByte { index: usize, value: u8 },
}
