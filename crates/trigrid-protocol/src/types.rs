//! Wire message types and protocol constants.

use std::fmt;

use trigrid_game::Cell;

use crate::ProtocolError;

/// The single supported protocol version. Both peers stamp it on every
/// message; anything else is invalid by construction.
pub const PROTOCOL_VERSION: u8 = 6;

/// Size of a session message on the stream transport.
pub const SESSION_MESSAGE_LEN: usize = 4;

/// Size of a REQUEST_GAME datagram.
pub const DISCOVERY_REQUEST_LEN: usize = 2;

/// Size of a GAME_AVAILABLE datagram.
pub const DISCOVERY_REPLY_LEN: usize = 4;

/// Discovery command byte for "who has a free game?".
pub(crate) const REQUEST_GAME: u8 = 0x04;

/// Discovery command byte for "I do, on this port".
pub(crate) const GAME_AVAILABLE: u8 = 0x05;

// ---------------------------------------------------------------------------
// SessionCommand
// ---------------------------------------------------------------------------

/// The four session commands.
///
/// The original dispatch was a command-indexed function-pointer table;
/// here the command is an enum and dispatch is a `match` at the session
/// layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SessionCommand {
    /// Challenger → host: start a fresh game.
    NewGame = 0x00,
    /// Either direction: a move, the cell in the data byte.
    Move = 0x01,
    /// Either direction: the game ended (or the sender is leaving).
    GameOver = 0x02,
    /// Challenger → host: adopt the 9-byte snapshot that follows.
    ResumeGame = 0x03,
}

impl SessionCommand {
    fn from_byte(byte: u8) -> Result<Self, ProtocolError> {
        match byte {
            0x00 => Ok(Self::NewGame),
            0x01 => Ok(Self::Move),
            0x02 => Ok(Self::GameOver),
            0x03 => Ok(Self::ResumeGame),
            other => Err(ProtocolError::UnknownCommand(other)),
        }
    }

    /// Whether this command must carry a nonzero slot id.
    fn requires_slot(self) -> bool {
        !matches!(self, Self::NewGame)
    }
}

impl fmt::Display for SessionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NewGame => "NEW_GAME",
            Self::Move => "MOVE",
            Self::GameOver => "GAME_OVER",
            Self::ResumeGame => "RESUME_GAME",
        };
        write!(f, "{name}")
    }
}

// ---------------------------------------------------------------------------
// SessionMessage
// ---------------------------------------------------------------------------

/// One 4-byte session message: `[version, command, data, slot]`.
///
/// `data` is meaningful only for [`SessionCommand::Move`], where it holds
/// the chosen cell as its ASCII digit. `slot` is the 1-based game slot
/// and is required (nonzero) for every command except NEW_GAME; inbound
/// it is advisory — the host identifies the session by which stream the
/// message arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionMessage {
    pub command: SessionCommand,
    pub data: u8,
    pub slot: u8,
}

impl SessionMessage {
    /// A NEW_GAME request (no slot assigned yet).
    pub fn new_game() -> Self {
        Self {
            command: SessionCommand::NewGame,
            data: 0,
            slot: 0,
        }
    }

    /// A MOVE of `cell` within `slot`.
    pub fn move_at(cell: Cell, slot: u8) -> Self {
        Self {
            command: SessionCommand::Move,
            data: cell.as_digit(),
            slot,
        }
    }

    /// A GAME_OVER notice for `slot`.
    pub fn game_over(slot: u8) -> Self {
        Self {
            command: SessionCommand::GameOver,
            data: 0,
            slot,
        }
    }

    /// A RESUME_GAME announcement for `slot`; the 9-byte snapshot
    /// follows as a separate write.
    pub fn resume_game(slot: u8) -> Self {
        Self {
            command: SessionCommand::ResumeGame,
            data: 0,
            slot,
        }
    }

    /// Serializes to the fixed 4-byte wire form.
    pub fn encode(&self) -> [u8; SESSION_MESSAGE_LEN] {
        [
            PROTOCOL_VERSION,
            self.command as u8,
            self.data,
            self.slot,
        ]
    }

    /// Parses the fixed 4-byte wire form, validating version, command
    /// range, and the slot-id requirement before anything is dispatched.
    pub fn decode(
        bytes: &[u8; SESSION_MESSAGE_LEN],
    ) -> Result<Self, ProtocolError> {
        let [version, command, data, slot] = *bytes;
        if version != PROTOCOL_VERSION {
            return Err(ProtocolError::UnsupportedVersion(version));
        }
        let command = SessionCommand::from_byte(command)?;
        if command.requires_slot() && slot == 0 {
            return Err(ProtocolError::MissingSlot(command));
        }
        Ok(Self {
            command,
            data,
            slot,
        })
    }
}

// ---------------------------------------------------------------------------
// DiscoveryMessage
// ---------------------------------------------------------------------------

/// A discovery datagram.
///
/// REQUEST_GAME is broadcast by a challenger looking for a host;
/// GAME_AVAILABLE is the host's unicast answer carrying the port its
/// session listener is bound to (the address is the datagram's source).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryMessage {
    RequestGame,
    GameAvailable { port: u16 },
}

impl DiscoveryMessage {
    /// Serializes to the 2- or 4-byte wire form. The port travels in
    /// network byte order.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Self::RequestGame => vec![PROTOCOL_VERSION, REQUEST_GAME],
            Self::GameAvailable { port } => {
                let [hi, lo] = port.to_be_bytes();
                vec![PROTOCOL_VERSION, GAME_AVAILABLE, hi, lo]
            }
        }
    }

    /// Parses a received datagram.
    pub fn decode(bytes: &[u8]) -> Result<Self, ProtocolError> {
        if bytes.len() < DISCOVERY_REQUEST_LEN {
            return Err(ProtocolError::Truncated {
                expected: DISCOVERY_REQUEST_LEN,
                got: bytes.len(),
            });
        }
        if bytes[0] != PROTOCOL_VERSION {
            return Err(ProtocolError::UnsupportedVersion(bytes[0]));
        }
        match bytes[1] {
            REQUEST_GAME => Ok(Self::RequestGame),
            GAME_AVAILABLE => {
                if bytes.len() < DISCOVERY_REPLY_LEN {
                    return Err(ProtocolError::Truncated {
                        expected: DISCOVERY_REPLY_LEN,
                        got: bytes.len(),
                    });
                }
                let port = u16::from_be_bytes([bytes[2], bytes[3]]);
                Ok(Self::GameAvailable { port })
            }
            other => Err(ProtocolError::UnknownCommand(other)),
        }
    }
}
