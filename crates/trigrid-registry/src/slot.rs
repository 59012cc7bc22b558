//! One game slot: identity, peer handle, game state, protocol phase.

use std::fmt;

use trigrid_game::Game;

// ---------------------------------------------------------------------------
// SlotId
// ---------------------------------------------------------------------------

/// A stable, 1-based slot identity.
///
/// Assigned at pool construction and never reused for a different slot
/// for the life of the process. This is also the id stamped into the
/// `slot` byte of outbound session messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(u8);

impl SlotId {
    /// Creates a slot id from a 1-based number. Zero is reserved on the
    /// wire for "no slot yet".
    pub fn new(id: u8) -> Option<Self> {
        (id != 0).then_some(Self(id))
    }

    /// The raw 1-based id (the wire byte).
    pub fn as_u8(self) -> u8 {
        self.0
    }

    /// The 0-based pool index.
    pub(crate) fn index(self) -> usize {
        usize::from(self.0) - 1
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Where a slot's session currently stands.
///
/// ```text
/// Idle ──accept──▶ AwaitingNewGame ──NEW_GAME / RESUME──▶ InProgress
///  ▲                                                         │
///  │                          local move ends the game       ▼
///  └──── GAME_OVER / disconnect / violation ◀──────────── Terminal
/// ```
///
/// `Terminal` covers the window where the local side's own move decided
/// the game and the slot is waiting for the peer's GAME_OVER
/// acknowledgement. Every exit path funnels back to `Idle` via a reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No peer attached; the slot is available for assignment.
    #[default]
    Idle,
    /// A peer connected but has not opened (or resumed) a game yet.
    AwaitingNewGame,
    /// Moves are being exchanged.
    InProgress,
    /// The game is decided locally; awaiting the peer's GAME_OVER.
    Terminal,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "Idle",
            Self::AwaitingNewGame => "AwaitingNewGame",
            Self::InProgress => "InProgress",
            Self::Terminal => "Terminal",
        };
        write!(f, "{name}")
    }
}

// ---------------------------------------------------------------------------
// GameSlot
// ---------------------------------------------------------------------------

/// A reusable container for one session.
///
/// Created once, recycled on every session end. `peer` is `None` exactly
/// when the phase is [`Phase::Idle`].
#[derive(Debug)]
pub struct GameSlot<P> {
    id: SlotId,
    peer: Option<P>,
    pub game: Game,
    pub phase: Phase,
}

impl<P> GameSlot<P> {
    pub(crate) fn new(id: SlotId) -> Self {
        Self {
            id,
            peer: None,
            game: Game::new(),
            phase: Phase::Idle,
        }
    }

    /// This slot's stable id.
    pub fn id(&self) -> SlotId {
        self.id
    }

    /// Returns `true` when no peer is attached.
    pub fn is_idle(&self) -> bool {
        self.peer.is_none()
    }

    /// The attached peer handle, if any.
    pub fn peer(&self) -> Option<&P> {
        self.peer.as_ref()
    }

    /// Mutable access to the attached peer handle.
    pub fn peer_mut(&mut self) -> Option<&mut P> {
        self.peer.as_mut()
    }

    /// Attaches a freshly accepted peer and arms the session.
    pub(crate) fn attach(&mut self, peer: P) {
        self.peer = Some(peer);
        self.game.reset();
        self.phase = Phase::AwaitingNewGame;
    }

    /// Recycles the slot: detaches the peer (returned so the caller can
    /// close it), resets the board, clears the winner. The id survives.
    pub fn reset(&mut self) -> Option<P> {
        self.game.reset();
        self.phase = Phase::Idle;
        self.peer.take()
    }
}
