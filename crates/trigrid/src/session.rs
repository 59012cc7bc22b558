//! The host-side session state machine.
//!
//! [`step`] is the whole protocol for one slot, as a pure function:
//! current phase and game in, one inbound message in, replies and a
//! verdict out. The event loop owns the sockets; nothing here does I/O,
//! which is what lets the machine be tested message by message.

use tracing::{debug, warn};
use trigrid_game::{Board, Game, Mark, MoveSource, Winner};
use trigrid_protocol::SessionMessage;
use trigrid_registry::{Phase, SlotId};

/// An inbound session message, already decoded and (for RESUME_GAME)
/// already joined with its snapshot.
#[derive(Debug, Clone, Copy)]
pub enum Inbound {
    NewGame,
    Move(u8),
    GameOver,
    Resume(Board),
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// The game ran to completion and both sides acknowledged it.
    Completed(Winner),
    /// The challenger sent GAME_OVER with the game still undecided.
    Abandoned,
    /// The challenger broke the protocol: an illegal move, a message
    /// that makes no sense in the current phase, or an unplayable
    /// resume snapshot.
    Violation,
}

impl std::fmt::Display for EndReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Completed(winner) => write!(f, "completed ({winner})"),
            Self::Abandoned => write!(f, "abandoned by challenger"),
            Self::Violation => write!(f, "protocol violation"),
        }
    }
}

/// What the event loop should do with the slot after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Keep the session; the updated phase says what comes next.
    Continue,
    /// Recycle the slot, closing the connection.
    End(EndReason),
}

/// One step's output: messages to write to the challenger, in order,
/// then the verdict.
#[derive(Debug)]
pub struct StepResult {
    pub replies: Vec<SessionMessage>,
    pub verdict: Verdict,
}

impl StepResult {
    fn contin(replies: Vec<SessionMessage>) -> Self {
        Self {
            replies,
            verdict: Verdict::Continue,
        }
    }

    fn end(replies: Vec<SessionMessage>, reason: EndReason) -> Self {
        Self {
            replies,
            verdict: Verdict::End(reason),
        }
    }
}

/// Advances one slot's session by one inbound message.
///
/// The host always plays [`Mark::X`] and moves first; `source` picks
/// its moves. Phase handling follows one asymmetry throughout: the side
/// whose own move ends the game stays quiet and waits for the peer's
/// GAME_OVER, while the side that *receives* the ending move answers
/// with GAME_OVER immediately.
pub fn step<S: MoveSource>(
    id: SlotId,
    phase: &mut Phase,
    game: &mut Game,
    source: &mut S,
    inbound: Inbound,
) -> StepResult {
    match (*phase, inbound) {
        (Phase::AwaitingNewGame, Inbound::NewGame) => {
            game.reset();
            open_with_move(id, phase, game, source)
        }
        (Phase::AwaitingNewGame, Inbound::Resume(board)) => {
            // Equal counts are taken to mean strict alternation survived
            // the disconnect, with the host on move. Corruption that
            // keeps the counts equal passes this check undetected.
            if board.count(Mark::X) != board.count(Mark::O) {
                warn!(slot = %id, "rejecting snapshot with unbalanced marks");
                return StepResult::end(vec![], EndReason::Violation);
            }
            let status = board.status();
            if status.is_decided() {
                // Nothing left to play; just confirm the ending.
                return StepResult::end(
                    vec![SessionMessage::game_over(id.as_u8())],
                    EndReason::Completed(status),
                );
            }
            *game = Game::from_board(board);
            debug!(slot = %id, "game resumed from snapshot");
            open_with_move(id, phase, game, source)
        }
        (Phase::InProgress, Inbound::Move(data)) => {
            let choice = data.wrapping_sub(b'0');
            let cell = match game.validate(choice) {
                Ok(cell) => cell,
                Err(err) => {
                    warn!(slot = %id, error = %err, "illegal challenger move");
                    return StepResult::end(vec![], EndReason::Violation);
                }
            };
            game.apply(cell, Mark::O);
            debug!(slot = %id, %cell, "challenger played");
            let after_theirs = game.check_over();
            if after_theirs.is_decided() {
                // Their move ended it; acknowledge and recycle.
                return StepResult::end(
                    vec![SessionMessage::game_over(id.as_u8())],
                    EndReason::Completed(after_theirs),
                );
            }
            answer_with_move(id, phase, game, source)
        }
        (Phase::InProgress, Inbound::GameOver) => {
            StepResult::end(vec![], EndReason::Abandoned)
        }
        (Phase::Terminal, Inbound::GameOver) => {
            StepResult::end(vec![], EndReason::Completed(game.winner()))
        }
        (phase_now, inbound) => {
            warn!(
                slot = %id,
                phase = %phase_now,
                ?inbound,
                "message out of phase",
            );
            StepResult::end(vec![], EndReason::Violation)
        }
    }
}

/// First host move of a fresh or resumed game.
fn open_with_move<S: MoveSource>(
    id: SlotId,
    phase: &mut Phase,
    game: &mut Game,
    source: &mut S,
) -> StepResult {
    *phase = Phase::InProgress;
    answer_with_move(id, phase, game, source)
}

/// Plays the host's move and decides whether to keep going or wait for
/// the challenger's GAME_OVER.
fn answer_with_move<S: MoveSource>(
    id: SlotId,
    phase: &mut Phase,
    game: &mut Game,
    source: &mut S,
) -> StepResult {
    let Some(cell) = source.choose(game, Mark::X) else {
        // No legal move on an undecided board cannot happen with the
        // search-backed source; treat it as the game being over.
        return StepResult::end(
            vec![SessionMessage::game_over(id.as_u8())],
            EndReason::Completed(game.winner()),
        );
    };
    game.apply(cell, Mark::X);
    debug!(slot = %id, %cell, "host played");
    let reply = SessionMessage::move_at(cell, id.as_u8());
    if game.check_over().is_decided() {
        // Our move ended it; send the move and wait for their GAME_OVER.
        *phase = Phase::Terminal;
    }
    StepResult::contin(vec![reply])
}

// =========================================================================
// Tests
// =========================================================================
