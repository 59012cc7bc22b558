//! The challenger: the connecting side of a session.
//!
//! Mirrors the host's state machine from the other chair. The
//! challenger plays O, always moves second, and is the side that
//! initiates games, resumes, and the discovery handshake.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};
use trigrid_discovery::DiscoveryContext;
use trigrid_game::{Game, Mark, MoveSource, Winner};
use trigrid_protocol::{
    encode_snapshot, SessionCommand, SessionMessage, SESSION_MESSAGE_LEN,
};

use crate::TrigridError;

/// One challenger-side game over an established stream.
///
/// Generic over the move source so the binary can plug in a prompting
/// human and tests can plug in anything scripted.
pub struct Challenger<S> {
    stream: TcpStream,
    source: S,
    game: Game,
    /// Slot id learned from the host's first reply; echoed on every
    /// outbound message. Zero until the host has spoken.
    slot: u8,
    /// How to find a replacement host if this one vanishes mid-game.
    rendezvous: Option<DiscoveryContext>,
}

impl<S: MoveSource> Challenger<S> {
    /// Wraps an established connection.
    pub fn new(stream: TcpStream, source: S) -> Self {
        Self {
            stream,
            source,
            game: Game::new(),
            slot: 0,
            rendezvous: None,
        }
    }

    /// Enables mid-game resume: on disconnect, probe for another host
    /// and hand it the board instead of giving up.
    pub fn with_rendezvous(mut self, rendezvous: DiscoveryContext) -> Self {
        self.rendezvous = Some(rendezvous);
        self
    }

    /// Plays one game to completion and returns the result.
    pub async fn play(mut self) -> Result<Winner, TrigridError> {
        self.send(SessionMessage::new_game()).await?;
        loop {
            let message = match self.receive().await {
                Ok(message) => message,
                Err(TrigridError::Io(err)) if self.resumable() => {
                    info!(error = %err, "host lost mid-game, resuming");
                    self.resume().await?;
                    continue;
                }
                Err(TrigridError::Io(_)) => {
                    return Err(TrigridError::ConnectionLost);
                }
                Err(err) => return Err(err),
            };

            match message.command {
                SessionCommand::Move => {
                    match self.handle_host_move(message).await {
                        Ok(true) => return Ok(self.game.winner()),
                        Ok(false) => {}
                        // A write failure is the same loss as a read
                        // failure; our own move is already on the local
                        // board, so the snapshot hands it over intact.
                        Err(TrigridError::Io(err)) if self.resumable() => {
                            info!(error = %err, "host lost mid-reply, resuming");
                            self.resume().await?;
                        }
                        Err(err) => return Err(err),
                    }
                }
                SessionCommand::GameOver => {
                    self.game.check_over();
                    let winner = self.game.winner();
                    if winner.is_decided() {
                        // The host acknowledged our final move.
                        info!(result = %winner, "game over");
                    } else {
                        // GAME_OVER with the game still open means the
                        // host walked away, not that anybody won.
                        warn!("host abandoned the game");
                    }
                    return Ok(winner);
                }
                other => {
                    warn!(command = %other, "unexpected command from host");
                    return Err(TrigridError::ConnectionLost);
                }
            }
        }
    }

    /// Applies the host's move and answers with ours. Returns `true`
    /// when the game is finished from our side.
    async fn handle_host_move(
        &mut self,
        message: SessionMessage,
    ) -> Result<bool, TrigridError> {
        if self.slot == 0 {
            self.slot = message.slot;
            debug!(slot = self.slot, "seated by host");
        }

        let choice = message.data.wrapping_sub(b'0');
        let cell = self.game.validate(choice)?;
        self.game.apply(cell, Mark::X);
        info!(%cell, "host played");

        if self.game.check_over().is_decided() {
            // Their move ended it; acknowledge and stop.
            info!(result = %self.game.winner(), "game over");
            self.send(SessionMessage::game_over(self.slot)).await?;
            return Ok(true);
        }

        let Some(ours) = self.source.choose(&self.game, Mark::O) else {
            // The source resigning mid-game reads as leaving the table.
            self.send(SessionMessage::game_over(self.slot)).await?;
            return Ok(true);
        };
        self.game.apply(ours, Mark::O);
        self.game.check_over();
        self.send(SessionMessage::move_at(ours, self.slot)).await?;
        // If our move decided it, the host's GAME_OVER comes next.
        Ok(false)
    }

    /// A dropped connection is worth resuming only mid-game and only
    /// with a rendezvous configured.
    fn resumable(&self) -> bool {
        self.rendezvous.is_some() && self.game.board().count(Mark::X) > 0
    }

    /// Finds a replacement host and hands it the current board.
    async fn resume(&mut self) -> Result<(), TrigridError> {
        let rendezvous = self
            .rendezvous
            .as_ref()
            .ok_or(TrigridError::ConnectionLost)?;
        self.stream = rendezvous.find_host().await?;
        // The slot id is the old host's seating; the new host seats us
        // by the stream and ignores it.
        self.send(SessionMessage::resume_game(self.slot)).await?;
        let snapshot = encode_snapshot(self.game.board());
        self.stream.write_all(&snapshot).await?;
        info!("board handed to replacement host");
        Ok(())
    }

    async fn send(&mut self, message: SessionMessage) -> Result<(), TrigridError> {
        self.stream.write_all(&message.encode()).await?;
        Ok(())
    }

    async fn receive(&mut self) -> Result<SessionMessage, TrigridError> {
        let mut buf = [0u8; SESSION_MESSAGE_LEN];
        self.stream.read_exact(&mut buf).await?;
        Ok(SessionMessage::decode(&buf)?)
    }
}
