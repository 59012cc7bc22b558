//! The session host: one task multiplexing discovery, accepts, and
//! every live game over a single readiness loop.

use std::io;
use std::net::{Ipv4Addr, SocketAddr};

use futures_util::future;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream, UdpSocket};
use tracing::{debug, info, warn};
use trigrid_game::Oracle;
use trigrid_protocol::{
    decode_snapshot, DiscoveryMessage, SessionCommand, SessionMessage,
    SESSION_MESSAGE_LEN, SNAPSHOT_LEN,
};
use trigrid_registry::{Registry, SlotId, DEFAULT_CAPACITY};

use crate::session::{self, Inbound, Verdict};
use crate::TrigridError;

/// One loop iteration's wakeup, owned so the handler can borrow the
/// registry mutably after the readiness futures are gone.
enum Event {
    Probe(Vec<u8>, SocketAddr),
    Accepted(TcpStream, SocketAddr),
    Ready(SlotId),
}

/// One seated challenger: the stream plus the bytes of any message
/// still being assembled.
///
/// Reads never block the event loop. A readiness wakeup drains what the
/// socket actually holds with `try_read` into `inbox`; complete frames
/// are peeled off, partial ones wait for the next wakeup. Readiness can
/// fire with nothing pending at all, in which case the drain is a no-op
/// and the loop moves on.
struct Peer {
    stream: TcpStream,
    inbox: Vec<u8>,
}

impl Peer {
    fn new(stream: TcpStream) -> Self {
        Self {
            stream,
            inbox: Vec::new(),
        }
    }

    /// Pulls everything currently readable on the stream into the
    /// inbox. Returns without blocking once the socket is drained.
    fn fill(&mut self) -> io::Result<()> {
        loop {
            let mut chunk = [0u8; 64];
            match self.stream.try_read(&mut chunk) {
                Ok(0) => {
                    return Err(io::ErrorKind::UnexpectedEof.into());
                }
                Ok(n) => self.inbox.extend_from_slice(&chunk[..n]),
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => {
                    return Ok(());
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Takes one complete message off the inbox, if one has fully
    /// arrived, consuming its bytes. RESUME_GAME is complete only once
    /// its trailing snapshot is in too.
    fn next_inbound(&mut self) -> Result<Option<Inbound>, TrigridError> {
        if self.inbox.len() < SESSION_MESSAGE_LEN {
            return Ok(None);
        }
        let header: [u8; SESSION_MESSAGE_LEN] = self.inbox
            [..SESSION_MESSAGE_LEN]
            .try_into()
            .expect("sliced to length");
        let message = SessionMessage::decode(&header)?;

        let inbound = match message.command {
            SessionCommand::NewGame => Inbound::NewGame,
            SessionCommand::Move => Inbound::Move(message.data),
            SessionCommand::GameOver => Inbound::GameOver,
            SessionCommand::ResumeGame => {
                let framed = SESSION_MESSAGE_LEN + SNAPSHOT_LEN;
                if self.inbox.len() < framed {
                    return Ok(None);
                }
                let snapshot: [u8; SNAPSHOT_LEN] = self.inbox
                    [SESSION_MESSAGE_LEN..framed]
                    .try_into()
                    .expect("sliced to length");
                let board = decode_snapshot(&snapshot)?;
                self.inbox.drain(..framed);
                return Ok(Some(Inbound::Resume(board)));
            }
        };
        self.inbox.drain(..SESSION_MESSAGE_LEN);
        Ok(Some(inbound))
    }
}

/// The host process: a TCP listener for sessions, a UDP socket for
/// discovery, and the fixed slot pool.
///
/// Everything runs on one task. Per iteration the loop waits on the
/// discovery socket, the listener, and readability of every occupied
/// slot's stream at once; whichever fires first is handled to
/// completion before the next wait. Slot reads are nonblocking (see
/// [`Peer`]), so a quiet or slow-writing peer never holds up the other
/// sessions, the listener, or discovery.
pub struct SessionHost {
    listener: TcpListener,
    discovery: UdpSocket,
    registry: Registry<Peer>,
    oracle: Oracle,
}

impl SessionHost {
    /// Builds a host from pre-bound sockets. Tests use this with
    /// loopback sockets; production goes through [`bind`](Self::bind).
    pub fn new(
        listener: TcpListener,
        discovery: UdpSocket,
        capacity: usize,
    ) -> Self {
        Self {
            listener,
            discovery,
            registry: Registry::new(capacity),
            oracle: Oracle,
        }
    }

    /// Binds the session listener on `port` (0 for ephemeral) and joins
    /// the discovery multicast group.
    pub async fn bind(port: u16) -> Result<Self, TrigridError> {
        let listener =
            TcpListener::bind((Ipv4Addr::UNSPECIFIED, port)).await?;
        let discovery = trigrid_discovery::host_socket().await?;
        let addr = listener.local_addr()?;
        info!(%addr, slots = DEFAULT_CAPACITY, "host listening");
        Ok(Self::new(listener, discovery, DEFAULT_CAPACITY))
    }

    /// The session listener's bound address.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the host forever (or until a socket-level failure on the
    /// listener or discovery socket).
    pub async fn run(mut self) -> Result<(), TrigridError> {
        loop {
            let event = self.next_event().await?;
            match event {
                Event::Probe(datagram, from) => {
                    self.handle_probe(&datagram, from).await?;
                }
                Event::Accepted(stream, from) => {
                    self.handle_accept(stream, from);
                }
                Event::Ready(id) => {
                    self.handle_ready(id).await?;
                }
            }
        }
    }

    /// Waits for the next wakeup across all three sources.
    async fn next_event(&mut self) -> Result<Event, TrigridError> {
        let mut buf = [0u8; 16];
        let readiness = {
            let waiters: Vec<_> = self
                .registry
                .occupied()
                .map(|(id, peer)| {
                    Box::pin(async move {
                        peer.stream.readable().await.map(|()| id)
                    })
                })
                .collect();
            async move {
                if waiters.is_empty() {
                    future::pending().await
                } else {
                    future::select_all(waiters).await.0
                }
            }
        };

        tokio::select! {
            received = self.discovery.recv_from(&mut buf) => {
                let (len, from) = received?;
                Ok(Event::Probe(buf[..len].to_vec(), from))
            }
            accepted = self.listener.accept() => {
                let (stream, from) = accepted?;
                Ok(Event::Accepted(stream, from))
            }
            ready = readiness => Ok(Event::Ready(ready?)),
        }
    }

    /// Answers a discovery probe if a slot is free; stays silent (and
    /// lets the challenger time out or find another host) if not.
    async fn handle_probe(
        &self,
        datagram: &[u8],
        from: SocketAddr,
    ) -> Result<(), TrigridError> {
        match DiscoveryMessage::decode(datagram) {
            Ok(DiscoveryMessage::RequestGame) => {
                if !self.registry.has_free_slot() {
                    info!(%from, "probe ignored, all slots occupied");
                    return Ok(());
                }
                let port = self.listener.local_addr()?.port();
                let reply = DiscoveryMessage::GameAvailable { port };
                self.discovery.send_to(&reply.encode(), from).await?;
                debug!(%from, port, "availability announced");
            }
            Ok(DiscoveryMessage::GameAvailable { .. }) => {
                // Another host's answer on the shared group; not ours.
            }
            Err(err) => {
                warn!(%from, error = %err, "undecodable probe dropped");
            }
        }
        Ok(())
    }

    /// Seats an accepted connection, or drops it when the pool is full.
    fn handle_accept(&mut self, stream: TcpStream, from: SocketAddr) {
        match self.registry.assign(Peer::new(stream)) {
            Ok(id) => info!(%from, slot = %id, "challenger connected"),
            Err(err) => {
                // Dropping the stream closes it; the challenger sees EOF.
                warn!(%from, error = %err, "connection refused");
            }
        }
    }

    /// Drains a readable slot and applies every fully-arrived message.
    async fn handle_ready(&mut self, id: SlotId) -> Result<(), TrigridError> {
        {
            let slot = self.registry.get_mut(id)?;
            let Some(peer) = slot.peer_mut() else {
                return Ok(());
            };
            if let Err(err) = peer.fill() {
                info!(slot = %id, error = %err, "session read failed");
                self.registry.reset(id)?;
                return Ok(());
            }
        }

        // Apply buffered messages until one ends the session or the
        // inbox holds only a partial frame.
        loop {
            let slot = self.registry.get_mut(id)?;
            let Some(peer) = slot.peer_mut() else {
                return Ok(());
            };
            let inbound = match peer.next_inbound() {
                Ok(Some(inbound)) => inbound,
                Ok(None) => return Ok(()),
                Err(err) => {
                    info!(slot = %id, error = %err, "undecodable message");
                    self.registry.reset(id)?;
                    return Ok(());
                }
            };
            debug!(slot = %id, "message received");

            let result = session::step(
                id,
                &mut slot.phase,
                &mut slot.game,
                &mut self.oracle,
                inbound,
            );

            let mut peer_gone = false;
            if let Some(peer) = slot.peer_mut() {
                for reply in &result.replies {
                    if let Err(err) =
                        peer.stream.write_all(&reply.encode()).await
                    {
                        info!(slot = %id, error = %err, "reply write failed");
                        peer_gone = true;
                        break;
                    }
                }
            }

            match result.verdict {
                Verdict::End(reason) => {
                    info!(slot = %id, %reason, "session ended");
                    self.registry.reset(id)?;
                    return Ok(());
                }
                Verdict::Continue if peer_gone => {
                    self.registry.reset(id)?;
                    return Ok(());
                }
                Verdict::Continue => {}
            }
        }
    }
}
