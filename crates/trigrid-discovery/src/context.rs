//! Multicast host discovery and the challenger's connect loop.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use tokio::net::{TcpStream, UdpSocket};
use tracing::{debug, info, warn};
use trigrid_protocol::{DiscoveryMessage, DISCOVERY_REPLY_LEN};

use crate::DiscoveryError;

/// The well-known multicast group hosts listen on.
pub const MULTICAST_GROUP: Ipv4Addr = Ipv4Addr::new(239, 0, 0, 1);

/// The well-known discovery port.
pub const MULTICAST_PORT: u16 = 1818;

/// How long a challenger waits for any host to answer a probe.
pub const DISCOVERY_TIMEOUT: Duration = Duration::from_secs(30);

/// How many failed TCP connections a challenger tolerates before
/// giving up on discovery entirely.
pub const MAX_CONNECT_ATTEMPTS: u32 = 5;

/// Binds the host-side discovery socket: the well-known port, joined
/// to the multicast group on all interfaces.
pub async fn host_socket() -> std::io::Result<UdpSocket> {
    let socket =
        UdpSocket::bind((Ipv4Addr::UNSPECIFIED, MULTICAST_PORT)).await?;
    socket.join_multicast_v4(MULTICAST_GROUP, Ipv4Addr::UNSPECIFIED)?;
    info!(group = %MULTICAST_GROUP, port = MULTICAST_PORT, "joined discovery group");
    Ok(socket)
}

/// A challenger-side discovery session.
///
/// Owns the probe socket and the retry budget. The group address is a
/// parameter rather than a constant so tests can point it at a plain
/// unicast responder.
#[derive(Debug)]
pub struct DiscoveryContext {
    socket: UdpSocket,
    group: SocketAddr,
    timeout: Duration,
    max_attempts: u32,
}

impl DiscoveryContext {
    /// Creates a context probing the default multicast group.
    pub async fn bind() -> std::io::Result<Self> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).await?;
        Ok(Self::new(
            socket,
            SocketAddr::from((MULTICAST_GROUP, MULTICAST_PORT)),
        ))
    }

    /// Creates a context over an already-bound socket, probing `group`.
    pub fn new(socket: UdpSocket, group: SocketAddr) -> Self {
        Self {
            socket,
            group,
            timeout: DISCOVERY_TIMEOUT,
            max_attempts: MAX_CONNECT_ATTEMPTS,
        }
    }

    /// Overrides the per-probe reply deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overrides the connection retry budget.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Probes for a host and connects to the first one that answers.
    ///
    /// Each round sends one request to the group, waits for a
    /// GAME_AVAILABLE reply, and dials the announced port at the
    /// replying address. A failed dial burns one attempt and starts a
    /// new round; silence for the full deadline ends discovery.
    pub async fn find_host(&self) -> Result<TcpStream, DiscoveryError> {
        for attempt in 1..=self.max_attempts {
            let host = self.probe().await?;
            debug!(%host, attempt, "host announced availability");
            match TcpStream::connect(host).await {
                Ok(stream) => {
                    info!(%host, "connected to host");
                    return Ok(stream);
                }
                Err(err) => {
                    warn!(%host, attempt, error = %err, "connection failed");
                }
            }
        }
        Err(DiscoveryError::AttemptsExhausted(self.max_attempts))
    }

    /// One probe round: request out, first decodable reply in.
    async fn probe(&self) -> Result<SocketAddr, DiscoveryError> {
        let request = DiscoveryMessage::RequestGame.encode();
        self.socket.send_to(&request, self.group).await?;

        let mut buf = [0u8; DISCOVERY_REPLY_LEN];
        let (len, from) =
            tokio::time::timeout(self.timeout, self.socket.recv_from(&mut buf))
                .await
                .map_err(|_| DiscoveryError::Timeout(self.timeout))??;

        match DiscoveryMessage::decode(&buf[..len])? {
            DiscoveryMessage::GameAvailable { port } => {
                Ok(SocketAddr::from((from.ip(), port)))
            }
            DiscoveryMessage::RequestGame => {
                // Another challenger's probe echoed back to us; treat it
                // as silence rather than a malformed reply.
                Err(DiscoveryError::Timeout(self.timeout))
            }
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpListener;

    async fn loopback_context(
        responder: &UdpSocket,
    ) -> DiscoveryContext {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let group = responder.local_addr().unwrap();
        DiscoveryContext::new(socket, group)
            .with_timeout(Duration::from_millis(500))
    }

    /// Answers one probe on `responder` with GAME_AVAILABLE for `port`.
    async fn answer_one(responder: UdpSocket, port: u16) {
        let mut buf = [0u8; 8];
        let (len, from) = responder.recv_from(&mut buf).await.unwrap();
        assert!(matches!(
            DiscoveryMessage::decode(&buf[..len]).unwrap(),
            DiscoveryMessage::RequestGame,
        ));
        let reply = DiscoveryMessage::GameAvailable { port }.encode();
        responder.send_to(&reply, from).await.unwrap();
    }

    #[tokio::test]
    async fn test_find_host_connects_to_announced_port() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let responder = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let ctx = loopback_context(&responder).await;
        tokio::spawn(answer_one(responder, port));

        let finder = tokio::spawn(async move { ctx.find_host().await });
        let (mut accepted, _) = listener.accept().await.unwrap();
        let mut stream = finder.await.unwrap().unwrap();

        // Prove the two ends are actually the same connection.
        accepted.write_all(b"hi").await.unwrap();
        let mut got = [0u8; 2];
        tokio::io::AsyncReadExt::read_exact(&mut stream, &mut got)
            .await
            .unwrap();
        assert_eq!(&got, b"hi");
    }

    #[tokio::test]
    async fn test_silence_is_a_timeout() {
        // Bound but never answering.
        let responder = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let ctx = loopback_context(&responder)
            .await
            .with_timeout(Duration::from_millis(100));

        match ctx.find_host().await {
            Err(DiscoveryError::Timeout(_)) => {}
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_host_exhausts_attempts() {
        // Grab a port, then free it so every dial is refused.
        let dead_port = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };

        let responder = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let ctx = loopback_context(&responder)
            .await
            .with_max_attempts(2);
        tokio::spawn(async move {
            // Answer every round; the dial is what keeps failing.
            loop {
                let mut buf = [0u8; 8];
                let (_, from) = responder.recv_from(&mut buf).await.unwrap();
                let reply =
                    DiscoveryMessage::GameAvailable { port: dead_port }
                        .encode();
                responder.send_to(&reply, from).await.unwrap();
            }
        });

        match ctx.find_host().await {
            Err(DiscoveryError::AttemptsExhausted(2)) => {}
            other => panic!("expected exhaustion, got {other:?}"),
        }
    }
}
