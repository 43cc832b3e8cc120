// Best-effort UDP transport for snapshots: one JSON datagram per snapshot, latest wins.
// No acknowledgement, retransmission or sequence numbers; a reordered datagram simply
// replaces whatever the receiver held.

use crate::models::Snapshot;
use std::io::ErrorKind;
use std::net::{SocketAddr, ToSocketAddrs};

/// Largest UDP payload over IPv4.
pub const MAX_DATAGRAM_BYTES: usize = 65_507;

/// Receive buffer; anything larger than a datagram is impossible anyway.
const RECV_BUFFER_BYTES: usize = 65_535;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("snapshot is {size} bytes, over the 65507-byte datagram limit")]
    Oversized { size: usize },
    #[error("bind sender socket: {0}")]
    Bind(#[source] std::io::Error),
    #[error("resolve {target}: {reason}")]
    Resolve { target: String, reason: String },
    #[error("send to {target}: {source}")]
    Send {
        target: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("receive: {0}")]
    Receive(#[source] std::io::Error),
    #[error("decode datagram from {from}: {source}")]
    Decode {
        from: SocketAddr,
        #[source]
        source: serde_json::Error,
    },
}

/// Serializes a snapshot into a single datagram payload.
pub fn encode(snapshot: &Snapshot) -> Result<Vec<u8>, TransportError> {
    let bytes = serde_json::to_vec(snapshot).map_err(TransportError::Encode)?;
    if bytes.len() > MAX_DATAGRAM_BYTES {
        return Err(TransportError::Oversized { size: bytes.len() });
    }
    Ok(bytes)
}

pub fn decode(payload: &[u8], from: SocketAddr) -> Result<Snapshot, TransportError> {
    serde_json::from_slice(payload).map_err(|source| TransportError::Decode { from, source })
}

/// Resolves `host:port` to its first IPv4 address.
pub async fn resolve_ipv4(host: &str, port: u16) -> Result<SocketAddr, TransportError> {
    let target = format!("{}:{}", host, port);
    let mut addrs = tokio::net::lookup_host(target.clone())
        .await
        .map_err(|e| TransportError::Resolve {
            target: target.clone(),
            reason: e.to_string(),
        })?;
    addrs
        .find(SocketAddr::is_ipv4)
        .ok_or_else(|| TransportError::Resolve {
            target,
            reason: "no IPv4 address".into(),
        })
}

/// Sending half, owned by the dispatcher loop.
pub struct SnapshotSender {
    socket: tokio::net::UdpSocket,
    target: SocketAddr,
}

impl SnapshotSender {
    pub async fn bind(target: SocketAddr) -> Result<Self, TransportError> {
        let socket = tokio::net::UdpSocket::bind(("0.0.0.0", 0))
            .await
            .map_err(TransportError::Bind)?;
        Ok(Self { socket, target })
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }

    /// Encodes and sends one datagram; returns the payload size.
    pub async fn send(&self, snapshot: &Snapshot) -> Result<usize, TransportError> {
        let payload = encode(snapshot)?;
        self.socket
            .send_to(&payload, self.target)
            .await
            .map_err(|source| TransportError::Send {
                target: self.target,
                source,
            })
    }

    /// Fire-and-forget send. Failures are logged and swallowed; returns whether a datagram left.
    pub async fn broadcast(&self, snapshot: &Snapshot) -> bool {
        match self.send(snapshot).await {
            Ok(bytes) => {
                tracing::trace!(bytes, target = %self.target, "snapshot sent");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, operation = "broadcast", "snapshot not sent");
                false
            }
        }
    }
}

/// Receiving half, owned by the dashboard. Never blocks.
pub struct SnapshotReceiver {
    socket: std::net::UdpSocket,
    buf: Vec<u8>,
    received: u64,
    rejected: u64,
}

impl SnapshotReceiver {
    pub fn bind(addr: impl ToSocketAddrs) -> std::io::Result<Self> {
        let socket = std::net::UdpSocket::bind(addr)?;
        socket.set_nonblocking(true)?;
        Ok(Self {
            socket,
            buf: vec![0; RECV_BUFFER_BYTES],
            received: 0,
            rejected: 0,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Datagrams decoded successfully.
    pub fn received(&self) -> u64 {
        self.received
    }

    /// Datagrams dropped as undecodable, plus receive errors.
    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    /// Takes at most one pending datagram. `None` when nothing is pending or it was unusable.
    pub fn try_receive(&mut self) -> Option<Snapshot> {
        match self.recv_one() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                self.rejected += 1;
                tracing::warn!(error = %e, operation = "try_receive", "datagram dropped");
                None
            }
        }
    }

    /// Drains everything pending and keeps the newest usable snapshot.
    pub fn try_receive_latest(&mut self) -> Option<Snapshot> {
        let mut latest = None;
        loop {
            match self.recv_one() {
                Ok(Some(snapshot)) => latest = Some(snapshot),
                Ok(None) => break,
                Err(e) => {
                    self.rejected += 1;
                    tracing::warn!(error = %e, operation = "try_receive_latest", "datagram dropped");
                    if matches!(e, TransportError::Receive(_)) {
                        break;
                    }
                }
            }
        }
        latest
    }

    fn recv_one(&mut self) -> Result<Option<Snapshot>, TransportError> {
        let (len, from) = match self.socket.recv_from(&mut self.buf) {
            Ok(r) => r,
            Err(e) if e.kind() == ErrorKind::WouldBlock => return Ok(None),
            Err(e) => return Err(TransportError::Receive(e)),
        };
        let snapshot = decode(&self.buf[..len], from)?;
        self.received += 1;
        Ok(Some(snapshot))
    }
}
