//! One duplex byte stream to the device.
//!
//! Each connection runs a reader task and a writer task joined by a
//! `CancellationToken`. Inbound packets and the final `Closed` notice are
//! delivered, in stream order, on the event channel supplied at spawn.

use std::fmt;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use agnoc_frame::{Frame, FrameCodec};
use agnoc_protocol::{Codec, Packet};
use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::codec::{FramedRead, FramedWrite};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn, Instrument};

use crate::config::SessionConfig;

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique connection identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    fn next() -> Self {
        Self(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Something that happened on a connection.
#[derive(Debug, Clone)]
pub struct ConnectionEvent {
    pub connection: ConnectionHandle,
    pub kind: ConnectionEventKind,
}

#[derive(Debug, Clone)]
pub enum ConnectionEventKind {
    Packet(Packet),
    /// Emitted exactly once, after which the connection is dead.
    Closed,
}

struct Shared {
    id: ConnectionId,
    peer: Option<SocketAddr>,
    codec: Arc<dyn Codec>,
    outbound: mpsc::UnboundedSender<Frame>,
    cancel: CancellationToken,
    opened_at: Instant,
    // Milliseconds after `opened_at`.
    last_activity: AtomicU64,
}

/// Cheap, cloneable handle to a running connection.
#[derive(Clone)]
pub struct ConnectionHandle {
    shared: Arc<Shared>,
}

impl ConnectionHandle {
    pub fn id(&self) -> ConnectionId {
        self.shared.id
    }

    pub fn peer(&self) -> Option<SocketAddr> {
        self.shared.peer
    }

    pub fn is_closed(&self) -> bool {
        self.shared.cancel.is_cancelled()
    }

    /// Encode `packet` and queue it for the writer task.
    ///
    /// Returns `false` when the connection is closed or the packet cannot be
    /// encoded. Never blocks.
    pub fn send(&self, packet: &Packet) -> bool {
        if self.is_closed() {
            return false;
        }

        let frame = match packet.to_frame(self.shared.codec.as_ref()) {
            Ok(frame) => frame,
            Err(err) => {
                warn!(connection_id = %self.id(), opname = %packet.opcode(), error = %err, "cannot encode packet");
                return false;
            }
        };

        trace!(connection_id = %self.id(), opname = %packet.opcode(), len = frame.body.len(), "send");
        self.shared.outbound.send(frame).is_ok()
    }

    /// Force the connection closed. The reader task still emits `Closed`.
    pub fn close(&self) {
        self.shared.cancel.cancel();
    }

    /// Resolves once the connection has been closed for any reason.
    pub async fn closed(&self) {
        self.shared.cancel.cancelled().await;
    }

    /// When the last frame was received (or the connection opened).
    pub fn last_activity(&self) -> Instant {
        let ms = self.shared.last_activity.load(Ordering::Relaxed);
        self.shared.opened_at + Duration::from_millis(ms)
    }

    fn touch(&self) {
        let ms = self.shared.opened_at.elapsed().as_millis();
        self.shared
            .last_activity
            .store(u64::try_from(ms).unwrap_or(u64::MAX), Ordering::Relaxed);
    }
}

impl PartialEq for ConnectionHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for ConnectionHandle {}

impl fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionHandle")
            .field("id", &self.shared.id)
            .field("peer", &self.shared.peer)
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Spawns the I/O tasks for one byte stream.
pub struct Connection;

impl Connection {
    /// Take ownership of `stream` and start reading and writing frames.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<S>(
        stream: S,
        peer: Option<SocketAddr>,
        codec: Arc<dyn Codec>,
        config: &SessionConfig,
        events: mpsc::UnboundedSender<ConnectionEvent>,
    ) -> ConnectionHandle
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (read_half, write_half) = tokio::io::split(stream);
        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let handle = ConnectionHandle {
            shared: Arc::new(Shared {
                id: ConnectionId::next(),
                peer,
                codec,
                outbound,
                cancel: cancel.clone(),
                opened_at: Instant::now(),
                last_activity: AtomicU64::new(0),
            }),
        };

        let span = tracing::info_span!(
            "connection",
            connection_id = %handle.id(),
            peer = %peer.map_or_else(|| "-".to_string(), |p| p.to_string()),
        );

        let reader = FramedRead::new(read_half, FrameCodec::new(config.frame_config()));
        let writer = FramedWrite::new(write_half, FrameCodec::new(config.frame_config()));

        debug!(parent: &span, "connection opened");
        tokio::spawn(
            read_loop(handle.clone(), reader, config.idle_timeout, events).instrument(span.clone()),
        );
        tokio::spawn(write_loop(writer, outbound_rx, cancel).instrument(span));

        handle
    }
}

async fn read_loop<R>(
    conn: ConnectionHandle,
    mut frames: FramedRead<R, FrameCodec>,
    idle_timeout: Duration,
    events: mpsc::UnboundedSender<ConnectionEvent>,
) where
    R: AsyncRead + Unpin,
{
    let cancel = conn.shared.cancel.clone();

    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("closed locally");
                break;
            }
            next = tokio::time::timeout(idle_timeout, frames.next()) => next,
        };

        let frame = match next {
            Err(_) => {
                info!(idle_ms = idle_timeout.as_millis() as u64, "idle timeout");
                break;
            }
            Ok(None) => {
                debug!("stream ended");
                break;
            }
            Ok(Some(Err(err))) => {
                warn!(error = %err, "malformed frame");
                break;
            }
            Ok(Some(Ok(frame))) => frame,
        };

        conn.touch();

        let packet = match Packet::from_frame(frame, conn.shared.codec.as_ref()) {
            Ok(packet) => packet,
            Err(err) => {
                warn!(error = %err, "undecodable packet");
                break;
            }
        };

        trace!(opname = %packet.opcode(), user_id = %packet.user_id(), device_id = %packet.device_id(), "recv");
        let event = ConnectionEvent {
            connection: conn.clone(),
            kind: ConnectionEventKind::Packet(packet),
        };
        if events.send(event).is_err() {
            debug!("event receiver dropped");
            break;
        }
    }

    cancel.cancel();
    let _ = events.send(ConnectionEvent {
        connection: conn,
        kind: ConnectionEventKind::Closed,
    });
}

async fn write_loop<W>(
    mut sink: FramedWrite<W, FrameCodec>,
    mut outbound: mpsc::UnboundedReceiver<Frame>,
    cancel: CancellationToken,
) where
    W: AsyncWrite + Unpin,
{
    loop {
        let frame = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            frame = outbound.recv() => match frame {
                Some(frame) => frame,
                None => break,
            },
        };

        if let Err(err) = sink.send(frame).await {
            warn!(error = %err, "write failed");
            cancel.cancel();
            break;
        }
    }

    let _ = sink.close().await;
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use agnoc_frame::{encode_frame, FrameCodec};
    use agnoc_protocol::payload::{DeviceTimeBody, GetTimeRsp, ResultAck};
    use agnoc_protocol::{Id, JsonCodec, OpName, Opcode, Payload};
    use bytes::{BufMut, BytesMut};
    use tokio::io::{AsyncWriteExt, DuplexStream};
    use tokio_util::codec::FramedRead;

    use super::*;

    fn spawn(config: SessionConfig) -> (
        ConnectionHandle,
        DuplexStream,
        mpsc::UnboundedReceiver<ConnectionEvent>,
    ) {
        let (local, remote) = tokio::io::duplex(1024);
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = Connection::spawn(local, None, Arc::new(JsonCodec), &config, tx);
        (handle, remote, rx)
    }

    fn gettime_wire() -> Vec<u8> {
        let packet = Packet::new(
            Id::new(0),
            Id::new(7),
            OpName::DeviceGettimeRsp,
            GetTimeRsp {
                body: DeviceTimeBody {
                    device_time: 1_700_000_000,
                    device_timezone: 2,
                },
            },
        );
        let frame = packet.to_frame(&JsonCodec).unwrap();
        let mut buf = BytesMut::new();
        encode_frame(frame.opcode, &frame.body, &mut buf).unwrap();
        buf.to_vec()
    }

    #[tokio::test]
    async fn fragmented_frame_yields_exactly_one_packet() {
        let wire = gettime_wire();

        for chunk_size in [1, 2, 3, 5, 11, wire.len()] {
            let (_handle, mut remote, mut rx) = spawn(SessionConfig::default());

            for chunk in wire.chunks(chunk_size) {
                remote.write_all(chunk).await.unwrap();
                remote.flush().await.unwrap();
                tokio::task::yield_now().await;
            }
            drop(remote);

            let first = rx.recv().await.unwrap();
            match first.kind {
                ConnectionEventKind::Packet(packet) => {
                    assert_eq!(packet.opname(), Some(OpName::DeviceGettimeRsp));
                    assert_eq!(packet.device_id(), Id::new(7));
                    assert_eq!(
                        packet.payload(),
                        &Payload::GetTime(GetTimeRsp {
                            body: DeviceTimeBody {
                                device_time: 1_700_000_000,
                                device_timezone: 2,
                            },
                        }),
                        "chunk {chunk_size}"
                    );
                }
                other => panic!("expected packet, got {other:?}"),
            }

            let second = rx.recv().await.unwrap();
            assert!(matches!(second.kind, ConnectionEventKind::Closed), "chunk {chunk_size}");
            assert!(rx.recv().await.is_none());
        }
    }

    #[tokio::test]
    async fn send_writes_one_frame_per_packet_in_order() {
        let (handle, remote, _rx) = spawn(SessionConfig::default());

        let first = Packet::new(Id::new(1), Id::new(2), OpName::ClientHeartbeatRsp, Payload::Empty);
        let second = first.reply(OpName::DeviceWorkstatusReportRsp, ResultAck::OK);
        assert!(handle.send(&first));
        assert!(handle.send(&second));

        let mut frames = FramedRead::new(remote, FrameCodec::default());
        let a = Packet::from_frame(frames.next().await.unwrap().unwrap(), &JsonCodec).unwrap();
        let b = Packet::from_frame(frames.next().await.unwrap().unwrap(), &JsonCodec).unwrap();
        assert_eq!(a, first);
        assert_eq!(b, second);
    }

    #[tokio::test]
    async fn unknown_opcode_is_delivered_not_fatal() {
        let (handle, mut remote, mut rx) = spawn(SessionConfig::default());

        let mut body = BytesMut::new();
        body.put_u32_le(0);
        body.put_u32_le(3);
        body.put_slice(b"\x01\x02");
        let mut wire = BytesMut::new();
        encode_frame(0xfff0, &body, &mut wire).unwrap();
        remote.write_all(&wire).await.unwrap();

        let event = rx.recv().await.unwrap();
        assert!(matches!(
            event.kind,
            ConnectionEventKind::Packet(ref p) if p.opcode() == Opcode::Unknown(0xfff0)
        ));
        assert!(!handle.is_closed());
    }

    #[tokio::test]
    async fn short_body_closes_connection() {
        let (handle, mut remote, mut rx) = spawn(SessionConfig::default());

        let mut wire = BytesMut::new();
        encode_frame(0x07d5, &[0, 0, 0], &mut wire).unwrap();
        remote.write_all(&wire).await.unwrap();

        let event = rx.recv().await.unwrap();
        assert!(matches!(event.kind, ConnectionEventKind::Closed));
        assert!(handle.is_closed());
        assert!(!handle.send(&Packet::new(
            Id::ZERO,
            Id::ZERO,
            OpName::ClientHeartbeatRsp,
            Payload::Empty
        )));
    }

    #[tokio::test(start_paused = true)]
    async fn idle_connection_is_closed() {
        let config = SessionConfig {
            idle_timeout: Duration::from_secs(60),
            ..SessionConfig::default()
        };
        let (handle, _remote, mut rx) = spawn(config);

        let started = Instant::now();
        let event = rx.recv().await.unwrap();
        assert!(matches!(event.kind, ConnectionEventKind::Closed));
        assert!(started.elapsed() >= Duration::from_secs(60));
        assert!(handle.is_closed());
    }

    #[tokio::test]
    async fn local_close_emits_closed_once() {
        let (handle, _remote, mut rx) = spawn(SessionConfig::default());
        handle.close();
        handle.closed().await;

        let event = rx.recv().await.unwrap();
        assert_eq!(event.connection, handle);
        assert!(matches!(event.kind, ConnectionEventKind::Closed));
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn ids_are_unique() {
        let (a, _ra, _rxa) = spawn(SessionConfig::default());
        let (b, _rb, _rxb) = spawn(SessionConfig::default());
        assert_ne!(a.id(), b.id());
        assert_ne!(a, b);
    }
}
