#![cfg(feature = "session")]

use std::net::SocketAddr;
use std::time::Duration;

use agnoc::frame::{encode_frame, FrameCodec};
use agnoc::protocol::payload::{DeviceTimeBody, GetTimeRsp};
use agnoc::protocol::{Id, JsonCodec, OpName, Packet, Payload};
use agnoc::robot::domain::User;
use agnoc::robot::{DeviceTimestamp, Robot, SessionRouter, USER_OFFLINE_RESULT};
use agnoc::session::SessionListener;
use bytes::BytesMut;
use futures_util::{SinkExt, StreamExt};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_util::codec::Framed;
use tokio_util::sync::CancellationToken;

const USER_ID: Id = Id::new(1);
const DEVICE_ID: Id = Id::new(7);
const STEP: Duration = Duration::from_secs(5);

struct Server {
    addr: SocketAddr,
    cancel: CancellationToken,
    robots: mpsc::UnboundedReceiver<Robot>,
    router: JoinHandle<SessionRouter>,
}

impl Server {
    async fn start() -> Self {
        let listener = SessionListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let cancel = CancellationToken::new();
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let serve_cancel = cancel.clone();
        tokio::spawn(async move { listener.serve(events_tx, serve_cancel).await });

        let (robots_tx, robots) = mpsc::unbounded_channel();
        let router = tokio::spawn(SessionRouter::new(User::new(USER_ID)).run(
            events_rx,
            cancel.clone(),
            move |robot| {
                let _ = robots_tx.send(robot.clone());
            },
        ));

        Self {
            addr,
            cancel,
            robots,
            router,
        }
    }

    async fn stop(self) -> SessionRouter {
        self.cancel.cancel();
        self.router.await.unwrap()
    }
}

struct Client {
    framed: Framed<TcpStream, FrameCodec>,
    codec: JsonCodec,
}

impl Client {
    async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.unwrap();
        Self {
            framed: Framed::new(stream, FrameCodec::default()),
            codec: JsonCodec::new(),
        }
    }

    async fn send(&mut self, packet: Packet) {
        self.framed
            .send(packet.to_frame(&self.codec).unwrap())
            .await
            .unwrap();
    }

    async fn recv(&mut self) -> Packet {
        let frame = timeout(STEP, self.framed.next())
            .await
            .expect("frame before timeout")
            .expect("stream open")
            .unwrap();
        Packet::from_frame(frame, &self.codec).unwrap()
    }

    /// Write `packet` in two TCP segments split mid-body.
    async fn send_fragmented(&mut self, packet: Packet) {
        let frame = packet.to_frame(&self.codec).unwrap();
        let mut wire = BytesMut::new();
        encode_frame(frame.opcode, &frame.body, &mut wire).unwrap();
        let (head, tail) = wire.split_at(wire.len() / 2);

        let stream = self.framed.get_mut();
        stream.write_all(head).await.unwrap();
        stream.flush().await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        stream.write_all(tail).await.unwrap();
        stream.flush().await.unwrap();
    }
}

fn heartbeat(user_id: Id) -> Packet {
    Packet::new(user_id, DEVICE_ID, OpName::ClientHeartbeatReq, Payload::Empty)
}

#[tokio::test]
async fn heartbeat_is_answered_and_creates_robot() {
    let mut server = Server::start().await;
    let mut client = Client::connect(server.addr).await;

    client.send(heartbeat(USER_ID)).await;
    let reply = client.recv().await;
    assert_eq!(reply.opname(), Some(OpName::ClientHeartbeatRsp));
    assert_eq!(reply.device_id(), DEVICE_ID);

    let robot = timeout(STEP, server.robots.recv()).await.unwrap().unwrap();
    assert_eq!(robot.device_id(), DEVICE_ID);
    assert_eq!(robot.connection_count(), 1);

    let router = server.stop().await;
    assert_eq!(router.len(), 1);
    assert!(!robot.is_connected());
}

#[tokio::test]
async fn foreign_user_is_told_target_is_offline() {
    let server = Server::start().await;
    let mut client = Client::connect(server.addr).await;

    client.send(heartbeat(Id::new(99))).await;
    let reply = client.recv().await;
    assert_eq!(reply.opname(), Some(OpName::CommonErrorReply));
    let Payload::ErrorReply(error) = reply.payload() else {
        panic!("expected error reply, got {reply}");
    };
    assert_eq!(error.result, USER_OFFLINE_RESULT);
    assert_eq!(error.opcode, OpName::ClientHeartbeatReq.code());

    server.stop().await;
}

#[tokio::test]
async fn get_time_over_tcp_with_fragmented_reply() {
    let mut server = Server::start().await;
    let mut client = Client::connect(server.addr).await;

    client.send(heartbeat(USER_ID)).await;
    client.recv().await;
    let robot = timeout(STEP, server.robots.recv()).await.unwrap().unwrap();

    let pending = tokio::spawn(async move { robot.get_time().await });

    let request = client.recv().await;
    assert_eq!(request.opname(), Some(OpName::DeviceGettimeReq));
    assert_eq!(request.user_id(), USER_ID);

    client
        .send_fragmented(request.reply(
            OpName::DeviceGettimeRsp,
            GetTimeRsp {
                body: DeviceTimeBody {
                    device_time: 1_700_000_000,
                    device_timezone: 2,
                },
            },
        ))
        .await;

    let time = timeout(STEP, pending).await.unwrap().unwrap().unwrap();
    assert_eq!(
        time,
        DeviceTimestamp {
            timestamp: 1_700_000_000_000,
            offset: 2,
        }
    );

    server.stop().await;
}
