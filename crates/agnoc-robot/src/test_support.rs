//! A scripted device on the far end of an in-memory link.

use std::sync::Arc;

use agnoc_frame::FrameCodec;
use agnoc_protocol::{Id, JsonCodec, OpName, Packet, Payload};
use agnoc_session::{Connection, ConnectionEvent, ConnectionHandle, SessionConfig};
use futures_util::{SinkExt, StreamExt};
use tokio::io::{DuplexStream, ReadHalf, WriteHalf};
use tokio::sync::{broadcast, mpsc};
use tokio_util::codec::{FramedRead, FramedWrite};

use crate::config::RobotConfig;
use crate::domain::{Device, DeviceModel, User};
use crate::registry::DeviceHandle;
use crate::robot::{Robot, RobotEvent};

pub const USER_ID: Id = Id::new(1);
pub const DEVICE_ID: Id = Id::new(7);

pub fn robot(config: RobotConfig) -> (Robot, mpsc::UnboundedSender<ConnectionEvent>) {
    let device = DeviceHandle::new(Device::new(DEVICE_ID, DeviceModel::C3490));
    let robot = Robot::new(device, User::new(USER_ID), config);
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(robot.clone().run(rx));
    (robot, tx)
}

pub fn link(events: &mpsc::UnboundedSender<ConnectionEvent>) -> (ConnectionHandle, FakeDevice) {
    let (local, remote) = tokio::io::duplex(64 * 1024);
    let handle = Connection::spawn(
        local,
        None,
        Arc::new(JsonCodec),
        &SessionConfig::default(),
        events.clone(),
    );
    let (read_half, write_half) = tokio::io::split(remote);
    let device = FakeDevice {
        reader: FramedRead::new(read_half, FrameCodec::default()),
        writer: FramedWrite::new(write_half, FrameCodec::default()),
    };
    (handle, device)
}

/// A connected robot with one link already tracked.
pub fn connected(config: RobotConfig) -> (Robot, FakeDevice, mpsc::UnboundedSender<ConnectionEvent>) {
    let (robot, events) = robot(config);
    let (handle, device) = link(&events);
    assert!(robot.add_connection(handle));
    (robot, device, events)
}

pub struct FakeDevice {
    reader: FramedRead<ReadHalf<DuplexStream>, FrameCodec>,
    writer: FramedWrite<WriteHalf<DuplexStream>, FrameCodec>,
}

impl FakeDevice {
    pub async fn push_packet(&mut self, packet: Packet) {
        let frame = packet.to_frame(&JsonCodec).unwrap();
        self.writer.send(frame).await.unwrap();
    }

    /// Push as the session user.
    pub async fn push(&mut self, opname: OpName, payload: impl Into<Payload>) {
        self.push_packet(Packet::new(USER_ID, DEVICE_ID, opname, payload))
            .await;
    }

    pub async fn next(&mut self) -> Packet {
        let frame = self.reader.next().await.unwrap().unwrap();
        Packet::from_frame(frame, &JsonCodec).unwrap()
    }

    pub async fn expect(&mut self, opname: OpName) -> Packet {
        let packet = self.next().await;
        assert_eq!(packet.opname(), Some(opname), "got {packet}");
        packet
    }

    /// Wait for `request` and answer it with `response`.
    pub async fn answer(&mut self, request: OpName, response: OpName, payload: impl Into<Payload>) -> Packet {
        let packet = self.expect(request).await;
        self.push_packet(packet.reply(response, payload)).await;
        packet
    }
}

pub async fn next_event(events: &mut broadcast::Receiver<RobotEvent>, wanted: RobotEvent) {
    loop {
        if events.recv().await.unwrap() == wanted {
            return;
        }
    }
}
