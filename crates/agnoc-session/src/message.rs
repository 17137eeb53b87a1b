use agnoc_protocol::{OpName, Packet, Payload};

use crate::connection::ConnectionHandle;

/// An inbound packet together with the connection it arrived on.
#[derive(Debug, Clone)]
pub struct Message {
    packet: Packet,
    connection: ConnectionHandle,
}

impl Message {
    pub fn new(packet: Packet, connection: ConnectionHandle) -> Self {
        Self { packet, connection }
    }

    pub fn packet(&self) -> &Packet {
        &self.packet
    }

    pub fn connection(&self) -> &ConnectionHandle {
        &self.connection
    }

    pub fn opname(&self) -> Option<OpName> {
        self.packet.opname()
    }

    /// Reply on the originating connection, reusing the packet's user and
    /// device ids.
    pub fn respond(&self, opname: OpName, payload: impl Into<Payload>) -> bool {
        self.connection.send(&self.packet.reply(opname, payload))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use agnoc_frame::FrameCodec;
    use agnoc_protocol::payload::ResultAck;
    use agnoc_protocol::{Id, JsonCodec};
    use futures_util::StreamExt;
    use tokio::sync::mpsc;
    use tokio_util::codec::FramedRead;

    use super::*;
    use crate::config::SessionConfig;
    use crate::connection::Connection;

    #[tokio::test]
    async fn respond_uses_origin_connection_and_ids() {
        let (local, remote) = tokio::io::duplex(1024);
        let (tx, _rx) = mpsc::unbounded_channel();
        let conn = Connection::spawn(local, None, Arc::new(JsonCodec), &SessionConfig::default(), tx);

        let inbound = Packet::new(
            Id::new(3),
            Id::new(4),
            OpName::DeviceWorkstatusReportReq,
            Payload::Empty,
        );
        let message = Message::new(inbound, conn.clone());
        assert_eq!(message.opname(), Some(OpName::DeviceWorkstatusReportReq));
        assert!(message.respond(OpName::DeviceWorkstatusReportRsp, ResultAck::OK));

        let mut frames = FramedRead::new(remote, FrameCodec::default());
        let reply = Packet::from_frame(frames.next().await.unwrap().unwrap(), &JsonCodec).unwrap();
        assert_eq!(reply.user_id(), Id::new(3));
        assert_eq!(reply.device_id(), Id::new(4));
        assert_eq!(reply.payload(), &Payload::Ack(ResultAck::OK));

        conn.close();
        assert!(!message.respond(OpName::DeviceWorkstatusReportRsp, ResultAck::OK));
    }
}
