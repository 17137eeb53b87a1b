use agnoc_protocol::{OpName, Packet};
use tracing::debug;

use crate::connection::{ConnectionHandle, ConnectionId};
use crate::waiter::{Waiter, WaiterRegistry};

/// Most links one device keeps open at a time.
pub const MAX_CONNECTIONS: usize = 2;

/// The live connections of one device plus its pending response waiters.
#[derive(Debug, Default)]
pub struct Multiplexer {
    connections: Vec<ConnectionHandle>,
    waiters: WaiterRegistry,
}

impl Multiplexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track `connection`.
    ///
    /// Returns `false`, leaving the set unchanged, when the connection is
    /// already tracked or the set is full.
    pub fn add_connection(&mut self, connection: ConnectionHandle) -> bool {
        if self.connections.iter().any(|c| c.id() == connection.id()) {
            return false;
        }
        if self.connections.len() >= MAX_CONNECTIONS {
            debug!(connection_id = %connection.id(), "multiplexer full, rejecting connection");
            return false;
        }

        self.connections.push(connection);
        true
    }

    /// Forget `id`. Losing the last connection cancels every pending waiter.
    pub fn remove_connection(&mut self, id: ConnectionId) -> bool {
        let before = self.connections.len();
        self.connections.retain(|c| c.id() != id);
        let removed = self.connections.len() != before;

        if removed && self.connections.is_empty() && !self.waiters.is_empty() {
            debug!(pending = self.waiters.len(), "last connection gone, cancelling waiters");
            self.waiters.cancel_all();
        }
        removed
    }

    pub fn has_connections(&self) -> bool {
        !self.connections.is_empty()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn connections(&self) -> &[ConnectionHandle] {
        &self.connections
    }

    /// Write `packet` to the first live connection. `false` means no I/O
    /// happened.
    pub fn send(&self, packet: &Packet) -> bool {
        self.connections
            .iter()
            .find(|c| !c.is_closed())
            .is_some_and(|c| c.send(packet))
    }

    /// Wait for the next packet of `opname` from any connection.
    pub fn once(&mut self, opname: OpName) -> Waiter {
        self.waiters.register(opname)
    }

    pub fn resolve(&mut self, packet: &Packet) -> bool {
        self.waiters.resolve(packet)
    }

    pub fn pending_waiters(&self) -> usize {
        self.waiters.len()
    }

    /// Close and discard every connection; pending waiters fail.
    pub fn close(&mut self) {
        for connection in self.connections.drain(..) {
            connection.close();
        }
        self.waiters.cancel_all();
    }
}

impl Drop for Multiplexer {
    fn drop(&mut self) {
        self.close();
    }
}
