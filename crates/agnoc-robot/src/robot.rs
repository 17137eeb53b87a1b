use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use agnoc_protocol::payload::ErrorReply;
use agnoc_protocol::{Id, OpName, Packet, Payload};
use agnoc_session::{
    ConnectionEvent, ConnectionEventKind, ConnectionHandle, Message, Multiplexer, SessionError,
    Waiter,
};
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{debug, info, warn, Instrument, Span};

use crate::config::RobotConfig;
use crate::domain::{DeviceMode, DeviceModel, DeviceStatus, User};
use crate::error::{DomainError, Result, RobotError};
use crate::handlers::{self, Handler};
use crate::registry::DeviceHandle;

/// Result code of the reply to a packet addressed to another user.
pub const USER_OFFLINE_RESULT: i32 = 11001;
pub const USER_OFFLINE_ERROR: &str = "Target user is offline";

/// Change notifications for observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RobotEvent {
    DeviceUpdated,
    MapUpdated,
}

struct RobotInner {
    device: DeviceHandle,
    user: User,
    config: RobotConfig,
    multiplexer: Mutex<Multiplexer>,
    handlers: HashMap<OpName, Handler>,
    events: broadcast::Sender<RobotEvent>,
    mode: watch::Sender<Option<DeviceMode>>,
    // Requests awaiting the same response opname go one at a time.
    request_locks: Mutex<HashMap<OpName, Arc<tokio::sync::Mutex<()>>>>,
    span: Span,
}

/// Session with one device.
///
/// Cheap to clone; all clones drive the same session.
#[derive(Clone)]
pub struct Robot {
    inner: Arc<RobotInner>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Robot {
    pub fn new(device: DeviceHandle, user: User, config: RobotConfig) -> Self {
        let span = tracing::info_span!("robot", device_id = %device.id());
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        let mode = device.read(|d| d.status().and_then(|s| s.mode));
        let (mode, _) = watch::channel(mode);

        debug!(parent: &span, user_id = %user.id, "new robot");
        Self {
            inner: Arc::new(RobotInner {
                device,
                user,
                config,
                multiplexer: Mutex::new(Multiplexer::new()),
                handlers: handlers::table(),
                events,
                mode,
                request_locks: Mutex::new(HashMap::new()),
                span,
            }),
        }
    }

    pub fn device(&self) -> &DeviceHandle {
        &self.inner.device
    }

    pub fn device_id(&self) -> Id {
        self.inner.device.id()
    }

    pub fn user(&self) -> User {
        self.inner.user
    }

    pub fn config(&self) -> &RobotConfig {
        &self.inner.config
    }

    pub(crate) fn span(&self) -> &Span {
        &self.inner.span
    }

    pub(crate) fn model(&self) -> DeviceModel {
        self.inner.device.read(|d| d.system().model)
    }

    pub(crate) fn mode(&self) -> Option<DeviceMode> {
        *self.inner.mode.borrow()
    }

    fn multiplexer(&self) -> MutexGuard<'_, Multiplexer> {
        lock(&self.inner.multiplexer)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RobotEvent> {
        self.inner.events.subscribe()
    }

    pub(crate) fn emit(&self, event: RobotEvent) {
        // No subscribers is fine.
        let _ = self.inner.events.send(event);
    }

    pub fn is_connected(&self) -> bool {
        self.multiplexer().has_connections()
    }

    pub fn connection_count(&self) -> usize {
        self.multiplexer().connection_count()
    }

    /// Track `connection`. The handshake runs once, when the device's
    /// second link arrives.
    pub fn add_connection(&self, connection: ConnectionHandle) -> bool {
        let id = connection.id();
        let (added, count) = {
            let mut mux = self.multiplexer();
            let added = mux.add_connection(connection);
            (added, mux.connection_count())
        };

        if added {
            info!(parent: self.span(), connection_id = %id, count, "connection added");
            if count == 2 {
                self.spawn_command("handshake", {
                    let robot = self.clone();
                    async move { robot.handshake().await }
                });
            }
        }
        added
    }

    pub fn remove_connection(&self, connection: &ConnectionHandle) -> bool {
        let removed = self.multiplexer().remove_connection(connection.id());
        if removed {
            info!(parent: self.span(), connection_id = %connection.id(), "connection removed");
        }
        removed
    }

    /// Route one connection event into the session.
    pub fn handle_event(&self, event: ConnectionEvent) {
        let ConnectionEvent { connection, kind } = event;
        match kind {
            ConnectionEventKind::Closed => {
                self.remove_connection(&connection);
            }
            ConnectionEventKind::Packet(packet) => {
                self.add_connection(connection.clone());
                if self.is_authorized(&packet) {
                    self.multiplexer().resolve(&packet);
                }
                self.handle_message(&Message::new(packet, connection));
            }
        }
    }

    /// Drain `events` until every sender is gone.
    pub async fn run(self, mut events: mpsc::UnboundedReceiver<ConnectionEvent>) {
        while let Some(event) = events.recv().await {
            self.handle_event(event);
        }
        debug!(parent: self.span(), "event stream ended");
    }

    fn is_authorized(&self, packet: &Packet) -> bool {
        let user_id = packet.user_id();
        user_id.is_zero() || user_id == self.inner.user.id
    }

    /// Authorize and dispatch one inbound message.
    ///
    /// A packet for another user gets the fixed offline reply and reaches no
    /// handler.
    pub fn handle_message(&self, message: &Message) {
        let packet = message.packet();
        if !self.is_authorized(packet) {
            debug!(
                parent: self.span(),
                user_id = %packet.user_id(),
                opname = %packet.opcode(),
                "rejecting packet for foreign user"
            );
            message.respond(
                OpName::CommonErrorReply,
                ErrorReply {
                    result: USER_OFFLINE_RESULT,
                    error: USER_OFFLINE_ERROR.to_string(),
                    opcode: packet.opcode().code(),
                },
            );
            return;
        }

        match message.opname().and_then(|op| self.inner.handlers.get(&op)) {
            Some(handler) => {
                let _enter = self.inner.span.enter();
                handler(self, message);
            }
            None => debug!(parent: self.span(), opname = %packet.opcode(), "unhandled opcode"),
        }
    }

    fn packet(&self, opname: OpName, payload: Payload) -> Packet {
        Packet::new(self.inner.user.id, self.device_id(), opname, payload)
    }

    /// Fire-and-forget. `false` when no connection took the packet.
    pub fn send(&self, opname: OpName, payload: impl Into<Payload>) -> bool {
        let packet = self.packet(opname, payload.into());
        self.multiplexer().send(&packet)
    }

    /// Wait for the next packet of `opname`.
    pub async fn recv(&self, opname: OpName) -> Result<Packet> {
        let waiter = self.multiplexer().once(opname);
        self.await_response(opname, waiter).await
    }

    /// Send a request and wait for its response.
    ///
    /// The waiter is registered before the request goes out, so a fast reply
    /// cannot be missed.
    pub async fn send_recv(
        &self,
        send: OpName,
        recv: OpName,
        payload: impl Into<Payload>,
    ) -> Result<Packet> {
        let packet = self.packet(send, payload.into());
        let request_lock = self.request_lock(recv);
        let _serialized = request_lock.lock().await;

        let waiter = {
            let mut mux = self.multiplexer();
            let waiter = mux.once(recv);
            if !mux.send(&packet) {
                return Err(SessionError::NoConnection.into());
            }
            waiter
        };

        debug!(parent: self.span(), send = %send, recv = %recv, "request sent");
        self.await_response(recv, waiter).await
    }

    fn request_lock(&self, opname: OpName) -> Arc<tokio::sync::Mutex<()>> {
        Arc::clone(lock(&self.inner.request_locks).entry(opname).or_default())
    }

    async fn await_response(&self, opname: OpName, waiter: Waiter) -> Result<Packet> {
        let result = match self.inner.config.response_timeout {
            Some(timeout) => tokio::time::timeout(timeout, waiter)
                .await
                .map_err(|_| RobotError::Timeout { opname, timeout })?,
            None => waiter.await,
        };
        Ok(result?)
    }

    /// Merge a status update into the device and publish the new mode.
    pub(crate) fn update_status(&self, update: DeviceStatus) {
        let mode = self.inner.device.update(|device| {
            device.update_status(update);
            device.status().and_then(|s| s.mode)
        });
        self.inner.mode.send_replace(mode);
        self.emit(RobotEvent::DeviceUpdated);
    }

    /// Wait until the device reports `target`, bounded by the mode-change
    /// timeout.
    pub(crate) async fn wait_for_mode(&self, target: DeviceMode, label: &'static str) -> Result<()> {
        let mut rx = self.inner.mode.subscribe();
        let reached = tokio::time::timeout(
            self.inner.config.mode_change_timeout,
            rx.wait_for(|mode| *mode == Some(target)),
        )
        .await;

        match reached {
            Ok(Ok(_)) => Ok(()),
            _ => Err(DomainError::ModeChange(label).into()),
        }
    }

    /// Run a command in the background, logging its failure.
    pub(crate) fn spawn_command<T, F>(&self, name: &'static str, command: F)
    where
        F: Future<Output = Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        tokio::spawn(
            async move {
                if let Err(err) = command.await {
                    warn!(command = name, error = %err, "background command failed");
                }
            }
            .instrument(self.inner.span.clone()),
        );
    }

    /// Close every connection. Pending responses fail with `Cancelled`.
    pub fn disconnect(&self) {
        debug!(parent: self.span(), "disconnecting");
        self.multiplexer().close();
    }
}

impl std::fmt::Debug for Robot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Robot")
            .field("device_id", &self.device_id())
            .field("user_id", &self.inner.user.id)
            .field("connections", &self.connection_count())
            .finish()
    }
}
