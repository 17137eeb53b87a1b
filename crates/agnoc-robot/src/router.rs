use std::collections::HashMap;

use agnoc_protocol::Id;
use agnoc_session::{ConnectionEvent, ConnectionEventKind, ConnectionId};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::RobotConfig;
use crate::domain::{DeviceModel, User};
use crate::registry::DeviceRegistry;
use crate::robot::Robot;

/// Routes connection events from a listener to one [`Robot`] per device.
///
/// A connection is bound to the device id of the first packet that names
/// one. Later packets with a zero device id follow that binding.
#[derive(Debug)]
pub struct SessionRouter {
    registry: DeviceRegistry,
    robots: HashMap<Id, Robot>,
    routes: HashMap<ConnectionId, Id>,
    user: User,
    model: DeviceModel,
    config: RobotConfig,
}

impl SessionRouter {
    pub fn new(user: User) -> Self {
        Self {
            registry: DeviceRegistry::new(),
            robots: HashMap::new(),
            routes: HashMap::new(),
            user,
            model: DeviceModel::default(),
            config: RobotConfig::default(),
        }
    }

    /// Model assumed for newly seen devices.
    pub fn with_model(mut self, model: DeviceModel) -> Self {
        self.model = model;
        self
    }

    pub fn with_config(mut self, config: RobotConfig) -> Self {
        self.config = config;
        self
    }

    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    pub fn robot(&self, id: Id) -> Option<&Robot> {
        self.robots.get(&id)
    }

    pub fn robots(&self) -> impl Iterator<Item = &Robot> {
        self.robots.values()
    }

    pub fn len(&self) -> usize {
        self.robots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.robots.is_empty()
    }

    /// Deliver one event. Returns the robot when this event created it.
    pub fn handle_event(&mut self, event: ConnectionEvent) -> Option<Robot> {
        let connection_id = event.connection.id();

        let addressed = match &event.kind {
            ConnectionEventKind::Packet(packet) => Some((packet.device_id(), packet.opcode())),
            ConnectionEventKind::Closed => None,
        };

        let Some((addressed, opcode)) = addressed else {
            match self.routes.remove(&connection_id) {
                Some(device_id) => {
                    if let Some(robot) = self.robots.get(&device_id) {
                        robot.handle_event(event);
                    }
                }
                None => debug!(%connection_id, "unrouted connection closed"),
            }
            return None;
        };

        let device_id = if !addressed.is_zero() {
            addressed
        } else if let Some(device_id) = self.routes.get(&connection_id) {
            *device_id
        } else {
            debug!(%connection_id, opname = %opcode, "dropping packet without device id");
            return None;
        };

        self.routes.insert(connection_id, device_id);

        let mut created = None;
        let robot = self.robots.entry(device_id).or_insert_with(|| {
            let device = self.registry.get_or_insert(device_id, self.model);
            let robot = Robot::new(device, self.user, self.config.clone());
            info!(%device_id, %connection_id, "new device session");
            created = Some(robot.clone());
            robot
        });
        robot.handle_event(event);

        created
    }

    /// Drain `events` until the channel closes or `cancel` fires, then
    /// disconnect every robot. `on_new` sees each robot as it is created.
    pub async fn run(
        mut self,
        mut events: mpsc::UnboundedReceiver<ConnectionEvent>,
        cancel: CancellationToken,
        mut on_new: impl FnMut(&Robot),
    ) -> Self {
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                event = events.recv() => match event {
                    Some(event) => {
                        if let Some(robot) = self.handle_event(event) {
                            on_new(&robot);
                        }
                    }
                    None => break,
                },
            }
        }

        for robot in self.robots.values() {
            robot.disconnect();
        }
        debug!(robots = self.robots.len(), "router stopped");
        self
    }
}
