use agnoc_protocol::payload::{
    AllGlobalMapInfoReq, AreaCleanReq, AreaListReq, AutoCleanReq, CarpetModeReq, ChargeReq,
    CleanArea, CleanPreferenceReq, GlobalInfoReq, ManualCtrlReq,
    NavigationReq, OrderDeleteReq, OrderSetReq, Point, QuietHoursSetting, SaveWaitingMapReq,
    WithRoomsCleanReq,
};
use agnoc_protocol::{Id, OpName, Payload};
use serde::Serialize;
use tracing::debug;

use crate::domain::{
    ConsumableType, Coordinate, DeviceConsumable, DeviceMode, DeviceModel, DeviceOrder,
    DeviceTime, DeviceWlan, FanSpeed, ManualMode, Position, QuietHours, Room,
};
use crate::error::{DomainError, Result, RobotError};
use crate::robot::{Robot, RobotEvent};

const MAP_MASK: u32 = 0x78ff;
const C3090_MAP_MASK: u32 = 0xff;
const ZONE_MASK: u32 = 0x100;
const SPOT_MASK: u32 = 0x200;
const MOP_MASK: u32 = 0x400;

const CTRL_STOP: u32 = 0;
const CTRL_START: u32 = 1;
const CTRL_PAUSE: u32 = 2;
const CLEAN_TYPE_AUTO: u32 = 2;

/// Device clock as reported by `DEVICE_GETTIME_RSP`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeviceTimestamp {
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    /// Timezone offset as sent by the device.
    pub offset: i32,
}

fn to_points(coordinates: &[Coordinate]) -> Vec<Point> {
    coordinates.iter().map(|c| Point { x: c.x, y: c.y }).collect()
}

fn to_areas(areas: &[Vec<Coordinate>]) -> Vec<CleanArea> {
    areas.iter().map(|coords| CleanArea::new(to_points(coords))).collect()
}

impl Robot {
    fn map_mask(&self) -> u32 {
        match self.model() {
            DeviceModel::C3090 => C3090_MAP_MASK,
            _ => MAP_MASK,
        }
    }

    fn map_id(&self) -> Option<Id> {
        self.device().read(|device| device.map().map(|map| map.id))
    }

    async fn request(&self, send: OpName, recv: OpName, payload: impl Into<Payload>) -> Result<()> {
        self.send_recv(send, recv, payload).await.map(drop)
    }

    async fn auto_clean(&self, ctrl_value: u32) -> Result<()> {
        self.request(
            OpName::DeviceAutoCleanReq,
            OpName::DeviceAutoCleanRsp,
            AutoCleanReq {
                ctrl_value,
                clean_type: CLEAN_TYPE_AUTO,
            },
        )
        .await
    }

    async fn area_clean(&self, ctrl_value: u32) -> Result<()> {
        self.request(
            OpName::DeviceAreaCleanReq,
            OpName::DeviceAreaCleanRsp,
            AreaCleanReq { ctrl_value },
        )
        .await
    }

    async fn navigate(&self, map_id: Id, target: Position, ctrl_value: u32) -> Result<()> {
        self.request(
            OpName::DeviceMapidSetNavigationReq,
            OpName::DeviceMapidSetNavigationRsp,
            NavigationReq {
                map_head_id: map_id,
                pose_x: target.x,
                pose_y: target.y,
                pose_phi: target.phi,
                ctrl_value,
            },
        )
        .await
    }

    async fn request_map(&self, mask: u32) -> Result<()> {
        self.request(
            OpName::DeviceMapidGetGlobalInfoReq,
            OpName::DeviceMapidGetGlobalInfoRsp,
            GlobalInfoReq { mask },
        )
        .await
    }

    // Start and stop follow whatever cleaning the device is set up for.
    async fn clean_control(&self, ctrl_value: u32) -> Result<()> {
        let spot = self.device().read(|device| {
            device
                .map()
                .and_then(|map| map.current_spot.map(|spot| (map.id, spot)))
        });

        match (self.mode(), spot) {
            (Some(DeviceMode::Zone), _) => self.area_clean(ctrl_value).await,
            (Some(DeviceMode::Spot), Some((map_id, spot))) => {
                self.navigate(map_id, spot, ctrl_value).await
            }
            _ => self.auto_clean(ctrl_value).await,
        }
    }

    pub async fn start(&self) -> Result<()> {
        self.clean_control(CTRL_START).await
    }

    pub async fn stop(&self) -> Result<()> {
        self.clean_control(CTRL_PAUSE).await
    }

    /// Send the device back to its dock.
    pub async fn home(&self) -> Result<()> {
        self.request(
            OpName::DeviceChargeReq,
            OpName::DeviceChargeRsp,
            ChargeReq { enable: 1 },
        )
        .await
    }

    /// Make the device play its locator sound.
    pub async fn locate(&self) -> Result<()> {
        self.request(
            OpName::DeviceSeekLocationReq,
            OpName::DeviceSeekLocationRsp,
            Payload::Empty,
        )
        .await
    }

    pub async fn set_fan_speed(&self, speed: FanSpeed) -> Result<()> {
        self.request(
            OpName::DeviceSetCleanPreferenceReq,
            OpName::DeviceSetCleanPreferenceRsp,
            CleanPreferenceReq { mode: speed.code() },
        )
        .await
    }

    pub async fn get_time(&self) -> Result<DeviceTimestamp> {
        let packet = self
            .send_recv(OpName::DeviceGettimeReq, OpName::DeviceGettimeRsp, Payload::Empty)
            .await?;
        let Payload::GetTime(rsp) = packet.payload() else {
            return Err(RobotError::UnexpectedPayload(OpName::DeviceGettimeRsp));
        };

        let timestamp = rsp
            .body
            .device_time
            .checked_mul(1000)
            .ok_or(RobotError::UnexpectedPayload(OpName::DeviceGettimeRsp))?;

        Ok(DeviceTimestamp {
            timestamp,
            offset: rsp.body.device_timezone,
        })
    }

    pub async fn get_consumables(&self) -> Result<Vec<DeviceConsumable>> {
        let packet = self
            .send_recv(
                OpName::DeviceMapidGetConsumablesParamReq,
                OpName::DeviceMapidGetConsumablesParamRsp,
                Payload::Empty,
            )
            .await?;
        let Payload::Consumables(rsp) = packet.payload() else {
            return Err(RobotError::UnexpectedPayload(
                OpName::DeviceMapidGetConsumablesParamRsp,
            ));
        };

        let consumables = vec![
            DeviceConsumable {
                kind: ConsumableType::MainBrush,
                used: rsp.main_brush_time,
            },
            DeviceConsumable {
                kind: ConsumableType::SideBrush,
                used: rsp.side_brush_time,
            },
            DeviceConsumable {
                kind: ConsumableType::Filter,
                used: rsp.filter_time,
            },
            DeviceConsumable {
                kind: ConsumableType::Dishcloth,
                used: rsp.dishcloth_time,
            },
        ];

        let stored = consumables.clone();
        self.device()
            .update(|device| device.update_consumables(stored));
        Ok(consumables)
    }

    /// Always fails: the reset request has never been seen on the wire, so
    /// its opcode is not registered.
    pub async fn reset_consumable(&self, consumable: ConsumableType) -> Result<()> {
        debug!(
            consumable = ?consumable,
            item_id = consumable.reset_item_id(),
            "consumable reset has no wire code"
        );
        Err(RobotError::Unsupported {
            command: "reset_consumable",
            opname: "DEVICE_MAPID_SET_CONSUMABLES_PARAM_REQ",
        })
    }

    /// Ask for a full map push. The map itself arrives through the push
    /// handler.
    pub async fn update_map(&self) -> Result<()> {
        self.request_map(self.map_mask()).await
    }

    pub async fn get_wlan(&self) -> Result<DeviceWlan> {
        let packet = self
            .send_recv(
                OpName::DeviceWlanInfoGettingReq,
                OpName::DeviceWlanInfoGettingRsp,
                Payload::Empty,
            )
            .await?;
        let Payload::Wlan(rsp) = packet.payload() else {
            return Err(RobotError::UnexpectedPayload(OpName::DeviceWlanInfoGettingRsp));
        };

        let wlan = DeviceWlan {
            ipv4: rsp.body.ipv4.clone(),
            ssid: rsp.body.ssid.clone(),
            port: rsp.body.port,
            mask: rsp.body.mask.clone(),
            mac: rsp.body.mac.clone(),
        };
        let stored = wlan.clone();
        self.device().update(|device| device.update_wlan(stored));
        self.emit(RobotEvent::DeviceUpdated);
        Ok(wlan)
    }

    pub async fn enter_manual_mode(&self) -> Result<()> {
        self.auto_clean(CTRL_STOP).await?;
        self.set_manual_mode(ManualMode::Init).await
    }

    pub async fn leave_manual_mode(&self) -> Result<()> {
        self.auto_clean(CTRL_PAUSE).await
    }

    pub async fn set_manual_mode(&self, mode: ManualMode) -> Result<()> {
        self.request(
            OpName::DeviceManualCtrlReq,
            OpName::DeviceManualCtrlRsp,
            ManualCtrlReq {
                command: mode.code(),
            },
        )
        .await
    }

    pub async fn get_orders(&self) -> Result<Vec<DeviceOrder>> {
        let packet = self
            .send_recv(
                OpName::DeviceOrderlistGettingReq,
                OpName::DeviceOrderlistGettingRsp,
                Payload::Empty,
            )
            .await?;
        let Payload::OrderList(rsp) = packet.payload() else {
            return Err(RobotError::UnexpectedPayload(OpName::DeviceOrderlistGettingRsp));
        };

        let orders = rsp
            .order_list
            .iter()
            .flatten()
            .map(DeviceOrder::from_entry)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let stored = orders.clone();
        self.device().update(|device| device.update_orders(stored));
        Ok(orders)
    }

    pub async fn set_order(&self, order: &DeviceOrder) -> Result<()> {
        self.request(
            OpName::DeviceOrderlistSettingReq,
            OpName::DeviceOrderlistSettingRsp,
            OrderSetReq {
                mode: 0,
                order: order.to_entry(),
            },
        )
        .await
    }

    pub async fn delete_order(&self, order: &DeviceOrder) -> Result<()> {
        self.request(
            OpName::DeviceOrderlistSettingReq,
            OpName::DeviceOrderlistSettingRsp,
            OrderDeleteReq {
                order_id: order.id,
                mode: 1,
            },
        )
        .await
    }

    /// Drive to `position`, switching the device to spot mode first.
    pub async fn clean_position(&self, position: Position) -> Result<()> {
        let map_id = self
            .map_id()
            .ok_or(DomainError::MapNotLoaded("unable to set robot position"))?;

        if self.mode() != Some(DeviceMode::Spot) {
            self.request_map(self.map_mask() | SPOT_MASK).await?;
            self.wait_for_mode(DeviceMode::Spot, "position").await?;
        }

        self.navigate(map_id, position, CTRL_START).await
    }

    /// Clean the given polygons. Does nothing until a map is loaded.
    ///
    /// ```text
    /// A ┌───┐ D
    ///   │   │
    /// B └───┘ C
    /// ```
    pub async fn clean_areas(&self, areas: &[Vec<Coordinate>]) -> Result<()> {
        let Some(map_id) = self.map_id() else {
            debug!("clean_areas without a map, skipping");
            return Ok(());
        };

        if self.mode() != Some(DeviceMode::Zone) {
            self.area_clean(CTRL_STOP).await?;
            self.request_map(self.map_mask() | ZONE_MASK).await?;
            self.wait_for_mode(DeviceMode::Zone, "area").await?;
        }

        self.request(
            OpName::DeviceMapidSetAreaCleanInfoReq,
            OpName::DeviceMapidSetAreaCleanInfoRsp,
            AreaListReq::new(map_id, to_areas(areas)),
        )
        .await?;
        self.area_clean(CTRL_START).await
    }

    /// Start a mopping run, switching the device to mop mode first.
    pub async fn clean_mop(&self) -> Result<()> {
        if self.mode() != Some(DeviceMode::Mop) {
            self.request_map(self.map_mask() | MOP_MASK).await?;
            self.wait_for_mode(DeviceMode::Mop, "mop").await?;
        }

        self.auto_clean(CTRL_START).await
    }

    /// Replace the restricted zones. An empty list clears them.
    pub async fn set_restricted_zones(&self, areas: &[Vec<Coordinate>]) -> Result<()> {
        let Some(map_id) = self.map_id() else {
            debug!("set_restricted_zones without a map, skipping");
            return Ok(());
        };

        let mut areas = to_areas(areas);
        if areas.is_empty() {
            areas.push(CleanArea::new(Vec::new()));
        }

        self.request(
            OpName::DeviceMapidSetAreaRestrictedInfoReq,
            OpName::DeviceMapidSetAreaRestrictedInfoRsp,
            AreaListReq::new(map_id, areas),
        )
        .await
    }

    pub async fn get_quiet_hours(&self) -> Result<QuietHours> {
        let packet = self
            .send_recv(
                OpName::UserGetDeviceQuiethoursReq,
                OpName::UserGetDeviceQuiethoursRsp,
                Payload::Empty,
            )
            .await?;
        let Payload::QuietHours(rsp) = packet.payload() else {
            return Err(RobotError::UnexpectedPayload(OpName::UserGetDeviceQuiethoursRsp));
        };

        let quiet_hours = QuietHours {
            is_enabled: rsp.is_open,
            begin: DeviceTime::from_minutes(rsp.begin_time)?,
            end: DeviceTime::from_minutes(rsp.end_time)?,
        };
        self.device().update(|device| {
            if let Some(config) = device.config_mut() {
                config.update_quiet_hours(quiet_hours);
            }
        });
        Ok(quiet_hours)
    }

    pub async fn set_quiet_hours(&self, quiet_hours: QuietHours) -> Result<()> {
        self.request(
            OpName::UserSetDeviceQuiethoursReq,
            OpName::UserSetDeviceQuiethoursRsp,
            QuietHoursSetting {
                is_open: quiet_hours.is_enabled,
                begin_time: quiet_hours.begin.to_minutes(),
                end_time: quiet_hours.end.to_minutes(),
            },
        )
        .await
    }

    pub async fn set_carpet_mode(&self, enable: bool) -> Result<()> {
        self.request(
            OpName::UserSetDeviceCleanpreferenceReq,
            OpName::UserSetDeviceCleanpreferenceRsp,
            CarpetModeReq {
                carpet_turbo: enable,
            },
        )
        .await?;

        self.device().update(|device| {
            if let Some(config) = device.config_mut() {
                config.update_carpet_mode(enable);
            }
        });
        Ok(())
    }

    /// Drop the map the device is holding for confirmation.
    pub async fn discard_waiting_map(&self) -> Result<()> {
        self.request(
            OpName::DeviceMapidSetSavewaitingmapInfoReq,
            OpName::DeviceMapidSetSavewaitingmapInfoRsp,
            SaveWaitingMapReq { mode: 0 },
        )
        .await
    }

    /// Clean the given rooms. Room ids travel as single bytes.
    pub async fn clean_rooms(&self, rooms: &[Room]) -> Result<()> {
        let room_id_list = rooms
            .iter()
            .map(|room| {
                u8::try_from(room.id.value()).map_err(|_| {
                    DomainError::InvalidArgument(format!("room id {} out of range", room.id))
                })
            })
            .collect::<std::result::Result<Vec<u8>, _>>()?;

        self.request(
            OpName::DeviceWithroomsCleanReq,
            OpName::DeviceWithroomsCleanRsp,
            WithRoomsCleanReq {
                ctrl_value: CTRL_START,
                clean_type: CLEAN_TYPE_AUTO,
                room_number: room_id_list.len() as u32,
                room_id_list,
            },
        )
        .await
    }

    pub async fn control_lock(&self) -> Result<()> {
        self.request(
            OpName::DeviceControlLockReq,
            OpName::DeviceControlLockRsp,
            Payload::Empty,
        )
        .await
    }

    /// Session setup once both device links are up.
    ///
    /// Only the control lock is awaited; the follow-up queries run in the
    /// background and fail independently.
    pub async fn handshake(&self) -> Result<()> {
        self.control_lock().await?;

        self.send(OpName::DeviceStatusGettingReq, Payload::Empty);
        self.send(
            OpName::DeviceGetAllGlobalMapInfoReq,
            AllGlobalMapInfoReq {
                unk1: 0,
                unk2: String::new(),
            },
        );

        let robot = self.clone();
        self.spawn_command("get_time", async move { robot.get_time().await });
        let robot = self.clone();
        self.spawn_command("update_map", async move { robot.update_map().await });
        let robot = self.clone();
        self.spawn_command("get_orders", async move { robot.get_orders().await });
        let robot = self.clone();
        self.spawn_command("get_consumables", async move {
            robot.get_consumables().await
        });
        let robot = self.clone();
        self.spawn_command("get_wlan", async move { robot.get_wlan().await });

        debug!("handshake complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use agnoc_protocol::payload::{
        ConsumablesRsp, MapHeadInfo, MapInfo, OrderCleanInfo, OrderEntry, OrderListRsp,
        WorkStatusPush,
    };

    use super::*;
    use crate::config::RobotConfig;
    use crate::domain::{DeviceMapUpdate, DeviceStatus, MapHeader};
    use crate::error::DomainError;
    use crate::test_support::{self, FakeDevice};

    const MAP_ID: Id = Id::new(3);

    fn load_map(robot: &Robot) {
        let header = MapHeader {
            id: MAP_ID,
            size: Coordinate::new(10.0, 10.0),
            min: Coordinate::new(-5.0, -5.0),
            max: Coordinate::new(5.0, 5.0),
        };
        assert!(robot.device().update(|device| device.update_map(DeviceMapUpdate {
            header: Some(header),
            ..DeviceMapUpdate::default()
        })));
    }

    fn set_mode(robot: &Robot, mode: DeviceMode) {
        robot.update_status(DeviceStatus {
            mode: Some(mode),
            ..DeviceStatus::default()
        });
    }

    fn spawn<T: Send + 'static>(
        robot: &Robot,
        command: impl FnOnce(Robot) -> tokio::task::JoinHandle<Result<T>>,
    ) -> tokio::task::JoinHandle<Result<T>> {
        command(robot.clone())
    }

    // Proves nothing else was queued ahead of it.
    async fn assert_idle(robot: &Robot, device: &mut FakeDevice) {
        robot.send(OpName::ClientHeartbeatRsp, Payload::Empty);
        device.expect(OpName::ClientHeartbeatRsp).await;
    }

    #[tokio::test]
    async fn start_follows_zone_mode() {
        let (robot, mut device, _events) = test_support::connected(RobotConfig::default());
        set_mode(&robot, DeviceMode::Zone);

        let task = spawn(&robot, |r| tokio::spawn(async move { r.start().await }));
        let request = device
            .answer(OpName::DeviceAreaCleanReq, OpName::DeviceAreaCleanRsp, Payload::Empty)
            .await;
        assert_eq!(
            request.payload(),
            &Payload::AreaClean(AreaCleanReq { ctrl_value: 1 })
        );
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn stop_navigates_in_spot_mode_with_spot() {
        let (robot, mut device, _events) = test_support::connected(RobotConfig::default());
        load_map(&robot);
        robot.device().update(|device| {
            if let Some(map) = device.map_mut() {
                map.current_spot = Some(Position::new(1.0, 2.0, 0.5));
            }
        });
        set_mode(&robot, DeviceMode::Spot);

        let task = spawn(&robot, |r| tokio::spawn(async move { r.stop().await }));
        let request = device
            .answer(
                OpName::DeviceMapidSetNavigationReq,
                OpName::DeviceMapidSetNavigationRsp,
                Payload::Empty,
            )
            .await;
        assert_eq!(
            request.payload(),
            &Payload::Navigation(NavigationReq {
                map_head_id: MAP_ID,
                pose_x: 1.0,
                pose_y: 2.0,
                pose_phi: 0.5,
                ctrl_value: 2,
            })
        );
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn start_defaults_to_auto_clean() {
        let (robot, mut device, _events) = test_support::connected(RobotConfig::default());
        // Spot mode without a spot falls through.
        set_mode(&robot, DeviceMode::Spot);

        let task = spawn(&robot, |r| tokio::spawn(async move { r.start().await }));
        let request = device
            .answer(OpName::DeviceAutoCleanReq, OpName::DeviceAutoCleanRsp, Payload::Empty)
            .await;
        assert_eq!(
            request.payload(),
            &Payload::AutoClean(AutoCleanReq {
                ctrl_value: 1,
                clean_type: 2,
            })
        );
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn clean_areas_without_map_sends_nothing() {
        let (robot, mut device, _events) = test_support::connected(RobotConfig::default());

        robot.clean_areas(&[]).await.unwrap();
        robot.set_restricted_zones(&[]).await.unwrap();
        assert_idle(&robot, &mut device).await;
    }

    #[tokio::test]
    async fn clean_position_without_map_is_a_domain_error() {
        let (robot, mut device, _events) = test_support::connected(RobotConfig::default());

        let err = robot
            .clean_position(Position::new(0.0, 0.0, 0.0))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RobotError::Domain(DomainError::MapNotLoaded(_))
        ));
        assert_idle(&robot, &mut device).await;
    }

    #[tokio::test]
    async fn clean_areas_switches_to_zone_mode() {
        let (robot, mut device, _events) = test_support::connected(RobotConfig::default());
        load_map(&robot);

        let task = spawn(&robot, |r| {
            tokio::spawn(async move {
                r.clean_areas(&[vec![
                    Coordinate::new(0.0, 0.0),
                    Coordinate::new(0.0, 1.0),
                    Coordinate::new(1.0, 1.0),
                    Coordinate::new(1.0, 0.0),
                ]])
                .await
            })
        });

        let request = device
            .answer(OpName::DeviceAreaCleanReq, OpName::DeviceAreaCleanRsp, Payload::Empty)
            .await;
        assert_eq!(
            request.payload(),
            &Payload::AreaClean(AreaCleanReq { ctrl_value: 0 })
        );

        let request = device
            .answer(
                OpName::DeviceMapidGetGlobalInfoReq,
                OpName::DeviceMapidGetGlobalInfoRsp,
                MapInfo::default(),
            )
            .await;
        assert_eq!(
            request.payload(),
            &Payload::GlobalInfo(GlobalInfoReq { mask: 0x78ff | 0x100 })
        );

        device
            .push(
                OpName::DeviceMapidWorkStatusPushReq,
                WorkStatusPush {
                    battery: 150,
                    fault_type: 0,
                    work_mode: 20,
                    charge_status: false,
                    clean_preference: 2,
                    clean_size: 0,
                    clean_time: 0,
                    fault_code: None,
                    water_level: None,
                },
            )
            .await;

        let request = device
            .answer(
                OpName::DeviceMapidSetAreaCleanInfoReq,
                OpName::DeviceMapidSetAreaCleanInfoRsp,
                Payload::Empty,
            )
            .await;
        let Payload::AreaList(areas) = request.payload() else {
            panic!("unexpected payload {:?}", request.payload());
        };
        assert_eq!(areas.map_head_id, MAP_ID);
        assert_eq!(areas.clean_area_length, 1);
        assert_eq!(areas.clean_area_list[0].coordinate_length, 4);

        let request = device
            .answer(OpName::DeviceAreaCleanReq, OpName::DeviceAreaCleanRsp, Payload::Empty)
            .await;
        assert_eq!(
            request.payload(),
            &Payload::AreaClean(AreaCleanReq { ctrl_value: 1 })
        );
        task.await.unwrap().unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn mode_change_times_out() {
        let (robot, mut device, _events) = test_support::connected(RobotConfig::default());
        load_map(&robot);

        let task = spawn(&robot, |r| {
            tokio::spawn(async move { r.clean_position(Position::new(1.0, 1.0, 0.0)).await })
        });
        let request = device
            .answer(
                OpName::DeviceMapidGetGlobalInfoReq,
                OpName::DeviceMapidGetGlobalInfoRsp,
                MapInfo::default(),
            )
            .await;
        assert_eq!(
            request.payload(),
            &Payload::GlobalInfo(GlobalInfoReq { mask: 0x78ff | 0x200 })
        );

        let started = tokio::time::Instant::now();
        let err = task.await.unwrap().unwrap_err();
        assert!(matches!(
            err,
            RobotError::Domain(DomainError::ModeChange("position"))
        ));
        assert!(started.elapsed() >= Duration::from_millis(4900));
    }

    #[tokio::test]
    async fn clean_mop_skips_switch_when_already_mopping() {
        let (robot, mut device, _events) = test_support::connected(RobotConfig::default());
        set_mode(&robot, DeviceMode::Mop);

        let task = spawn(&robot, |r| tokio::spawn(async move { r.clean_mop().await }));
        device
            .answer(OpName::DeviceAutoCleanReq, OpName::DeviceAutoCleanRsp, Payload::Empty)
            .await;
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn c3090_uses_short_map_mask() {
        let (robot, mut device, _events) = test_support::connected(RobotConfig::default());
        robot.device().update(|device| *device = crate::domain::Device::new(device.id(), DeviceModel::C3090));

        let task = spawn(&robot, |r| tokio::spawn(async move { r.update_map().await }));
        let request = device
            .answer(
                OpName::DeviceMapidGetGlobalInfoReq,
                OpName::DeviceMapidGetGlobalInfoRsp,
                MapInfo::default(),
            )
            .await;
        assert_eq!(request.payload(), &Payload::GlobalInfo(GlobalInfoReq { mask: 0xff }));
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn empty_restricted_zones_clear_with_one_empty_area() {
        let (robot, mut device, _events) = test_support::connected(RobotConfig::default());
        load_map(&robot);

        let task = spawn(&robot, |r| {
            tokio::spawn(async move { r.set_restricted_zones(&[]).await })
        });
        let request = device
            .answer(
                OpName::DeviceMapidSetAreaRestrictedInfoReq,
                OpName::DeviceMapidSetAreaRestrictedInfoRsp,
                Payload::Empty,
            )
            .await;
        let Payload::AreaList(areas) = request.payload() else {
            panic!("unexpected payload {:?}", request.payload());
        };
        assert_eq!(areas.clean_area_length, 1);
        assert!(areas.clean_area_list[0].coordinate_list.is_empty());
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn clean_rooms_rejects_wide_ids_before_sending() {
        let (robot, mut device, _events) = test_support::connected(RobotConfig::default());
        let room = Room {
            id: Id::new(300),
            name: "hall".to_string(),
            center: Coordinate::default(),
            pixels: Vec::new(),
        };

        let err = robot.clean_rooms(&[room]).await.unwrap_err();
        assert!(matches!(
            err,
            RobotError::Domain(DomainError::InvalidArgument(_))
        ));
        assert_idle(&robot, &mut device).await;
    }

    #[tokio::test]
    async fn clean_rooms_sends_ids_as_bytes() {
        let (robot, mut device, _events) = test_support::connected(RobotConfig::default());
        let rooms: Vec<Room> = [2, 5]
            .into_iter()
            .map(|id| Room {
                id: Id::new(id),
                name: format!("room {id}"),
                center: Coordinate::default(),
                pixels: Vec::new(),
            })
            .collect();

        let task = spawn(&robot, |r| tokio::spawn(async move { r.clean_rooms(&rooms).await }));
        let request = device
            .answer(
                OpName::DeviceWithroomsCleanReq,
                OpName::DeviceWithroomsCleanRsp,
                Payload::Empty,
            )
            .await;
        assert_eq!(
            request.payload(),
            &Payload::WithRoomsClean(WithRoomsCleanReq {
                ctrl_value: 1,
                clean_type: 2,
                room_number: 2,
                room_id_list: vec![2, 5],
            })
        );
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn consumables_and_orders_update_device() {
        let (robot, mut device, _events) = test_support::connected(RobotConfig::default());

        let task = spawn(&robot, |r| tokio::spawn(async move { r.get_consumables().await }));
        device
            .answer(
                OpName::DeviceMapidGetConsumablesParamReq,
                OpName::DeviceMapidGetConsumablesParamRsp,
                ConsumablesRsp {
                    main_brush_time: 10,
                    side_brush_time: 20,
                    filter_time: 30,
                    dishcloth_time: 40,
                },
            )
            .await;
        let consumables = task.await.unwrap().unwrap();
        assert_eq!(consumables[3].kind, ConsumableType::Dishcloth);
        assert_eq!(consumables[3].used, 40);
        assert_eq!(robot.device().read(|d| d.consumables().len()), 4);

        let entry = OrderEntry {
            order_id: Id::new(9),
            enable: true,
            repeat: false,
            week_day: 0b10,
            day_time: 8 * 60,
            clean_info: OrderCleanInfo {
                map_head_id: MAP_ID,
                plan_id: 0,
                clean_mode: 0,
                wind_power: 2,
                water_level: 0,
                twice_clean: false,
            },
        };
        let task = spawn(&robot, |r| tokio::spawn(async move { r.get_orders().await }));
        device
            .answer(
                OpName::DeviceOrderlistGettingReq,
                OpName::DeviceOrderlistGettingRsp,
                OrderListRsp {
                    order_list: Some(vec![entry.clone()]),
                },
            )
            .await;
        let orders = task.await.unwrap().unwrap();
        assert_eq!(orders[0].fan_speed, FanSpeed::Medium);
        assert_eq!(robot.device().read(|d| d.orders().to_vec()), orders);

        let order = orders[0];
        let task = spawn(&robot, |r| tokio::spawn(async move { r.delete_order(&order).await }));
        let request = device
            .answer(
                OpName::DeviceOrderlistSettingReq,
                OpName::DeviceOrderlistSettingRsp,
                Payload::Empty,
            )
            .await;
        assert_eq!(
            request.payload(),
            &Payload::OrderDelete(OrderDeleteReq {
                order_id: Id::new(9),
                mode: 1,
            })
        );
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn reset_consumable_fails_without_sending() {
        let (robot, mut device, _events) = test_support::connected(RobotConfig::default());

        let err = robot
            .reset_consumable(ConsumableType::Filter)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RobotError::Unsupported {
                command: "reset_consumable",
                ..
            }
        ));
        assert!(agnoc_protocol::lookup_code("DEVICE_MAPID_SET_CONSUMABLES_PARAM_REQ").is_err());
        assert_idle(&robot, &mut device).await;
    }

    #[tokio::test]
    async fn enter_manual_mode_stops_then_inits() {
        let (robot, mut device, _events) = test_support::connected(RobotConfig::default());

        let task = spawn(&robot, |r| tokio::spawn(async move { r.enter_manual_mode().await }));
        let stop = device
            .answer(OpName::DeviceAutoCleanReq, OpName::DeviceAutoCleanRsp, Payload::Empty)
            .await;
        assert_eq!(
            stop.payload(),
            &Payload::AutoClean(AutoCleanReq {
                ctrl_value: 0,
                clean_type: 2,
            })
        );
        let init = device
            .answer(OpName::DeviceManualCtrlReq, OpName::DeviceManualCtrlRsp, Payload::Empty)
            .await;
        assert_eq!(init.payload(), &Payload::ManualCtrl(ManualCtrlReq { command: 10 }));
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn map_push_loads_map() {
        let (robot, mut device, _events) = test_support::connected(RobotConfig::default());
        let mut updates = robot.subscribe();

        device
            .push(
                OpName::DeviceMapidPushMapInfo,
                MapInfo {
                    map_head_info: Some(MapHeadInfo {
                        map_head_id: MAP_ID,
                        size_x: 4.0,
                        size_y: 4.0,
                        min_x: 0.0,
                        min_y: 0.0,
                        max_x: 4.0,
                        max_y: 4.0,
                    }),
                    ..MapInfo::default()
                },
            )
            .await;
        test_support::next_event(&mut updates, RobotEvent::MapUpdated).await;

        assert_eq!(robot.device().read(|d| d.map().map(|m| m.id)), Some(MAP_ID));
    }
}
