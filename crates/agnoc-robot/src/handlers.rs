//! Inbound message handlers, one per pushed or requested opcode.
//!
//! Handlers run on the event worker: they update the device, answer with the
//! fixed ack and return without awaiting. Work that needs a response from the
//! device is spawned onto the runtime.

use std::collections::HashMap;

use agnoc_protocol::payload::{
    AgentSetting, BinDataReportRsp, EventReportRsp, ResultAck, UnkAck,
};
use agnoc_protocol::{OpName, Payload};
use agnoc_session::Message;
use tracing::{debug, warn};

use crate::domain::{DeviceConfig, DeviceStatus, DeviceTime, QuietHours, Voice};
use crate::error::DomainError;
use crate::mappers;
use crate::robot::{Robot, RobotEvent};

pub(crate) type Handler = fn(&Robot, &Message);

const HANDLERS: &[(OpName, Handler)] = &[
    (OpName::ClientHeartbeatReq, client_heartbeat),
    (OpName::DeviceMapidGetGlobalInfoRsp, map_update),
    (OpName::DeviceMapidPushMapInfo, map_update),
    (OpName::DeviceMapidPushChargePositionInfo, charge_position),
    (OpName::DeviceMapidPushPositionInfo, robot_position),
    (OpName::DeviceMapidWorkStatusPushReq, work_status),
    (OpName::DeviceVersionInfoUpdateReq, version_info),
    (OpName::PushDeviceAgentSettingReq, agent_setting),
    (OpName::PushDeviceBatteryInfoReq, battery_info),
    (OpName::PushDevicePackageUpgradeInfoReq, package_upgrade),
    (OpName::DeviceMapidPushHasWaitingBeSaved, waiting_map),
    (OpName::DeviceWorkstatusReportReq, workstatus_report),
    (OpName::DeviceEventReportCleantask, report_cleantask),
    (OpName::DeviceEventReportCleanmap, report_cleanmap),
    (OpName::DeviceCleanmapBindataReportReq, bindata_report),
    (OpName::DeviceEventReportReq, event_report),
];

pub(crate) fn table() -> HashMap<OpName, Handler> {
    HANDLERS.iter().copied().collect()
}

fn unexpected(message: &Message) {
    warn!(
        opname = %message.packet().opcode(),
        "payload does not match opcode, ignoring"
    );
}

fn client_heartbeat(_robot: &Robot, message: &Message) {
    message.respond(OpName::ClientHeartbeatRsp, Payload::Empty);
}

fn map_update(robot: &Robot, message: &Message) {
    let Payload::MapInfo(info) = message.packet().payload() else {
        return unexpected(message);
    };

    if let Some(status) = &info.status_info {
        robot.update_status(mappers::status_from_info(status));
    }

    let update = mappers::map_update(info);
    if !robot.device().update(|device| device.update_map(update)) {
        debug!("map push without header before any map, ignoring");
    }
    robot.emit(RobotEvent::MapUpdated);
}

fn robot_position(robot: &Robot, message: &Message) {
    let Payload::Pose(pose) = message.packet().payload() else {
        return unexpected(message);
    };

    let position = mappers::position(pose);
    let updated = robot.device().update(|device| {
        device.map_mut().map(|map| map.update_robot(position)).is_some()
    });
    if updated {
        robot.emit(RobotEvent::MapUpdated);
    }
}

fn charge_position(robot: &Robot, message: &Message) {
    let Payload::Pose(pose) = message.packet().payload() else {
        return unexpected(message);
    };

    let position = mappers::position(pose);
    let updated = robot.device().update(|device| {
        device
            .map_mut()
            .map(|map| map.update_charger(position))
            .is_some()
    });
    if updated {
        robot.emit(RobotEvent::MapUpdated);
    }
}

fn work_status(robot: &Robot, message: &Message) {
    let Payload::WorkStatus(push) = message.packet().payload() else {
        return unexpected(message);
    };
    robot.update_status(mappers::status_from_push(push));
}

fn version_info(robot: &Robot, message: &Message) {
    if let Payload::VersionInfo(info) = message.packet().payload() {
        let (software, hardware) = (info.software_version.clone(), info.hardware_version.clone());
        robot
            .device()
            .update(|device| device.update_system(software, hardware));
        robot.emit(RobotEvent::DeviceUpdated);
    } else {
        unexpected(message);
    }

    message.respond(OpName::DeviceVersionInfoUpdateRsp, ResultAck::OK);
}

fn device_config(setting: &AgentSetting) -> Result<DeviceConfig, DomainError> {
    let prefs = setting.clean_preference;
    Ok(DeviceConfig {
        voice: Voice {
            is_enabled: setting.voice.voice_mode,
            volume: setting.voice.volume.unwrap_or(0),
        },
        quiet_hours: QuietHours {
            is_enabled: setting.quiet_hours.is_open,
            begin: DeviceTime::from_minutes(setting.quiet_hours.begin_time)?,
            end: DeviceTime::from_minutes(setting.quiet_hours.end_time)?,
        },
        is_eco_mode_enabled: prefs.eco_mode.unwrap_or(false),
        is_repeat_clean_enabled: prefs.repeat_clean.unwrap_or(false),
        is_broken_clean_enabled: prefs.clean_broken.unwrap_or(false),
        is_carpet_mode_enabled: prefs.carpet_turbo.unwrap_or(false),
        is_history_map_enabled: prefs.history_map.unwrap_or(false),
    })
}

fn agent_setting(robot: &Robot, message: &Message) {
    match message.packet().payload() {
        Payload::AgentSetting(setting) => match device_config(setting) {
            Ok(config) => robot.device().update(|device| device.update_config(config)),
            Err(err) => warn!(error = %err, "ignoring agent setting"),
        },
        _ => unexpected(message),
    }

    message.respond(OpName::PushDeviceAgentSettingRsp, ResultAck::OK);
}

fn battery_info(robot: &Robot, message: &Message) {
    message.respond(OpName::PushDeviceBatteryInfoRsp, ResultAck::OK);

    // Level pushes only refine a status we already have.
    if robot.device().read(|device| device.status().is_none()) {
        return;
    }

    let Payload::BatteryInfo(info) = message.packet().payload() else {
        return unexpected(message);
    };

    match mappers::battery(info.battery.level) {
        Ok(battery) => robot.update_status(DeviceStatus {
            battery: Some(battery),
            ..DeviceStatus::default()
        }),
        Err(err) => warn!(error = %err, "ignoring battery push"),
    }
}

fn package_upgrade(_robot: &Robot, message: &Message) {
    message.respond(OpName::PushDevicePackageUpgradeInfoRsp, ResultAck::OK);
}

fn waiting_map(robot: &Robot, _message: &Message) {
    let task = robot.clone();
    robot.spawn_command("discard_waiting_map", async move {
        task.discard_waiting_map().await
    });
}

fn workstatus_report(_robot: &Robot, message: &Message) {
    message.respond(OpName::DeviceWorkstatusReportRsp, ResultAck::OK);
}

fn report_cleantask(_robot: &Robot, message: &Message) {
    message.respond(OpName::Unk11a4, UnkAck { unk1: 0 });
}

fn report_cleanmap(_robot: &Robot, message: &Message) {
    let Payload::CleanmapReport(report) = message.packet().payload() else {
        return unexpected(message);
    };
    message.respond(
        OpName::DeviceEventReportRsp,
        EventReportRsp {
            result: 0,
            body: *report,
        },
    );
}

fn bindata_report(_robot: &Robot, message: &Message) {
    let Payload::CleanmapReport(report) = message.packet().payload() else {
        return unexpected(message);
    };
    message.respond(
        OpName::DeviceCleanmapBindataReportRsp,
        BinDataReportRsp {
            result: 0,
            clean_id: report.clean_id,
        },
    );
}

fn event_report(_robot: &Robot, message: &Message) {
    message.respond(OpName::Unk11a7, UnkAck { unk1: 0 });
}
